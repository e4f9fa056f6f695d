//! Repair report text.
use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

const PLACEHOLDER: &str = "-";

/// Free-text fields filled in by the technician.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub client_name: String,
    pub vehicle_id: String,
    pub client_says: String,
    pub confirmed_cause: String,
    pub actions_done: String,
    pub parts_used: String,
    pub final_test: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    ClientName,
    VehicleId,
    ClientSays,
    ConfirmedCause,
    ActionsDone,
    PartsUsed,
    FinalTest,
}

impl ReportField {
    pub const ALL: [ReportField; 7] = [
        ReportField::ClientName,
        ReportField::VehicleId,
        ReportField::ClientSays,
        ReportField::ConfirmedCause,
        ReportField::ActionsDone,
        ReportField::PartsUsed,
        ReportField::FinalTest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportField::ClientName => "client",
            ReportField::VehicleId => "vehicle",
            ReportField::ClientSays => "says",
            ReportField::ConfirmedCause => "confirmed",
            ReportField::ActionsDone => "actions",
            ReportField::PartsUsed => "parts",
            ReportField::FinalTest => "test",
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportField {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let field = match raw.trim().to_lowercase().as_str() {
            "client" | "cliente" => ReportField::ClientName,
            "vehicle" | "veicolo" => ReportField::VehicleId,
            "says" | "segnalazione" => ReportField::ClientSays,
            "confirmed" | "causa" => ReportField::ConfirmedCause,
            "actions" | "azioni" => ReportField::ActionsDone,
            "parts" | "ricambi" => ReportField::PartsUsed,
            "test" | "esito" => ReportField::FinalTest,
            other => {
                let known: Vec<&str> = ReportField::ALL.iter().map(|f| f.name()).collect();
                return Err(anyhow!(
                    "unknown report field {other:?} (expected one of: {})",
                    known.join(", ")
                ));
            }
        };
        Ok(field)
    }
}

impl ReportForm {
    pub fn set(&mut self, field: ReportField, value: &str) {
        let slot = match field {
            ReportField::ClientName => &mut self.client_name,
            ReportField::VehicleId => &mut self.vehicle_id,
            ReportField::ClientSays => &mut self.client_says,
            ReportField::ConfirmedCause => &mut self.confirmed_cause,
            ReportField::ActionsDone => &mut self.actions_done,
            ReportField::PartsUsed => &mut self.parts_used,
            ReportField::FinalTest => &mut self.final_test,
        };
        *slot = value.to_string();
    }
}

/// Workflow selection shown in the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSelection<'a> {
    pub procedure_title: Option<&'a str>,
    pub cause_name: Option<&'a str>,
}

/// Form fields are trimmed; blank ones print the placeholder.
fn or_placeholder(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

/// Selection names print exactly as loaded.
fn selected_or_placeholder(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or(PLACEHOLDER)
}

/// Timestamp in the `dd/mm/yyyy, hh:mm:ss` form used on the report.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

pub fn build_report_text(form: &ReportForm, selection: ReportSelection<'_>, timestamp: &str) -> String {
    let procedure = selected_or_placeholder(selection.procedure_title);
    let cause = selected_or_placeholder(selection.cause_name);
    [
        "OFFICINAPLUS – RELAZIONE TECNICA DI RIPARAZIONE".to_string(),
        "--------------------------------------------------".to_string(),
        format!("Data/Ora: {timestamp}"),
        String::new(),
        format!("Cliente: {}", or_placeholder(&form.client_name)),
        format!("Veicolo: {}", or_placeholder(&form.vehicle_id)),
        String::new(),
        "SEGNALAZIONE CLIENTE (parole sue):".to_string(),
        or_placeholder(&form.client_says).to_string(),
        String::new(),
        "PERCORSO SELEZIONATO:".to_string(),
        format!("Procedura: {procedure}"),
        format!("Causa scelta: {cause}"),
        String::new(),
        "CAUSA CONFERMATA (a fine diagnosi):".to_string(),
        or_placeholder(&form.confirmed_cause).to_string(),
        String::new(),
        "AZIONI ESEGUITE:".to_string(),
        or_placeholder(&form.actions_done).to_string(),
        String::new(),
        "RICAMBI UTILIZZATI:".to_string(),
        or_placeholder(&form.parts_used).to_string(),
        String::new(),
        "TEST FINALE / ESITO:".to_string(),
        or_placeholder(&form.final_test).to_string(),
        String::new(),
        "FIRMA OFFICINA: ___________________________".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
