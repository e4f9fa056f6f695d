use super::*;
use chrono::{FixedOffset, TimeZone};

const LABELS: [&str; 13] = [
    "OFFICINAPLUS – RELAZIONE TECNICA DI RIPARAZIONE",
    "Data/Ora: ",
    "Cliente: ",
    "Veicolo: ",
    "SEGNALAZIONE CLIENTE (parole sue):",
    "PERCORSO SELEZIONATO:",
    "Procedura: ",
    "Causa scelta: ",
    "CAUSA CONFERMATA (a fine diagnosi):",
    "AZIONI ESEGUITE:",
    "RICAMBI UTILIZZATI:",
    "TEST FINALE / ESITO:",
    "FIRMA OFFICINA: ___________________________",
];

#[test]
fn empty_form_renders_every_label_with_placeholders() {
    let text = build_report_text(
        &ReportForm::default(),
        ReportSelection::default(),
        "01/02/2026, 09:05:00",
    );
    for label in LABELS {
        assert!(text.contains(label), "missing label {label:?}");
    }
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 27);
    assert_eq!(lines[4], "Cliente: -");
    assert_eq!(lines[5], "Veicolo: -");
    assert_eq!(lines[8], "-");
    assert_eq!(lines[11], "Procedura: -");
    assert_eq!(lines[12], "Causa scelta: -");
    for idx in [15, 18, 21, 24] {
        assert_eq!(lines[idx], "-", "line {idx}");
    }
    assert!(!text.ends_with('\n'));
}

#[test]
fn filled_form_is_trimmed_and_laid_out_in_order() {
    let mut form = ReportForm::default();
    form.set(ReportField::ClientName, "  Mario Rossi ");
    form.set(ReportField::VehicleId, "AB123CD");
    form.set(ReportField::ClientSays, "la batteria è scarica");
    form.set(ReportField::ConfirmedCause, "Batteria a fine vita");
    form.set(ReportField::ActionsDone, "Sostituita batteria");
    form.set(ReportField::PartsUsed, "Batteria 70Ah");
    form.set(ReportField::FinalTest, "   ");

    let text = build_report_text(
        &form,
        ReportSelection {
            procedure_title: Some("Motore non parte"),
            cause_name: Some("Batteria scarica"),
        },
        "16/10/2026, 14:03:22",
    );
    let expected = "\
OFFICINAPLUS – RELAZIONE TECNICA DI RIPARAZIONE
--------------------------------------------------
Data/Ora: 16/10/2026, 14:03:22

Cliente: Mario Rossi
Veicolo: AB123CD

SEGNALAZIONE CLIENTE (parole sue):
la batteria è scarica

PERCORSO SELEZIONATO:
Procedura: Motore non parte
Causa scelta: Batteria scarica

CAUSA CONFERMATA (a fine diagnosi):
Batteria a fine vita

AZIONI ESEGUITE:
Sostituita batteria

RICAMBI UTILIZZATI:
Batteria 70Ah

TEST FINALE / ESITO:
-

FIRMA OFFICINA: ___________________________";
    assert_eq!(text, expected);
}

#[test]
fn selection_names_are_printed_verbatim() {
    let text = build_report_text(
        &ReportForm::default(),
        ReportSelection {
            procedure_title: Some(" Motore non parte "),
            cause_name: Some(""),
        },
        "16/10/2026, 14:03:22",
    );
    assert!(text.contains("\nProcedura:  Motore non parte \n"));
    assert!(text.contains("\nCausa scelta: -\n"));
}

#[test]
fn timestamp_uses_day_month_year() {
    let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let at = offset
        .with_ymd_and_hms(2026, 3, 7, 8, 4, 9)
        .single()
        .expect("valid datetime");
    assert_eq!(format_timestamp(&at), "07/03/2026, 08:04:09");
}

#[test]
fn report_fields_parse_english_and_italian_names() {
    assert_eq!("client".parse::<ReportField>().expect("parse"), ReportField::ClientName);
    assert_eq!("Ricambi".parse::<ReportField>().expect("parse"), ReportField::PartsUsed);
    assert_eq!("esito".parse::<ReportField>().expect("parse"), ReportField::FinalTest);
    let err = "colour".parse::<ReportField>().expect_err("reject");
    assert!(err.to_string().contains("client, vehicle"));
}
