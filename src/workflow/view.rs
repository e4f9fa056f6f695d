//! Render projection of the session.
//!
//! Views are built from state and procedures only; front-ends never read the
//! state directly.
use super::state::{Stage, WorkflowState};
use crate::procedures::{CauseId, Procedure};
use serde::Serialize;

pub const NO_PROCEDURE: &str = "Nessuna procedura selezionata.";
pub const NO_CHECKLIST: &str = "Nessuna checklist disponibile.";
pub const NO_REPAIR_STEPS: &str = "Nessuno step di riparazione disponibile.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub stage: Stage,
    pub procedure_title: Option<String>,
    pub causes: Vec<CauseRow>,
    pub selected_cause: Option<String>,
    pub checklist: Vec<ChecklistRow>,
    pub repair_steps: Vec<StepRow>,
    pub can_proceed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseRow {
    pub id: CauseId,
    /// 1-based position in probability order.
    pub rank: usize,
    pub name: String,
    pub percent: i64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistRow {
    pub number: usize,
    pub title: String,
    pub description: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRow {
    pub number: usize,
    pub title: String,
    pub description: String,
}

impl SessionView {
    pub fn project(state: &WorkflowState, procedures: &[Procedure]) -> Self {
        let procedure = state.selected_procedure().and_then(|idx| procedures.get(idx));
        let cause = procedure
            .zip(state.selected_cause())
            .and_then(|(procedure, id)| procedure.cause(id));

        let causes = procedure
            .map(|procedure| {
                procedure
                    .ranked_causes()
                    .into_iter()
                    .enumerate()
                    .map(|(pos, (id, cause))| CauseRow {
                        id,
                        rank: pos + 1,
                        name: cause.name.clone(),
                        percent: cause.percent(),
                        selected: state.selected_cause() == Some(id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let checks = state.checklist().unwrap_or_default();
        let checklist = cause
            .map(|cause| {
                cause
                    .verify
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| ChecklistRow {
                        number: idx + 1,
                        title: item.t.clone(),
                        description: item.description().to_string(),
                        checked: checks.get(idx).copied().unwrap_or(false),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let repair_steps = cause
            .map(|cause| {
                cause
                    .repair
                    .iter()
                    .enumerate()
                    .map(|(idx, step)| StepRow {
                        number: idx + 1,
                        title: step.t.clone(),
                        description: step.description().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            stage: state.stage(),
            procedure_title: procedure.map(|procedure| procedure.title.clone()),
            causes,
            selected_cause: cause.map(|cause| cause.name.clone()),
            checklist,
            repair_steps,
            can_proceed: state.can_proceed(),
        }
    }

    /// Plain-text rendering of the current stage with its proceed gate.
    pub fn render_text(&self) -> String {
        let mut out = self.render_section(self.stage);
        if !matches!(self.stage, Stage::Idle | Stage::ReportReady) {
            let gate = if self.can_proceed { "avanti" } else { "bloccato" };
            out.push_str(&format!("[{gate}]\n"));
        }
        out
    }

    /// Plain-text rendering of one stage's section, whatever the current stage.
    pub fn render_section(&self, stage: Stage) -> String {
        let mut out = String::new();
        match stage {
            Stage::Idle | Stage::CauseSelection => self.render_causes(&mut out),
            Stage::Verification => self.render_checklist(&mut out),
            Stage::Repair => self.render_steps(&mut out),
            Stage::ReportReady => {
                out.push_str("== Report ==\n");
                out.push_str(
                    "Compila i campi con `set <campo> <testo>` e genera con `report`.\n",
                );
            }
        }
        out
    }

    fn render_causes(&self, out: &mut String) {
        out.push_str("== Cause ==\n");
        let Some(title) = &self.procedure_title else {
            out.push_str(NO_PROCEDURE);
            out.push('\n');
            return;
        };
        out.push_str(&format!("Procedura: {title}\n"));
        for row in &self.causes {
            let marker = if row.selected { '*' } else { ' ' };
            out.push_str(&format!(
                "{marker} {}. {} (Probabilità stimata: {}%)\n",
                row.rank, row.name, row.percent
            ));
        }
    }

    fn render_checklist(&self, out: &mut String) {
        out.push_str("== Verifica ==\n");
        if self.checklist.is_empty() {
            out.push_str(NO_CHECKLIST);
            out.push('\n');
            return;
        }
        for row in &self.checklist {
            let mark = if row.checked { 'x' } else { ' ' };
            out.push_str(&format!("[{mark}] {}. {}\n", row.number, row.title));
            if !row.description.is_empty() {
                out.push_str(&format!("      {}\n", row.description));
            }
        }
    }

    fn render_steps(&self, out: &mut String) {
        out.push_str("== Riparazione ==\n");
        if self.repair_steps.is_empty() {
            out.push_str(NO_REPAIR_STEPS);
            out.push('\n');
            return;
        }
        for row in &self.repair_steps {
            out.push_str(&format!("Step {}: {}\n", row.number, row.title));
            if !row.description.is_empty() {
                out.push_str(&format!("   {}\n", row.description));
            }
        }
    }
}
