//! Workflow state and its transition function.
//!
//! `transition` is pure: it takes the current state, the loaded procedures
//! and a command, and returns the next state plus the narration to perform.
//! Commands whose guard fails return the state unchanged.
use crate::matcher;
use crate::procedures::{CauseId, Procedure};
use serde::Serialize;

pub const NARRATION_TO_VERIFY: &str =
    "Passa alla verifica. Completa tutti i controlli in checklist.";
pub const NARRATION_TO_REPAIR: &str = "Passa alla riparazione. Segui gli step.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    CauseSelection,
    Verification,
    Repair,
    ReportReady,
}

impl Stage {
    /// Stage reached by backward navigation, if any.
    fn previous(self) -> Option<Stage> {
        match self {
            Stage::Verification => Some(Stage::CauseSelection),
            Stage::Repair => Some(Stage::Verification),
            Stage::ReportReady => Some(Stage::Repair),
            Stage::Idle | Stage::CauseSelection => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Client complaint text; narrates the proposed procedure.
    SubmitComplaint(String),
    /// Free search box; same matching, no narration.
    Search(String),
    SelectCause(CauseId),
    ToggleChecklistItem(usize),
    Proceed,
    Back,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    Keep,
    Speak(String),
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WorkflowState,
    pub narration: Narration,
}

/// Session selection state.
///
/// `checklist` exists only once Verification has been entered for the
/// selected cause and always has one entry per verify item of that cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    stage: Stage,
    procedure: Option<usize>,
    cause: Option<CauseId>,
    checklist: Option<Vec<bool>>,
}

impl WorkflowState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected_procedure(&self) -> Option<usize> {
        self.procedure
    }

    pub fn selected_cause(&self) -> Option<CauseId> {
        self.cause
    }

    pub fn checklist(&self) -> Option<&[bool]> {
        self.checklist.as_deref()
    }

    /// True when every checklist item is checked; vacuously true for an
    /// empty checklist, false when no checklist was built.
    pub fn checklist_complete(&self) -> bool {
        self.checklist
            .as_ref()
            .is_some_and(|items| items.iter().all(|checked| *checked))
    }

    /// Whether `Proceed` would advance from the current stage.
    pub fn can_proceed(&self) -> bool {
        match self.stage {
            Stage::CauseSelection => self.cause.is_some(),
            Stage::Verification => self.cause.is_some() && self.checklist_complete(),
            Stage::Repair => true,
            Stage::Idle | Stage::ReportReady => false,
        }
    }
}

fn unchanged(state: &WorkflowState) -> Transition {
    Transition {
        state: state.clone(),
        narration: Narration::Keep,
    }
}

fn select_best(procedures: &[Procedure], query: &str) -> WorkflowState {
    let best = matcher::rank_candidates(procedures, query)
        .first()
        .map(|candidate| candidate.index);
    WorkflowState {
        stage: Stage::CauseSelection,
        procedure: best,
        cause: None,
        checklist: None,
    }
}

pub fn transition(
    state: &WorkflowState,
    procedures: &[Procedure],
    command: &Command,
) -> Transition {
    match command {
        Command::SubmitComplaint(text) => {
            let next = select_best(procedures, text.trim());
            let narration = match next.procedure.and_then(|idx| procedures.get(idx)) {
                Some(procedure) => Narration::Speak(format!(
                    "Procedura proposta: {}. Seleziona una causa.",
                    procedure.title
                )),
                None => Narration::Stop,
            };
            Transition {
                state: next,
                narration,
            }
        }
        Command::Search(query) => Transition {
            state: select_best(procedures, query.trim()),
            narration: Narration::Keep,
        },
        Command::SelectCause(id) => {
            if state.stage != Stage::CauseSelection {
                return unchanged(state);
            }
            let Some(cause) = state
                .procedure
                .and_then(|idx| procedures.get(idx))
                .and_then(|procedure| procedure.cause(*id))
            else {
                return unchanged(state);
            };
            Transition {
                state: WorkflowState {
                    cause: Some(*id),
                    checklist: None,
                    ..state.clone()
                },
                narration: Narration::Speak(format!("Causa selezionata: {}", cause.name)),
            }
        }
        Command::ToggleChecklistItem(index) => {
            if state.stage != Stage::Verification {
                return unchanged(state);
            }
            let Some(checklist) = state.checklist.as_ref() else {
                return unchanged(state);
            };
            if *index >= checklist.len() {
                return unchanged(state);
            }
            let mut checklist = checklist.clone();
            checklist[*index] = !checklist[*index];
            Transition {
                state: WorkflowState {
                    checklist: Some(checklist),
                    ..state.clone()
                },
                narration: Narration::Keep,
            }
        }
        Command::Proceed => proceed(state, procedures),
        Command::Back => match state.stage.previous() {
            Some(stage) => Transition {
                state: WorkflowState {
                    stage,
                    ..state.clone()
                },
                narration: Narration::Keep,
            },
            None => unchanged(state),
        },
        Command::Reset => Transition {
            state: WorkflowState::default(),
            narration: Narration::Stop,
        },
    }
}

fn proceed(state: &WorkflowState, procedures: &[Procedure]) -> Transition {
    if !state.can_proceed() {
        return unchanged(state);
    }
    match state.stage {
        Stage::CauseSelection => {
            let Some(cause) = state
                .procedure
                .and_then(|idx| procedures.get(idx))
                .zip(state.cause)
                .and_then(|(procedure, id)| procedure.cause(id))
            else {
                return unchanged(state);
            };
            Transition {
                state: WorkflowState {
                    stage: Stage::Verification,
                    checklist: Some(vec![false; cause.verify.len()]),
                    ..state.clone()
                },
                narration: Narration::Speak(NARRATION_TO_VERIFY.to_string()),
            }
        }
        Stage::Verification => Transition {
            state: WorkflowState {
                stage: Stage::Repair,
                ..state.clone()
            },
            narration: Narration::Speak(NARRATION_TO_REPAIR.to_string()),
        },
        Stage::Repair => Transition {
            state: WorkflowState {
                stage: Stage::ReportReady,
                ..state.clone()
            },
            narration: Narration::Keep,
        },
        Stage::Idle | Stage::ReportReady => unchanged(state),
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
