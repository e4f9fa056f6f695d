//! Workflow controller: owns the procedures, the session state and the
//! narration port, and notifies observers after every command.
use super::report::{build_report_text, ReportForm, ReportSelection};
use super::state::{transition, Command, Narration, WorkflowState};
use super::view::SessionView;
use crate::capabilities::Narrator;
use crate::procedures::{Cause, CauseId, Procedure};

pub const NARRATION_REPORT_READY: &str = "Report generato.";

/// Receives a fresh projection after each command.
pub trait Observer {
    fn render(&mut self, view: &SessionView);
}

pub struct Controller {
    procedures: Vec<Procedure>,
    state: WorkflowState,
    narrator: Box<dyn Narrator>,
    observers: Vec<Box<dyn Observer>>,
}

impl Controller {
    pub fn new(procedures: Vec<Procedure>, narrator: Box<dyn Narrator>) -> Self {
        Self {
            procedures,
            state: WorkflowState::default(),
            narrator,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        SessionView::project(&self.state, &self.procedures)
    }

    pub fn selected_procedure(&self) -> Option<&Procedure> {
        self.state
            .selected_procedure()
            .and_then(|idx| self.procedures.get(idx))
    }

    pub fn selected_cause(&self) -> Option<&Cause> {
        self.selected_procedure()
            .zip(self.state.selected_cause())
            .and_then(|(procedure, id)| procedure.cause(id))
    }

    pub fn dispatch(&mut self, command: Command) {
        let result = transition(&self.state, &self.procedures, &command);
        if result.state != self.state {
            tracing::debug!(
                command = ?command,
                from = ?self.state.stage(),
                to = ?result.state.stage(),
                "workflow transition"
            );
        }
        self.state = result.state;
        match result.narration {
            Narration::Keep => {}
            Narration::Speak(text) => self.narrator.speak(&text),
            Narration::Stop => self.narrator.stop(),
        }
        self.notify();
    }

    pub fn submit_complaint(&mut self, text: &str) {
        self.dispatch(Command::SubmitComplaint(text.to_string()));
    }

    pub fn search(&mut self, query: &str) {
        self.dispatch(Command::Search(query.to_string()));
    }

    pub fn select_cause(&mut self, id: CauseId) {
        self.dispatch(Command::SelectCause(id));
    }

    pub fn toggle_checklist_item(&mut self, index: usize) {
        self.dispatch(Command::ToggleChecklistItem(index));
    }

    pub fn proceed(&mut self) {
        self.dispatch(Command::Proceed);
    }

    pub fn back(&mut self) {
        self.dispatch(Command::Back);
    }

    pub fn reset(&mut self) {
        self.dispatch(Command::Reset);
    }

    /// Replace the collection wholesale; indices into the old one are dropped.
    pub fn reload(&mut self, procedures: Vec<Procedure>) {
        self.procedures = procedures;
        self.dispatch(Command::Reset);
    }

    pub fn build_report(&mut self, form: &ReportForm, timestamp: &str) -> String {
        let selection = ReportSelection {
            procedure_title: self.selected_procedure().map(|p| p.title.as_str()),
            cause_name: self.selected_cause().map(|c| c.name.as_str()),
        };
        let text = build_report_text(form, selection, timestamp);
        self.narrator.speak(NARRATION_REPORT_READY);
        text
    }

    /// Narrate repair step `number` (1-based) of the selected cause.
    pub fn read_step(&mut self, number: usize) -> bool {
        let Some(line) = number
            .checked_sub(1)
            .and_then(|idx| self.selected_cause()?.repair.get(idx))
            .map(|step| step.narration(number))
        else {
            return false;
        };
        self.narrator.speak(&line);
        true
    }

    pub fn stop_narration(&mut self) {
        self.narrator.stop();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for observer in &mut self.observers {
            observer.render(&view);
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
