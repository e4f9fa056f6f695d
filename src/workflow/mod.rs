//! Diagnostic workflow: Cause → Verify → Repair → Report.
//!
//! `state` holds the pure transition function, `controller` applies it and
//! performs the narration side effects, `view` projects the state for
//! rendering and `report` assembles the final text.
mod controller;
mod report;
mod state;
mod view;

pub use controller::{Controller, Observer};
pub use report::{format_timestamp, ReportField, ReportForm};
pub use state::Stage;
pub use view::SessionView;
