//! Procedure document schema.
//!
//! The document is treated as an opaque data source: every field is optional
//! on input so a partially filled admin override still decodes.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level `{ "procedures": [...] }` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub procedures: Vec<Procedure>,
}

/// A diagnosable repair scenario. Identity is its position in the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub causes: Vec<Cause>,
}

/// A root-cause hypothesis owned by exactly one procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub probability: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verify: Vec<ChecklistItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repair: Vec<RepairStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub t: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairStep {
    #[serde(default, deserialize_with = "null_as_default")]
    pub t: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Position of a cause inside its procedure's source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CauseId(pub usize);

impl Procedure {
    /// Causes ordered by probability, highest first. Ties keep source order.
    pub fn ranked_causes(&self) -> Vec<(CauseId, &Cause)> {
        let mut causes: Vec<(CauseId, &Cause)> = self
            .causes
            .iter()
            .enumerate()
            .map(|(idx, cause)| (CauseId(idx), cause))
            .collect();
        causes.sort_by(|(_, a), (_, b)| b.probability.total_cmp(&a.probability));
        causes
    }

    pub fn cause(&self, id: CauseId) -> Option<&Cause> {
        self.causes.get(id.0)
    }
}

impl Cause {
    /// Estimated probability as a rounded percentage.
    pub fn percent(&self) -> i64 {
        (self.probability * 100.0).round() as i64
    }
}

impl ChecklistItem {
    pub fn description(&self) -> &str {
        self.d.as_deref().unwrap_or("")
    }
}

impl RepairStep {
    pub fn description(&self) -> &str {
        self.d.as_deref().unwrap_or("")
    }

    /// Narration line for the 1-based step `number`.
    pub fn narration(&self, number: usize) -> String {
        format!("Step {number}. {}. {}", self.t, self.description())
    }
}

/// Check that `text` is a document with a top-level `procedures` array.
///
/// Used by the admin editor, which rejects anything else outright. The parsed
/// value is returned as-is so unknown fields survive a save.
pub fn validate_document(text: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).context("parse procedures JSON")?;
    if !value
        .get("procedures")
        .is_some_and(serde_json::Value::is_array)
    {
        return Err(anyhow!(
            "JSON non valido. Deve contenere {{ \"procedures\": [...] }}"
        ));
    }
    ProcedureDocument::deserialize(&value).context("decode procedures document")?;
    Ok(value)
}

#[cfg(test)]
#[path = "procedures_tests.rs"]
mod tests;
