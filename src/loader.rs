//! Procedure loading with admin override.
//!
//! Order: the override stored under the configured key, then the default
//! document. Any failure along the way degrades to the next source and finally
//! to an empty collection; loading never fails the session.
use crate::procedures::{validate_document, Procedure, ProcedureDocument};
use crate::store::KeyValueStore;
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Where the default document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Override,
    Default,
    Empty,
}

#[derive(Debug, Clone)]
pub struct LoadedProcedures {
    pub procedures: Vec<Procedure>,
    pub origin: LoadOrigin,
}

pub fn load_procedures(
    store: &dyn KeyValueStore,
    override_key: &str,
    source: &DataSource,
) -> LoadedProcedures {
    if let Some(procedures) = read_override(store, override_key) {
        tracing::info!(
            key = override_key,
            count = procedures.len(),
            "loaded procedures from override"
        );
        return LoadedProcedures {
            procedures,
            origin: LoadOrigin::Override,
        };
    }
    match load_default_document(source) {
        Ok(document) => {
            tracing::info!(
                source = %source,
                count = document.procedures.len(),
                "loaded default procedures"
            );
            LoadedProcedures {
                procedures: document.procedures,
                origin: LoadOrigin::Default,
            }
        }
        Err(err) => {
            tracing::warn!(source = %source, error = %format!("{err:#}"), "procedure load failed");
            LoadedProcedures {
                procedures: Vec::new(),
                origin: LoadOrigin::Empty,
            }
        }
    }
}

/// Usable override procedures, or `None` when absent, malformed, or empty.
fn read_override(store: &dyn KeyValueStore, key: &str) -> Option<Vec<Procedure>> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %format!("{err:#}"), "override store unreadable");
            return None;
        }
    };
    match serde_json::from_str::<ProcedureDocument>(&raw) {
        Ok(document) if !document.procedures.is_empty() => Some(document.procedures),
        Ok(_) => {
            tracing::debug!(key, "override has no procedures");
            None
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring malformed override");
            None
        }
    }
}

pub fn load_default_document(source: &DataSource) -> Result<ProcedureDocument> {
    match source {
        DataSource::File(path) => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parse procedures {}", path.display()))
        }
        DataSource::Url(url) => {
            let mut response = ureq::get(url)
                .call()
                .with_context(|| format!("fetch {url}"))?;
            response
                .body_mut()
                .read_json::<ProcedureDocument>()
                .with_context(|| format!("parse procedures from {url}"))
        }
    }
}

/// Validate and store an override document, returning its procedure count.
pub fn save_override(store: &mut dyn KeyValueStore, key: &str, text: &str) -> Result<usize> {
    let value = validate_document(text)?;
    let count = value
        .get("procedures")
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len);
    let compact = serde_json::to_string(&value).context("serialize override")?;
    store.set(key, &compact)?;
    Ok(count)
}

/// The stored override, pretty-printed when it parses.
pub fn show_override(store: &dyn KeyValueStore, key: &str) -> Result<String> {
    let raw = store
        .get(key)?
        .ok_or_else(|| anyhow!("Nessun override local trovato."))?;
    Ok(match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(raw),
        Err(_) => raw,
    })
}

pub fn clear_override(store: &mut dyn KeyValueStore, key: &str) -> Result<()> {
    store.remove(key)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
