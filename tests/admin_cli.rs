mod common;

use common::{stderr, stdout, Workspace};

const OVERRIDE: &str = r#"{
  "procedures": [
    { "title": "Cambio duro", "keywords": ["frizione"], "causes": [], "note": "officina nord" }
  ]
}"#;

#[test]
fn saved_override_supersedes_default_until_cleared() {
    let workspace = Workspace::new();
    let file = workspace.write("override.json", OVERRIDE);

    let output = workspace.run(&["admin", "save", file.to_str().expect("utf-8 path")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Salvato override con 1 procedure."));

    let output = workspace.run(&["match", "--json", "frizione"]);
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("parse match JSON");
    assert_eq!(report["candidates"][0]["title"], "Cambio duro");

    let output = workspace.run(&["admin", "show-override"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("officina nord"));

    let output = workspace.run(&["admin", "clear"]);
    assert!(stdout(&output).contains("Override local rimosso."));
    let output = workspace.run(&["match", "frizione"]);
    assert!(stdout(&output).contains("Motore non parte"));
    assert!(!stdout(&output).contains("Cambio duro"));
}

#[test]
fn save_rejects_document_without_procedures() {
    let workspace = Workspace::new();
    let file = workspace.write("bad.json", r#"{"items": []}"#);
    let output = workspace.run(&["admin", "save", file.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("JSON non valido. Deve contenere { \"procedures\": [...] }"));
    assert!(!workspace.path("store/store.json").exists());
}

#[test]
fn show_override_without_override_fails() {
    let workspace = Workspace::new();
    let output = workspace.run(&["admin", "show-override"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Nessun override local trovato."));
}

#[test]
fn show_default_prints_document() {
    let workspace = Workspace::new();
    let output = workspace.run(&["admin", "show-default"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("parse document");
    assert_eq!(document["procedures"].as_array().map(Vec::len), Some(3));
}

#[test]
fn ephemeral_store_does_not_persist() {
    let workspace = Workspace::new();
    let file = workspace.write("override.json", OVERRIDE);
    let output = workspace.run(&[
        "--ephemeral",
        "admin",
        "save",
        file.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let output = workspace.run(&["admin", "show-override"]);
    assert!(!output.status.success());
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let workspace = Workspace::new();
    let output = workspace.run(&["config", "init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("use --force"));

    let output = workspace.run(&["--data", "altro.json", "config", "init", "--force"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = std::fs::read_to_string(&workspace.config_path).expect("read config");
    assert!(written.contains("altro.json"));

    let output = workspace.run(&["config", "show"]);
    assert!(stdout(&output).contains("\"data_source\": \"altro.json\""));
}

#[test]
fn invalid_config_is_rejected() {
    let workspace = Workspace::with_config(serde_json::json!({ "schema_version": 7 }));
    let output = workspace.run(&["match", "batteria"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported config schema_version 7"));
}
