//! Shared test infrastructure for integration tests.

use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Shipped sample document, used as the default data source.
pub fn sample_procedures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/procedures.json")
}

/// A scratch config, store and report directory for one test.
pub struct Workspace {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Self {
        Self::with_config(json!({}))
    }

    /// Config pointing at the sample document, with `extra` keys merged in.
    pub fn with_config(extra: Value) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut config = json!({
            "schema_version": 1,
            "data_source": sample_procedures().display().to_string(),
            "override_key": "officinaplus_procedures_override_v1",
            "store_dir": dir.path().join("store"),
            "clipboard_command": "cat",
            "print_opener": "true",
            "report_dir": dir.path().join("reports"),
        });
        if let (Some(base), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            serde_json::to_string_pretty(&config).expect("serialize config"),
        )
        .expect("write config");
        Self { dir, config_path }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_officina"));
        command
            .arg("--config")
            .arg(&self.config_path)
            .env_remove("OFFICINA_DATA")
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run officina")
    }

    /// Run a silent session fed from `script` on stdin.
    pub fn session(&self, extra_args: &[&str], script: &str) -> Output {
        let mut child = self
            .command()
            .arg("session")
            .arg("--silent")
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn session");
        child
            .stdin
            .take()
            .expect("session stdin")
            .write_all(script.as_bytes())
            .expect("write script");
        child.wait_with_output().expect("wait for session")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
