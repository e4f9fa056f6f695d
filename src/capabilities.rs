//! Narration, share and print ports.
//!
//! Each port is optional: a missing program turns into a silent no-op (for
//! narration) or a visible notice (for share and print). None of them can
//! abort the workflow.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

const NARRATOR_CANDIDATES: [(&str, &str); 3] = [
    ("espeak-ng", "espeak-ng -v it"),
    ("espeak", "espeak -v it"),
    ("say", "say"),
];
const CLIPBOARD_CANDIDATES: [(&str, &str); 3] = [
    ("wl-copy", "wl-copy"),
    ("xclip", "xclip -selection clipboard"),
    ("pbcopy", "pbcopy"),
];
const OPENER_CANDIDATES: [(&str, &str); 2] = [("xdg-open", "xdg-open"), ("open", "open")];

pub const CLIPBOARD_NOTICE: &str = "Report copiato negli appunti. Incollalo su WhatsApp/email.";
pub const PRINT_TITLE: &str = "Report OfficinaPlus";

fn detect(candidates: &[(&str, &str)]) -> Option<String> {
    candidates
        .iter()
        .find(|(program, _)| which::which(program).is_ok())
        .map(|(_, command)| command.to_string())
}

pub fn detect_narrator_command() -> Option<String> {
    detect(&NARRATOR_CANDIDATES)
}

pub fn detect_clipboard_command() -> Option<String> {
    detect(&CLIPBOARD_CANDIDATES)
}

pub fn detect_print_opener() -> Option<String> {
    detect(&OPENER_CANDIDATES)
}

fn split_command(command: &str) -> Result<Vec<String>> {
    let words =
        shell_words::split(command).with_context(|| format!("parse command: {command}"))?;
    if words.is_empty() {
        return Err(anyhow!("command is empty"));
    }
    Ok(words)
}

pub trait Narrator {
    /// Interrupt any current narration and start `text`.
    fn speak(&mut self, text: &str);
    fn stop(&mut self);
}

/// Narrator used when no speech program is available.
#[derive(Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&mut self, _text: &str) {}
    fn stop(&mut self) {}
}

/// Speaks by running a program with the text as its last argument.
///
/// Holds at most one child process; a new `speak` kills the previous one.
#[derive(Debug)]
pub struct CommandNarrator {
    argv: Vec<String>,
    current: Option<Child>,
}

impl CommandNarrator {
    pub fn from_command(command: &str) -> Result<Self> {
        Ok(Self {
            argv: split_command(command)?,
            current: None,
        })
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str) {
        self.stop();
        let spawned = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(err) => tracing::warn!(program = %self.argv[0], error = %err, "narration unavailable"),
        }
    }

    fn stop(&mut self) {
        let Some(mut child) = self.current.take() else {
            return;
        };
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        if let Err(err) = child.kill() {
            tracing::debug!(error = %err, "narration already finished");
        }
        let _ = child.wait();
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the narrator for an optional configured command.
pub fn narrator_for(command: Option<&str>) -> Box<dyn Narrator> {
    let Some(command) = command else {
        return Box::new(SilentNarrator);
    };
    match CommandNarrator::from_command(command) {
        Ok(narrator) => Box::new(narrator),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "invalid narrator command");
            Box::new(SilentNarrator)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed(String),
}

impl ShareOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, ShareOutcome::Failed(_))
    }

    /// User-visible notice, when the outcome needs one.
    pub fn notice(&self) -> Option<String> {
        match self {
            ShareOutcome::Shared => None,
            ShareOutcome::Copied => Some(CLIPBOARD_NOTICE.to_string()),
            ShareOutcome::Failed(reason) => Some(format!("Condivisione non riuscita: {reason}")),
        }
    }
}

pub trait Sharer {
    fn share(&mut self, text: &str) -> ShareOutcome;
}

/// Pipes the report into a share program, or into a clipboard program when
/// no share program is configured.
#[derive(Debug, Clone, Default)]
pub struct CommandSharer {
    share_command: Option<String>,
    clipboard_command: Option<String>,
}

impl CommandSharer {
    pub fn new(share_command: Option<String>, clipboard_command: Option<String>) -> Self {
        Self {
            share_command,
            clipboard_command,
        }
    }
}

impl Sharer for CommandSharer {
    fn share(&mut self, text: &str) -> ShareOutcome {
        if let Some(command) = &self.share_command {
            return match pipe_to_command(command, text) {
                Ok(()) => ShareOutcome::Shared,
                Err(err) => ShareOutcome::Failed(format!("{err:#}")),
            };
        }
        let Some(command) = &self.clipboard_command else {
            return ShareOutcome::Failed("nessun programma di condivisione o appunti".to_string());
        };
        match pipe_to_command(command, text) {
            Ok(()) => ShareOutcome::Copied,
            Err(err) => ShareOutcome::Failed(format!("{err:#}")),
        }
    }
}

fn pipe_to_command(command: &str, text: &str) -> Result<()> {
    let argv = split_command(command)?;
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {}", argv[0]))?;
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            if let Err(kill_err) = child.kill() {
                tracing::debug!(error = %kill_err, "share program already exited");
            }
            let status = child.wait();
            return Err(err).with_context(|| {
                format!("write to {} (exit: {status:?})", argv[0])
            });
        }
    }
    let output = child
        .wait_with_output()
        .with_context(|| format!("wait for {}", argv[0]))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{} failed with status {}: {}",
            argv[0],
            output.status,
            stderr.trim()
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Document written and handed to the opener.
    Opened(PathBuf),
    /// Document written; no opener available.
    Saved(PathBuf),
    Failed(String),
}

impl PrintOutcome {
    pub fn notice(&self) -> String {
        match self {
            PrintOutcome::Opened(path) => format!("Report aperto per la stampa: {}", path.display()),
            PrintOutcome::Saved(path) => format!(
                "Report salvato in {}. Aprilo nel browser per stampare o salvare in PDF.",
                path.display()
            ),
            PrintOutcome::Failed(reason) => format!("Stampa non riuscita: {reason}"),
        }
    }
}

pub trait Printer {
    fn print(&mut self, text: &str) -> PrintOutcome;
}

/// Writes a printable HTML page and opens it with the configured opener.
#[derive(Debug, Clone, Default)]
pub struct HtmlPrinter {
    report_dir: Option<PathBuf>,
    opener: Option<String>,
}

impl HtmlPrinter {
    pub fn new(report_dir: Option<PathBuf>, opener: Option<String>) -> Self {
        Self { report_dir, opener }
    }

    fn write_document(&self, html: &str) -> Result<PathBuf> {
        match &self.report_dir {
            Some(dir) => {
                fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
                let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
                let path = dir.join(format!("report-{stamp}.html"));
                fs::write(&path, html.as_bytes())
                    .with_context(|| format!("write {}", path.display()))?;
                Ok(path)
            }
            None => {
                let mut file = tempfile::Builder::new()
                    .prefix("officina-report-")
                    .suffix(".html")
                    .tempfile()
                    .context("create report file")?;
                file.write_all(html.as_bytes())
                    .context("write report file")?;
                let (_, path) = file.keep().context("keep report file")?;
                Ok(path)
            }
        }
    }
}

impl Printer for HtmlPrinter {
    fn print(&mut self, text: &str) -> PrintOutcome {
        let path = match self.write_document(&render_print_document(text)) {
            Ok(path) => path,
            Err(err) => return PrintOutcome::Failed(format!("{err:#}")),
        };
        let Some(opener) = &self.opener else {
            return PrintOutcome::Saved(path);
        };
        match open_with(opener, &path) {
            Ok(()) => PrintOutcome::Opened(path),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "print opener failed");
                PrintOutcome::Saved(path)
            }
        }
    }
}

fn open_with(command: &str, path: &Path) -> Result<()> {
    let argv = split_command(command)?;
    Command::new(&argv[0])
        .args(&argv[1..])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {}", argv[0]))?;
    Ok(())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Standalone page that opens the print dialog once loaded.
pub fn render_print_document(text: &str) -> String {
    format!(
        r#"<!doctype html><html><head><meta charset="utf-8">
<title>{PRINT_TITLE}</title>
<style>
body{{font-family:Arial,system-ui;white-space:pre-wrap;padding:20px}}
h1{{margin:0 0 10px}}
small{{color:#555}}
</style>
</head><body>
<h1>{PRINT_TITLE}</h1>
<small>Stampa o salva in PDF dal menu di stampa</small>
<pre>{}</pre>
<script>window.onload=()=>window.print();</script>
</body></html>
"#,
        escape_html(text)
    )
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
