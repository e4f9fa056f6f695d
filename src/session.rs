//! Line-oriented front-end for the diagnostic workflow.
//!
//! Each input line is one command; the controller re-renders the current
//! stage after every workflow command unless `--quiet` is set.
use crate::capabilities::{Printer, Sharer};
use crate::cli::SessionArgs;
use crate::context::AppContext;
use crate::loader::LoadOrigin;
use crate::matcher;
use crate::procedures::Procedure;
use crate::workflow::{
    format_timestamp, Controller, Observer, ReportField, ReportForm, SessionView, Stage,
};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

const HELP: &str = "\
Comandi:
  analyze [testo]        analizza la segnalazione del cliente e propone una procedura
                         (senza testo usa il campo `says` del report)
  search <testo>         cerca una procedura senza narrazione
  causes                 mostra le cause della procedura
  select <n>             seleziona la causa n (ordine di probabilità)
  proceed                passa alla fase successiva
  back                   torna alla fase precedente
  checklist              mostra la checklist di verifica
  toggle <n>             spunta/rimuovi il controllo n
  steps                  mostra gli step di riparazione
  read <n>               leggi ad alta voce lo step n
  stop                   interrompi la lettura
  set <campo> <testo>    compila un campo del report
                         (client, vehicle, says, confirmed, actions, parts, test)
  report                 genera il report
  share                  condividi il report
  print                  salva/apri il report stampabile
  reload                 ricarica le procedure
  reset                  nuova sessione
  status                 stato della sessione in JSON
  help                   questo elenco
  quit                   esci";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    /// `None` re-submits the complaint already in the report form.
    Analyze(Option<String>),
    Search(String),
    Causes,
    Select(usize),
    Proceed,
    Back,
    Checklist,
    Toggle(usize),
    Steps,
    Read(usize),
    Stop,
    Set(ReportField, String),
    Report,
    Share,
    Print,
    Reload,
    Reset,
    Status,
    Help,
    Quit,
}

/// Parse one input line; blank lines and `#` comments yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_lowercase().as_str() {
        "analyze" | "analizza" => {
            SessionCommand::Analyze(Some(rest.to_string()).filter(|text| !text.is_empty()))
        }
        "search" | "cerca" => SessionCommand::Search(rest.to_string()),
        "causes" | "cause" => SessionCommand::Causes,
        "select" | "seleziona" => SessionCommand::Select(parse_number(word, rest)?),
        "proceed" | "avanti" => SessionCommand::Proceed,
        "back" | "indietro" => SessionCommand::Back,
        "checklist" => SessionCommand::Checklist,
        "toggle" | "spunta" => SessionCommand::Toggle(parse_number(word, rest)?),
        "steps" | "step" => SessionCommand::Steps,
        "read" | "leggi" => SessionCommand::Read(parse_number(word, rest)?),
        "stop" => SessionCommand::Stop,
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(anyhow!("usage: set <field> <value>"));
            }
            SessionCommand::Set(field.parse()?, value.to_string())
        }
        "report" => SessionCommand::Report,
        "share" | "condividi" => SessionCommand::Share,
        "print" | "stampa" => SessionCommand::Print,
        "reload" | "ricarica" => SessionCommand::Reload,
        "reset" => SessionCommand::Reset,
        "status" | "stato" => SessionCommand::Status,
        "help" | "aiuto" | "?" => SessionCommand::Help,
        "quit" | "exit" | "esci" => SessionCommand::Quit,
        other => return Err(anyhow!("unknown command {other:?} (try `help`)")),
    };
    Ok(Some(command))
}

/// 1-based position argument.
fn parse_number(word: &str, rest: &str) -> Result<usize> {
    let number: usize = rest
        .parse()
        .map_err(|_| anyhow!("usage: {word} <n> (got {rest:?})"))?;
    if number == 0 {
        return Err(anyhow!("{word}: numbering starts at 1"));
    }
    Ok(number)
}

struct TextObserver;

impl Observer for TextObserver {
    fn render(&mut self, view: &SessionView) {
        print!("{}", view.render_text());
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    controller: Controller,
    form: ReportForm,
    last_report: Option<String>,
    sharer: Box<dyn Sharer>,
    printer: Box<dyn Printer>,
}

impl Session {
    fn execute(&mut self, ctx: &AppContext, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Analyze(text) => {
                if let Some(text) = text {
                    self.form.set(ReportField::ClientSays, &text);
                }
                let complaint = self.form.client_says.clone();
                self.controller.submit_complaint(&complaint);
            }
            SessionCommand::Search(query) => {
                let titles: Vec<String> = matcher::rank(self.controller.procedures(), &query)
                    .iter()
                    .map(|procedure| procedure.title.clone())
                    .collect();
                self.controller.search(&query);
                if let Some((_, others)) = titles.split_first().filter(|(_, rest)| !rest.is_empty()) {
                    println!("Altre corrispondenze: {}", others.join(", "));
                }
            }
            SessionCommand::Causes => {
                print!("{}", self.controller.view().render_section(Stage::CauseSelection));
            }
            SessionCommand::Select(rank) => {
                let view = self.controller.view();
                let row = view
                    .causes
                    .iter()
                    .find(|row| row.rank == rank)
                    .ok_or_else(|| anyhow!("no cause number {rank}"))?;
                self.controller.select_cause(row.id);
            }
            SessionCommand::Proceed => self.controller.proceed(),
            SessionCommand::Back => self.controller.back(),
            SessionCommand::Checklist => {
                print!("{}", self.controller.view().render_section(Stage::Verification));
            }
            SessionCommand::Toggle(number) => self.controller.toggle_checklist_item(number - 1),
            SessionCommand::Steps => {
                print!("{}", self.controller.view().render_section(Stage::Repair));
            }
            SessionCommand::Read(number) => {
                if !self.controller.read_step(number) {
                    println!("Step {number} non disponibile.");
                }
            }
            SessionCommand::Stop => self.controller.stop_narration(),
            SessionCommand::Set(field, value) => self.form.set(field, &value),
            SessionCommand::Report => {
                let text = self.build_report();
                println!("{text}");
            }
            SessionCommand::Share => {
                let text = self.current_report();
                let outcome = self.sharer.share(&text);
                if !outcome.succeeded() {
                    tracing::warn!(outcome = ?outcome, "report not shared");
                }
                match outcome.notice() {
                    Some(notice) => println!("{notice}"),
                    None => println!("Report condiviso."),
                }
            }
            SessionCommand::Print => {
                let text = self.current_report();
                println!("{}", self.printer.print(&text).notice());
            }
            SessionCommand::Reload => {
                let loaded = ctx.load_procedures();
                announce(&loaded.procedures, loaded.origin);
                self.form = ReportForm::default();
                self.last_report = None;
                self.controller.reload(loaded.procedures);
            }
            SessionCommand::Reset => {
                self.form = ReportForm::default();
                self.last_report = None;
                self.controller.reset();
            }
            SessionCommand::Status => {
                let text = serde_json::to_string_pretty(&self.controller.view())
                    .context("serialize session view")?;
                println!("{text}");
            }
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn build_report(&mut self) -> String {
        let timestamp = format_timestamp(&chrono::Local::now());
        let text = self.controller.build_report(&self.form, &timestamp);
        self.last_report = Some(text.clone());
        text
    }

    /// The last built report, or a fresh one when none exists.
    fn current_report(&mut self) -> String {
        match &self.last_report {
            Some(text) => text.clone(),
            None => self.build_report(),
        }
    }
}

fn announce(procedures: &[Procedure], origin: LoadOrigin) {
    match origin {
        LoadOrigin::Override => println!("Procedure caricate (override): {}", procedures.len()),
        LoadOrigin::Default => println!("Procedure caricate: {}", procedures.len()),
        LoadOrigin::Empty => println!("Nessuna procedura caricata."),
    }
}

pub(crate) fn run_session(ctx: &AppContext, args: &SessionArgs) -> Result<()> {
    let loaded = ctx.load_procedures();
    announce(&loaded.procedures, loaded.origin);

    let mut controller = Controller::new(loaded.procedures, ctx.narrator(args.silent));
    if !args.quiet {
        controller.subscribe(Box::new(TextObserver));
    }
    let mut session = Session {
        controller,
        form: ReportForm::default(),
        last_report: None,
        sharer: Box::new(ctx.sharer()),
        printer: Box::new(ctx.printer()),
    };

    let interactive = args.script.is_none() && io::stdin().is_terminal();
    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    if interactive {
        println!("Scrivi `help` per l'elenco dei comandi.");
    }

    let mut lines = reader.lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush().context("flush prompt")?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read session input")?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("errore: {err:#}");
                continue;
            }
        };
        tracing::debug!(command = ?command, "session command");
        match session.execute(ctx, command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("errore: {err:#}"),
        }
    }
    session.controller.stop_narration();
    tracing::debug!(stage = ?session.controller.state().stage(), "session ended");
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
