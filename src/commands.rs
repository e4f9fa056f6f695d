//! One-shot commands: match, admin, config.
use crate::cli::{AdminCommand, ConfigCommand, MatchArgs};
use crate::config;
use crate::context::AppContext;
use crate::loader;
use crate::matcher;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;

#[derive(Serialize)]
struct MatchRow<'a> {
    index: usize,
    title: &'a str,
    score: u32,
}

#[derive(Serialize)]
struct MatchReport<'a> {
    query: String,
    matched: bool,
    candidates: Vec<MatchRow<'a>>,
}

pub fn run_match(ctx: &AppContext, args: &MatchArgs) -> Result<()> {
    let loaded = ctx.load_procedures();
    let query = args.query.join(" ");
    let candidates = matcher::rank_candidates(&loaded.procedures, &query);
    let report = MatchReport {
        query: query.trim().to_string(),
        matched: candidates.iter().any(|candidate| candidate.score > 0),
        candidates: candidates
            .iter()
            .map(|candidate| MatchRow {
                index: candidate.index,
                title: &candidate.procedure.title,
                score: candidate.score,
            })
            .collect(),
    };

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize match report")?;
        println!("{text}");
        return Ok(());
    }
    if report.candidates.is_empty() {
        println!("Nessuna procedura caricata.");
        return Ok(());
    }
    if !report.matched {
        println!("Nessuna corrispondenza: elenco completo.");
    }
    for row in &report.candidates {
        println!("{:>3}  {}", row.score, row.title);
    }
    Ok(())
}

pub fn run_admin(ctx: &mut AppContext, command: &AdminCommand) -> Result<()> {
    let key = ctx.config.override_key.clone();
    match command {
        AdminCommand::ShowDefault => {
            let document = loader::load_default_document(&ctx.source)?;
            let text =
                serde_json::to_string_pretty(&document).context("serialize procedures")?;
            println!("{text}");
        }
        AdminCommand::ShowOverride => {
            println!("{}", loader::show_override(ctx.store.as_ref(), &key)?);
        }
        AdminCommand::Save { file } => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("read {}", file.display()))?;
            let count = loader::save_override(ctx.store.as_mut(), &key, &text)?;
            println!("Salvato override con {count} procedure.");
        }
        AdminCommand::Clear => {
            loader::clear_override(ctx.store.as_mut(), &key)?;
            println!("Override local rimosso.");
        }
    }
    Ok(())
}

pub fn run_config(ctx: &AppContext, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            let path = ctx
                .config_path
                .as_deref()
                .ok_or_else(|| anyhow!("no config directory; pass --config <PATH>"))?;
            if path.is_file() && !force {
                return Err(anyhow!(
                    "config already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
            config::write_config(path, &ctx.config)?;
            println!("wrote {}", path.display());
        }
        ConfigCommand::Show => {
            let text =
                serde_json::to_string_pretty(&ctx.config).context("serialize config")?;
            println!("{text}");
        }
    }
    Ok(())
}
