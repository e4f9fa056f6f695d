//! Officina: symptom-driven diagnostic checklists and repair reports.
//!
//! A technician types the client's complaint, picks a probable cause, works
//! through its verification checklist and repair steps, then produces a
//! plain-text repair report.
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod capabilities;
mod cli;
mod commands;
mod config;
mod context;
mod loader;
mod matcher;
mod procedures;
mod session;
mod store;
mod workflow;

use cli::{Command, RootArgs};
use context::AppContext;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "officina=debug" } else { "officina=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);

    let mut ctx = AppContext::load(&args.global)?;
    match &args.command {
        Command::Match(match_args) => commands::run_match(&ctx, match_args),
        Command::Session(session_args) => session::run_session(&ctx, session_args),
        Command::Admin(admin) => commands::run_admin(&mut ctx, admin),
        Command::Config(config_command) => commands::run_config(&ctx, config_command),
    }
}
