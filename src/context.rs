//! Resolved runtime context shared by every command.
use crate::capabilities::{
    detect_clipboard_command, detect_narrator_command, detect_print_opener, narrator_for,
    CommandSharer, HtmlPrinter, Narrator, SilentNarrator,
};
use crate::cli::GlobalArgs;
use crate::config::{self, Config, DATA_SOURCE_ENV};
use crate::loader::{self, DataSource, LoadedProcedures};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use anyhow::Result;
use std::path::PathBuf;

pub(crate) struct AppContext {
    pub(crate) config: Config,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) source: DataSource,
    pub(crate) store: Box<dyn KeyValueStore>,
}

impl AppContext {
    pub(crate) fn load(args: &GlobalArgs) -> Result<Self> {
        let config_path = args.config.clone().or_else(config::default_config_path);
        let mut config = config::load_config_optional(config_path.as_deref())?;
        config.override_data_source(std::env::var(DATA_SOURCE_ENV).ok().as_deref());
        config.override_data_source(args.data.as_deref());
        if let Some(dir) = &args.store {
            config.store_dir = Some(dir.clone());
        }
        config::validate_config(&config)?;

        let store: Box<dyn KeyValueStore> = if args.ephemeral {
            Box::new(MemoryStore::new())
        } else {
            let store = FileStore::new(&config.resolve_store_dir()?);
            tracing::debug!(path = %store.path().display(), "using file store");
            Box::new(store)
        };
        let source = DataSource::parse(&config.data_source);
        tracing::debug!(source = %source, ephemeral = args.ephemeral, "context loaded");

        Ok(Self {
            config,
            config_path,
            source,
            store,
        })
    }

    pub(crate) fn load_procedures(&self) -> LoadedProcedures {
        loader::load_procedures(self.store.as_ref(), &self.config.override_key, &self.source)
    }

    pub(crate) fn narrator(&self, silent: bool) -> Box<dyn Narrator> {
        if silent {
            return Box::new(SilentNarrator);
        }
        let command = self
            .config
            .narrator_command
            .clone()
            .or_else(detect_narrator_command);
        narrator_for(command.as_deref())
    }

    pub(crate) fn sharer(&self) -> CommandSharer {
        CommandSharer::new(
            self.config.share_command.clone(),
            self.config
                .clipboard_command
                .clone()
                .or_else(detect_clipboard_command),
        )
    }

    pub(crate) fn printer(&self) -> HtmlPrinter {
        HtmlPrinter::new(
            self.config.report_dir.clone(),
            self.config.print_opener.clone().or_else(detect_print_opener),
        )
    }
}
