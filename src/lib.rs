pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{CurrencyCode, InsightProvider, RateTable};
use crate::providers::FlowServerProvider;
use crate::store::{DiskStore, SavingsStore};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Add {
        amount: f64,
        currency: Option<CurrencyCode>,
        category: Option<String>,
    },
    List,
    Delete {
        id: String,
    },
    Total,
    SetTotal {
        amount: f64,
        currency: Option<CurrencyCode>,
    },
    Breakdown,
    Trend,
    Insights,
    NoteShow,
    NoteSet {
        content: String,
    },
    ReminderAdd {
        text: String,
    },
    ReminderList,
    ReminderToggle {
        id: String,
    },
    ReminderDelete {
        id: String,
    },
}

/// Everything a command needs: config, rates, storage and insights.
pub struct App {
    pub config: AppConfig,
    pub rates: RateTable,
    pub store: Box<dyn SavingsStore>,
    pub insight: Option<Box<dyn InsightProvider>>,
}

impl App {
    /// Opens the on-disk store and insight provider named by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let store = DiskStore::open(&config.data_path()?)?;
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: AppConfig, store: Box<dyn SavingsStore>) -> Result<Self> {
        let rates = config.rate_table()?;
        let insight = match &config.insight {
            Some(provider) => Some(
                Box::new(FlowServerProvider::new(&provider.base_url)?) as Box<dyn InsightProvider>
            ),
            None => None,
        };
        Ok(App {
            config,
            rates,
            store,
            insight,
        })
    }

    /// Runs `command` and returns what it has to show.
    pub async fn execute(&self, command: AppCommand) -> Result<String> {
        debug!(?command, "Executing command");
        match command {
            AppCommand::Add {
                amount,
                currency,
                category,
            } => cli::savings::add(self, amount, currency, category),
            AppCommand::List => cli::savings::list(self),
            AppCommand::Delete { id } => cli::savings::delete(self, &id),
            AppCommand::Total => cli::total::run(self),
            AppCommand::SetTotal { amount, currency } => {
                cli::savings::set_total(self, amount, currency)
            }
            AppCommand::Breakdown => cli::breakdown::run(self),
            AppCommand::Trend => cli::trend::run(self),
            AppCommand::Insights => cli::insights::run(self).await,
            AppCommand::NoteShow => cli::notes::show(self),
            AppCommand::NoteSet { content } => cli::notes::set(self, content),
            AppCommand::ReminderAdd { text } => cli::reminders::add(self, &text),
            AppCommand::ReminderList => cli::reminders::list(self),
            AppCommand::ReminderToggle { id } => cli::reminders::toggle(self, &id),
            AppCommand::ReminderDelete { id } => cli::reminders::delete(self, &id),
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Savings tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::from_config(config)?;
    let output = app.execute(command).await?;
    println!("{output}");
    Ok(())
}
