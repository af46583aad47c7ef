use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use savr::AppCommand;
use savr::core::CurrencyCode;
use savr::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record a saving
    Add {
        amount: f64,
        /// Currency of the amount, e.g. SLL or USD
        currency: Option<CurrencyCode>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List savings, newest first
    List,
    /// Delete a saving by id
    Delete { id: String },
    /// Show the total in every display currency
    Total,
    /// Record an adjustment so the total matches the given amount
    #[command(allow_negative_numbers = true)]
    SetTotal {
        amount: f64,
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Show savings by category
    Breakdown,
    /// Show savings per day
    Trend,
    /// Ask the insight provider about your saving habits
    Insights,
    /// Show or edit the note
    Note {
        #[command(subcommand)]
        action: Option<NoteAction>,
    },
    /// Manage reminders
    Remind {
        #[command(subcommand)]
        action: RemindAction,
    },
}

#[derive(Subcommand)]
enum NoteAction {
    Show,
    Set { content: String },
}

#[derive(Subcommand)]
enum RemindAction {
    Add { text: String },
    List,
    Toggle { id: String },
    Delete { id: String },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Add {
                amount,
                currency,
                category,
            } => AppCommand::Add {
                amount,
                currency,
                category,
            },
            Commands::List => AppCommand::List,
            Commands::Delete { id } => AppCommand::Delete { id },
            Commands::Total => AppCommand::Total,
            Commands::SetTotal { amount, currency } => AppCommand::SetTotal { amount, currency },
            Commands::Breakdown => AppCommand::Breakdown,
            Commands::Trend => AppCommand::Trend,
            Commands::Insights => AppCommand::Insights,
            Commands::Note { action } => match action {
                None | Some(NoteAction::Show) => AppCommand::NoteShow,
                Some(NoteAction::Set { content }) => AppCommand::NoteSet { content },
            },
            Commands::Remind { action } => match action {
                RemindAction::Add { text } => AppCommand::ReminderAdd { text },
                RemindAction::List => AppCommand::ReminderList,
                RemindAction::Toggle { id } => AppCommand::ReminderToggle { id },
                RemindAction::Delete { id } => AppCommand::ReminderDelete { id },
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => savr::cli::setup::setup().map(|message| println!("{message}")),
        Some(cmd) => savr::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
