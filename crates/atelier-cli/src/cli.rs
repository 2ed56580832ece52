//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{ChatCommand, ConversationsCommand, KbCommand, TrainCommand};
use crate::error::CliError;
use atelier_common_config::{ApiCredentials, AtelierConfig, ConfigLoader, Environment};
use atelier_common_http::{ApiClient, HttpConfig};

/// Atelier - dialogue dataset curation workbench
///
/// Compose conversations, compare multi-model responses, critique rejected
/// turns, and drive generation and training jobs on the curation backend.
#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Project directory holding .atelier/config.yaml
    #[arg(short = 'C', long, global = true, env = "ATELIER_CONFIG_PATH")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Curate a conversation interactively
    Chat(ChatCommand),

    /// List and inspect stored conversations
    #[command(visible_alias = "convs")]
    Conversations(ConversationsCommand),

    /// Manage knowledge bases and sample generation
    Kb(KbCommand),

    /// Manage training sessions and checkpoints
    Train(TrainCommand),
}

impl Cli {
    fn project_dir(&self) -> PathBuf {
        self.project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from the project directory.
    pub fn load_config(&self) -> Result<AtelierConfig, CliError> {
        Environment::init();
        let loader = ConfigLoader::new(self.project_dir());
        Ok(loader.load()?)
    }

    /// Execute the selected command
    pub async fn execute(self, config: AtelierConfig) -> Result<(), CliError> {
        let ctx = CommandContext::build(self.project_dir(), config)?;

        match self.command {
            Command::Chat(cmd) => cmd.execute(&ctx).await,
            Command::Conversations(cmd) => cmd.execute(&ctx).await,
            Command::Kb(cmd) => cmd.execute(&ctx).await,
            Command::Train(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Context passed to all commands
pub struct CommandContext {
    pub config: AtelierConfig,
    pub api: ApiClient,
}

impl CommandContext {
    fn build(project_dir: PathBuf, config: AtelierConfig) -> Result<Self, CliError> {
        let token = ApiCredentials::load(&project_dir)?;
        let base_url = Environment::get(atelier_common_config::vars::ATELIER_API_URL)
            .unwrap_or_else(|| config.api.base_url.clone());

        let http = HttpConfig {
            request_timeout: std::time::Duration::from_secs(config.api.request_timeout_secs),
            ..HttpConfig::default()
        };
        let api = ApiClient::with_config(base_url, token, http)?;
        Ok(Self { config, api })
    }
}
