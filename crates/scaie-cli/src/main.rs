//! `scaie` — command-line client for the SCAIE contacts backend.
//!
//! # Usage
//!
//! ```text
//! scaie list --page 2 --search ana
//! scaie create --name "Ana López" --phone +525512345678
//! scaie import leads.csv
//! scaie agent set --tone formal
//! ```
//!
//! Settings come from `scaie.toml` (or `--config`), then `SCAIE_*`
//! environment variables, then flags.

mod agent_store;
mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use scaie_core::contact::{ContactDraft, ContactId, InterestLevel};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scaie", version, about = "Client for the SCAIE contacts API")]
struct Cli {
  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "scaie.toml")]
  config: PathBuf,

  /// Base URL of the API, e.g. http://localhost:8000/api.
  #[arg(long)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List one page of contacts.
  List {
    #[arg(long, default_value_t = 1)]
    page:   u32,
    /// Page size; defaults to the configured `page_size`.
    #[arg(long)]
    size:   Option<u32>,
    /// Filter by name, phone, email or company.
    #[arg(long, default_value = "")]
    search: String,
  },
  /// Show contact totals per interest level.
  Stats,
  /// Print one contact as JSON.
  Show { id: ContactId },
  /// Create a contact.
  Create(DraftArgs),
  /// Update the given fields of a contact.
  Update {
    id:    ContactId,
    #[command(flatten)]
    draft: DraftArgs,
  },
  /// Delete a contact.
  Delete { id: ContactId },
  /// Import contacts from a CSV or JSON file.
  Import { file: PathBuf },
  /// Download the export of all contacts.
  Export {
    /// Write to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
  /// Inspect or edit the chat-agent settings.
  #[command(subcommand)]
  Agent(AgentCommand),
}

#[derive(Args, Debug, Default)]
struct DraftArgs {
  #[arg(long)]
  name:           Option<String>,
  #[arg(long)]
  phone:          Option<String>,
  #[arg(long)]
  email:          Option<String>,
  #[arg(long)]
  company:        Option<String>,
  #[arg(long)]
  notes:          Option<String>,
  /// interesado, contactado or no_interesado.
  #[arg(long)]
  interest_level: Option<InterestLevel>,
}

impl From<DraftArgs> for ContactDraft {
  fn from(args: DraftArgs) -> Self {
    ContactDraft {
      name:           args.name,
      phone:          args.phone,
      email:          args.email,
      company:        args.company,
      notes:          args.notes,
      interest_level: args.interest_level,
    }
  }
}

#[derive(Subcommand, Debug)]
enum AgentCommand {
  /// Print the current agent settings.
  Show,
  /// Change individual agent settings.
  Set(AgentArgs),
  /// Restore the default agent settings.
  Reset,
  /// Print the greeting the agent would open with.
  Preview,
}

#[derive(Args, Debug, Default)]
struct AgentArgs {
  #[arg(long)]
  name:        Option<String>,
  #[arg(long)]
  personality: Option<String>,
  #[arg(long)]
  tone:        Option<String>,
  #[arg(long)]
  goal:        Option<String>,
  #[arg(long)]
  temperature: Option<f64>,
  #[arg(long)]
  max_tokens:  Option<u32>,
  #[arg(long)]
  top_p:       Option<f64>,
  #[arg(long)]
  top_k:       Option<u32>,
}

impl From<AgentArgs> for scaie_core::agent::AgentConfigUpdate {
  fn from(args: AgentArgs) -> Self {
    Self {
      name:        args.name,
      personality: args.personality,
      tone:        args.tone,
      goal:        args.goal,
      temperature: args.temperature,
      max_tokens:  args.max_tokens,
      top_p:       args.top_p,
      top_k:       args.top_k,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so command output can be piped.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(url) = cli.url {
    settings.base_url = url;
  }

  commands::run(cli.command, &settings).await
}
