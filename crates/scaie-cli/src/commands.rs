//! Subcommand handlers.

use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use anyhow::{Context, Result, bail};
use scaie_core::{
  agent::{AgentConfig, ConfigStore},
  contact::{Contact, ContactDraft, ImportFile, InterestLevel},
  page::Stats,
};
use scaie_directory::{ContactDirectory, DirectoryEvent};
use scaie_http::HttpContactsApi;
use tracing::info;

use crate::{AgentCommand, Command, agent_store::TomlFileConfigStore, settings::Settings};

type Directory = ContactDirectory<HttpContactsApi>;

pub async fn run(command: Command, settings: &Settings) -> Result<()> {
  match command {
    Command::Agent(agent) => {
      let store = TomlFileConfigStore::new(settings.agent_config_path());
      run_agent(agent, &store)
    }
    Command::List { page, size, search } => {
      let mut dir = directory(settings, size.unwrap_or(settings.page_size))?;
      list(&mut dir, page, &search).await
    }
    Command::Stats => {
      let mut dir = directory(settings, settings.page_size)?;
      let stats = dir.load_stats().await?;
      print_stats(stats);
      Ok(())
    }
    Command::Show { id } => {
      let mut dir = directory(settings, settings.page_size)?;
      let contact = dir.fetch(id).await?;
      println!("{}", serde_json::to_string_pretty(&contact)?);
      Ok(())
    }
    Command::Create(args) => {
      let draft = ContactDraft::from(args);
      if draft.name.is_none() || draft.phone.is_none() {
        bail!("creating a contact requires --name and --phone");
      }
      let mut dir = directory(settings, settings.page_size)?;
      let contact = dir.create(draft).await?;
      info!(id = contact.id, "created");
      println!("created {}", describe(&contact));
      print_totals(&dir);
      Ok(())
    }
    Command::Update { id, draft } => {
      let draft = ContactDraft::from(draft);
      if draft.is_empty() {
        bail!("nothing to update; pass at least one field");
      }
      let mut dir = directory(settings, settings.page_size)?;
      let contact = dir.update(id, draft).await?;
      println!("updated {}", describe(&contact));
      print_totals(&dir);
      Ok(())
    }
    Command::Delete { id } => {
      let mut dir = directory(settings, settings.page_size)?;
      let outcome = dir.delete(id).await?;
      println!("{}", outcome.message);
      print_totals(&dir);
      Ok(())
    }
    Command::Import { file } => {
      let import = read_import(&file)?;
      let mut dir = directory(settings, settings.page_size)?;
      let outcome = dir.import(import).await?;
      println!(
        "{} ({} imported)",
        outcome.message, outcome.imported_count
      );
      print_totals(&dir);
      Ok(())
    }
    Command::Export { output } => {
      let mut dir = directory(settings, settings.page_size)?;
      let bytes = dir.export().await?;
      match output {
        Some(path) => {
          fs::write(&path, &bytes)
            .with_context(|| format!("writing {}", path.display()))?;
          info!(path = %path.display(), bytes = bytes.len(), "export written");
        }
        None => io::stdout().write_all(&bytes).context("writing export")?,
      }
      Ok(())
    }
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// A directory over the configured backend, logging page loads at debug.
fn directory(settings: &Settings, page_size: u32) -> Result<Directory> {
  let api = HttpContactsApi::new(settings.http())?;
  let mut dir = ContactDirectory::new(api).with_page_size(page_size);
  dir.subscribe(|event| {
    if let DirectoryEvent::PageLoaded {
      page_number,
      total_count,
    } = event
    {
      tracing::debug!(page_number, total_count, "page loaded");
    }
  });
  Ok(dir)
}

async fn list(dir: &mut Directory, page: u32, search: &str) -> Result<()> {
  // Land on page 1 first so the total is known, then bounds-check the
  // requested page against it.
  dir.search(search).await?;
  if page != 1 && !dir.go_to_page(page).await? {
    bail!(
      "page {page} is out of range (there are {} pages)",
      dir.total_pages()
    );
  }

  for contact in dir.contacts() {
    println!("{}", row(contact));
  }
  let current = dir.page();
  println!(
    "page {}/{} · {} contacts",
    current.page_number,
    dir.total_pages().max(1),
    current.total_count
  );
  Ok(())
}

fn row(contact: &Contact) -> String {
  format!(
    "{:>6}  {:<28}  {:<16}  {:<24}  {}",
    contact.id,
    truncate(&contact.display_name(), 28),
    contact.phone.as_deref().unwrap_or("-"),
    truncate(contact.company.as_deref().unwrap_or("-"), 24),
    contact.interest_level.as_deref().unwrap_or("-"),
  )
}

fn describe(contact: &Contact) -> String {
  format!("#{} {}", contact.id, contact.display_name())
}

fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_string();
  }
  let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
  out.push('…');
  out
}

fn print_stats(stats: &Stats) {
  println!("total          {}", stats.total);
  for level in InterestLevel::ALL {
    println!("{:<14} {}", level.as_str(), stats.count(level));
  }
  for (level, count) in &stats.counts_by_interest_level {
    if level.parse::<InterestLevel>().is_err() {
      println!("{level:<14} {count}");
    }
  }
}

/// After a write the directory has already refreshed its stats.
fn print_totals(dir: &Directory) {
  println!("{} contacts in total", dir.stats().total);
}

fn read_import(path: &Path) -> Result<ImportFile> {
  let bytes =
    fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .and_then(|n| n.to_str())
    .context("import path has no file name")?;
  Ok(ImportFile::new(file_name, bytes))
}

// ─── Agent ───────────────────────────────────────────────────────────────────

fn run_agent(command: AgentCommand, store: &impl ConfigStore) -> Result<()> {
  match command {
    AgentCommand::Show => print_agent(&store.load()?),
    AgentCommand::Set(args) => {
      let mut config = store.load()?;
      config.apply(args.into());
      store.save(&config)?;
      print_agent(&config)
    }
    AgentCommand::Reset => print_agent(&store.reset()?),
    AgentCommand::Preview => {
      println!("{}", store.load()?.greeting());
      Ok(())
    }
  }
}

fn print_agent(config: &AgentConfig) -> Result<()> {
  print!("{}", toml::to_string_pretty(config)?);
  Ok(())
}
