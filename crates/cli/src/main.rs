//! timebridge - Toggl Track to Google Calendar synchronizer
//!
//! `timebridge sync` runs one reconciliation pass; `timebridge seed` posts a
//! day template to Toggl as real time entries.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use timebridge_core::{plan_day, SyncService, TimeEntrySource};
use timebridge_domain::Config;
use timebridge_infra::{
    config, templates, GoogleCalendarClient, GoogleCredentials, SqliteMappingStore, TogglClient,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timebridge", version, about = "Sync Toggl time entries to Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one sync pass: fetch entries changed since the last run and
    /// reconcile them against the calendar
    Sync,
    /// Create time entries for one day from a stored template
    Seed {
        /// Day to anchor the template to, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Template name (a file under the template directory)
        #[arg(long, default_value = "weekday")]
        template: String,
        /// Delete the day's existing entries before re-creating them
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Sync => run_sync(&config).await,
        Command::Seed { date, template, replace } => {
            run_seed(&config, date, &template, replace).await
        }
    }
}

async fn run_sync(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(
        SqliteMappingStore::open(&config.storage.db_path).context("failed to open sync store")?,
    );
    let credentials = GoogleCredentials::load(&config.calendar.credentials_path)
        .context("failed to load Google credentials")?;
    let calendar = Arc::new(GoogleCalendarClient::new(&config.calendar, credentials));
    let toggl = Arc::new(TogglClient::new(&config.toggl));

    let service = SyncService::new(
        toggl,
        calendar,
        store,
        config.calendar.time_zone.clone(),
        config.sync.lookback_days,
    );

    let report = service.run().await?;
    info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        skipped = report.skipped,
        "sync finished"
    );
    Ok(())
}

async fn run_seed(
    config: &Config,
    date: NaiveDate,
    template: &str,
    replace: bool,
) -> anyhow::Result<()> {
    let entries = templates::load_template(&config.sync.template_dir, template)
        .with_context(|| format!("failed to load template '{template}'"))?;
    let planned = plan_day(&entries, date, &config.calendar.time_zone)?;

    let toggl = TogglClient::new(&config.toggl);

    if replace {
        let existing = toggl.entries_between(date, date).await?;
        for entry in &existing {
            toggl.delete_entry(entry.id).await?;
        }
        info!(count = existing.len(), %date, "deleted existing entries");
    }

    for entry in &planned {
        let created = toggl.create_entry(entry).await?;
        info!(entry_id = created.id, description = %entry.description, "created time entry");
    }

    info!(count = planned.len(), %date, template, "seed finished");
    Ok(())
}
