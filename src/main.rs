//! # Daily Briefing
//!
//! Collects AI news, research papers, grant schemes, funding programs and
//! trending repositories into per-day snapshots, then mails one HTML digest.
//!
//! ## Usage
//!
//! ```sh
//! daily_briefing --collect              # run every agent
//! daily_briefing --collect-agent news   # run one agent
//! daily_briefing --send                 # mail today's digest
//! daily_briefing --daily                # both, in that order
//! ```
//!
//! ## Architecture
//!
//! 1. **Sources**: a static registry of feeds and pages per category
//! 2. **Fetching**: one HTTP request per source, failures logged and skipped
//! 3. **Extraction**: feed entries, anchor heuristics or trending rows become records
//! 4. **Storage**: records are deduplicated into `<data>/<category>/items_<YYYY-MM-DD>.json`
//! 5. **Digest**: today's files are rendered to HTML and sent over SMTP

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod agents;
mod cli;
mod digest;
mod error;
mod extract;
mod fetch;
mod mailer;
mod models;
mod sources;
mod store;
mod utils;

use agents::{Pacing, Services, collect_all, run_agent};
use cli::{Cli, Mode};
use fetch::HttpFetcher;
use mailer::MailConfig;
use models::Category;
use sources::Registry;
use store::DailyStore;
use utils::{ensure_writable_dir, truncate_for_log};

/// Assemble, render and mail today's digest. `false` when anything failed.
async fn send_digest(store: &DailyStore, registry: &Registry, mail: &MailConfig) -> bool {
    let day = store::today();
    let sections = match digest::assemble(store, registry, day).await {
        Ok(sections) => sections,
        Err(e) => {
            error!(error = %e, "Failed to assemble digest");
            return false;
        }
    };
    let (subject, html) = digest::render(&sections, registry, day);
    debug!(%subject, preview = %truncate_for_log(&html, 300), "Rendered digest");

    match mailer::send(mail, &subject, &html).await {
        Ok(()) => {
            info!(%subject, "Digest sent successfully");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to send digest");
            false
        }
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_briefing starting up");
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let args = Cli::parse();
    let mode = args.mode();
    debug!(?mode, data_dir = %args.data_dir.display(), retention_days = args.retention_days, "Parsed CLI arguments");

    // Early check: the store root must be writable before any agent runs
    if let Err(e) = ensure_writable_dir(&args.data_dir).await {
        error!(
            path = %args.data_dir.display(),
            error = %e,
            "Data directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let services = Services {
        fetcher: HttpFetcher::new()?,
        store: DailyStore::new(&args.data_dir),
        retention_days: args.retention_days,
        pacing: Pacing::default(),
    };
    let registry = Registry::default();

    let succeeded = match mode {
        Mode::Collect => {
            let count = collect_all(&services, &registry).await;
            info!(count, "Done. New items collected across all agents");
            true
        }
        Mode::CollectAgent(name) => match name.parse::<Category>() {
            Ok(category) => match run_agent(&services, &registry, category).await {
                Ok(count) => {
                    info!(count, agent = %category, "Done. New items collected");
                    true
                }
                Err(e) => {
                    error!(agent = %category, error = %e, "Agent failed");
                    false
                }
            },
            Err(e) => {
                error!(error = %e, "Cannot collect");
                false
            }
        },
        Mode::Send => send_digest(&services.store, &registry, &args.mail_config()).await,
        Mode::Daily => {
            let count = collect_all(&services, &registry).await;
            info!(count, "Collected new items across all agents");
            send_digest(&services.store, &registry, &args.mail_config()).await
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        succeeded,
        "Execution complete"
    );

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
