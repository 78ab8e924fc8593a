//! Command-line interface definitions for Daily Briefing.
//!
//! Exactly one mode flag is required. Every setting can also come from the
//! environment (a `.env` file in the working directory is loaded first).

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::mailer::MailConfig;
use crate::store::DEFAULT_RETENTION_DAYS;

/// Command-line arguments for the Daily Briefing application.
///
/// # Examples
///
/// ```sh
/// # Run every agent
/// daily_briefing --collect
///
/// # Run one agent against a custom data directory
/// daily_briefing --collect-agent papers --data-dir /var/lib/briefing
///
/// # Collect, then mail today's digest
/// GMAIL_ADDRESS=bot@gmail.com GMAIL_APP_PASSWORD=... RECIPIENT_EMAIL=me@example.com \
///     daily_briefing --daily
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["collect", "collect_agent", "send", "daily"])
))]
pub struct Cli {
    /// Collect from every agent
    #[arg(long)]
    pub collect: bool,

    /// Collect from one agent (news, papers, grants, funding, github)
    #[arg(long, value_name = "NAME")]
    pub collect_agent: Option<String>,

    /// Send today's digest email now
    #[arg(long)]
    pub send: bool,

    /// Collect from every agent, then send the digest
    #[arg(long)]
    pub daily: bool,

    /// Root directory of the daily store
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Days a daily file is kept before purge
    #[arg(long, env = "STORAGE_RETENTION_DAYS", default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Sender account for the digest
    #[arg(long, env = "GMAIL_ADDRESS", hide_env_values = true)]
    pub gmail_address: Option<String>,

    /// App password of the sender account
    #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
    pub gmail_app_password: Option<String>,

    /// Digest recipient
    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    #[arg(long, env = "SMTP_SERVER", default_value = "smtp.gmail.com")]
    pub smtp_server: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Collect,
    CollectAgent(String),
    Send,
    Daily,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if let Some(name) = &self.collect_agent {
            Mode::CollectAgent(name.clone())
        } else if self.send {
            Mode::Send
        } else if self.daily {
            Mode::Daily
        } else {
            Mode::Collect
        }
    }

    /// Mail settings; unset credentials become empty strings.
    pub fn mail_config(&self) -> MailConfig {
        MailConfig {
            sender: self.gmail_address.clone().unwrap_or_default(),
            app_password: self.gmail_app_password.clone().unwrap_or_default(),
            recipient: self.recipient_email.clone().unwrap_or_default(),
            smtp_server: self.smtp_server.clone(),
            smtp_port: self.smtp_port,
        }
    }
}
