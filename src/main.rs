//! Telegram Forwarder CLI - main entry point
//!
//! Subcommands cover the three workflows for scripted use; running without
//! a subcommand opens the interactive menu.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use telegram_forwarder::commands::{self, KeywordFilter};
use telegram_forwarder::config::{Credentials, CREDENTIALS_FILE, DEFAULT_COPY_SINCE};

#[derive(Parser)]
#[command(name = "telegram_forwarder")]
#[command(about = "Telegram chat lister, live forwarder and bulk copier", long_about = None)]
#[command(version)]
struct Cli {
    /// Credentials file (three lines: api id, api hash, phone number)
    #[arg(long, env = "TG_CREDENTIALS_FILE", default_value = CREDENTIALS_FILE)]
    credentials: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all dialogs and save them to chats_of_<phone>.txt
    ListChats,

    /// Poll a chat and re-send new matching messages to another chat
    Forward {
        /// Source chat ID
        source: i64,

        /// Destination chat ID
        destination: i64,

        /// Keywords to match (comma separated); empty forwards every message
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,
    },

    /// Copy a chat's history to another chat in batches
    Copy {
        /// Source chat ID
        source: i64,

        /// Destination chat ID
        destination: i64,

        /// Only copy messages sent on or after this date (YYYY-MM-DD)
        #[arg(long, default_value = DEFAULT_COPY_SINCE)]
        since: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("telegram_forwarder=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let credentials = load_or_prompt_credentials(&cli.credentials)?;

    match cli.command {
        Some(Commands::ListChats) => {
            commands::list_chats::run(&credentials).await?;
        }
        Some(Commands::Forward {
            source,
            destination,
            keywords,
        }) => {
            let filter = KeywordFilter::from_keywords(keywords);
            commands::forward::run(&credentials, source, destination, filter).await?;
        }
        Some(Commands::Copy {
            source,
            destination,
            since,
        }) => {
            commands::copy::run(&credentials, source, destination, day_start(since)).await?;
        }
        None => {
            commands::menu::run(&credentials).await?;
        }
    }

    Ok(())
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Load credentials from the file, prompting for and saving a fresh set
/// when the file is missing or unreadable. Env vars always win.
fn load_or_prompt_credentials(path: &Path) -> anyhow::Result<Credentials> {
    let credentials = match Credentials::load(path)? {
        Some(credentials) => credentials,
        None => {
            let credentials = prompt_credentials()?;
            credentials.save(path)?;
            credentials
        }
    };

    Ok(credentials.with_env_overrides())
}

fn prompt_credentials() -> anyhow::Result<Credentials> {
    let api_id = prompt("Enter your API ID: ")?
        .parse::<i32>()
        .map_err(|_| anyhow::anyhow!("API ID must be a number"))?;
    let api_hash = prompt("Enter your API Hash: ")?;
    let phone = prompt("Enter your phone number: ")?;

    Ok(Credentials::new(api_id, api_hash, phone))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
