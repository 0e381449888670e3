// src/main.rs

//! zdexport: Zendesk Knowledge Base Article Exporter CLI
//!
//! Fetches all knowledge-base articles for an account, resolves authors and
//! view metrics, and writes one CSV row per article.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use zdexport::config::{Config, CredentialOverrides, Credentials, UserLookupMode};
use zdexport::error::Result;
use zdexport::pipeline::{run_check, run_export};
use zdexport::utils::log;

#[derive(Parser, Debug)]
#[command(
    name = "zdexport",
    version = "1.0.0",
    about = "Export Zendesk Help Center knowledge base articles to CSV"
)]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Export knowledge base articles to a CSV file
    Export {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Output CSV filename (derived from a timestamp when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolve authors with per-user lookups instead of embedded summaries
        #[arg(long)]
        fetch_authors: bool,
    },
    /// Validate credentials and API access
    Check {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

/// Account credential flags shared by all commands.
#[derive(Args, Debug)]
struct CredentialArgs {
    /// Account subdomain (e.g. "company" for company.zendesk.com)
    #[arg(long)]
    subdomain: Option<String>,

    /// Account email address
    #[arg(long)]
    email: Option<String>,

    /// API token
    #[arg(long)]
    api_token: Option<String>,

    /// Path to a key=value file holding the ZENDESK_* settings
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl From<CredentialArgs> for CredentialOverrides {
    fn from(args: CredentialArgs) -> Self {
        Self {
            subdomain: args.subdomain,
            email: args.email,
            api_token: args.api_token,
            env_file: args.env_file,
        }
    }
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.validate()?;

    if cli.quiet {
        config.logging.level = "warn".to_string();
    }
    log::init(&config.logging.level);

    match cli.command {
        Command::Export {
            credentials,
            output,
            fetch_authors,
        } => {
            let credentials = Credentials::resolve(&credentials.into())?;
            if fetch_authors {
                config.users.lookup = UserLookupMode::Direct;
            }
            run_export(&config, &credentials, output).await?;
        }
        Command::Check { credentials } => {
            let credentials = Credentials::resolve(&credentials.into())?;
            run_check(&config, &credentials).await?;
        }
    }

    Ok(())
}
