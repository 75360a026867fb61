//! Command-line client for a single RESTlet.
//!
//! ```text
//! restlet-link --config restlet.toml post --payload '{"message": "hi"}'
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use restlet_link::config::loader::load_config;
use restlet_link::observability::logging::init_logging;
use restlet_link::RestletLink;

#[derive(Parser)]
#[command(name = "restlet-link")]
#[command(about = "Call a RESTlet with OAuth1 or NLAuth credentials", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "restlet.toml")]
    config: PathBuf,

    /// Override the configured attempt budget
    #[arg(long)]
    retries: Option<u32>,

    /// Override the configured backoff step in milliseconds
    #[arg(long)]
    backoff: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the payload as query parameters
    Get(Payload),
    /// Send the payload as a JSON body
    Post(Payload),
    /// Send the payload as a JSON body
    Put(Payload),
    /// Send the payload as query parameters
    Delete(Payload),
}

#[derive(clap::Args)]
struct Payload {
    #[arg(short, long, default_value = "{}")]
    payload: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level)?;

    if let Some(retries) = cli.retries {
        config.target.retries = Some(retries);
    }
    if let Some(backoff) = cli.backoff {
        config.target.backoff = Some(backoff);
    }

    let link = RestletLink::from_config(&config)?;
    tracing::info!(config = %cli.config.display(), "Link ready");

    let outcome = match cli.command {
        Commands::Get(p) => link.get(parse_payload(&p.payload)?).await,
        Commands::Post(p) => link.post(parse_payload(&p.payload)?).await,
        Commands::Put(p) => link.put(parse_payload(&p.payload)?).await,
        Commands::Delete(p) => link.delete(parse_payload(&p.payload)?).await,
    }?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn parse_payload(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}
