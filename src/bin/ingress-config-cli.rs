//! Command-line client for the ingress-config HTTP API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "ingress-config-cli")]
#[command(about = "Query a running ingress-config controller", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the controller is serving
    Health,
    /// Print the current configuration snapshot
    Snapshot,
    /// Print the revision of every configuration domain
    Revisions,
    /// Resolve the gateways for an ingress read from a JSON file
    Resolve {
        /// Ingress JSON; omit to resolve without an ingress
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/healthz", cli.url)).send().await?;
            let status = res.status();
            println!("{}: {}", status, res.text().await?);
        }
        Commands::Snapshot => {
            let res = client.get(format!("{}/config", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Revisions => {
            let res = client.get(format!("{}/config/revisions", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Resolve { file } => {
            let body = match file {
                Some(path) => std::fs::read(path)?,
                None => Vec::new(),
            };
            let res = client
                .post(format!("{}/config/gateways/resolve", cli.url))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("{}", text);
        }
        return Err(format!("controller returned status {status}").into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
