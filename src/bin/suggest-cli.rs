use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "suggest-cli")]
#[command(about = "Send edit suggestions to an edit gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Origin header to present; must be on the gateway's allow-list
    #[arg(short, long, default_value = "http://localhost:3000")]
    origin: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest an edit to one file
    Submit {
        /// Repository-relative path, e.g. Characters/Bob.md
        #[arg(short, long)]
        file: String,

        /// What should change and why
        #[arg(short, long)]
        description: String,

        /// Read replacement content from this file
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Name to credit in the pull request
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Check gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit {
            file,
            description,
            content,
            name,
        } => {
            let content = match content {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };
            let body = json!({
                "file": file,
                "description": description,
                "content": content,
                "name": name,
            });

            let mut headers = HeaderMap::new();
            headers.insert(ORIGIN, HeaderValue::from_str(&cli.origin)?);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

            let res = client
                .post(format!("{}/", cli.url.trim_end_matches('/')))
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client
                .get(format!("{}/health", cli.url.trim_end_matches('/')))
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
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
