use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "spyglass-cli")]
#[command(about = "Command-line client for the Spyglass API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new session and (unless --no-send) send it
    Create {
        method: String,
        target: String,
        /// Request body
        #[arg(short, long)]
        body: Option<String>,
        /// Extra header line, e.g. "User-Agent: Spyglass/0.1" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// Only record the session
        #[arg(long)]
        no_send: bool,
    },
    /// List all sessions
    List,
    /// Show one session
    Show { id: u64 },
    /// Send a session again, optionally to another URL
    Resend {
        id: u64,
        #[arg(long)]
        to: Option<String>,
    },
    /// Print the raw request a session would send
    Raw {
        id: u64,
        #[arg(long)]
        to: Option<String>,
    },
    /// Server version and session counts
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Create { method, target, body, headers, no_send } => {
            let headers = if headers.is_empty() { None } else { Some(headers.join("\r\n")) };
            let res = client
                .post(format!("{}/sessions", base))
                .json(&json!({
                    "method": method,
                    "url": target,
                    "body": body,
                    "headers": headers,
                    "send": !no_send,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::List => {
            let res = client.get(format!("{}/sessions", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Show { id } => {
            let res = client.get(format!("{}/sessions/{}", base, id)).send().await?;
            print_response(res).await?;
        }
        Commands::Resend { id, to } => {
            let res = client
                .post(format!("{}/sessions/{}/resend", base, id))
                .query(&override_query(to))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Raw { id, to } => {
            let res = client
                .get(format!("{}/sessions/{}/raw", base, id))
                .query(&override_query(to))
                .send()
                .await?;
            if res.status().is_success() {
                print!("{}", res.text().await?);
            } else {
                print_response(res).await?;
            }
        }
        Commands::Status => {
            let res = client.get(format!("{}/status", base)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn override_query(to: Option<String>) -> Vec<(&'static str, String)> {
    to.map(|url| vec![("url", url)]).unwrap_or_default()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Spyglass API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
