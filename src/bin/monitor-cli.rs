use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "monitor-cli")]
#[command(about = "Management CLI for the cluster monitor", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cluster health status
    Status,
    /// Show composed metrics
    Metrics,
    /// List per-member probe summaries
    Members,
    /// Print the operator text report
    Report,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/status", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Members => {
            let res = client.get(format!("{}/members", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Report => {
            let res = client.get(format!("{}/report", cli.url)).send().await?;
            if !res.status().is_success() {
                eprintln!("Error: API returned status {}", res.status());
                return Ok(());
            }
            print!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
