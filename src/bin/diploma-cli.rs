use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "diploma-cli")]
#[command(about = "Command-line client for the diploma credential desk", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the chain connection
    Status,
    /// Show block, chain, issuer balance and gas price
    Stats,
    /// Show the configured credential contract
    Contract,
    /// Issue a credential to a student
    Issue {
        #[arg(long)]
        recipient: String,

        #[arg(long)]
        metadata_url: String,

        /// Issuer key; defaults to the server's configured issuer
        #[arg(long, env = "DIPLOMA_ISSUER_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,

        #[arg(long)]
        issuer_address: Option<String>,
    },
    /// Count the credentials held by an address
    Count { address: String },
    /// Look up one token's owner and metadata URL
    Token { token_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{base}/api/status")).send().await?,
        Commands::Stats => client.get(format!("{base}/api/stats")).send().await?,
        Commands::Contract => client.get(format!("{base}/api/contract")).send().await?,
        Commands::Issue {
            recipient,
            metadata_url,
            private_key,
            issuer_address,
        } => {
            let mut body = json!({
                "recipient": recipient,
                "metadata_url": metadata_url,
            });
            if let Some(key) = private_key {
                body["issuer_private_key"] = Value::String(key);
            }
            if let Some(address) = issuer_address {
                body["issuer_address"] = Value::String(address);
            }
            client
                .post(format!("{base}/api/credentials"))
                .json(&body)
                .send()
                .await?
        }
        Commands::Count { address } => {
            client
                .get(format!("{base}/api/credentials/{address}/count"))
                .send()
                .await?
        }
        Commands::Token { token_id } => {
            client
                .get(format!("{base}/api/tokens/{token_id}"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{rendered}");
    } else {
        eprintln!("Error: API returned status {status}");
        eprintln!("{rendered}");
        std::process::exit(1);
    }
    Ok(())
}
