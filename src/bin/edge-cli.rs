use clap::{Parser, Subcommand};
use serde_json::json;

use presign_edge::config::{BackendConfig, WorkerSecret};
use presign_edge::http::MediaKey;
use presign_edge::presign::{PresignClient, Presigner};
use presign_edge::signing::{sign, RequestSigner};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Debugging tools for presign-edge worker signatures", long_about = None)]
struct Cli {
    /// Shared HMAC secret.
    #[arg(short, long, env = "WORKER_SECRET", hide_env_values = true)]
    secret: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the timestamp and signature the edge would send for a key
    Sign {
        #[arg(short, long)]
        key: String,

        /// Fixed timestamp (epoch seconds); defaults to now.
        #[arg(short, long)]
        timestamp: Option<String>,
    },
    /// Perform one presign exchange against the backend
    Presign {
        #[arg(short, long)]
        key: String,

        #[arg(short, long, env = "BACKEND_API_ENDPOINT", default_value = "http://127.0.0.1:3000")]
        endpoint: String,

        #[arg(long, default_value = "worker-v1")]
        worker_id: String,

        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let secret = WorkerSecret::new(cli.secret);

    match cli.command {
        Commands::Sign { key, timestamp } => {
            let (timestamp, signature) = match timestamp {
                Some(ts) => {
                    let signature = sign(&key, &ts, secret.expose());
                    (ts, signature)
                }
                None => {
                    let creds = RequestSigner::new(secret).credentials(&key);
                    (creds.timestamp, creds.signature)
                }
            };
            let out = json!({
                "key": key,
                "timestamp": timestamp,
                "signature": signature,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Presign {
            key,
            endpoint,
            worker_id,
            timeout_secs,
        } => {
            let key = MediaKey::new(key).ok_or("key must not be empty")?;
            let config = BackendConfig {
                endpoint,
                worker_secret: secret.clone(),
                worker_id,
                timeout_secs,
            };
            let client = PresignClient::new(&config)?;
            let creds = RequestSigner::new(secret).credentials(key.as_str());

            match client.presign(&key, &creds).await {
                Ok(result) => {
                    let out = json!({
                        "key": key.as_str(),
                        "timestamp": creds.timestamp,
                        "signature": creds.signature,
                        "url": result.url.as_str(),
                        "expires": result.expires,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Err(e) => {
                    eprintln!("Error: presign failed ({}): {}", e.kind(), e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
