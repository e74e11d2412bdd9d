//! Polymarket SDK operator CLI
//!
//! Commands:
//! - `address`: derive the wallet address from `POLY_PRIVATE_KEY`
//! - `l1-headers`: print EIP-712 L1 auth headers
//! - `l2-headers`: print HMAC L2 auth headers for a request
//! - `server-time`: CLOB server clock
//! - `derive-api-key`: derive L2 credentials with an L1 signature
//! - `book`: order book for a token
//! - `markets`: active Gamma markets
//! - `stream-market`: stream market channel events as JSON lines
//!
//! # Usage
//! ```bash
//! POLY_PRIVATE_KEY=0x... pm address
//! POLY_PRIVATE_KEY=0x... pm l1-headers --nonce 0
//! POLY_API_KEY=... POLY_API_SECRET=... POLY_API_PASSPHRASE=... \
//!   pm l2-headers --method POST --path /order --body '{"a":1}'
//! POLY_PRIVATE_KEY=0x... pm derive-api-key --nonce 0
//! pm book --token-id <TOKEN_ID>
//! pm markets --limit 5
//! pm stream-market --asset-id <TOKEN_ID> --asset-id <TOKEN_ID> --limit 100
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{error, info};

use polymarket_sdk::{
    ApiCredentials, AuthManager, ClientConfig, ClobClient, GammaClient, SignatureType,
    SignedHeaderSet, WsClient, WsEvent, WsEventHandler,
};

#[derive(Parser)]
#[command(name = "pm")]
#[command(about = "Polymarket SDK operator CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address of POLY_PRIVATE_KEY
    Address,

    /// Print L1 (EIP-712) auth headers (requires POLY_PRIVATE_KEY)
    L1Headers {
        #[arg(long, default_value = "0")]
        nonce: u64,

        /// Unix seconds (default: now)
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Print L2 (HMAC) auth headers (requires POLY_API_KEY, POLY_API_SECRET, POLY_API_PASSPHRASE)
    L2Headers {
        #[arg(long)]
        method: String,

        /// Request path without query string
        #[arg(long)]
        path: String,

        /// Exact request body
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Print the CLOB server time
    ServerTime,

    /// Derive L2 credentials for a nonce (requires POLY_PRIVATE_KEY)
    DeriveApiKey {
        #[arg(long, default_value = "0")]
        nonce: u64,
    },

    /// Print the order book of a token
    Book {
        #[arg(long)]
        token_id: String,
    },

    /// List active Gamma markets
    Markets {
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Stream market channel events as JSON lines
    StreamMarket {
        /// Asset ID(s) (token_id) to subscribe to. Can specify multiple times.
        #[arg(long, required = true)]
        asset_id: Vec<String>,

        /// Maximum events to print (0 = unlimited until Ctrl+C)
        #[arg(long, default_value = "100")]
        limit: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();

    let result = match cli.command {
        Commands::Address => run_address(&config),
        Commands::L1Headers { nonce, timestamp } => run_l1_headers(&config, nonce, timestamp),
        Commands::L2Headers { method, path, body } => {
            run_l2_headers(&config, &method, &path, &body)
        }
        Commands::ServerTime => run_server_time(&config).await,
        Commands::DeriveApiKey { nonce } => run_derive_api_key(&config, nonce).await,
        Commands::Book { token_id } => run_book(&config, &token_id).await,
        Commands::Markets { limit } => run_markets(&config, limit).await,
        Commands::StreamMarket { asset_id, limit } => {
            run_stream_market(&config, asset_id, limit).await
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Auth manager with L1 configured from POLY_PRIVATE_KEY
fn l1_auth(config: &ClientConfig) -> Result<Arc<AuthManager>> {
    let key = std::env::var("POLY_PRIVATE_KEY").context("POLY_PRIVATE_KEY is not set")?;
    let auth = AuthManager::new(config.chain_id);
    auth.setup_l1_auth(&key, SignatureType::Eoa, None)?;
    Ok(Arc::new(auth))
}

fn print_headers(headers: &SignedHeaderSet) -> Result<()> {
    let map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn run_address(config: &ClientConfig) -> Result<()> {
    let auth = l1_auth(config)?;
    println!("{}", auth.get_address());
    Ok(())
}

fn run_l1_headers(config: &ClientConfig, nonce: u64, timestamp: Option<i64>) -> Result<()> {
    let auth = l1_auth(config)?;
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let headers = auth.generate_l1_headers(&timestamp.to_string(), nonce)?;
    print_headers(&headers)
}

fn run_l2_headers(config: &ClientConfig, method: &str, path: &str, body: &str) -> Result<()> {
    let credentials = ApiCredentials::from_env()
        .context("Missing credentials: set POLY_API_KEY, POLY_API_SECRET, POLY_API_PASSPHRASE")?;

    let auth = match std::env::var("POLY_PRIVATE_KEY") {
        Ok(_) => l1_auth(config)?,
        Err(_) => Arc::new(AuthManager::new(config.chain_id)),
    };
    auth.set_api_credentials(credentials)?;
    info!("Credentials loaded: {:?}", auth.get_api_credentials());

    let headers = auth.generate_l2_headers(&method.to_uppercase(), path, body)?;
    print_headers(&headers)
}

async fn run_server_time(config: &ClientConfig) -> Result<()> {
    let client = ClobClient::with_config(config, Arc::new(AuthManager::new(config.chain_id)))?;
    println!("{}", client.get_server_time().await?);
    Ok(())
}

async fn run_derive_api_key(config: &ClientConfig, nonce: u64) -> Result<()> {
    let auth = l1_auth(config)?;
    info!("Deriving API key for {} (nonce {})", auth.get_address(), nonce);

    let client = ClobClient::with_config(config, auth)?;
    let credentials = client.derive_api_key(nonce).await?;
    println!("{}", serde_json::to_string_pretty(&credentials)?);
    Ok(())
}

async fn run_book(config: &ClientConfig, token_id: &str) -> Result<()> {
    let client = ClobClient::with_config(config, Arc::new(AuthManager::new(config.chain_id)))?;
    let book = client.get_order_book(token_id).await?;

    info!("Bids: {} levels, Asks: {} levels", book.bids.len(), book.asks.len());
    println!("{}", serde_json::to_string_pretty(&book)?);
    Ok(())
}

async fn run_markets(config: &ClientConfig, limit: u32) -> Result<()> {
    let client = GammaClient::with_config(config)?;
    let markets = client.get_active_markets(limit, 0).await?;

    info!("Fetched {} markets", markets.len());
    for market in &markets {
        println!(
            "{}\t{}\t{}",
            market.id,
            market.slug.as_deref().unwrap_or("-"),
            market.question.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Prints each event as one JSON line
struct JsonLinesPrinter;

impl WsEventHandler for JsonLinesPrinter {
    fn on_event(&mut self, event: &WsEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to encode event: {}", e),
        }
    }

    fn on_error(&mut self, error: &anyhow::Error) {
        error!("Stream error: {:#}", error);
    }
}

async fn run_stream_market(
    config: &ClientConfig,
    asset_ids: Vec<String>,
    limit: u64,
) -> Result<()> {
    info!("=== Market Channel Stream ===");
    info!("Asset IDs: {} token(s)", asset_ids.len());
    info!("Limit: {} (0 = unlimited)", limit);
    info!("Press Ctrl+C to stop");

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, shutting down...");
        shutdown_clone.store(true, Ordering::Relaxed);
    });

    let client = WsClient::with_config(config, Arc::new(AuthManager::new(config.chain_id)));
    let mut connection = client.connect_market(asset_ids).await?;
    let stats = connection
        .run_until(&mut JsonLinesPrinter, limit, shutdown)
        .await?;
    connection.close().await.ok();

    info!("=== Summary ===");
    info!("Total messages: {}", stats.total_messages);
    info!("Parsed OK: {}", stats.parsed_ok);
    info!("Unknown type count: {}", stats.unknown_type_count);
    info!("Snapshot arrays: {}", stats.snapshot_array_count);
    info!("Parse errors: {}", stats.parse_error_count);
    info!("Pings sent: {}, Pongs received: {}", stats.pings_sent, stats.pongs_received);
    let mut types: Vec<_> = stats.type_counts.iter().collect();
    types.sort_by(|a, b| b.1.cmp(a.1));
    for (msg_type, count) in types {
        info!("  {}: {}", msg_type, count);
    }

    Ok(())
}
