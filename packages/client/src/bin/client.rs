//! Planning poker CLI client.
//!
//! Connects to a Mitsumori room server, mirrors the room state locally,
//! and sends votes, task edits, reveals, and resets from an interactive
//! prompt. Automatically reconnects with exponential backoff (max 5
//! attempts, capped at 10 seconds) and resynchronizes through a fresh
//! room snapshot after every reconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mitsumori-client -- --name Alice
//! cargo run --bin mitsumori-client -- -n Bob -r sprint-42
//! ```

use std::path::PathBuf;

use clap::Parser;

use mitsumori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "mitsumori-client")]
#[command(about = "Planning poker CLI client", long_about = None)]
struct Args {
    /// Display name at the table
    #[arg(short = 'n', long)]
    name: String,

    /// Room to join
    #[arg(short = 'r', long, default_value = "default")]
    room: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// File holding the durable client identity
    #[arg(long, default_value = ".mitsumori-client-id")]
    identity_file: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) =
        mitsumori_client::run_client(args.url, args.room, args.name, &args.identity_file).await
    {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
