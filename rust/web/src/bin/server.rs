//! Standalone room server binary
//!
//! Usage: cargo run -p fivepiles_web --bin fivepiles-server -- --port 8080

use clap::Parser;
use fivepiles_web::{ServerConfig, WebServer};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "fivepiles-server", version, about = "Five Piles room server")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "FIVEPILES_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Port to bind to
    #[arg(short, long, env = "FIVEPILES_PORT", default_value_t = 8080)]
    port: u16,
    /// Idle seconds before a room is closed
    #[arg(long, env = "FIVEPILES_ROOM_TTL_SECS", default_value_t = 1800,
          value_parser = clap::value_parser!(u64).range(1..))]
    room_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fivepiles_web::init_logging();
    let args = Args::parse();

    let config = ServerConfig::new(args.host, args.port)
        .with_room_ttl(Duration::from_secs(args.room_ttl_secs));

    tracing::info!(
        host = %config.host(),
        port = config.port(),
        room_ttl_secs = args.room_ttl_secs,
        "starting Five Piles server"
    );

    let handle = WebServer::new(config).start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}
