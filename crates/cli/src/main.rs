//! autoreload - live-reload notifications over websockets

use anyhow::Result;
use autoreload_cli::{client, daemon, logging, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_client {
        println!("{}", client::client_script(args.port));
        return Ok(());
    }

    let log_guard = logging::init(args.verbose, args.log_file.as_deref())?;

    daemon::run(args.to_config()).await?;

    // The server has no orderly stop, leave without waiting on open connections
    drop(log_guard);
    std::process::exit(0);
}
