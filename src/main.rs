use clap::Parser;
use std::process::ExitCode;

/// Authoritative server for the Arctic shooter.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// UDP port to listen on (overrides ARCTIC_SERVER_PORT).
    #[arg(short, long)]
    port: Option<u16>,
    /// Number of bots to spawn (overrides ARCTIC_BOT_COUNT).
    #[arg(short, long)]
    bots: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match arctic_server::run_with_config(cli.port, cli.bots).await {
        Ok(()) => ExitCode::SUCCESS,
        // Already logged where it happened.
        Err(_) => ExitCode::FAILURE,
    }
}
