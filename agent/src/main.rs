//! compose-agent: run docker compose on this host from authenticated HTTP requests

use std::process::ExitCode;

use clap::Parser;
use compose_agent::cli::Cli;
use compose_agent::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match json::format_error(&message) {
                Ok(body) if json_mode => println!("{body}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
