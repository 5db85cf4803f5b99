//! skillpipe CLI: one subcommand per skill.
//!
//! Each invocation fetches one resource, writes one artifact and prints a
//! one-line summary. Failures print a single `error:` line and exit 1.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    commands::init_tracing(&cli);

    match commands::run(cli).await {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
