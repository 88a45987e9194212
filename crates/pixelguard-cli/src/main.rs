//! PixelGuard CLI - Image quality control for catalog and document images.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{analyze::AnalyzeArgs, batch::BatchArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let outcome = match cli.command {
        Commands::Analyze(args) => {
            let args = AnalyzeArgs::with_config(args, &AppConfig::load());
            commands::analyze::run(&args).map(|result| result.exit_code)
        }
        Commands::Batch(args) => {
            let args = BatchArgs::with_config(args, &AppConfig::load());
            commands::batch::run(&args).map(|result| result.exit_code)
        }
        Commands::ShowConfig(ref args) => {
            commands::show_config::run(args).map(|()| ExitCode::Success)
        }
        Commands::ShowEnvVars(ref args) => {
            commands::env_vars::run(args).map(|()| ExitCode::Success)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
    .into()
}
