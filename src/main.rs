mod cli;
mod commands;
mod credentials;
mod engine;
mod error;
mod inputs;
mod paths;
mod source;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        ui::error(&format!("{e:#}"));
        if let Some(error::Error::Remote(remote)) = e.downcast_ref::<error::Error>() {
            ui::dim(remote.category().advice());
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    credentials::load_dotenv(&commands::current_dir()?);

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    log::debug!("ssmdoc {} (verbosity {})", env!("CARGO_PKG_VERSION"), ctx.verbose);

    match cli.command {
        Command::Deploy(args) => commands::deploy::run(&ctx, args).await,
        Command::Remove(args) => commands::remove::run(&ctx, args).await,
        Command::Status(args) => commands::status::run(&ctx, args).await,
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ssmdoc", &mut io::stdout());
            Ok(())
        }
    }
}
