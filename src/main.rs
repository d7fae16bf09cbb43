//! Busmix CLI - Decibel-Domain Bus Mixer
//!
//! Command-line interface for inspecting and exercising mixer configs.

use clap::Parser;
use env_logger::Env;
use log::info;

use busmix::cli::{commands, Cli, Commands};
use busmix::Result;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Busmix v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Busmix v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { path } => commands::init(&path),
        Commands::Check { path } => commands::check(&path),
        Commands::Show { path } => commands::show(&path),
        Commands::Simulate {
            path,
            snapshot,
            seconds,
            rate,
        } => commands::simulate(&path, &snapshot, seconds, rate),
    }
}
