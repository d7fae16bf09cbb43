//! CLI Module
//!
//! Command-line interface for inspecting and exercising mixer configs.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Busmix - decibel-domain audio bus mixer
#[derive(Parser, Debug)]
#[command(name = "busmix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the standard five-bus mixer config to a file
    #[command(name = "init")]
    Init {
        /// Path for the new config file
        path: PathBuf,
    },

    /// Validate a config file by constructing the mixer
    #[command(name = "check")]
    Check {
        /// Path to the config file
        path: PathBuf,
    },

    /// Print buses, effective gains, parameters, and snapshots
    #[command(name = "show")]
    Show {
        /// Path to the config file
        path: PathBuf,
    },

    /// Run a snapshot transition under a fixed tick rate
    #[command(name = "simulate")]
    Simulate {
        /// Path to the config file
        path: PathBuf,

        /// Snapshot to transition to
        #[arg(short, long)]
        snapshot: String,

        /// Transition duration in seconds
        #[arg(long, default_value_t = 1.0)]
        seconds: f32,

        /// Tick rate in Hz
        #[arg(long, default_value_t = 30)]
        rate: u32,
    },
}
