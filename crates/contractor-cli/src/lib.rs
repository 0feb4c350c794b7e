//! Command line client for the Contractor orchestration API.
//!
//! The binary parses a [`Cli`], loads [`config::Settings`], opens a session
//! and hands the command to [`commands::dispatch`].

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use commands::{dispatch, Command, Context};
pub use error::{CliError, CliResult};

/// Contractor command line client.
#[derive(Parser, Debug)]
#[command(name = "contractorcli", version, about = "Contractor command line client")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file, instead of ~/.contractorcli.ini
    #[arg(long, global = true, env = "CONTRACTORCLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}
