//! CLI for the synthesis engine

pub mod serve;

use clap::{Parser, Subcommand};

/// Flowsynth - natural-language workflow synthesis for n8n-compatible platforms
#[derive(Parser)]
#[command(name = "flowsynth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the synthesis API server
    Serve,
}
