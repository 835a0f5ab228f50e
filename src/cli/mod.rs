// src/cli/mod.rs — CLI definition (clap derive)

pub mod submit;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardpress", about = "Multi-page image post generator", version)]
pub struct Cli {
    /// Config file path (defaults to ./cardpress.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the generation service and its background cleanup jobs
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Submit topics to a running service, one post at a time
    Submit {
        /// Topics to generate; prompts interactively when none given
        topics: Vec<String>,
        /// Generate each topic this many times
        #[arg(short, long, default_value = "1")]
        times: u32,
        /// Writing style passed to the generator
        #[arg(short, long, default_value = "干货分享")]
        style: String,
        /// Base URL of the generation service
        #[arg(long, default_value = "http://localhost:8000")]
        server: String,
    },
    /// Validate a recorded input macro and print its replay schedule
    Macro {
        /// Path to the recording (clicks.json)
        file: PathBuf,
    },
}
