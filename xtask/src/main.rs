// Licensed under the Apache-2.0 license

//! Developer tasks for the TDC host interface.

mod regmap_gen;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Developer tasks for the TDC host interface")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the TDC register-map description for the register compiler.
    RegmapGen {
        /// Number of measurement channels.
        #[arg(long, default_value_t = 8)]
        channels: u32,

        /// Write the description to this file instead of standard output.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let xtask = Xtask::parse();
    match xtask.command {
        Commands::RegmapGen { channels, output } => {
            regmap_gen::generate(channels, output.as_deref())
        }
    }
}
