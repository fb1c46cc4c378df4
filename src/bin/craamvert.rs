// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # craamvert CLI
//!
//! Command-line converter for CRAAM instrument telemetry.
//!
//! ## Usage
//!
//! ```sh
//! # Convert a POEMAS tracking file to a raw (level 0) FITS file
//! craamvert convert SunTrack_120127.TRK
//!
//! # Convert with second binning (level 1)
//! craamvert convert --level 1 SunTrack_120127.TRK
//!
//! # Merge a day of level-1 data into one level-2 file
//! craamvert concat Track_*.TRK --output-dir out/
//!
//! # Convert an SST raw binary data file
//! craamvert convert RS120127.105135
//!
//! # Summarize a file without converting it
//! craamvert inspect --json RS120127.105135
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConcatCmd, ConvertCmd, InspectCmd};
use common::Result;

/// craamvert - CRAAM telemetry to FITS converter
///
/// Converts POEMAS TRK and SST RBD raw binary files into FITS containers,
/// with optional per-second binning and day-level concatenation.
#[derive(Parser, Clone)]
#[command(name = "craamvert")]
#[command(about = "Convert POEMAS and SST raw binary telemetry to FITS", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "CRAAM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Convert raw files to FITS (level 0 or 1)
    Convert(ConvertCmd),

    /// Merge same-day files into one FITS output
    Concat(ConcatCmd),

    /// Decode a file and print a summary
    Inspect(InspectCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(cmd) => cmd.run(),
        Commands::Concat(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
