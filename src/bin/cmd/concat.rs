// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Concat command - merge same-day files into one FITS output.
//!
//! POEMAS files are second-binned first and merged into a level-2 day
//! file; SST files are merged at level 0 with records re-sorted by time.

use std::path::PathBuf;

use clap::Args;

use crate::common::{load_catalog, resolve_instrument, Result};
use craamvert::{Instrument, PoemasConversion, SstConversion};

/// Merge same-day files into one FITS output.
#[derive(Args, Clone, Debug)]
pub struct ConcatCmd {
    /// Source files, all from the same instrument and day
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Instrument (poemas or sst); inferred from file names when omitted
    #[arg(short, long)]
    instrument: Option<String>,

    /// Directory the FITS file is written into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Site-local schema directory overriding the compiled-in tables
    #[arg(long)]
    schema_dir: Option<PathBuf>,
}

impl ConcatCmd {
    pub fn run(self) -> Result<()> {
        let catalog = load_catalog(self.schema_dir.as_deref())?;
        let instrument = resolve_instrument(self.instrument.as_deref(), &self.files[0])?;

        let written = match instrument {
            Instrument::Poemas => {
                let binned = self
                    .files
                    .iter()
                    .map(|file| Ok(PoemasConversion::open(file, &catalog)?.to_level1()?))
                    .collect::<Result<Vec<_>>>()?;
                PoemasConversion::concatenate(binned)?.write_fits(&self.output_dir)?
            }
            Instrument::Sst => {
                let conversions = self
                    .files
                    .iter()
                    .map(|file| Ok(SstConversion::open(file, &catalog)?))
                    .collect::<Result<Vec<_>>>()?;
                SstConversion::concatenate(conversions)?.write_fits(&self.output_dir)?
            }
        };

        println!("{}", written.display());
        Ok(())
    }
}
