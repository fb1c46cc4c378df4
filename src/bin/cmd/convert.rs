// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - raw instrument files to FITS at level 0 or 1.

use std::path::PathBuf;

use clap::Args;
use rayon::prelude::*;

use crate::common::{load_catalog, resolve_instrument, ProgressBar, Result};
use craamvert::{Instrument, PoemasConversion, SchemaCatalog, SstConversion};

/// Convert raw instrument files to FITS.
#[derive(Args, Clone, Debug)]
pub struct ConvertCmd {
    /// Source files (TRK or RBD)
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Instrument (poemas or sst); inferred from file names when omitted
    #[arg(short, long)]
    instrument: Option<String>,

    /// Reduction level of the output (0 = raw, 1 = second-binned)
    #[arg(short, long, default_value_t = 0)]
    level: u8,

    /// Directory the FITS files are written into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Site-local schema directory overriding the compiled-in tables
    #[arg(long)]
    schema_dir: Option<PathBuf>,
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        if self.level > 1 {
            return Err(anyhow::anyhow!(
                "convert produces level 0 or 1; use 'concat' for a level-2 day file"
            ));
        }
        let catalog = load_catalog(self.schema_dir.as_deref())?;

        // Each file is an independent pipeline; name collisions cannot
        // occur because the output name encodes the file's time span.
        let progress = ProgressBar::new(self.files.len() as u64, "convert");
        let outcomes: Vec<(PathBuf, Result<PathBuf>)> = self
            .files
            .par_iter()
            .map(|file| {
                let outcome = convert_one(file, &self, &catalog);
                progress.inc();
                (file.clone(), outcome)
            })
            .collect();
        progress.finish_with_message(format!("{} file(s)", outcomes.len()));

        let mut failures = 0;
        for (file, outcome) in outcomes {
            match outcome {
                Ok(written) => println!("{} -> {}", file.display(), written.display()),
                Err(e) => {
                    failures += 1;
                    eprintln!("{}: {e}", file.display());
                }
            }
        }
        if failures > 0 {
            return Err(anyhow::anyhow!("{failures} conversion(s) failed"));
        }
        Ok(())
    }
}

fn convert_one(file: &PathBuf, cmd: &ConvertCmd, catalog: &SchemaCatalog) -> Result<PathBuf> {
    let instrument = resolve_instrument(cmd.instrument.as_deref(), file)?;
    match instrument {
        Instrument::Poemas => {
            let mut conversion = PoemasConversion::open(file, catalog)?;
            if cmd.level == 1 {
                conversion = conversion.to_level1()?;
            }
            Ok(conversion.write_fits(&cmd.output_dir)?)
        }
        Instrument::Sst => {
            if cmd.level != 0 {
                return Err(anyhow::anyhow!("SST data only converts at level 0"));
            }
            let conversion = SstConversion::open(file, catalog)?;
            Ok(conversion.write_fits(&cmd.output_dir)?)
        }
    }
}
