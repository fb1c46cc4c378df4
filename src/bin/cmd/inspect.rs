// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - decode a file and summarize it without writing FITS.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::common::{load_catalog, resolve_instrument, Result};
use craamvert::{Instrument, PoemasConversion, SstConversion};

/// Decode a file and print a summary.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Source file (TRK or RBD)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Instrument (poemas or sst); inferred from the file name when omitted
    #[arg(short, long)]
    instrument: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Site-local schema directory overriding the compiled-in tables
    #[arg(long)]
    schema_dir: Option<PathBuf>,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let catalog = load_catalog(self.schema_dir.as_deref())?;
        let instrument = resolve_instrument(self.instrument.as_deref(), &self.file)?;

        let summary = match instrument {
            Instrument::Poemas => {
                let c = PoemasConversion::open(&self.file, &catalog)?;
                json!({
                    "instrument": Instrument::Poemas.as_str(),
                    "date": c.date,
                    "time": c.obs_time,
                    "start_time": c.start_time,
                    "end_time": c.end_time,
                    "level": c.level.as_u8(),
                    "records": c.header.records,
                    "frequencies_ghz": [c.header.freq1, c.header.freq2],
                    "brightness_range": [c.header.brt_min, c.header.brt_max],
                    "columns": c.channels.names,
                    "rows": c.channels.row_count(),
                })
            }
            Instrument::Sst => {
                let c = SstConversion::open(&self.file, &catalog)?;
                let columns: Vec<&str> =
                    c.records.fields.iter().map(|f| f.name.as_str()).collect();
                json!({
                    "instrument": Instrument::Sst.as_str(),
                    "role": c.role.as_str(),
                    "date": c.date,
                    "time": c.obs_time,
                    "start_time": c.start_time,
                    "end_time": c.end_time,
                    "columns": columns,
                    "records": c.records.record_count(),
                })
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("File: {}", self.file.display());
            if let Some(map) = summary.as_object() {
                for (key, value) in map {
                    println!("  {key}: {value}");
                }
            }
        }
        Ok(())
    }
}
