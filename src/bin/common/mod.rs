// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::Path;

use craamvert::instrument::{is_trk_file, parse_sst_file_name};
use craamvert::{Instrument, SchemaCatalog};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Resolve the instrument for a source file: the explicit flag wins,
/// otherwise the file name decides (a `TRK` marker means POEMAS, a valid
/// RBD prefix means SST).
pub fn resolve_instrument(explicit: Option<&str>, path: &Path) -> Result<Instrument> {
    if let Some(name) = explicit {
        return Ok(name.parse::<Instrument>()?);
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if is_trk_file(&file_name) {
        Ok(Instrument::Poemas)
    } else if parse_sst_file_name(&file_name).is_ok() {
        Ok(Instrument::Sst)
    } else {
        Err(anyhow::anyhow!(
            "cannot infer the instrument from '{file_name}'; pass --instrument"
        ))
    }
}

/// Load the schema catalog: a site-local directory when given, the
/// compiled-in tables otherwise.
pub fn load_catalog(schema_dir: Option<&Path>) -> Result<SchemaCatalog> {
    match schema_dir {
        Some(dir) => Ok(SchemaCatalog::from_dir(dir)?),
        None => Ok(SchemaCatalog::builtin()?),
    }
}

/// Progress bar wrapper for consistent progress reporting.
pub struct ProgressBar {
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new progress bar.
    pub fn new(total: u64, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(total);
            pb.set_style(indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"));
            pb.set_prefix(prefix);
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    /// Advance the bar by one unit.
    pub fn inc(&self) {
        if let Some(pb) = &self.inner {
            pb.inc(1);
        }
    }

    /// Finish the progress bar with a message.
    pub fn finish_with_message(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_instrument_from_names() {
        let trk = PathBuf::from("/data/SunTrack_120127.TRK");
        let rbd = PathBuf::from("/data/RS120127.105135");
        assert_eq!(
            resolve_instrument(None, &trk).unwrap(),
            Instrument::Poemas
        );
        assert_eq!(resolve_instrument(None, &rbd).unwrap(), Instrument::Sst);
        assert!(resolve_instrument(None, &PathBuf::from("notes.txt")).is_err());
    }

    #[test]
    fn test_explicit_instrument_wins() {
        let rbd = PathBuf::from("RS120127");
        assert_eq!(
            resolve_instrument(Some("poemas"), &rbd).unwrap(),
            Instrument::Poemas
        );
    }
}
