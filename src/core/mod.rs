// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout craamvert.
//!
//! This module provides the foundational types for the library:
//! - [`ConvertError`] - Conversion error taxonomy
//! - [`FieldValue`] - Unified decoded value representation
//! - [`Instrument`], [`FileKind`], [`FileRole`], [`Level`] - closed identity
//!   enums replacing the string-keyed lookup maps of earlier tooling, so
//!   dispatch over them stays exhaustiveness-checked at compile time

pub mod error;
pub mod value;

pub use error::{ConvertError, Result};
pub use value::FieldValue;

use serde::{Deserialize, Serialize};

/// Instrument identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// POEMAS - POlarization Emission of Millimeter Activity at the Sun
    Poemas,
    /// SST - Solar Submillimeter Telescope
    Sst,
}

impl std::str::FromStr for Instrument {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "POEMAS" => Ok(Instrument::Poemas),
            "SST" => Ok(Instrument::Sst),
            other => Err(ConvertError::invalid_instrument(other)),
        }
    }
}

impl Instrument {
    /// Canonical instrument name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Poemas => "POEMAS",
            Instrument::Sst => "SST",
        }
    }

    /// The raw file kind this instrument produces.
    pub fn file_kind(&self) -> FileKind {
        match self {
            Instrument::Poemas => FileKind::Trk,
            Instrument::Sst => FileKind::Rbd,
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw binary file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// POEMAS tracking file (`.TRK`)
    Trk,
    /// SST raw binary data file (`RS`/`RF`/`BI` prefixed)
    Rbd,
}

impl FileKind {
    /// Canonical kind tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Trk => "TRK",
            FileKind::Rbd => "RBD",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a source file, derived from its name.
///
/// SST files carry a two-letter role prefix; POEMAS tracking files are all
/// `Tracking`. For schema lookup the SST roles collapse onto the
/// `Data` / `Auxiliary` tags of the time-span index via [`FileRole::span_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileRole {
    /// `RS` - integrated data
    Integration,
    /// `RF` - subintegration (fast) data
    Subintegration,
    /// `BI` - auxiliary housekeeping data
    Auxiliary,
    /// POEMAS sun-tracking data
    Tracking,
}

impl FileRole {
    /// Canonical role name (used in output file names).
    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::Integration => "Integration",
            FileRole::Subintegration => "Subintegration",
            FileRole::Auxiliary => "Auxiliary",
            FileRole::Tracking => "Tracking",
        }
    }

    /// Tag used by the SST schema time-span index.
    pub fn span_tag(&self) -> &'static str {
        match self {
            FileRole::Integration | FileRole::Subintegration => "Data",
            FileRole::Auxiliary => "Auxiliary",
            FileRole::Tracking => "Tracking",
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduction stage of a converted data set.
///
/// Level 0 is raw decoded data, level 1 is second-binned, level 2 is a
/// day-level concatenation of level-1 sets. Reductions must be applied in
/// order; skipping or repeating a stage is a [`ConvertError::LevelOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Raw decoded data
    Raw,
    /// One row per whole-second mark
    SecondBinned,
    /// Same-day level-1 sets merged into one
    DayConcatenated,
}

impl Level {
    /// Numeric stage tag (0, 1, 2).
    pub fn as_u8(&self) -> u8 {
        match self {
            Level::Raw => 0,
            Level::SecondBinned => 1,
            Level::DayConcatenated => 2,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_instrument_from_str() {
        assert_eq!(Instrument::from_str("POEMAS").unwrap(), Instrument::Poemas);
        assert_eq!(Instrument::from_str("sst").unwrap(), Instrument::Sst);
        assert!(matches!(
            Instrument::from_str("ALMA"),
            Err(ConvertError::InvalidInstrument { .. })
        ));
    }

    #[test]
    fn test_instrument_file_kind() {
        assert_eq!(Instrument::Poemas.file_kind(), FileKind::Trk);
        assert_eq!(Instrument::Sst.file_kind(), FileKind::Rbd);
    }

    #[test]
    fn test_role_span_tag() {
        assert_eq!(FileRole::Integration.span_tag(), "Data");
        assert_eq!(FileRole::Subintegration.span_tag(), "Data");
        assert_eq!(FileRole::Auxiliary.span_tag(), "Auxiliary");
    }

    #[test]
    fn test_level_ordering_tags() {
        assert_eq!(Level::Raw.as_u8(), 0);
        assert_eq!(Level::SecondBinned.as_u8(), 1);
        assert_eq!(Level::DayConcatenated.as_u8(), 2);
        assert_eq!(Level::SecondBinned.to_string(), "1");
    }
}
