// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Data reductions over decoded record streams.
//!
//! Every reduction here is a pure transformation: it takes the prior stage's
//! complete output and returns a new value, so stages compose into an
//! explicit pipeline with no partially-constructed state in between:
//!
//! ```text
//! DecodedRecordSet -> deinterleave -> ChannelSet (level 0)
//!                  -> bin_by_second -> ChannelSet (level 1)
//!                  -> concatenate_day -> ChannelSet (level 2)
//! ```

pub mod binning;
pub mod concat;
pub mod deinterleave;
pub mod timespan;

pub use binning::bin_by_second;
pub use concat::{concatenate_day, concatenate_records, DayMerge, DaySlice};
pub use deinterleave::deinterleave;
pub use timespan::resolve_span;

use crate::core::{ConvertError, Result};

/// Parallel named columns: one time-of-day string column plus numeric
/// channel columns, all of identical length.
///
/// This is the working representation of POEMAS body data from
/// de-interleaving onwards (`sec`, `ele_ang`, `azi_ang`, four TB channels).
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    /// Column names, time column first
    pub names: Vec<String>,
    /// Time-of-day strings (column 0)
    pub time: Vec<String>,
    /// Numeric columns, ordered like `names[1..]`
    pub columns: Vec<Vec<f32>>,
}

impl ChannelSet {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.time.len()
    }

    /// Validate that every column has the same length and the names line up.
    pub fn check_parallel(&self) -> Result<()> {
        if self.names.len() != self.columns.len() + 1 {
            return Err(ConvertError::schema_mismatch(
                "channel set",
                format!(
                    "{} names for {} columns",
                    self.names.len(),
                    self.columns.len()
                ),
            ));
        }
        for (name, column) in self.names[1..].iter().zip(&self.columns) {
            if column.len() != self.time.len() {
                return Err(ConvertError::schema_mismatch(
                    "channel set",
                    format!(
                        "column '{name}' has {} rows, time column has {}",
                        column.len(),
                        self.time.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}
