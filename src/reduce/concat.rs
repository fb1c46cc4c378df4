// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Day-level concatenation.
//!
//! Two merge flavors exist:
//!
//! - [`concatenate_day`]: merges second-binned (level 1) channel sets into
//!   one day set, ordered by start time, with the aggregate header fields
//!   recomputed (count summed, minima/maxima folded). Scalar attributes come
//!   from the first and last object in sorted order, never from raw data.
//! - [`concatenate_records`]: the simpler submillimeter case. Decoded
//!   record sets with identical schemas are merged and sorted by their
//!   primary time field. No binning, no median.

use tracing::debug;

use crate::core::{ConvertError, Level, Result};
use crate::decode::DecodedRecordSet;
use crate::reduce::ChannelSet;

/// One second-binned data set queued for day concatenation.
#[derive(Debug, Clone)]
pub struct DaySlice {
    /// Reduction stage of the data (must be [`Level::SecondBinned`])
    pub level: Level,
    /// Observation date (`YYYY-MM-DD`)
    pub date: String,
    /// Observation time attribute (`HH:MM`)
    pub obs_time: String,
    /// First valid time of day in the data
    pub start_time: String,
    /// Last valid time of day in the data
    pub end_time: String,
    /// The binned columns
    pub channels: ChannelSet,
    /// Record count header field (NRS)
    pub record_count: i64,
    /// Minimum-value header field (BRTMin)
    pub min_value: f32,
    /// Maximum-value header field (BRTMax)
    pub max_value: f32,
    /// Originating file name(s)
    pub source_files: Vec<String>,
}

/// Result of a day concatenation.
#[derive(Debug, Clone)]
pub struct DayMerge {
    /// Observation date, from the earliest slice
    pub date: String,
    /// Observation time, from the earliest slice
    pub obs_time: String,
    /// Start time of the earliest slice
    pub start_time: String,
    /// End time of the latest slice
    pub end_time: String,
    /// All columns concatenated in start-time order
    pub channels: ChannelSet,
    /// Sum of the input record counts
    pub record_count: i64,
    /// Global minimum of the input minima
    pub min_value: f32,
    /// Global maximum of the input maxima
    pub max_value: f32,
    /// All originating file names, sorted
    pub source_files: Vec<String>,
}

/// Merge second-binned slices into one day-level set.
///
/// # Errors
///
/// - [`ConvertError::LevelOrder`] when any input is not second-binned
/// - [`ConvertError::HeterogeneousConcatenation`] when column layouts differ
pub fn concatenate_day(mut slices: Vec<DaySlice>) -> Result<DayMerge> {
    let Some(first) = slices.first() else {
        return Err(ConvertError::heterogeneous("no objects to concatenate"));
    };

    for slice in &slices {
        if slice.level != Level::SecondBinned {
            return Err(ConvertError::level_order(
                Level::DayConcatenated.as_u8(),
                slice.level.as_u8(),
            ));
        }
        slice.channels.check_parallel()?;
        if slice.channels.names != first.channels.names {
            return Err(ConvertError::heterogeneous(format!(
                "column layout {:?} differs from {:?}",
                slice.channels.names, first.channels.names
            )));
        }
    }

    // Stable: slices sharing a start time keep their submission order.
    slices.sort_by(|a, b| a.start_time.cmp(&b.start_time));

    let names = slices[0].channels.names.clone();
    let mut time = Vec::new();
    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); names.len() - 1];
    let mut record_count = 0i64;
    let mut min_value = f32::INFINITY;
    let mut max_value = f32::NEG_INFINITY;
    let mut source_files = Vec::new();

    for slice in &slices {
        time.extend(slice.channels.time.iter().cloned());
        for (out, column) in columns.iter_mut().zip(&slice.channels.columns) {
            out.extend_from_slice(column);
        }
        record_count += slice.record_count;
        min_value = min_value.min(slice.min_value);
        max_value = max_value.max(slice.max_value);
        source_files.extend(slice.source_files.iter().cloned());
    }
    source_files.sort();

    let last = slices.last().expect("at least one slice");
    let merge = DayMerge {
        date: slices[0].date.clone(),
        obs_time: slices[0].obs_time.clone(),
        start_time: slices[0].start_time.clone(),
        end_time: last.end_time.clone(),
        channels: ChannelSet {
            names,
            time,
            columns,
        },
        record_count,
        min_value,
        max_value,
        source_files,
    };

    debug!(
        slices = slices.len(),
        rows = merge.channels.row_count(),
        record_count = merge.record_count,
        "concatenated day set"
    );

    Ok(merge)
}

/// Merge decoded record sets and sort rows by the primary time field.
///
/// All inputs must share an identical schema; rows with equal time stamps
/// keep their relative input order (stable sort).
pub fn concatenate_records(
    sets: Vec<DecodedRecordSet>,
    time_field: &str,
) -> Result<DecodedRecordSet> {
    let Some(first) = sets.first() else {
        return Err(ConvertError::heterogeneous("no objects to concatenate"));
    };
    let fields = first.fields.clone();

    for set in &sets {
        if set.fields != fields {
            return Err(ConvertError::heterogeneous(
                "record sets declare different schemas",
            ));
        }
    }

    let time_idx = fields
        .iter()
        .position(|f| f.name == time_field)
        .ok_or_else(|| {
            ConvertError::schema_mismatch(
                "record concatenation",
                format!("no field named '{time_field}'"),
            )
        })?;

    let mut keyed = Vec::new();
    for set in sets {
        for row in set.rows {
            let key = row[time_idx].as_i64().ok_or_else(|| {
                ConvertError::schema_mismatch(
                    "record concatenation",
                    format!("field '{time_field}' is not an integer scalar"),
                )
            })?;
            keyed.push((key, row));
        }
    }
    keyed.sort_by_key(|(key, _)| *key);

    Ok(DecodedRecordSet {
        fields,
        rows: keyed.into_iter().map(|(_, row)| row).collect(),
    })
}
