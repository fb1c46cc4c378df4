// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Second-binning: reduce a per-sample channel set to one row per whole
//! second.
//!
//! The scan keeps a "current chunk": a contiguous run of rows whose time
//! strings share the same integer second. A chunk is flushed when the next
//! row's second differs *or* the input ends; the end-of-input flush is what
//! keeps the final second from being dropped. Each flushed chunk emits one
//! row: the chunk's first time string (time is representative, not reduced)
//! and the median of every numeric column.
//!
//! # Numeric contract
//!
//! The median of an even-count chunk is the mean of the two middle values,
//! matching the numpy default the legacy pipeline relied on.
//!
//! # Precondition
//!
//! Input must be at the native sampling rate (level 0). Re-binning already
//! binned data is meaningless; converters enforce this through their level
//! ordering.

use tracing::debug;

use crate::core::{ConvertError, Result};
use crate::reduce::ChannelSet;
use crate::time::seconds_of_day_from_str;

/// Median of a chunk, even counts averaging the two middle values.
fn median(values: &[f32]) -> f32 {
    debug_assert!(!values.is_empty(), "median of an empty chunk");
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Reduce a channel set to one row per whole-second mark.
pub fn bin_by_second(set: &ChannelSet) -> Result<ChannelSet> {
    set.check_parallel()?;
    if set.time.is_empty() {
        return Err(ConvertError::empty_time_column(
            set.names.first().map(String::as_str).unwrap_or("time"),
        ));
    }

    let mut time = Vec::new();
    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); set.columns.len()];

    let mut chunk_start = 0usize;
    let mut chunk_second = seconds_of_day_from_str(&set.time[0])?;

    for row in 1..=set.time.len() {
        let boundary = if row == set.time.len() {
            true
        } else {
            seconds_of_day_from_str(&set.time[row])? != chunk_second
        };
        if !boundary {
            continue;
        }

        time.push(set.time[chunk_start].clone());
        for (out, column) in columns.iter_mut().zip(&set.columns) {
            out.push(median(&column[chunk_start..row]));
        }

        if row < set.time.len() {
            chunk_start = row;
            chunk_second = seconds_of_day_from_str(&set.time[row])?;
        }
    }

    debug!(
        input_rows = set.row_count(),
        output_rows = time.len(),
        "binned channel set by second"
    );

    Ok(ChannelSet {
        names: set.names.clone(),
        time,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(time: &[&str], values: &[f32]) -> ChannelSet {
        ChannelSet {
            names: vec!["sec".into(), "v".into()],
            time: time.iter().map(|s| s.to_string()).collect(),
            columns: vec![values.to_vec()],
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 6.0]), 5.0);
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn test_two_chunks_with_final_flush() {
        // Three samples in second 10, two in second 11. The second chunk
        // only closes at end-of-input.
        let input = set(
            &[
                "00:00:10", "00:00:10", "00:00:10", "00:00:11", "00:00:11",
            ],
            &[1.0, 2.0, 3.0, 4.0, 6.0],
        );
        let out = bin_by_second(&input).unwrap();
        assert_eq!(out.time, vec!["00:00:10", "00:00:11"]);
        assert_eq!(out.columns[0], vec![2.0, 5.0]);
    }

    #[test]
    fn test_time_is_first_of_chunk_not_reduced() {
        let input = ChannelSet {
            names: vec!["sec".into(), "v".into()],
            time: vec!["10:51:35.100".into(), "10:51:35.900".into()],
            columns: vec![vec![1.0, 3.0]],
        };
        let out = bin_by_second(&input).unwrap();
        assert_eq!(out.time, vec!["10:51:35.100"]);
        assert_eq!(out.columns[0], vec![2.0]);
    }

    #[test]
    fn test_single_row_input() {
        let out = bin_by_second(&set(&["00:00:01"], &[9.0])).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.columns[0], vec![9.0]);
    }

    #[test]
    fn test_every_row_its_own_second() {
        let out = bin_by_second(&set(
            &["00:00:01", "00:00:02", "00:00:03"],
            &[1.0, 2.0, 3.0],
        ))
        .unwrap();
        assert_eq!(out.row_count(), 3);
        assert_eq!(out.columns[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_multiple_columns_binned_independently() {
        let input = ChannelSet {
            names: vec!["sec".into(), "a".into(), "b".into()],
            time: vec!["00:00:10".into(), "00:00:10".into(), "00:00:11".into()],
            columns: vec![vec![1.0, 5.0, 7.0], vec![10.0, 20.0, 30.0]],
        };
        let out = bin_by_second(&input).unwrap();
        assert_eq!(out.columns[0], vec![3.0, 7.0]);
        assert_eq!(out.columns[1], vec![15.0, 30.0]);
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = bin_by_second(&set(&[], &[])).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyTimeColumn { .. }));
    }
}
