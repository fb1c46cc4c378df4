// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Time-span resolution over decoded time columns.
//!
//! Instrument acquisition buffers are zero-filled, so a raw time column can
//! carry leading or trailing zero entries that were never populated. The
//! span of a record set is the first and last *non-zero* time value in
//! stored order.

use crate::core::{ConvertError, Result};

/// First and last valid (non-zero) entries of a time column, rendered with
/// the instrument's time formatter.
///
/// Fails with [`ConvertError::EmptyTimeColumn`] when every entry is zero;
/// an all-zero column means the file never recorded a sample and has no
/// derivable span.
pub fn resolve_span(
    column: &[i64],
    column_name: &str,
    render: impl Fn(i64) -> String,
) -> Result<(String, String)> {
    let first = column
        .iter()
        .find(|&&value| value != 0)
        .ok_or_else(|| ConvertError::empty_time_column(column_name))?;
    let last = column
        .iter()
        .rev()
        .find(|&&value| value != 0)
        .expect("a non-zero entry exists");

    Ok((render(*first), render(*last)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(v: i64) -> String {
        v.to_string()
    }

    #[test]
    fn test_span_skips_unpopulated_edges() {
        let column = [0, 0, 5, 7, 9, 0];
        let (first, last) = resolve_span(&column, "sec", raw).unwrap();
        assert_eq!(first, "5");
        assert_eq!(last, "9");
    }

    #[test]
    fn test_single_valid_entry() {
        let (first, last) = resolve_span(&[0, 42, 0], "sec", raw).unwrap();
        assert_eq!(first, "42");
        assert_eq!(last, "42");
    }

    #[test]
    fn test_all_zero_column_is_explicit_error() {
        let err = resolve_span(&[0, 0, 0], "sec", raw).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyTimeColumn { .. }));
    }

    #[test]
    fn test_empty_column_is_explicit_error() {
        let err = resolve_span(&[], "time", raw).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyTimeColumn { .. }));
    }

    #[test]
    fn test_renderer_is_applied() {
        let (first, last) =
            resolve_span(&[349_354_295, 349_354_300], "sec", crate::time::poemas_time).unwrap();
        assert_eq!(first, "10:51:35");
        assert_eq!(last, "10:51:40");
    }
}
