// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Source file-name contracts.
//!
//! SST raw files are named `<RS|RF|BI><YYMMDD|YYYMMDD>[.HHMM]`. The date
//! carries no century, so two-digit years pivot at 70 (`99` is 1999, `12`
//! is 2012) and the seven-digit form counts years from 1900 (`112` is
//! 2012). POEMAS tracking files are recognized by a `TRK` marker anywhere
//! in the name.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::{ConvertError, FileRole, Result};

/// Pieces parsed out of an SST file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SstFileName {
    /// Role from the two-letter prefix
    pub role: FileRole,
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    /// Start time (`HH:MM`), `00:00` when the name carries none
    pub time: String,
}

fn trk_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("TRK").expect("static pattern"))
}

/// Whether a file name identifies a POEMAS tracking file.
pub fn is_trk_file(name: &str) -> bool {
    trk_pattern().is_match(name)
}

/// Parse an SST file name into role, date and start time.
pub fn parse_sst_file_name(name: &str) -> Result<SstFileName> {
    let prefix = name.get(..2).unwrap_or("").to_ascii_uppercase();
    let role = match prefix.as_str() {
        "RS" => FileRole::Integration,
        "RF" => FileRole::Subintegration,
        "BI" => FileRole::Auxiliary,
        _ => return Err(ConvertError::invalid_file_type(name, "SST")),
    };

    let rest = &name[2..];
    let (date_part, time_part) = match rest.split_once('.') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let date = parse_date(name, date_part)?;
    let time = match time_part {
        Some(digits) => parse_time(name, digits)?,
        None => "00:00".to_string(),
    };

    Ok(SstFileName { role, date, time })
}

fn parse_date(name: &str, digits: &str) -> Result<String> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::invalid_file_name(
            name,
            "date segment contains non-digit characters",
        ));
    }
    // The six-digit form spans the century rollover; 70 is the pivot.
    let (year, month, day) = match digits.len() {
        6 => {
            let yy: u32 = digits[..2].parse().map_err(|_| bad_date(name))?;
            let year = if yy >= 70 { 1900 + yy } else { 2000 + yy };
            (year, &digits[2..4], &digits[4..6])
        }
        7 => {
            let yyy: u32 = digits[..3].parse().map_err(|_| bad_date(name))?;
            (1900 + yyy, &digits[3..5], &digits[5..7])
        }
        _ => {
            return Err(ConvertError::invalid_file_name(
                name,
                format!("date segment has {} digits, expected 6 or 7", digits.len()),
            ))
        }
    };
    Ok(format!("{year}-{month}-{day}"))
}

fn parse_time(name: &str, digits: &str) -> Result<String> {
    if digits.len() < 4 || !digits.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return Err(ConvertError::invalid_file_name(
            name,
            "time suffix is not at least HHMM",
        ));
    }
    Ok(format!("{}:{}", &digits[..2], &digits[2..4]))
}

fn bad_date(name: &str) -> ConvertError {
    ConvertError::invalid_file_name(name, "date segment is not numeric")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_file_with_time_suffix() {
        let parsed = parse_sst_file_name("RS120127.105135").unwrap();
        assert_eq!(parsed.role, FileRole::Integration);
        assert_eq!(parsed.date, "2012-01-27");
        assert_eq!(parsed.time, "10:51");
    }

    #[test]
    fn test_auxiliary_file_without_time() {
        let parsed = parse_sst_file_name("bi990315").unwrap();
        assert_eq!(parsed.role, FileRole::Auxiliary);
        assert_eq!(parsed.date, "1999-03-15");
        assert_eq!(parsed.time, "00:00");
    }

    #[test]
    fn test_seven_digit_year() {
        let parsed = parse_sst_file_name("RF1120127").unwrap();
        assert_eq!(parsed.role, FileRole::Subintegration);
        assert_eq!(parsed.date, "2012-01-27");
    }

    #[test]
    fn test_non_numeric_date_is_invalid() {
        let err = parse_sst_file_name("BI99XXXX").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileName { .. }));
    }

    #[test]
    fn test_wrong_date_length_is_invalid() {
        let err = parse_sst_file_name("RS12012").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileName { .. }));
        let err = parse_sst_file_name("RS12012788").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileName { .. }));
    }

    #[test]
    fn test_unknown_prefix_is_invalid_file_type() {
        let err = parse_sst_file_name("XX120127").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileType { .. }));
    }

    #[test]
    fn test_trk_detection() {
        assert!(is_trk_file("SunTrack_120127_105135.TRK"));
        assert!(!is_trk_file("RS120127.105135"));
    }
}
