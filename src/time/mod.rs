// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Instrument time scales.
//!
//! The two instruments stamp records on different scales:
//!
//! - **POEMAS** `sec` fields count whole seconds since 2001-01-01 00:00:00
//!   (instrument local day count, no leap-second handling in the writer).
//! - **SST** `time` fields count hundreds of microseconds ("Hus") since
//!   0 UT of the observation day.
//!
//! Both are rendered as ISO-style strings: dates as `YYYY-MM-DD`, times of
//! day as `HH:MM:SS` (POEMAS) or `HH:MM:SS.mmm` (SST).

use chrono::{Duration, NaiveDate};

use crate::core::{ConvertError, Result};

/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Hundreds of microseconds per second (SST time unit).
pub const HUS_PER_SECOND: i64 = 10_000;

/// Day zero of the POEMAS second counter.
fn poemas_epoch() -> NaiveDate {
    // 349354295 s <-> 2012-01-27 10:51:35 pins the epoch.
    NaiveDate::from_ymd_opt(2001, 1, 1).expect("valid epoch date")
}

/// ISO date (`YYYY-MM-DD`) of a POEMAS second counter value.
pub fn poemas_date(sec: i64) -> String {
    let days = sec.div_euclid(SECONDS_PER_DAY);
    (poemas_epoch() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Seconds of day of a POEMAS second counter value.
pub fn poemas_seconds_of_day(sec: i64) -> i64 {
    sec.rem_euclid(SECONDS_PER_DAY)
}

/// Time of day (`HH:MM:SS`) of a POEMAS second counter value.
pub fn poemas_time(sec: i64) -> String {
    let sod = poemas_seconds_of_day(sec);
    format!(
        "{:02}:{:02}:{:02}",
        sod / 3600,
        (sod % 3600) / 60,
        sod % 60
    )
}

/// Time of day (`HH:MM:SS.mmm`) of an SST Hus counter value.
pub fn hus_time(hus: i64) -> String {
    let sod = (hus.div_euclid(HUS_PER_SECOND)).rem_euclid(SECONDS_PER_DAY);
    let millis = hus.rem_euclid(HUS_PER_SECOND) / 10;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        sod / 3600,
        (sod % 3600) / 60,
        sod % 60,
        millis
    )
}

/// Truncate a time-of-day string to whole seconds (`HH:MM:SS`).
pub fn truncate_to_seconds(time: &str) -> &str {
    if time.len() > 8 { &time[..8] } else { time }
}

/// Integer seconds-of-day component of a time-of-day string.
///
/// Accepts `HH:MM:SS` with an optional fractional suffix; the fraction is
/// discarded, never rounded. This is the chunk key for second-binning.
pub fn seconds_of_day_from_str(time: &str) -> Result<i64> {
    let bad = || {
        ConvertError::schema_mismatch(
            "time column",
            format!("'{time}' is not a HH:MM:SS[.fff] time of day"),
        )
    };

    let whole = time.split('.').next().ok_or_else(bad)?;
    let mut parts = whole.split(':');
    let hours: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let minutes: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let seconds: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    if parts.next().is_some() || !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(bad());
    }
    // Seconds are not range-checked past 59: some writers emit :60 during
    // leap-second days and the binner only needs a monotone chunk key.
    Ok(hours * 3600 + minutes * 60 + seconds)
}
