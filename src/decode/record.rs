// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-layout binary record decoding.
//!
//! Decodes a flat byte stream into typed, named fields according to an
//! ordered field-spec sequence. Field order defines the byte offset of each
//! field inside a record; the record width is fully determined by the schema.
//!
//! Two decode passes may target the same byte source with different schemas
//! and starting offsets. The POEMAS TRK layout does exactly that: a header
//! pass ([`RecordCount::Exact`]`(1)` at offset 0) followed by a body pass
//! ([`RecordCount::ToEnd`] at the header's byte width).
//!
//! Decoding is a pure function over its inputs; decoding the same source
//! twice with the same schema yields identical record sets.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::debug;

use crate::core::{ConvertError, FieldValue, Result};
use crate::schema::{record_width, ElementType, FieldSpec};

/// Byte order of the source.
///
/// All current instrument writers are little-endian, so that is the default;
/// callers decoding foreign captures can override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Little-endian (instrument native)
    #[default]
    Little,
    /// Big-endian
    Big,
}

/// How many records a decode pass should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCount {
    /// Exactly this many records; fewer available is a schema mismatch
    Exact(usize),
    /// All full records to end-of-source (a trailing partial record is
    /// ignored, but at least one full record must exist)
    ToEnd,
}

/// Result of decoding one byte source against one field-spec sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecordSet {
    /// The schema, preserved in order
    pub fields: Vec<FieldSpec>,
    /// Decoded records; each row is ordered like `fields`
    pub rows: Vec<Vec<FieldValue>>,
}

impl DecodedRecordSet {
    /// Number of decoded records.
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Value of a named field in one row.
    pub fn value(&self, row: usize, name: &str) -> Option<&FieldValue> {
        let idx = self.field_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    /// Extract a named scalar integer column.
    ///
    /// Fails with [`ConvertError::SchemaMismatch`] if the field is missing
    /// or not an integer scalar; a decoded set whose values do not match
    /// their declared layout is a defect, never silently skipped.
    pub fn i64_column(&self, name: &str) -> Result<Vec<i64>> {
        let idx = self.field_index(name).ok_or_else(|| {
            ConvertError::schema_mismatch("record set", format!("no field named '{name}'"))
        })?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_i64().ok_or_else(|| {
                    ConvertError::schema_mismatch(
                        "record set",
                        format!("field '{name}' is not an integer scalar"),
                    )
                })
            })
            .collect()
    }

    /// Extract a named scalar float column.
    pub fn f32_column(&self, name: &str) -> Result<Vec<f32>> {
        let idx = self.field_index(name).ok_or_else(|| {
            ConvertError::schema_mismatch("record set", format!("no field named '{name}'"))
        })?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_f32().ok_or_else(|| {
                    ConvertError::schema_mismatch(
                        "record set",
                        format!("field '{name}' is not a numeric scalar"),
                    )
                })
            })
            .collect()
    }

    /// Extract a named array field from every row, flattened to f32.
    pub fn f32_array_column(&self, name: &str) -> Result<Vec<Vec<f32>>> {
        let idx = self.field_index(name).ok_or_else(|| {
            ConvertError::schema_mismatch("record set", format!("no field named '{name}'"))
        })?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].to_f32_vec().ok_or_else(|| {
                    ConvertError::schema_mismatch(
                        "record set",
                        format!("field '{name}' is not numeric"),
                    )
                })
            })
            .collect()
    }
}

/// Decode `count` records from `bytes` starting at `offset`.
pub fn decode(
    bytes: &[u8],
    fields: &[FieldSpec],
    count: RecordCount,
    offset: usize,
    endian: Endianness,
) -> Result<DecodedRecordSet> {
    let width = record_width(fields);
    debug_assert!(width > 0, "schema with zero-width records");

    let available = bytes.len().saturating_sub(offset);
    let records = match count {
        RecordCount::Exact(n) => {
            if available < n * width {
                return Err(ConvertError::schema_mismatch(
                    "record decode",
                    format!(
                        "requested {n} record(s) of {width} bytes at offset {offset}, \
                         but only {available} bytes remain"
                    ),
                ));
            }
            n
        }
        RecordCount::ToEnd => {
            if available < width {
                return Err(ConvertError::schema_mismatch(
                    "record decode",
                    format!(
                        "source has {available} bytes past offset {offset}, \
                         shorter than one {width}-byte record"
                    ),
                ));
            }
            available / width
        }
    };

    let mut rows = Vec::with_capacity(records);
    let mut pos = offset;
    for _ in 0..records {
        let mut row = Vec::with_capacity(fields.len());
        for field in fields {
            row.push(decode_field(bytes, &mut pos, field, endian));
        }
        rows.push(row);
    }

    debug!(
        records,
        record_width = width,
        offset,
        "decoded record set"
    );

    Ok(DecodedRecordSet {
        fields: fields.to_vec(),
        rows,
    })
}

fn decode_field(bytes: &[u8], pos: &mut usize, field: &FieldSpec, endian: Endianness) -> FieldValue {
    // Bounds were validated for the whole pass up front.
    if field.element_type == ElementType::Str {
        let raw = &bytes[*pos..*pos + field.dimension];
        *pos += field.dimension;
        let text = String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .to_string();
        return FieldValue::Str(text);
    }

    if field.dimension == 1 {
        return decode_scalar(bytes, pos, field.element_type, endian);
    }

    let items = (0..field.dimension)
        .map(|_| decode_scalar(bytes, pos, field.element_type, endian))
        .collect();
    FieldValue::Array(items)
}

fn decode_scalar(
    bytes: &[u8],
    pos: &mut usize,
    ty: ElementType,
    endian: Endianness,
) -> FieldValue {
    let width = ty.byte_width();
    let raw = &bytes[*pos..*pos + width];
    *pos += width;
    match (ty, endian) {
        (ElementType::Int32, Endianness::Little) => FieldValue::Int32(LittleEndian::read_i32(raw)),
        (ElementType::Int32, Endianness::Big) => FieldValue::Int32(BigEndian::read_i32(raw)),
        (ElementType::UInt16, Endianness::Little) => {
            FieldValue::UInt16(LittleEndian::read_u16(raw))
        }
        (ElementType::UInt16, Endianness::Big) => FieldValue::UInt16(BigEndian::read_u16(raw)),
        (ElementType::Int16, Endianness::Little) => FieldValue::Int16(LittleEndian::read_i16(raw)),
        (ElementType::Int16, Endianness::Big) => FieldValue::Int16(BigEndian::read_i16(raw)),
        (ElementType::Float32, Endianness::Little) => {
            FieldValue::Float32(LittleEndian::read_f32(raw))
        }
        (ElementType::Float32, Endianness::Big) => FieldValue::Float32(BigEndian::read_f32(raw)),
        (ElementType::Byte, _) => FieldValue::Byte(raw[0] as i8),
        (ElementType::Str, _) => unreachable!("strings are decoded whole"),
    }
}

/// Re-encode a record set into the byte layout its schema describes.
///
/// The inverse of [`decode`]: for any record set decoded from a matching
/// buffer, re-encoding reproduces that buffer byte-identically (string
/// fields are NUL-padded back to their declared width).
pub fn encode(set: &DecodedRecordSet, endian: Endianness) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(set.record_count() * record_width(&set.fields));
    for (row_idx, row) in set.rows.iter().enumerate() {
        if row.len() != set.fields.len() {
            return Err(ConvertError::schema_mismatch(
                "record encode",
                format!(
                    "row {row_idx} has {} values for {} fields",
                    row.len(),
                    set.fields.len()
                ),
            ));
        }
        for (field, value) in set.fields.iter().zip(row) {
            encode_field(&mut out, field, value)
                .map_err(|e| match e {
                    ConvertError::SchemaMismatch { context, message } => {
                        ConvertError::schema_mismatch(
                            context,
                            format!("row {row_idx}, field '{}': {message}", field.name),
                        )
                    }
                    other => other,
                })
                .map(|()| match endian {
                    // Scalars are written little-endian by encode_field; swap
                    // in place for big-endian targets.
                    Endianness::Little => (),
                    Endianness::Big => swap_tail(&mut out, field),
                })?;
        }
    }
    Ok(out)
}

fn swap_tail(out: &mut [u8], field: &FieldSpec) {
    let elem = field.element_type.byte_width();
    if elem == 1 || field.element_type == ElementType::Str {
        return;
    }
    let total = field.byte_width();
    let start = out.len() - total;
    for chunk in out[start..].chunks_exact_mut(elem) {
        chunk.reverse();
    }
}

fn encode_field(out: &mut Vec<u8>, field: &FieldSpec, value: &FieldValue) -> Result<()> {
    let mismatch = || {
        ConvertError::schema_mismatch(
            "record encode",
            format!("value does not match declared type {:?}", field.element_type),
        )
    };

    if field.element_type == ElementType::Str {
        let FieldValue::Str(text) = value else {
            return Err(mismatch());
        };
        let raw = text.as_bytes();
        if raw.len() > field.dimension {
            return Err(ConvertError::schema_mismatch(
                "record encode",
                format!(
                    "string of {} bytes exceeds declared width {}",
                    raw.len(),
                    field.dimension
                ),
            ));
        }
        out.extend_from_slice(raw);
        out.resize(out.len() + (field.dimension - raw.len()), 0);
        return Ok(());
    }

    let scalars: Vec<&FieldValue> = match value {
        FieldValue::Array(items) if field.dimension > 1 => items.iter().collect(),
        scalar if field.dimension == 1 => vec![scalar],
        _ => return Err(mismatch()),
    };
    if scalars.len() != field.dimension {
        return Err(ConvertError::schema_mismatch(
            "record encode",
            format!(
                "array of {} elements for declared dimension {}",
                scalars.len(),
                field.dimension
            ),
        ));
    }

    for scalar in scalars {
        match (field.element_type, scalar) {
            (ElementType::Int32, FieldValue::Int32(v)) => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            (ElementType::UInt16, FieldValue::UInt16(v)) => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            (ElementType::Int16, FieldValue::Int16(v)) => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            (ElementType::Byte, FieldValue::Byte(v)) => out.push(*v as u8),
            (ElementType::Float32, FieldValue::Float32(v)) => {
                out.extend_from_slice(&v.to_le_bytes());
            }
            _ => return Err(mismatch()),
        }
    }
    Ok(())
}
