// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Binary-table HDUs.
//!
//! Maps schema element types onto FITS TFORM codes and serializes decoded
//! rows into the big-endian table heap. Unsigned 16-bit columns use the
//! standard signed-storage convention (`TFORM I` with `TZERO 32768`); signed
//! bytes likewise (`TFORM B` with `TZERO -128`).

use byteorder::{BigEndian, ByteOrder};

use crate::core::{ConvertError, FieldValue, Result};
use crate::decode::DecodedRecordSet;
use crate::fits::card::Card;
use crate::schema::{record_width, ElementType, FieldSpec};

/// One binary-table extension: a schema plus its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryTable {
    /// Column schema, in table order
    pub fields: Vec<FieldSpec>,
    /// Rows, each ordered like `fields`
    pub rows: Vec<Vec<FieldValue>>,
}

impl From<DecodedRecordSet> for BinaryTable {
    fn from(set: DecodedRecordSet) -> Self {
        Self {
            fields: set.fields,
            rows: set.rows,
        }
    }
}

/// TFORM code for a schema field.
fn tform(field: &FieldSpec) -> String {
    let code = match field.element_type {
        ElementType::Int32 => 'J',
        ElementType::Float32 => 'E',
        ElementType::Str => 'A',
        ElementType::UInt16 | ElementType::Int16 => 'I',
        ElementType::Byte => 'B',
    };
    format!("{}{}", field.dimension, code)
}

/// TZERO offset for a schema field, when the stored form is shifted.
fn tzero(field: &FieldSpec) -> Option<i64> {
    match field.element_type {
        ElementType::UInt16 => Some(32768),
        ElementType::Byte => Some(-128),
        _ => None,
    }
}

impl BinaryTable {
    /// Byte width of one serialized row.
    pub fn row_width(&self) -> usize {
        record_width(&self.fields)
    }

    /// Header cards of this extension, END not included.
    pub fn header_cards(&self) -> Vec<Card> {
        let mut cards = vec![
            Card::string("XTENSION", "BINTABLE", "binary table extension"),
            Card::int("BITPIX", 8),
            Card::int("NAXIS", 2),
            Card::int("NAXIS1", self.row_width() as i64),
            Card::int("NAXIS2", self.rows.len() as i64),
            Card::int("PCOUNT", 0),
            Card::int("GCOUNT", 1),
            Card::int("TFIELDS", self.fields.len() as i64),
        ];
        for (i, field) in self.fields.iter().enumerate() {
            let n = i + 1;
            cards.push(Card::string(&format!("TTYPE{n}"), field.name.clone(), ""));
            cards.push(Card::string(&format!("TFORM{n}"), tform(field), ""));
            if !field.unit.is_empty() {
                cards.push(Card::string(&format!("TUNIT{n}"), field.unit.clone(), ""));
            }
            if let Some(offset) = tzero(field) {
                cards.push(Card::int(&format!("TZERO{n}"), offset));
            }
        }
        cards
    }

    /// Serialize all rows into the big-endian table heap.
    ///
    /// Fails with [`ConvertError::SchemaMismatch`] when a row does not match
    /// the declared column layout.
    pub fn serialize_rows(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.rows.len() * self.row_width());
        for row in &self.rows {
            if row.len() != self.fields.len() {
                return Err(ConvertError::schema_mismatch(
                    "binary table",
                    format!(
                        "row has {} values for {} columns",
                        row.len(),
                        self.fields.len()
                    ),
                ));
            }
            for (field, value) in self.fields.iter().zip(row) {
                serialize_field(&mut out, field, value)?;
            }
        }
        Ok(out)
    }
}

fn serialize_field(out: &mut Vec<u8>, field: &FieldSpec, value: &FieldValue) -> Result<()> {
    if field.element_type == ElementType::Str {
        let text = value.as_str().ok_or_else(|| element_mismatch(field))?;
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(field.dimension, b' ');
        out.extend_from_slice(&bytes[..field.dimension]);
        return Ok(());
    }

    match value {
        FieldValue::Array(elements) => {
            if elements.len() != field.dimension {
                return Err(ConvertError::schema_mismatch(
                    "binary table",
                    format!(
                        "field '{}' has {} elements, schema declares {}",
                        field.name,
                        elements.len(),
                        field.dimension
                    ),
                ));
            }
            for element in elements {
                serialize_element(out, field, element)?;
            }
            Ok(())
        }
        scalar if field.dimension == 1 => serialize_element(out, field, scalar),
        _ => Err(element_mismatch(field)),
    }
}

fn serialize_element(out: &mut Vec<u8>, field: &FieldSpec, value: &FieldValue) -> Result<()> {
    let mut word = [0u8; 4];
    match (field.element_type, value) {
        (ElementType::Int32, FieldValue::Int32(v)) => {
            BigEndian::write_i32(&mut word, *v);
            out.extend_from_slice(&word);
        }
        (ElementType::Float32, FieldValue::Float32(v)) => {
            BigEndian::write_f32(&mut word, *v);
            out.extend_from_slice(&word);
        }
        (ElementType::UInt16, FieldValue::UInt16(v)) => {
            // Shifted storage, recovered by readers through TZERO.
            let stored = (i32::from(*v) - 32768) as i16;
            BigEndian::write_i16(&mut word[..2], stored);
            out.extend_from_slice(&word[..2]);
        }
        (ElementType::Int16, FieldValue::Int16(v)) => {
            BigEndian::write_i16(&mut word[..2], *v);
            out.extend_from_slice(&word[..2]);
        }
        (ElementType::Byte, FieldValue::Byte(v)) => {
            let stored = (i16::from(*v) + 128) as u8;
            out.push(stored);
        }
        _ => return Err(element_mismatch(field)),
    }
    Ok(())
}

fn element_mismatch(field: &FieldSpec) -> ConvertError {
    ConvertError::schema_mismatch(
        "binary table",
        format!(
            "value for field '{}' does not match element type {:?}",
            field.name, field.element_type
        ),
    )
}
