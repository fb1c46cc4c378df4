// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field specifications describing the byte layout of instrument records.
//!
//! A schema is an ordered sequence of [`FieldSpec`]s; the order defines the
//! on-disk byte layout. The total byte width of one record is the sum of
//! `dimension * element_width` over the sequence.

use serde::{Deserialize, Serialize};

use crate::core::{ConvertError, Result};

/// Element type of a schema field.
///
/// The string forms are the XML Schema type codes used by the description
/// tables (`xs:int`, `xs:float`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// 32-bit signed integer (`xs:int`)
    Int32,
    /// 16-bit unsigned integer (`xs:unsignedShort`)
    UInt16,
    /// 16-bit signed integer (`xs:short`)
    Int16,
    /// Signed byte (`xs:byte`)
    Byte,
    /// 32-bit IEEE float (`xs:float`)
    Float32,
    /// Fixed-width byte string (`xs:string`)
    Str,
}

impl ElementType {
    /// Byte width of one element of this type.
    ///
    /// `Str` elements occupy one byte each; a string field's total width is
    /// its dimension.
    pub fn byte_width(&self) -> usize {
        match self {
            ElementType::Int32 | ElementType::Float32 => 4,
            ElementType::UInt16 | ElementType::Int16 => 2,
            ElementType::Byte | ElementType::Str => 1,
        }
    }

    /// Parse the XML Schema type code used by the description tables.
    pub fn from_xml_code(code: &str) -> Result<Self> {
        match code {
            "xs:int" => Ok(ElementType::Int32),
            "xs:unsignedShort" => Ok(ElementType::UInt16),
            "xs:short" => Ok(ElementType::Int16),
            "xs:byte" => Ok(ElementType::Byte),
            "xs:float" => Ok(ElementType::Float32),
            "xs:string" => Ok(ElementType::Str),
            other => Err(ConvertError::schema_mismatch(
                "field table",
                format!("unknown element type code '{other}'"),
            )),
        }
    }

    /// The XML Schema type code for this element type.
    pub fn xml_code(&self) -> &'static str {
        match self {
            ElementType::Int32 => "xs:int",
            ElementType::UInt16 => "xs:unsignedShort",
            ElementType::Int16 => "xs:short",
            ElementType::Byte => "xs:byte",
            ElementType::Float32 => "xs:float",
            ElementType::Str => "xs:string",
        }
    }
}

/// One field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Number of elements (1 for scalars)
    pub dimension: usize,
    /// Element type
    pub element_type: ElementType,
    /// Free-text unit annotation
    pub unit: String,
}

impl FieldSpec {
    /// Create a field spec.
    pub fn new(
        name: impl Into<String>,
        dimension: usize,
        element_type: ElementType,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            element_type,
            unit: unit.into(),
        }
    }

    /// Total byte width of this field within a record.
    pub fn byte_width(&self) -> usize {
        self.dimension * self.element_type.byte_width()
    }
}

/// Byte width of one full record described by an ordered field sequence.
pub fn record_width(fields: &[FieldSpec]) -> usize {
    fields.iter().map(FieldSpec::byte_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_widths() {
        assert_eq!(ElementType::Int32.byte_width(), 4);
        assert_eq!(ElementType::Float32.byte_width(), 4);
        assert_eq!(ElementType::UInt16.byte_width(), 2);
        assert_eq!(ElementType::Int16.byte_width(), 2);
        assert_eq!(ElementType::Byte.byte_width(), 1);
        assert_eq!(ElementType::Str.byte_width(), 1);
    }

    #[test]
    fn test_from_xml_code() {
        assert_eq!(
            ElementType::from_xml_code("xs:int").unwrap(),
            ElementType::Int32
        );
        assert_eq!(
            ElementType::from_xml_code("xs:unsignedShort").unwrap(),
            ElementType::UInt16
        );
        assert!(ElementType::from_xml_code("xs:double").is_err());
    }

    #[test]
    fn test_xml_code_round_trip() {
        for ty in [
            ElementType::Int32,
            ElementType::UInt16,
            ElementType::Int16,
            ElementType::Byte,
            ElementType::Float32,
            ElementType::Str,
        ] {
            assert_eq!(ElementType::from_xml_code(ty.xml_code()).unwrap(), ty);
        }
    }

    #[test]
    fn test_record_width_trk_header() {
        // Code, NRS, FreqNo (int32) + Freq1, Freq2, BRTMin, BRTMax (float32)
        let fields: Vec<FieldSpec> = [
            ("Code", ElementType::Int32),
            ("NRS", ElementType::Int32),
            ("FreqNo", ElementType::Int32),
            ("Freq1", ElementType::Float32),
            ("Freq2", ElementType::Float32),
            ("BRTMin", ElementType::Float32),
            ("BRTMax", ElementType::Float32),
        ]
        .iter()
        .map(|(name, ty)| FieldSpec::new(*name, 1, *ty, "none"))
        .collect();

        assert_eq!(record_width(&fields), 28);
    }

    #[test]
    fn test_record_width_with_array_field() {
        let fields = vec![
            FieldSpec::new("sec", 1, ElementType::Int32, "s"),
            FieldSpec::new("ele_ang", 1, ElementType::Float32, "deg"),
            FieldSpec::new("azi_ang", 1, ElementType::Float32, "deg"),
            FieldSpec::new("TB", 400, ElementType::Float32, "K"),
        ];
        assert_eq!(record_width(&fields), 12 + 1600);
    }
}
