// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded field value type system.
//!
//! Provides a unified value representation for fields decoded from raw
//! instrument records. The variant set mirrors the element types the schema
//! tables can declare (see [`crate::schema::ElementType`]); fields with a
//! dimension greater than one decode into the `Array` container variant.

use serde::{Deserialize, Serialize};

/// Unified value type for decoded instrument data.
///
/// # Design Principles
///
/// - **Serde support**: all variants are serializable for downstream use
/// - **Owned types**: owned `String` / `Vec` for clarity and simplicity
/// - **Schema-shaped**: one scalar variant per schema element type, plus
///   `Array` for multi-sample fields such as the POEMAS TB payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// 32-bit signed integer (`xs:int`)
    Int32(i32),
    /// 16-bit unsigned integer (`xs:unsignedShort`)
    UInt16(u16),
    /// 16-bit signed integer (`xs:short`)
    Int16(i16),
    /// Signed byte (`xs:byte`)
    Byte(i8),
    /// 32-bit float (`xs:float`)
    Float32(f32),
    /// Fixed-width string (`xs:string`)
    Str(String),
    /// Fixed-length array of scalar values (dimension > 1)
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Check if this value is a numeric scalar.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldValue::Int32(_)
                | FieldValue::UInt16(_)
                | FieldValue::Int16(_)
                | FieldValue::Byte(_)
                | FieldValue::Float32(_)
        )
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, FieldValue::Array(_))
    }

    /// Try to convert this value to i64 (integer scalars only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int32(v) => Some(*v as i64),
            FieldValue::UInt16(v) => Some(*v as i64),
            FieldValue::Int16(v) => Some(*v as i64),
            FieldValue::Byte(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Try to convert this value to f64 (numeric scalars only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int32(v) => Some(*v as f64),
            FieldValue::UInt16(v) => Some(*v as f64),
            FieldValue::Int16(v) => Some(*v as f64),
            FieldValue::Byte(v) => Some(*v as f64),
            FieldValue::Float32(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to convert this value to f32 (numeric scalars only).
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|v| v as f32)
    }

    /// Try to view this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view this value as an array slice.
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Collect an array of numeric scalars into a flat `Vec<f32>`.
    ///
    /// A scalar value yields a one-element vector, matching a schema
    /// dimension of one. Returns `None` if any element is non-numeric.
    pub fn to_f32_vec(&self) -> Option<Vec<f32>> {
        match self {
            FieldValue::Array(items) => items.iter().map(|v| v.as_f32()).collect(),
            other => other.as_f32().map(|v| vec![v]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_predicates() {
        assert!(FieldValue::Int32(7).is_numeric());
        assert!(FieldValue::Float32(1.5).is_numeric());
        assert!(!FieldValue::Str("x".into()).is_numeric());
        assert!(!FieldValue::Array(vec![]).is_numeric());
        assert!(FieldValue::Array(vec![]).is_array());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(FieldValue::Int32(-42).as_i64(), Some(-42));
        assert_eq!(FieldValue::UInt16(65535).as_i64(), Some(65535));
        assert_eq!(FieldValue::Byte(-3).as_i64(), Some(-3));
        assert_eq!(FieldValue::Float32(1.0).as_i64(), None);
        assert_eq!(FieldValue::Str("1".into()).as_i64(), None);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(FieldValue::Int16(-7).as_f64(), Some(-7.0));
        assert_eq!(FieldValue::Float32(2.5).as_f64(), Some(2.5));
        assert_eq!(FieldValue::Str("2.5".into()).as_f64(), None);
    }

    #[test]
    fn test_as_str_and_array() {
        let s = FieldValue::Str("10:51:35".into());
        assert_eq!(s.as_str(), Some("10:51:35"));
        assert_eq!(s.as_array(), None);

        let a = FieldValue::Array(vec![FieldValue::Float32(1.0), FieldValue::Float32(2.0)]);
        assert_eq!(a.as_array().map(|v| v.len()), Some(2));
        assert_eq!(a.as_str(), None);
    }

    #[test]
    fn test_to_f32_vec() {
        let a = FieldValue::Array(vec![FieldValue::Float32(1.0), FieldValue::Int32(2)]);
        assert_eq!(a.to_f32_vec(), Some(vec![1.0, 2.0]));

        let scalar = FieldValue::Float32(3.5);
        assert_eq!(scalar.to_f32_vec(), Some(vec![3.5]));

        let bad = FieldValue::Array(vec![FieldValue::Str("x".into())]);
        assert_eq!(bad.to_f32_vec(), None);
    }
}
