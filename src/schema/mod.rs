// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema handling: field specifications, XML table loading and the catalog
//! that resolves which table applies to an instrument / file type / date.

pub mod catalog;
pub mod field;
pub mod xml;

pub use catalog::{SchemaCatalog, SchemaQuery, TrkTable};
pub use field::{record_width, ElementType, FieldSpec};
pub use xml::SpanEntry;
