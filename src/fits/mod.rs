// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Minimal FITS container output.
//!
//! Just enough of the format for the converter's needs: a primary HDU
//! carrying provenance cards, binary-table extensions, and a writer that
//! never overwrites. No reading, no compliance checking.

pub mod card;
pub mod table;
pub mod writer;

pub use card::{Card, CardValue};
pub use table::BinaryTable;
pub use writer::{output_file_name, HduList, PrimaryHdu, BLOCK_WIDTH};
