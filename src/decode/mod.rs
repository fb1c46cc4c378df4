// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Binary record decoding.

pub mod record;

pub use record::{decode, encode, DecodedRecordSet, Endianness, RecordCount};
