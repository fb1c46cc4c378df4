// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # craamvert
//!
//! Converter for CRAAM radio-astronomy telemetry: decodes the raw binary
//! files written by the POEMAS polarimeter and the SST submillimeter
//! telescope and writes them as FITS containers.
//!
//! The conversion is an explicit pipeline of pure stages:
//! - `schema/` - XML field tables and the SST validity-window index
//! - `io/` - memory-mapped byte sources
//! - `decode/` - fixed-layout record decoding against a field table
//! - `time/` - instrument time scales rendered as dates and times of day
//! - `reduce/` - de-interleaving, second binning, day concatenation
//! - `instrument/` - the per-instrument pipelines (TRK and RBD)
//! - `fits/` - minimal FITS container output
//!
//! ## Example: converting a POEMAS tracking file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use craamvert::instrument::PoemasConversion;
//! use craamvert::schema::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::builtin()?;
//! let conversion = PoemasConversion::open("SunTrack_120127.TRK", &catalog)?;
//! let binned = conversion.to_level1()?;
//! binned.write_fits(".")?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{ConvertError, FieldValue, FileKind, FileRole, Instrument, Level, Result};

// Schema description tables
pub mod schema;

// Byte sources
pub mod io;

// Record decoding
pub mod decode;

// Instrument time scales
pub mod time;

// Data reductions
pub mod reduce;

// Per-instrument pipelines
pub mod instrument;

// FITS output
pub mod fits;

pub use instrument::{PoemasConversion, SstConversion};
pub use schema::SchemaCatalog;
