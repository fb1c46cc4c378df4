// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod concat;
mod convert;
mod inspect;

pub use concat::ConcatCmd;
pub use convert::ConvertCmd;
pub use inspect::InspectCmd;
