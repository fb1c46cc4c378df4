// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! FITS container assembly and output.
//!
//! An [`HduList`] is a provenance-carrying primary HDU followed by binary
//! tables; [`HduList::write_to`] serializes the whole container in 2880-byte
//! blocks. An existing output file is never overwritten.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::{ConvertError, FileRole, Instrument, Level, Result};
use crate::fits::card::{Card, CardValue, CARD_WIDTH};
use crate::fits::table::BinaryTable;

/// FITS block width in bytes; every unit is padded to a multiple of this.
pub const BLOCK_WIDTH: usize = 2880;

/// Primary HDU: no data, only provenance cards.
#[derive(Debug, Clone, Default)]
pub struct PrimaryHdu {
    cards: Vec<Card>,
}

impl PrimaryHdu {
    /// Empty primary HDU.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string-valued keyword card.
    pub fn string(&mut self, keyword: &str, value: impl Into<String>, comment: &str) -> &mut Self {
        self.cards.push(Card::string(keyword, value, comment));
        self
    }

    /// Append a COMMENT card.
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.cards.push(Card::Comment(text.into()));
        self
    }

    /// Append a HISTORY card. History is append-only; reprocessing stages
    /// add their own entries after the existing ones.
    pub fn history(&mut self, text: impl Into<String>) -> &mut Self {
        self.cards.push(Card::History(text.into()));
        self
    }

    /// All HISTORY entries, in append order.
    pub fn history_entries(&self) -> Vec<&str> {
        self.cards
            .iter()
            .filter_map(|card| match card {
                Card::History(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Value of a named card, if present.
    pub fn value(&self, keyword: &str) -> Option<&CardValue> {
        let keyword = keyword.to_ascii_uppercase();
        self.cards.iter().find_map(|card| match card {
            Card::Value {
                keyword: k, value, ..
            } if k.to_ascii_uppercase() == keyword => Some(value),
            _ => None,
        })
    }

    fn render(&self) -> Vec<u8> {
        let mut cards = vec![
            Card::logical("SIMPLE", true),
            Card::int("BITPIX", 8),
            Card::int("NAXIS", 0),
            Card::logical("EXTEND", true),
        ];
        cards.extend(self.cards.iter().cloned());
        cards.push(Card::End);
        render_header(&cards)
    }
}

/// A complete output container.
#[derive(Debug, Clone)]
pub struct HduList {
    /// Provenance header
    pub primary: PrimaryHdu,
    /// Data tables, in order
    pub tables: Vec<BinaryTable>,
}

impl HduList {
    /// Container with an empty primary header and no tables.
    pub fn new(primary: PrimaryHdu) -> Self {
        Self {
            primary,
            tables: Vec::new(),
        }
    }

    /// Append a binary table extension.
    pub fn push_table(&mut self, table: BinaryTable) {
        self.tables.push(table);
    }

    /// Serialize the container into FITS blocks.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = self.primary.render();
        for table in &self.tables {
            let mut cards = table.header_cards();
            cards.push(Card::End);
            out.extend_from_slice(&render_header(&cards));

            let mut data = table.serialize_rows()?;
            pad_to_block(&mut data, 0);
            out.extend_from_slice(&data);
        }
        Ok(out)
    }

    /// Write the container to `path`.
    ///
    /// Refuses to overwrite: an existing file fails with
    /// [`ConvertError::FileAlreadyExists`] and the file is left untouched.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ConvertError::file_already_exists(path));
        }
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes).map_err(|e| ConvertError::io("fits output", e.to_string()))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote fits container");
        Ok(())
    }
}

/// Render header cards into space-padded blocks.
fn render_header(cards: &[Card]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cards.len() * CARD_WIDTH);
    for card in cards {
        out.extend_from_slice(&card.render());
    }
    pad_to_block(&mut out, b' ');
    out
}

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let rem = bytes.len() % BLOCK_WIDTH;
    if rem != 0 {
        bytes.resize(bytes.len() + BLOCK_WIDTH - rem, fill);
    }
}

/// Auto-generated output file name:
/// `<instrument>-<role>-D<date>-T<start>-<end>-level<N>.fits`, with colons
/// in time components replaced by underscores.
pub fn output_file_name(
    instrument: Instrument,
    role: FileRole,
    date: &str,
    start_time: &str,
    end_time: &str,
    level: Level,
) -> String {
    format!(
        "{}-{}-D{}-T{}-{}-level{}.fits",
        instrument.as_str().to_ascii_lowercase(),
        role.to_string().to_ascii_lowercase(),
        date.replace(':', "_"),
        start_time.replace(':', "_"),
        end_time.replace(':', "_"),
        level.as_u8(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldValue;
    use crate::schema::{ElementType, FieldSpec};

    fn sample_list() -> HduList {
        let mut primary = PrimaryHdu::new();
        primary
            .string("ORIGIN", "CRAAM/Universidade Presbiteriana Mackenzie", "")
            .string("TELESCOP", "Solar Submillimeter Telescope", "")
            .history("Converted to FITS level-0");
        let mut list = HduList::new(primary);
        list.push_table(BinaryTable {
            fields: vec![FieldSpec::new("time", 1, ElementType::Int32, "Hus")],
            rows: vec![vec![FieldValue::Int32(42)]],
        });
        list
    }

    #[test]
    fn test_container_is_block_aligned() {
        let bytes = sample_list().to_bytes().unwrap();
        assert_eq!(bytes.len() % BLOCK_WIDTH, 0);
        // Primary header, table header, table data.
        assert_eq!(bytes.len(), 3 * BLOCK_WIDTH);
    }

    #[test]
    fn test_container_starts_with_simple() {
        let bytes = sample_list().to_bytes().unwrap();
        assert_eq!(&bytes[..9], b"SIMPLE  =");
    }

    #[test]
    fn test_table_data_follows_extension_header() {
        let bytes = sample_list().to_bytes().unwrap();
        let data = &bytes[2 * BLOCK_WIDTH..];
        assert_eq!(&data[..4], &42i32.to_be_bytes());
        assert!(data[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fits");
        sample_list().write_to(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = sample_list().write_to(&path).unwrap_err();
        assert!(matches!(err, ConvertError::FileAlreadyExists { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut primary = PrimaryHdu::new();
        primary
            .history("Converted to FITS level-0")
            .history("Converted to FITS level-1");
        assert_eq!(
            primary.history_entries(),
            vec!["Converted to FITS level-0", "Converted to FITS level-1"]
        );
    }

    #[test]
    fn test_output_file_name_replaces_colons() {
        let name = output_file_name(
            Instrument::Poemas,
            FileRole::Tracking,
            "2012-01-27",
            "10:51:35",
            "13:29:32",
            Level::SecondBinned,
        );
        assert_eq!(
            name,
            "poemas-tracking-D2012-01-27-T10_51_35-13_29_32-level1.fits"
        );
    }
}
