// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! 80-byte FITS header cards.
//!
//! Only the card forms the converter actually writes are supported: fixed
//! format value cards (string, integer, float, logical), COMMENT, HISTORY
//! and END. No card parsing, no CONTINUE long strings.

/// Value of a keyword card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    /// Quoted character string
    Str(String),
    /// Fixed-format integer
    Int(i64),
    /// Fixed-format real
    Float(f64),
    /// `T` / `F`
    Logical(bool),
}

/// One 80-byte header card.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// `KEYWORD = value / comment`
    Value {
        /// Keyword, at most 8 characters, rendered upper case
        keyword: String,
        /// The value
        value: CardValue,
        /// Free-text comment after the value separator (may be empty)
        comment: String,
    },
    /// `COMMENT text`
    Comment(String),
    /// `HISTORY text`
    History(String),
    /// `END`
    End,
}

/// Width of one header card in bytes.
pub const CARD_WIDTH: usize = 80;

impl Card {
    /// Shorthand for a string-valued card.
    pub fn string(keyword: &str, value: impl Into<String>, comment: &str) -> Self {
        Card::Value {
            keyword: keyword.to_string(),
            value: CardValue::Str(value.into()),
            comment: comment.to_string(),
        }
    }

    /// Shorthand for an integer-valued card.
    pub fn int(keyword: &str, value: i64) -> Self {
        Card::Value {
            keyword: keyword.to_string(),
            value: CardValue::Int(value),
            comment: String::new(),
        }
    }

    /// Shorthand for a logical-valued card.
    pub fn logical(keyword: &str, value: bool) -> Self {
        Card::Value {
            keyword: keyword.to_string(),
            value: CardValue::Logical(value),
            comment: String::new(),
        }
    }

    /// Render the card to its 80-byte image.
    pub fn render(&self) -> [u8; CARD_WIDTH] {
        let text = match self {
            Card::Value {
                keyword,
                value,
                comment,
            } => render_value_card(keyword, value, comment),
            Card::Comment(text) => format!("COMMENT {text}"),
            Card::History(text) => format!("HISTORY {text}"),
            Card::End => "END".to_string(),
        };

        let mut image = [b' '; CARD_WIDTH];
        let bytes = text.as_bytes();
        let take = bytes.len().min(CARD_WIDTH);
        image[..take].copy_from_slice(&bytes[..take]);
        image
    }
}

fn render_value_card(keyword: &str, value: &CardValue, comment: &str) -> String {
    let keyword = keyword.to_ascii_uppercase();
    let mut text = format!("{keyword:<8}= ");
    match value {
        CardValue::Str(s) => {
            // Embedded quotes double; the closing quote lands at column 20
            // or later per the fixed-format convention.
            let escaped = s.replace('\'', "''");
            text.push_str(&format!("'{escaped:<8}'"));
        }
        CardValue::Int(v) => text.push_str(&format!("{v:>20}")),
        CardValue::Float(v) => text.push_str(&format!("{v:>20}")),
        CardValue::Logical(v) => {
            text.push_str(&format!("{:>20}", if *v { "T" } else { "F" }))
        }
    }
    if !comment.is_empty() {
        text.push_str(" / ");
        text.push_str(comment);
    }
    text
}
