// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Loader for the XML schema description resources.
//!
//! Two resource kinds exist, both consumed as-is (the on-disk format is not
//! ours to change):
//!
//! - **Field tables**: an ordered list of `<column>` elements, each with
//!   `name`, `dimension`, `type` and `unit` children. Column order defines
//!   the record byte layout.
//! - **Time-span index** (SST only): `<span>` rows mapping a file-role tag
//!   (`Data` / `Auxiliary`) and a validity date range onto the field table
//!   that applies inside that range.

use roxmltree::{Document, Node};

use crate::core::{ConvertError, Result};
use crate::schema::field::{ElementType, FieldSpec};

fn child_text<'a>(node: Node<'a, 'a>, tag: &str) -> Result<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .ok_or_else(|| {
            ConvertError::schema_mismatch(
                "schema resource",
                format!("<{}> element missing <{tag}> child", node.tag_name().name()),
            )
        })
}

/// Parse a field table into an ordered field-spec sequence.
pub fn parse_field_table(text: &str) -> Result<Vec<FieldSpec>> {
    let doc = Document::parse(text)
        .map_err(|e| ConvertError::schema_mismatch("field table", e.to_string()))?;

    let mut fields = Vec::new();
    for column in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("column"))
    {
        let name = child_text(column, "name")?;
        let dimension: usize = child_text(column, "dimension")?.parse().map_err(|_| {
            ConvertError::schema_mismatch(
                "field table",
                format!("field '{name}' has a non-integer dimension"),
            )
        })?;
        if dimension == 0 {
            return Err(ConvertError::schema_mismatch(
                "field table",
                format!("field '{name}' has dimension 0"),
            ));
        }
        let element_type = ElementType::from_xml_code(child_text(column, "type")?)?;
        let unit = child_text(column, "unit")?;

        fields.push(FieldSpec::new(name, dimension, element_type, unit));
    }

    if fields.is_empty() {
        return Err(ConvertError::schema_mismatch(
            "field table",
            "table declares no columns",
        ));
    }

    Ok(fields)
}

/// One row of the SST time-span index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEntry {
    /// File-role tag (`Data` or `Auxiliary`)
    pub filetype: String,
    /// First date (inclusive, ISO `YYYY-MM-DD`) the table applies to
    pub start: String,
    /// Last date (inclusive) the table applies to
    pub end: String,
    /// File name of the field table valid inside the window
    pub table_file: String,
}

impl SpanEntry {
    /// Whether this entry's validity window brackets `date` for `filetype`.
    ///
    /// ISO dates compare correctly as strings, which is how the original
    /// index was consumed as well.
    pub fn matches(&self, filetype: &str, date: &str) -> bool {
        self.filetype == filetype && self.start.as_str() <= date && date <= self.end.as_str()
    }
}

/// Parse the time-span index.
pub fn parse_span_table(text: &str) -> Result<Vec<SpanEntry>> {
    let doc = Document::parse(text)
        .map_err(|e| ConvertError::schema_mismatch("time-span table", e.to_string()))?;

    let mut entries = Vec::new();
    for span in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("span"))
    {
        entries.push(SpanEntry {
            filetype: child_text(span, "filetype")?.to_string(),
            start: child_text(span, "start")?.to_string(),
            end: child_text(span, "end")?.to_string(),
            table_file: child_text(span, "file")?.to_string(),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"<?xml version="1.0"?>
<SSTDataFormat>
    <column>
        <name>time</name>
        <dimension>1</dimension>
        <type>xs:int</type>
        <unit>Hus</unit>
    </column>
    <column>
        <name>adcval</name>
        <dimension>6</dimension>
        <type>xs:unsignedShort</type>
        <unit>ADCu</unit>
    </column>
</SSTDataFormat>"#;

    #[test]
    fn test_parse_field_table_preserves_order() {
        let fields = parse_field_table(TABLE).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "time");
        assert_eq!(fields[0].element_type, ElementType::Int32);
        assert_eq!(fields[0].unit, "Hus");
        assert_eq!(fields[1].name, "adcval");
        assert_eq!(fields[1].dimension, 6);
        assert_eq!(fields[1].element_type, ElementType::UInt16);
    }

    #[test]
    fn test_parse_field_table_rejects_bad_dimension() {
        let text = TABLE.replace("<dimension>6</dimension>", "<dimension>six</dimension>");
        assert!(matches!(
            parse_field_table(&text),
            Err(ConvertError::SchemaMismatch { .. })
        ));

        let text = TABLE.replace("<dimension>6</dimension>", "<dimension>0</dimension>");
        assert!(parse_field_table(&text).is_err());
    }

    #[test]
    fn test_parse_field_table_rejects_unknown_type() {
        let text = TABLE.replace("xs:unsignedShort", "xs:duration");
        assert!(parse_field_table(&text).is_err());
    }

    #[test]
    fn test_parse_field_table_rejects_missing_child() {
        let text = TABLE.replace("<unit>Hus</unit>", "");
        assert!(parse_field_table(&text).is_err());
    }

    const SPANS: &str = r#"<?xml version="1.0"?>
<SSTDataFormatTimeSpanTable>
    <span>
        <filetype>Data</filetype>
        <start>1999-01-01</start>
        <end>2002-12-13</end>
        <file>old.xml</file>
    </span>
    <span>
        <filetype>Data</filetype>
        <start>2002-12-14</start>
        <end>2049-12-31</end>
        <file>new.xml</file>
    </span>
</SSTDataFormatTimeSpanTable>"#;

    #[test]
    fn test_parse_span_table() {
        let entries = parse_span_table(SPANS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].table_file, "old.xml");
        assert_eq!(entries[1].start, "2002-12-14");
    }

    #[test]
    fn test_span_matching_is_inclusive() {
        let entries = parse_span_table(SPANS).unwrap();
        assert!(entries[0].matches("Data", "1999-01-01"));
        assert!(entries[0].matches("Data", "2002-12-13"));
        assert!(!entries[0].matches("Data", "2002-12-14"));
        assert!(entries[1].matches("Data", "2012-01-27"));
        assert!(!entries[0].matches("Auxiliary", "2000-06-01"));
    }
}
