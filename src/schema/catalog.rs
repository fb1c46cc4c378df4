// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema catalog: resolves which field table applies to a given
//! instrument / file type / date combination.
//!
//! The catalog is a pure lookup; it performs no decoding. POEMAS TRK files
//! use three fixed tables selected by data kind. SST RBD files select their
//! table through the time-span index by role tag (`Data` / `Auxiliary`) and
//! the date derived from the source file name.
//!
//! Built-in tables (shipped under `schemas/` and embedded at compile time)
//! cover both instruments; [`SchemaCatalog::from_dir`] loads a replacement
//! table set from disk for site-local overrides.

use std::collections::HashMap;
use std::path::Path;

use crate::core::{ConvertError, FileRole, Instrument, Result};
use crate::schema::field::FieldSpec;
use crate::schema::xml::{parse_field_table, parse_span_table, SpanEntry};

/// The three fixed POEMAS TRK table kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrkTable {
    /// File header (Code, NRS, FreqNo, Freq1, Freq2, BRTMin, BRTMax)
    Header,
    /// Body as stored: sec, ele_ang, azi_ang, interleaved TB payload
    Body,
    /// Body as separated channels: sec, ele_ang, azi_ang, TBL_45..TBR_90
    SeparatedBody,
}

impl TrkTable {
    /// Resource file name of this table.
    pub fn file_name(&self) -> &'static str {
        match self {
            TrkTable::Header => "POEMASDataFormatHead.xml",
            TrkTable::Body => "POEMASDataFormat.xml",
            TrkTable::SeparatedBody => "POEMASFullDataFormat.xml",
        }
    }
}

/// A schema lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaQuery<'a> {
    /// POEMAS TRK lookup: fixed table kind, independent of date
    Trk(TrkTable),
    /// SST RBD lookup: file role plus the date from the source file name
    Rbd {
        /// Role parsed from the file-name prefix
        role: FileRole,
        /// ISO date (`YYYY-MM-DD`) the file covers
        date: &'a str,
    },
}

/// Catalog of schema description resources.
pub struct SchemaCatalog {
    /// Field tables keyed by `<INSTRUMENT>/<resource file name>`
    tables: HashMap<String, String>,
    /// Parsed SST time-span index
    spans: Vec<SpanEntry>,
}

const BUILTIN_TABLES: &[(&str, &str)] = &[
    (
        "POEMAS/POEMASDataFormatHead.xml",
        include_str!("../../schemas/POEMAS/TRK/POEMASDataFormatHead.xml"),
    ),
    (
        "POEMAS/POEMASDataFormat.xml",
        include_str!("../../schemas/POEMAS/TRK/POEMASDataFormat.xml"),
    ),
    (
        "POEMAS/POEMASFullDataFormat.xml",
        include_str!("../../schemas/POEMAS/TRK/POEMASFullDataFormat.xml"),
    ),
    (
        "SST/SSTDataFormatData.xml",
        include_str!("../../schemas/SST/RBD/SSTDataFormatData.xml"),
    ),
    (
        "SST/SSTDataFormatDataOld.xml",
        include_str!("../../schemas/SST/RBD/SSTDataFormatDataOld.xml"),
    ),
    (
        "SST/SSTDataFormatAuxiliary.xml",
        include_str!("../../schemas/SST/RBD/SSTDataFormatAuxiliary.xml"),
    ),
    (
        "SST/SSTDataFormatAuxiliaryOld.xml",
        include_str!("../../schemas/SST/RBD/SSTDataFormatAuxiliaryOld.xml"),
    ),
];

const BUILTIN_SPAN_TABLE: &str =
    include_str!("../../schemas/SST/RBD/SSTDataFormatTimeSpanTable.xml");

impl SchemaCatalog {
    /// Catalog backed by the tables embedded at compile time.
    pub fn builtin() -> Result<Self> {
        let tables = BUILTIN_TABLES
            .iter()
            .map(|(key, text)| ((*key).to_string(), (*text).to_string()))
            .collect();
        let spans = parse_span_table(BUILTIN_SPAN_TABLE)?;
        Ok(Self { tables, spans })
    }

    /// Catalog loaded from a directory laid out like the shipped `schemas/`
    /// tree (`POEMAS/TRK/*.xml`, `SST/RBD/*.xml`).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConvertError::file_not_found(dir));
        }

        let mut tables = HashMap::new();
        let mut span_text = None;

        for (instrument, subdir) in [("POEMAS", "POEMAS/TRK"), ("SST", "SST/RBD")] {
            let table_dir = dir.join(subdir);
            if !table_dir.is_dir() {
                continue;
            }
            for entry in std::fs::read_dir(&table_dir)
                .map_err(|e| ConvertError::io("schema directory", e.to_string()))?
            {
                let entry = entry.map_err(|e| ConvertError::io("schema directory", e.to_string()))?;
                let name = entry.file_name().to_string_lossy().to_string();
                if !name.ends_with(".xml") {
                    continue;
                }
                let text = std::fs::read_to_string(entry.path())
                    .map_err(|e| ConvertError::io("schema table", e.to_string()))?;
                if name == "SSTDataFormatTimeSpanTable.xml" {
                    span_text = Some(text);
                } else {
                    tables.insert(format!("{instrument}/{name}"), text);
                }
            }
        }

        let span_text = span_text.ok_or_else(|| {
            ConvertError::file_not_found(dir.join("SST/RBD/SSTDataFormatTimeSpanTable.xml"))
        })?;
        let spans = parse_span_table(&span_text)?;

        Ok(Self { tables, spans })
    }

    /// Resolve the ordered field-spec sequence for a lookup request.
    ///
    /// Fails with [`ConvertError::SchemaNotFound`] when the instrument and
    /// query kinds do not match, or when no validity window brackets the
    /// requested date.
    pub fn resolve(&self, instrument: Instrument, query: SchemaQuery<'_>) -> Result<Vec<FieldSpec>> {
        match (instrument, query) {
            (Instrument::Poemas, SchemaQuery::Trk(table)) => {
                self.field_table("POEMAS", table.file_name(), "TRK", "any")
            }
            (Instrument::Sst, SchemaQuery::Rbd { role, date }) => {
                let tag = role.span_tag();
                let entry = self
                    .spans
                    .iter()
                    .find(|span| span.matches(tag, date))
                    .ok_or_else(|| ConvertError::schema_not_found("SST", tag, date))?;
                self.field_table("SST", &entry.table_file, tag, date)
            }
            (instrument, _) => Err(ConvertError::schema_not_found(
                instrument.as_str(),
                "mismatched query kind",
                "any",
            )),
        }
    }

    fn field_table(
        &self,
        instrument: &str,
        file_name: &str,
        file_type: &str,
        date: &str,
    ) -> Result<Vec<FieldSpec>> {
        let text = self
            .tables
            .get(&format!("{instrument}/{file_name}"))
            .ok_or_else(|| ConvertError::schema_not_found(instrument, file_type, date))?;
        parse_field_table(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::{record_width, ElementType};

    #[test]
    fn test_builtin_trk_header() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let fields = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Header))
            .unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["Code", "NRS", "FreqNo", "Freq1", "Freq2", "BRTMin", "BRTMax"]
        );
        assert_eq!(record_width(&fields), 28);
    }

    #[test]
    fn test_builtin_trk_body_payload_dimension() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let fields = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Body))
            .unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3].name, "TB");
        assert_eq!(fields[3].dimension, 400);
        assert_eq!(fields[3].element_type, ElementType::Float32);
    }

    #[test]
    fn test_builtin_separated_body_channels() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let fields = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::SeparatedBody))
            .unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["sec", "ele_ang", "azi_ang", "TBL_45", "TBR_45", "TBL_90", "TBR_90"]
        );
    }

    #[test]
    fn test_sst_resolution_by_date_window() {
        let catalog = SchemaCatalog::builtin().unwrap();

        let modern = catalog
            .resolve(
                Instrument::Sst,
                SchemaQuery::Rbd {
                    role: FileRole::Integration,
                    date: "2012-01-27",
                },
            )
            .unwrap();
        assert!(modern.iter().any(|f| f.name == "adcval"));

        let old = catalog
            .resolve(
                Instrument::Sst,
                SchemaQuery::Rbd {
                    role: FileRole::Subintegration,
                    date: "2000-06-15",
                },
            )
            .unwrap();
        assert!(old.iter().any(|f| f.name == "adc"));
        assert!(old.iter().all(|f| f.name != "adcval"));
    }

    #[test]
    fn test_sst_auxiliary_role_uses_auxiliary_tables() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let fields = catalog
            .resolve(
                Instrument::Sst,
                SchemaQuery::Rbd {
                    role: FileRole::Auxiliary,
                    date: "2010-03-01",
                },
            )
            .unwrap();
        assert!(fields.iter().any(|f| f.name == "ambtemp"));
    }

    #[test]
    fn test_unbracketed_date_is_schema_not_found() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let err = catalog
            .resolve(
                Instrument::Sst,
                SchemaQuery::Rbd {
                    role: FileRole::Integration,
                    date: "1990-01-01",
                },
            )
            .unwrap_err();
        assert!(matches!(err, ConvertError::SchemaNotFound { .. }));
    }

    #[test]
    fn test_mismatched_instrument_query() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let err = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Rbd {
                role: FileRole::Integration,
                date: "2012-01-27",
            })
            .unwrap_err();
        assert!(matches!(err, ConvertError::SchemaNotFound { .. }));
    }
}
