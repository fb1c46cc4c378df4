// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SST raw-binary-data conversion.
//!
//! An RBD file is a flat run of fixed-width records; its schema depends on
//! the file role and the observation date, both read from the file name and
//! resolved through the time-span index. Unlike POEMAS there is no header
//! record and no binning stage; the only reduction is a same-day merge that
//! sorts records by their time stamp.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::{ConvertError, FileKind, FileRole, Instrument, Level, Result};
use crate::decode::{decode, DecodedRecordSet, Endianness, RecordCount};
use crate::fits::{output_file_name, BinaryTable, HduList};
use crate::instrument::{converted_history, filename, provenance_hdu};
use crate::io::ByteSource;
use crate::reduce::{concatenate_records, resolve_span};
use crate::schema::{SchemaCatalog, SchemaQuery};
use crate::time::{hus_time, truncate_to_seconds};

/// TELESCOP card value.
pub const SST_FULL_NAME: &str = "Solar Submillimeter Telescope";
/// STATION card value.
pub const SST_STATION: &str = "Lat = -31.79897222, Lon = -69.29669444, Height = 2.491 km";
/// DATA_TYP card value.
pub const SST_DATA_TYPE: &str = "SST Raw Binary Data file";
/// FREQUEN card value.
pub const SST_FREQUENCY: &str = "212 GHz ch=1,2,3,4; 405 GHz ch=5,6";

/// Unit notes attached to every SST output.
pub const SST_UNIT_COMMENTS: [&str; 4] = [
    "Time is in hundred of microseconds (Hus) since 0 UT",
    "ADCu = Analog to Digital Conversion units. Proportional to Voltage",
    "mDeg = milli degree",
    "Temperatures are in Celsius",
];

/// One SST conversion.
#[derive(Debug, Clone)]
pub struct SstConversion {
    /// Names of the source file(s) this data came from
    pub source_files: Vec<String>,
    /// Role from the file-name prefix
    pub role: FileRole,
    /// Observation date (`YYYY-MM-DD`), from the file name
    pub date: String,
    /// Observation time (`HH:MM`), from the file name
    pub obs_time: String,
    /// First valid time of day, millisecond precision
    pub start_time: String,
    /// Last valid time of day, millisecond precision
    pub end_time: String,
    /// Decoded records, sorted as stored
    pub records: DecodedRecordSet,
}

impl SstConversion {
    /// Open and decode an RBD file.
    pub fn open(path: impl AsRef<Path>, catalog: &SchemaCatalog) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let source = ByteSource::open(path)?;
        Self::from_source(&source, file_name, catalog)
    }

    /// Decode an in-memory RBD byte source.
    pub fn from_source(
        source: &ByteSource,
        file_name: String,
        catalog: &SchemaCatalog,
    ) -> Result<Self> {
        let parsed = filename::parse_sst_file_name(&file_name)?;
        let fields = catalog.resolve(
            Instrument::Sst,
            SchemaQuery::Rbd {
                role: parsed.role,
                date: &parsed.date,
            },
        )?;

        let records = decode(
            source.data(),
            &fields,
            RecordCount::ToEnd,
            0,
            Endianness::Little,
        )?;

        let time_name = records.fields[0].name.clone();
        let times = records.i64_column(&time_name)?;
        let (start_time, end_time) = resolve_span(&times, &time_name, hus_time)?;

        info!(
            file = %file_name,
            role = %parsed.role,
            date = %parsed.date,
            records = records.record_count(),
            "decoded RBD file"
        );

        Ok(Self {
            source_files: vec![file_name],
            role: parsed.role,
            date: parsed.date,
            obs_time: parsed.time,
            start_time,
            end_time,
            records,
        })
    }

    /// Merge same-day, same-role conversions, re-sorting records by time.
    pub fn concatenate(conversions: Vec<SstConversion>) -> Result<Self> {
        let Some(first) = conversions.first() else {
            return Err(ConvertError::heterogeneous("no objects to concatenate"));
        };
        for conversion in &conversions {
            if conversion.role != first.role || conversion.date != first.date {
                return Err(ConvertError::heterogeneous(format!(
                    "{} {} does not merge with {} {}",
                    conversion.role, conversion.date, first.role, first.date
                )));
            }
        }

        let role = first.role;
        let date = first.date.clone();
        let mut source_files = Vec::new();
        let mut obs_times = Vec::new();
        let mut sets = Vec::with_capacity(conversions.len());
        for conversion in conversions {
            source_files.extend(conversion.source_files);
            obs_times.push(conversion.obs_time);
            sets.push(conversion.records);
        }
        source_files.sort();
        obs_times.sort();

        let time_name = sets[0].fields[0].name.clone();
        let records = concatenate_records(sets, &time_name)?;
        let times = records.i64_column(&time_name)?;
        let (start_time, end_time) = resolve_span(&times, &time_name, hus_time)?;

        Ok(Self {
            source_files,
            role,
            date,
            obs_time: obs_times.remove(0),
            start_time,
            end_time,
            records,
        })
    }

    /// Assemble the output container: provenance plus one data table.
    pub fn to_hdu_list(&self) -> HduList {
        let mut primary = provenance_hdu(
            SST_FULL_NAME,
            SST_STATION,
            &self.date,
            &self.start_time,
            &self.end_time,
            SST_DATA_TYPE,
            &self.source_files,
            FileKind::Rbd,
            SST_FREQUENCY,
        );
        for comment in SST_UNIT_COMMENTS {
            primary.comment(comment);
        }
        primary.history(converted_history(Level::Raw.as_u8()));

        let mut list = HduList::new(primary);
        list.push_table(BinaryTable::from(self.records.clone()));
        list
    }

    /// Auto-generated output file name. Times are truncated to whole
    /// seconds; the millisecond span stays in the header cards.
    pub fn output_name(&self) -> String {
        output_file_name(
            Instrument::Sst,
            self.role,
            &self.date,
            truncate_to_seconds(&self.start_time),
            truncate_to_seconds(&self.end_time),
            Level::Raw,
        )
    }

    /// Write the FITS container into `output_dir` under the auto-generated
    /// name. Returns the written path.
    pub fn write_fits(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = output_dir.as_ref().join(self.output_name());
        self.to_hdu_list().write_to(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldValue;
    use crate::decode::encode;

    // 10:51:35.220 in hundreds of microseconds since 0 UT.
    const HUS_REF: i64 = 390_952_200;

    fn rbd_bytes(role: FileRole, date: &str, times: &[i32]) -> Vec<u8> {
        let catalog = SchemaCatalog::builtin().unwrap();
        let fields = catalog
            .resolve(Instrument::Sst, SchemaQuery::Rbd { role, date })
            .unwrap();

        let rows = times
            .iter()
            .map(|&t| {
                fields
                    .iter()
                    .map(|field| match (field.name.as_str(), field.dimension) {
                        ("time", _) => FieldValue::Int32(t),
                        (_, 1) => default_value(field.element_type),
                        (_, dim) => FieldValue::Array(
                            (0..dim).map(|_| default_value(field.element_type)).collect(),
                        ),
                    })
                    .collect()
            })
            .collect();

        let set = DecodedRecordSet { fields, rows };
        encode(&set, Endianness::Little).unwrap()
    }

    fn default_value(element_type: crate::schema::ElementType) -> FieldValue {
        use crate::schema::ElementType;
        match element_type {
            ElementType::Int32 => FieldValue::Int32(0),
            ElementType::UInt16 => FieldValue::UInt16(0),
            ElementType::Int16 => FieldValue::Int16(0),
            ElementType::Byte => FieldValue::Byte(0),
            ElementType::Float32 => FieldValue::Float32(0.0),
            ElementType::Str => FieldValue::Str(String::new()),
        }
    }

    fn open_sample(name: &str, times: &[i32]) -> SstConversion {
        let catalog = SchemaCatalog::builtin().unwrap();
        let parsed = filename::parse_sst_file_name(name).unwrap();
        let source = ByteSource::from_bytes(rbd_bytes(parsed.role, &parsed.date, times));
        SstConversion::from_source(&source, name.to_string(), &catalog).unwrap()
    }

    #[test]
    fn test_open_modern_integration_file() {
        let conversion = open_sample("RS120127.105135", &[HUS_REF as i32, HUS_REF as i32 + 10]);
        assert_eq!(conversion.role, FileRole::Integration);
        assert_eq!(conversion.date, "2012-01-27");
        assert_eq!(conversion.obs_time, "10:51");
        assert_eq!(conversion.start_time, "10:51:35.220");
        assert_eq!(conversion.end_time, "10:51:35.221");
        assert_eq!(conversion.records.record_count(), 2);
    }

    #[test]
    fn test_old_window_resolves_old_table() {
        // 1999 dates fall in the old validity window, whose table has no
        // offset columns.
        let conversion = open_sample("RS990315", &[10_000]);
        assert!(conversion.records.field_index("x_off").is_none());
        assert!(conversion.records.field_index("adc").is_some());
    }

    #[test]
    fn test_output_name_truncates_times() {
        let conversion = open_sample("RS120127.105135", &[HUS_REF as i32]);
        assert_eq!(
            conversion.output_name(),
            "sst-integration-D2012-01-27-T10_51_35-10_51_35-level0.fits"
        );
    }

    #[test]
    fn test_concatenate_sorts_and_respans() {
        let late = open_sample("RS120127.1200", &[HUS_REF as i32 + 20_000]);
        let early = open_sample("RS120127.105135", &[HUS_REF as i32]);
        let merged = SstConversion::concatenate(vec![late, early]).unwrap();
        assert_eq!(merged.start_time, "10:51:35.220");
        assert_eq!(merged.end_time, "10:51:37.220");
        assert_eq!(merged.obs_time, "10:51");
        assert_eq!(merged.records.record_count(), 2);
        assert_eq!(
            merged.source_files,
            vec!["RS120127.105135", "RS120127.1200"]
        );
    }

    #[test]
    fn test_concatenate_rejects_mixed_roles() {
        let data = open_sample("RS120127.105135", &[HUS_REF as i32]);
        let aux = open_sample("BI120127", &[HUS_REF as i32]);
        let err = SstConversion::concatenate(vec![data, aux]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::HeterogeneousConcatenation { .. }
        ));
    }

    #[test]
    fn test_hdu_list_carries_unit_comments() {
        let conversion = open_sample("RS120127.105135", &[HUS_REF as i32]);
        let list = conversion.to_hdu_list();
        assert_eq!(list.tables.len(), 1);
        assert!(!list.primary.history_entries().is_empty());
    }
}
