// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! POEMAS tracking-file conversion.
//!
//! A TRK file is one 28-byte header record followed by body records whose
//! payload interleaves the four receiver channels. The pipeline decodes
//! both passes, de-interleaves the payload into separated channel columns
//! (level 0), optionally bins to one row per second (level 1), and merges
//! same-day level-1 sets (level 2).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::{ConvertError, FieldValue, FileKind, FileRole, Instrument, Level, Result};
use crate::decode::{decode, DecodedRecordSet, Endianness, RecordCount};
use crate::fits::{output_file_name, BinaryTable, HduList};
use crate::instrument::{converted_history, filename, provenance_hdu};
use crate::io::ByteSource;
use crate::reduce::{
    bin_by_second, concatenate_day, deinterleave, resolve_span, ChannelSet, DaySlice,
};
use crate::schema::{record_width, FieldSpec, SchemaCatalog, SchemaQuery, TrkTable};
use crate::time::{poemas_date, poemas_time};

/// TELESCOP card value.
pub const POEMAS_FULL_NAME: &str =
    "POEMAS - POlarization Emission of Millimeter Activity at the Sun";
/// STATION card value.
pub const POEMAS_STATION: &str =
    "Lat = -31.79897222, Lon = -69.29669444, Height = 2.491 km";
/// DATA_TYP card value.
pub const POEMAS_DATA_TYPE: &str = "POEMAS TRK Raw Binary Data file";
/// FREQUEN card value.
pub const POEMAS_FREQUENCY: &str = "45 GHz ch=R,L; 90 GHz ch=R,L";

/// Decoded TRK header record (Code, NRS, FreqNo, Freq1, Freq2, BRTMin,
/// BRTMax).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrkHeader {
    /// Format code
    pub code: i32,
    /// Number of body records (NRS); updated by reductions
    pub records: i32,
    /// Number of observing frequencies
    pub freq_count: i32,
    /// First observing frequency, GHz
    pub freq1: f32,
    /// Second observing frequency, GHz
    pub freq2: f32,
    /// Minimum brightness temperature in the file
    pub brt_min: f32,
    /// Maximum brightness temperature in the file
    pub brt_max: f32,
}

impl TrkHeader {
    fn from_record(set: &DecodedRecordSet) -> Result<Self> {
        let i32_field = |name: &str| -> Result<i32> {
            set.value(0, name)
                .and_then(FieldValue::as_i64)
                .map(|v| v as i32)
                .ok_or_else(|| header_mismatch(name))
        };
        let f32_field = |name: &str| -> Result<f32> {
            set.value(0, name)
                .and_then(FieldValue::as_f32)
                .ok_or_else(|| header_mismatch(name))
        };
        Ok(Self {
            code: i32_field("Code")?,
            records: i32_field("NRS")?,
            freq_count: i32_field("FreqNo")?,
            freq1: f32_field("Freq1")?,
            freq2: f32_field("Freq2")?,
            brt_min: f32_field("BRTMin")?,
            brt_max: f32_field("BRTMax")?,
        })
    }

    fn row_for(&self, fields: &[FieldSpec]) -> Result<Vec<FieldValue>> {
        fields
            .iter()
            .map(|field| match field.name.as_str() {
                "Code" => Ok(FieldValue::Int32(self.code)),
                "NRS" => Ok(FieldValue::Int32(self.records)),
                "FreqNo" => Ok(FieldValue::Int32(self.freq_count)),
                "Freq1" => Ok(FieldValue::Float32(self.freq1)),
                "Freq2" => Ok(FieldValue::Float32(self.freq2)),
                "BRTMin" => Ok(FieldValue::Float32(self.brt_min)),
                "BRTMax" => Ok(FieldValue::Float32(self.brt_max)),
                other => Err(header_mismatch(other)),
            })
            .collect()
    }
}

fn header_mismatch(name: &str) -> ConvertError {
    ConvertError::schema_mismatch("TRK header", format!("missing or mistyped field '{name}'"))
}

/// One POEMAS conversion at a given reduction level.
#[derive(Debug, Clone)]
pub struct PoemasConversion {
    /// Names of the source file(s) this data came from
    pub source_files: Vec<String>,
    /// Current reduction stage
    pub level: Level,
    /// Observation date (`YYYY-MM-DD`), from the first valid sample
    pub date: String,
    /// Observation time (`HH:MM:SS`), from the first valid sample
    pub obs_time: String,
    /// First valid time of day in the data
    pub start_time: String,
    /// Last valid time of day in the data
    pub end_time: String,
    /// Decoded header record
    pub header: TrkHeader,
    /// Separated channel columns
    pub channels: ChannelSet,
    header_fields: Vec<FieldSpec>,
    separated_fields: Vec<FieldSpec>,
}

impl PoemasConversion {
    /// Open and decode a TRK file to level 0.
    pub fn open(path: impl AsRef<Path>, catalog: &SchemaCatalog) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !filename::is_trk_file(&file_name) {
            return Err(ConvertError::invalid_file_type(
                path.to_string_lossy(),
                Instrument::Poemas.as_str(),
            ));
        }

        let source = ByteSource::open(path)?;
        Self::from_source(&source, file_name, catalog)
    }

    /// Decode an in-memory TRK byte source to level 0.
    pub fn from_source(
        source: &ByteSource,
        file_name: String,
        catalog: &SchemaCatalog,
    ) -> Result<Self> {
        let header_fields =
            catalog.resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Header))?;
        let body_fields = catalog.resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Body))?;
        let separated_fields =
            catalog.resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::SeparatedBody))?;

        let header_set = decode(
            source.data(),
            &header_fields,
            RecordCount::Exact(1),
            0,
            Endianness::Little,
        )?;
        let header = TrkHeader::from_record(&header_set)?;

        let body = decode(
            source.data(),
            &body_fields,
            RecordCount::ToEnd,
            record_width(&header_fields),
            Endianness::Little,
        )?;
        if body.record_count() != header.records as usize {
            warn!(
                file = %file_name,
                declared = header.records,
                decoded = body.record_count(),
                "header record count differs from decoded body"
            );
        }

        let sec_name = body.fields[0].name.clone();
        let secs = body.i64_column(&sec_name)?;
        let first_valid = secs
            .iter()
            .find(|&&s| s != 0)
            .copied()
            .ok_or_else(|| ConvertError::empty_time_column(sec_name.as_str()))?;

        let channels = deinterleave(&body, &separated_fields)?;
        let (start_time, end_time) = resolve_span(&secs, &sec_name, poemas_time)?;

        info!(
            file = %file_name,
            records = body.record_count(),
            rows = channels.row_count(),
            "decoded TRK file"
        );

        Ok(Self {
            source_files: vec![file_name],
            level: Level::Raw,
            date: poemas_date(first_valid),
            obs_time: poemas_time(first_valid),
            start_time,
            end_time,
            header,
            channels,
            header_fields,
            separated_fields,
        })
    }

    /// Reduce level-0 data to one row per second (level 1).
    ///
    /// The header record count is updated to the binned row count.
    pub fn to_level1(self) -> Result<Self> {
        if self.level != Level::Raw {
            return Err(ConvertError::level_order(
                Level::SecondBinned.as_u8(),
                self.level.as_u8(),
            ));
        }
        let channels = bin_by_second(&self.channels)?;
        let mut header = self.header;
        header.records = channels.row_count() as i32;
        Ok(Self {
            level: Level::SecondBinned,
            channels,
            header,
            ..self
        })
    }

    /// Merge same-day level-1 conversions into one level-2 set.
    pub fn concatenate(conversions: Vec<PoemasConversion>) -> Result<Self> {
        let Some(first) = conversions.first() else {
            return Err(ConvertError::heterogeneous("no objects to concatenate"));
        };
        for conversion in &conversions {
            if conversion.date != first.date {
                return Err(ConvertError::heterogeneous(format!(
                    "dates {} and {} cannot merge into one day file",
                    first.date, conversion.date
                )));
            }
        }

        let template_header = first.header;
        let header_fields = first.header_fields.clone();
        let separated_fields = first.separated_fields.clone();

        let slices = conversions
            .into_iter()
            .map(|c| DaySlice {
                level: c.level,
                date: c.date,
                obs_time: c.obs_time,
                start_time: c.start_time,
                end_time: c.end_time,
                channels: c.channels,
                record_count: i64::from(c.header.records),
                min_value: c.header.brt_min,
                max_value: c.header.brt_max,
                source_files: c.source_files,
            })
            .collect();
        let merge = concatenate_day(slices)?;

        Ok(Self {
            source_files: merge.source_files,
            level: Level::DayConcatenated,
            date: merge.date,
            obs_time: merge.obs_time,
            start_time: merge.start_time,
            end_time: merge.end_time,
            header: TrkHeader {
                records: merge.record_count as i32,
                brt_min: merge.min_value,
                brt_max: merge.max_value,
                ..template_header
            },
            channels: merge.channels,
            header_fields,
            separated_fields,
        })
    }

    /// Assemble the output container: provenance, header table, body table.
    pub fn to_hdu_list(&self) -> Result<HduList> {
        let mut primary = provenance_hdu(
            POEMAS_FULL_NAME,
            POEMAS_STATION,
            &self.date,
            &self.start_time,
            &self.end_time,
            POEMAS_DATA_TYPE,
            &self.source_files,
            FileKind::Trk,
            POEMAS_FREQUENCY,
        );
        primary.history(converted_history(self.level.as_u8()));

        let header_table = BinaryTable {
            rows: vec![self.header.row_for(&self.header_fields)?],
            fields: self.header_fields.clone(),
        };

        self.channels.check_parallel()?;
        if self.separated_fields.len() != self.channels.names.len() {
            return Err(ConvertError::schema_mismatch(
                "TRK body table",
                format!(
                    "{} separated fields for {} channel columns",
                    self.separated_fields.len(),
                    self.channels.names.len()
                ),
            ));
        }
        let rows = (0..self.channels.row_count())
            .map(|i| {
                let mut row = Vec::with_capacity(self.separated_fields.len());
                row.push(FieldValue::Str(self.channels.time[i].clone()));
                row.extend(
                    self.channels
                        .columns
                        .iter()
                        .map(|column| FieldValue::Float32(column[i])),
                );
                row
            })
            .collect();
        let body_table = BinaryTable {
            fields: self.separated_fields.clone(),
            rows,
        };

        let mut list = HduList::new(primary);
        list.push_table(header_table);
        list.push_table(body_table);
        Ok(list)
    }

    /// Auto-generated output file name for this conversion.
    pub fn output_name(&self) -> String {
        output_file_name(
            Instrument::Poemas,
            FileRole::Tracking,
            &self.date,
            &self.start_time,
            &self.end_time,
            self.level,
        )
    }

    /// Write the FITS container into `output_dir` under the auto-generated
    /// name. Returns the written path.
    pub fn write_fits(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = output_dir.as_ref().join(self.output_name());
        self.to_hdu_list()?.write_to(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::encode;

    // 2012-01-27 10:51:35 in seconds since the instrument epoch.
    const SEC_REF: i32 = 349_354_295;

    fn trk_bytes(secs: &[i32]) -> Vec<u8> {
        let catalog = SchemaCatalog::builtin().unwrap();
        let header_fields = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Header))
            .unwrap();
        let body_fields = catalog
            .resolve(Instrument::Poemas, SchemaQuery::Trk(TrkTable::Body))
            .unwrap();

        let header_set = DecodedRecordSet {
            fields: header_fields,
            rows: vec![vec![
                FieldValue::Int32(1),
                FieldValue::Int32(secs.len() as i32),
                FieldValue::Int32(2),
                FieldValue::Float32(45.0),
                FieldValue::Float32(90.0),
                FieldValue::Float32(70.0),
                FieldValue::Float32(320.0),
            ]],
        };

        let rows = secs
            .iter()
            .map(|&sec| {
                let payload = (0..400)
                    .map(|i| FieldValue::Float32(i as f32))
                    .collect();
                vec![
                    FieldValue::Int32(sec),
                    FieldValue::Float32(12.5),
                    FieldValue::Float32(200.0),
                    FieldValue::Array(payload),
                ]
            })
            .collect();
        let body_set = DecodedRecordSet {
            fields: body_fields,
            rows,
        };

        let mut bytes = encode(&header_set, Endianness::Little).unwrap();
        bytes.extend(encode(&body_set, Endianness::Little).unwrap());
        bytes
    }

    fn open_sample(secs: &[i32]) -> PoemasConversion {
        let catalog = SchemaCatalog::builtin().unwrap();
        let source = ByteSource::from_bytes(trk_bytes(secs));
        PoemasConversion::from_source(&source, "SunTrack_120127.TRK".into(), &catalog).unwrap()
    }

    #[test]
    fn test_open_derives_date_and_span() {
        let conversion = open_sample(&[SEC_REF, SEC_REF + 1]);
        assert_eq!(conversion.level, Level::Raw);
        assert_eq!(conversion.date, "2012-01-27");
        assert_eq!(conversion.obs_time, "10:51:35");
        assert_eq!(conversion.start_time, "10:51:35");
        assert_eq!(conversion.end_time, "10:51:36");
        assert_eq!(conversion.header.records, 2);
        // Two records, 100 samples each.
        assert_eq!(conversion.channels.row_count(), 200);
    }

    #[test]
    fn test_non_trk_name_is_invalid_file_type() {
        let catalog = SchemaCatalog::builtin().unwrap();
        let source = ByteSource::from_bytes(trk_bytes(&[SEC_REF]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RS120127");
        std::fs::write(&path, source.data()).unwrap();
        let err = PoemasConversion::open(&path, &catalog).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidFileType { .. }));
    }

    #[test]
    fn test_level1_bins_and_updates_record_count() {
        let conversion = open_sample(&[SEC_REF, SEC_REF, SEC_REF + 1]);
        let binned = conversion.to_level1().unwrap();
        assert_eq!(binned.level, Level::SecondBinned);
        // Two distinct seconds remain.
        assert_eq!(binned.channels.row_count(), 2);
        assert_eq!(binned.header.records, 2);
    }

    #[test]
    fn test_level1_twice_is_level_order_error() {
        let binned = open_sample(&[SEC_REF]).to_level1().unwrap();
        let err = binned.to_level1().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::LevelOrder {
                requested: 1,
                current: 1
            }
        ));
    }

    #[test]
    fn test_day_concatenation_aggregates_header() {
        let mut early = open_sample(&[SEC_REF]).to_level1().unwrap();
        let mut late = open_sample(&[SEC_REF + 3600]).to_level1().unwrap();
        early.header.brt_min = 80.0;
        late.header.brt_max = 350.0;

        // Late first; the merge must reorder by start time.
        let merged = PoemasConversion::concatenate(vec![late, early]).unwrap();
        assert_eq!(merged.level, Level::DayConcatenated);
        assert_eq!(merged.start_time, "10:51:35");
        assert_eq!(merged.end_time, "11:51:35");
        assert_eq!(merged.header.records, 2);
        assert_eq!(merged.header.brt_min, 70.0);
        assert_eq!(merged.header.brt_max, 350.0);
    }

    #[test]
    fn test_hdu_list_shape_and_name() {
        let conversion = open_sample(&[SEC_REF]);
        let list = conversion.to_hdu_list().unwrap();
        assert_eq!(list.tables.len(), 2);
        assert_eq!(list.tables[0].rows.len(), 1);
        assert_eq!(list.tables[1].rows.len(), 100);
        assert_eq!(
            conversion.output_name(),
            "poemas-tracking-D2012-01-27-T10_51_35-10_51_35-level0.fits"
        );
    }
}
