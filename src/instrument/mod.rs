// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Instrument-specific conversion pipelines.
//!
//! One converter per instrument, each an explicit pipeline over immutable
//! stage outputs: open and decode the raw file, derive dates and time spans,
//! reduce, and assemble the FITS container. Shared provenance cards live
//! here; everything else is per instrument.

pub mod filename;
pub mod poemas;
pub mod sst;

pub use filename::{is_trk_file, parse_sst_file_name, SstFileName};
pub use poemas::PoemasConversion;
pub use sst::SstConversion;

use crate::core::FileKind;
use crate::fits::PrimaryHdu;

/// ORIGIN card value on every output file.
pub const ORIGIN_CRAAM: &str = "CRAAM/Universidade Presbiteriana Mackenzie";
/// Observatory hosting both instruments.
pub const OBSERVATORY_CASLEO: &str = "CASLEO";
/// Observatory timezone.
pub const TIMEZONE_GMT_MINUS_3: &str = "GMT-3";

/// HISTORY entry recorded at write time.
pub(crate) fn converted_history(level: u8) -> String {
    format!("Converted to FITS level-{level}")
}

/// Assemble the provenance-carrying primary HDU shared by both instruments.
#[allow(clippy::too_many_arguments)]
pub(crate) fn provenance_hdu(
    full_name: &str,
    station: &str,
    date: &str,
    start_time: &str,
    end_time: &str,
    data_type: &str,
    source_files: &[String],
    file_kind: FileKind,
    frequency: &str,
) -> PrimaryHdu {
    let mut hdu = PrimaryHdu::new();
    hdu.string("origin", ORIGIN_CRAAM, "")
        .string("telescop", full_name, "")
        .string("observat", OBSERVATORY_CASLEO, "")
        .string("station", station, "")
        .string("tz", TIMEZONE_GMT_MINUS_3, "")
        .string("date-obs", date, "")
        .string("t_start", format!("{date}T{start_time}"), "")
        .string("t_end", format!("{date}T{end_time}"), "")
        .string("data_typ", data_type, "");
    for file in source_files {
        hdu.string("origfile", file.clone(), file_kind.as_str());
    }
    hdu.string("frequen", frequency, "");

    hdu.comment("COPYRIGHT. Grant of use.")
        .comment("These data are property of Universidade Presbiteriana Mackenzie.")
        .comment("The Centro de Radio Astronomia e Astrofisica Mackenzie is reponsible")
        .comment("for their distribution. Grant of use permission is given for Academic ")
        .comment("purposes only.");

    hdu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::CardValue;

    #[test]
    fn test_provenance_hdu_carries_span_and_sources() {
        let hdu = provenance_hdu(
            "Solar Submillimeter Telescope",
            "Lat = -31.79897222, Lon = -69.29669444, Height = 2.491 km",
            "2012-01-27",
            "10:51:35.220",
            "13:29:32.930",
            "SST Raw Binary Data file",
            &["RS120127.105135".to_string()],
            FileKind::Rbd,
            "212 GHz ch=1,2,3,4; 405 GHz ch=5,6",
        );
        assert_eq!(
            hdu.value("t_start"),
            Some(&CardValue::Str("2012-01-27T10:51:35.220".into()))
        );
        assert_eq!(
            hdu.value("origfile"),
            Some(&CardValue::Str("RS120127.105135".into()))
        );
    }

    #[test]
    fn test_converted_history_entry() {
        assert_eq!(converted_history(1), "Converted to FITS level-1");
    }
}
