// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::GeomagResult;

/// One accepted survey observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub altitude: f64,             // m, >= MIN_ALTITUDE_M
    pub latitude: f64,             // rad
    pub longitude: f64,            // rad
    pub field: [f64; 3],           // Cartesian B [T]
    pub geomag_latitude: Option<f64>,
    pub geomag_longitude: Option<f64>,
    /// Slot for a simulated counterpart; always empty when a record is built.
    pub simulated: Vec<[f64; 3]>,
    /// The 18 positional fields exactly as sliced from the source line.
    pub raw_fields: Vec<String>,
}

impl Record {
    /// Column labels of `raw_fields`, in order.
    pub const FIELD_NAMES: [&'static str; 18] = [
        "Station_name",
        "Date",
        "Colat",
        "E-long",
        "Declin",
        "Inclin",
        "Horiz",
        "North",
        "East",
        "Vertic",
        "Total",
        "Alt",
        "D",
        "so",
        "SerNr",
        "el_cod",
        "GMT",
        "Country",
    ];

    pub const DATE_FIELD: usize = 1;

    /// Build a freshly accepted record: placeholders unset, sim slot empty.
    pub fn new(
        altitude: f64,
        latitude: f64,
        longitude: f64,
        field: [f64; 3],
        raw_fields: Vec<String>,
    ) -> Self {
        Record {
            altitude,
            latitude,
            longitude,
            field,
            geomag_latitude: None,
            geomag_longitude: None,
            simulated: Vec::new(),
            raw_fields,
        }
    }

    /// Survey date in fractional years, parsed from the raw date field.
    pub fn date(&self) -> Option<f64> {
        self.raw_fields
            .get(Self::DATE_FIELD)
            .and_then(|s| s.trim().parse::<f64>().ok())
    }

    /// Station name or track with padding removed.
    pub fn station(&self) -> &str {
        self.raw_fields
            .first()
            .map(|s| s.trim_end_matches(['_', ' ']))
            .unwrap_or("")
    }

    /// Field magnitude |B| [T].
    pub fn field_magnitude(&self) -> f64 {
        let [x, y, z] = self.field;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Ordered collection of accepted records, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Overwrite the record at `index` in place, keeping its position.
    pub fn replace(&mut self, index: usize, record: Record) {
        self.records[index] = record;
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Write the dataset as a JSON snapshot.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> GeomagResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.records)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a dataset previously written by [`Dataset::save_snapshot`].
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> GeomagResult<Self> {
        let file = File::open(path)?;
        let records: Vec<Record> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Dataset { records })
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Load a dataset snapshot by path.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> GeomagResult<Dataset> {
    Dataset::load_snapshot(path)
}

/// Working interval of a bracket-refinement search and the best error
/// seen in the round that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBracket {
    pub lower: f64,
    pub upper: f64,
    pub error: f64,
}

impl CalibrationBracket {
    /// Initial interval, before any round has been scored.
    pub fn new(lower: f64, upper: f64) -> Self {
        CalibrationBracket {
            lower,
            upper,
            error: f64::INFINITY,
        }
    }
}

/// Result of a single bracket-refinement round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOutcome {
    pub best: f64,
    pub error: f64,
    /// Next search interval `(lower, upper)`.
    pub bracket: (f64, f64),
}

/// Result of a full calibration loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    pub best: f64,
    pub error: f64,
    pub rounds: usize,
}
