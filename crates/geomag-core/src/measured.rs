// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Measured Series
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Column-oriented view of a dataset for scoring simulated fields.

use geomag_types::state::Record;
use ndarray::{Array1, Array2};

use crate::bfield::angle_to;

/// Parallel per-record columns, in dataset order.
#[derive(Debug, Clone)]
pub struct MeasuredSeries {
    pub longitude_deg: Array1<f64>,
    pub latitude_deg: Array1<f64>,
    pub altitude_m: Array1<f64>,
    /// |B| [T]
    pub magnitude: Array1<f64>,
    /// B [T], shape `[n, 3]`
    pub field: Array2<f64>,
}

impl MeasuredSeries {
    pub fn from_records(records: &[Record]) -> Self {
        let n = records.len();
        let mut field: Array2<f64> = Array2::zeros((n, 3));
        for (k, rec) in records.iter().enumerate() {
            for c in 0..3 {
                field[[k, c]] = rec.field[c];
            }
        }

        MeasuredSeries {
            longitude_deg: records.iter().map(|r| r.longitude.to_degrees()).collect(),
            latitude_deg: records.iter().map(|r| r.latitude.to_degrees()).collect(),
            altitude_m: records.iter().map(|r| r.altitude).collect(),
            magnitude: records.iter().map(Record::field_magnitude).collect(),
            field,
        }
    }

    pub fn len(&self) -> usize {
        self.altitude_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altitude_m.is_empty()
    }

    /// `(lon_deg, lat_deg, alt_m)` of point `k`.
    pub fn point(&self, k: usize) -> (f64, f64, f64) {
        (
            self.longitude_deg[k],
            self.latitude_deg[k],
            self.altitude_m[k],
        )
    }

    pub fn field_vector(&self, k: usize) -> [f64; 3] {
        [self.field[[k, 0]], self.field[[k, 1]], self.field[[k, 2]]]
    }

    /// Angle [deg] between each measured field and its local radial direction.
    pub fn radial_angles(&self) -> Array1<f64> {
        (0..self.len())
            .map(|k| {
                let (lon, lat, alt) = self.point(k);
                angle_to(self.field_vector(k), lon, lat, alt)
            })
            .collect()
    }
}
