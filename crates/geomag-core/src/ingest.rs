// ─────────────────────────────────────────────────────────────────────
// Geomag Loop — Survey Ingestion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Line-by-line ingestion of a survey export into a [`Dataset`].
//!
//! Every line goes through validation and then spatial deduplication, in
//! file order. Bad lines are dropped silently; an ingestion that accepts
//! nothing logs a single warning and still returns the empty dataset.

use std::path::Path;

use geomag_types::config::IngestConfig;
use geomag_types::error::GeomagResult;
use geomag_types::state::Dataset;
use tracing::{info, warn};

use crate::dedup::{try_insert, InsertOutcome};
use crate::survey::parse_survey_line;

/// Per-run line accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines_read: usize,
    pub rejected: usize,
    pub appended: usize,
    pub replaced: usize,
    pub dropped: usize,
}

/// Single-writer dataset builder.
#[derive(Debug, Clone)]
pub struct SurveyIngestor {
    config: IngestConfig,
    dataset: Dataset,
    stats: IngestStats,
}

impl SurveyIngestor {
    pub fn new(config: IngestConfig) -> Self {
        SurveyIngestor {
            config,
            dataset: Dataset::new(),
            stats: IngestStats::default(),
        }
    }

    /// Feed one raw line. Returns `None` when the line failed validation.
    pub fn feed_line(&mut self, line: &str) -> Option<InsertOutcome> {
        self.stats.lines_read += 1;
        let Some(record) = parse_survey_line(line, self.config.min_year) else {
            self.stats.rejected += 1;
            return None;
        };

        let outcome = try_insert(&mut self.dataset, record, self.config.min_distance_m);
        match outcome {
            InsertOutcome::Appended => self.stats.appended += 1,
            InsertOutcome::Replaced(_) => self.stats.replaced += 1,
            InsertOutcome::Dropped(_) => self.stats.dropped += 1,
        }
        Some(outcome)
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Finish ingestion, warning once if no record survived.
    pub fn finish(self) -> Dataset {
        let s = self.stats;
        if self.dataset.is_empty() {
            warn!(lines = s.lines_read, "survey dataset is empty");
        } else {
            info!(
                records = self.dataset.len(),
                lines = s.lines_read,
                rejected = s.rejected,
                replaced = s.replaced,
                dropped = s.dropped,
                "survey ingestion complete"
            );
        }
        self.dataset
    }
}

/// Build a dataset from an in-memory sequence of lines.
pub fn ingest_lines<I, S>(lines: I, config: &IngestConfig) -> Dataset
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ingestor = SurveyIngestor::new(*config);
    for line in lines {
        ingestor.feed_line(line.as_ref());
    }
    ingestor.finish()
}

/// Build a dataset from a survey export file.
///
/// Invalid UTF-8 is replaced rather than failing the whole file; such lines
/// are then rejected by the numeric parser.
pub fn ingest_file<P: AsRef<Path>>(path: P, config: &IngestConfig) -> GeomagResult<Dataset> {
    let bytes = std::fs::read(path.as_ref())?;
    let text = String::from_utf8_lossy(&bytes);
    info!(path = %path.as_ref().display(), "reading survey export");
    Ok(ingest_lines(text.lines(), config))
}
