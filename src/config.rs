use std::path::PathBuf;

use crate::{artifact::ArtifactKind, error::LandsatError};
use chrono::naive::{NaiveDate, NaiveDateTime};

/// Format of the start and end dates given on the command line.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Acquisition time window. Both ends are inclusive, a missing end is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateWindow {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl DateWindow {
    pub fn new(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Self, LandsatError> {
        log::info!("start - {:?} end - {:?}", start, end);

        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                log::error!("End before start: start - {} end - {}", start, end);
                return Err(LandsatError::InvalidDates(format!(
                    "end {} is before start {}",
                    end, start
                )));
            }
        }

        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        let after_start = self.start.map_or(true, |start| time >= start);
        let before_end = self.end.map_or(true, |end| time <= end);

        after_start && before_end
    }
}

/// Parse a `DD-MM-YYYY` day into midnight of that day.
pub fn parse_day(value: &str) -> Result<NaiveDateTime, LandsatError> {
    let day = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| LandsatError::InvalidDates(format!("{:?}: {}", value, err)))?;

    day.and_hms_opt(0, 0, 0)
        .ok_or_else(|| LandsatError::InvalidDates(format!("{:?}: no midnight", value)))
}

/// Where artifacts are cached, and which of them go through the cache at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSettings {
    pub root: PathBuf,
    pub metadata: bool,
    pub rasters: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            metadata: true,
            rasters: false,
        }
    }
}

/// Settings for one pipeline run.
#[derive(Clone, Debug)]
pub struct Options {
    pub window: DateWindow,
    pub workers: usize,
    pub bands: Vec<u8>,
    pub quality: bool,
    pub download_root: PathBuf,
    pub retries: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window: DateWindow::unbounded(),
            workers: 4,
            bands: vec![],
            quality: false,
            download_root: PathBuf::from("download"),
            retries: 3,
        }
    }
}

impl Options {
    /// Set the worker count; anything below one becomes one.
    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = if workers <= 0 { 1 } else { workers as usize };
        self
    }

    /// Attempts per fallible operation, never fewer than one.
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    /// Artifacts to download for a night scene, in download order.
    pub fn artifacts(&self) -> Vec<ArtifactKind> {
        let mut kinds = vec![ArtifactKind::Metadata];

        if self.quality {
            kinds.push(ArtifactKind::Quality);
        }

        kinds.extend(self.bands.iter().map(|&b| ArtifactKind::Band(b)));
        kinds
    }
}
