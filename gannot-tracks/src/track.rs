//! Signal values over genomic windows and the reader capability behind them.

use std::fmt::{self, Display};

use crate::errors::TrackError;

/// Per-call read options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackOptions {
    /// When set, values are averaged over consecutive bins of this many
    /// positions. The last bin may be shorter.
    pub bin_size: Option<u32>,
}

impl TrackOptions {
    pub fn with_bin_size(bin_size: u32) -> Self {
        TrackOptions {
            bin_size: Some(bin_size).filter(|&b| b > 1),
        }
    }

    pub fn apply(&self, values: Vec<f64>) -> Vec<f64> {
        match self.bin_size {
            Some(bin_size) if bin_size > 1 => bin_mean(&values, bin_size as usize),
            _ => values,
        }
    }
}

fn bin_mean(values: &[f64], bin_size: usize) -> Vec<f64> {
    values
        .chunks(bin_size)
        .map(|bin| bin.iter().sum::<f64>() / bin.len() as f64)
        .collect()
}

///
/// The shape a reader hands back for a batch of regions.
///
/// `Matrix` holds one row per region; [`TrackResult::reduce`] sums it over
/// rows into a single vector.
///
#[derive(Debug, Clone, PartialEq)]
pub enum TrackResult {
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl TrackResult {
    pub fn reduce(self) -> Result<Vec<f64>, TrackError> {
        match self {
            TrackResult::Vector(values) => Ok(values),
            TrackResult::Matrix(rows) => {
                let mut rows = rows.into_iter();
                let Some(mut summed) = rows.next() else {
                    return Ok(Vec::new());
                };
                for row in rows {
                    if row.len() != summed.len() {
                        return Err(TrackError::RaggedRows {
                            expected: summed.len(),
                            found: row.len(),
                        });
                    }
                    summed.iter_mut().zip(row).for_each(|(acc, v)| *acc += v);
                }
                Ok(summed)
            }
        }
    }
}

/// Signal over one window `[start, end)` of a chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub values: Vec<f64>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum() / self.values.len() as f64)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Mean over consecutive bins of `bin_size` values.
    pub fn binned(&self, bin_size: usize) -> Vec<f64> {
        if bin_size <= 1 {
            return self.values.clone();
        }
        bin_mean(&self.values, bin_size)
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Track({}:{}-{}, {} values)",
            self.chr,
            self.start,
            self.end,
            self.values.len()
        )
    }
}

///
/// Anything that can serve signal values for genomic windows.
///
/// Readers are shared across worker threads during aggregation, so every
/// method takes `&self`.
///
pub trait TrackReader: Send + Sync {
    /// Values over `[start, end)` on `chr`, after applying `options`.
    fn get_track(
        &self,
        chr: &str,
        start: u32,
        end: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError>;

    fn get_track_obj(
        &self,
        chr: &str,
        start: u32,
        end: u32,
        options: &TrackOptions,
    ) -> Result<Track, TrackError> {
        Ok(Track {
            chr: chr.to_string(),
            start,
            end,
            values: self.get_track(chr, start, end, options)?,
        })
    }

    /// One row per `(start, end)` region.
    fn get_track_for_regions(
        &self,
        chr: &str,
        regions: &[(u32, u32)],
        options: &TrackOptions,
    ) -> Result<TrackResult, TrackError> {
        let rows = regions
            .iter()
            .map(|&(start, end)| self.get_track(chr, start, end, options))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TrackResult::Matrix(rows))
    }
}
