use std::path::{Path, PathBuf};

use bigtools::BigWigRead;
use bigtools::utils::reopen::ReopenableFile;
use fxhash::FxHashMap;
use log::debug;

use crate::errors::TrackError;
use crate::track::{TrackOptions, TrackReader};

///
/// A bigWig file served as a [`TrackReader`].
///
/// Chromosome lengths are read once when the track is opened. Each read
/// reopens the file, so a single `BigWigTrack` can be shared by many worker
/// threads. Positions without data read as `0.0`; windows running past the
/// chromosome end are padded with `0.0`.
///
#[derive(Debug, Clone)]
pub struct BigWigTrack {
    path: PathBuf,
    chrom_sizes: FxHashMap<String, u32>,
}

impl BigWigTrack {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TrackError> {
        let path = path.as_ref().to_path_buf();
        let reader = open_bigwig(&path)?;
        let chrom_sizes = reader
            .chroms()
            .iter()
            .map(|c| (c.name.clone(), c.length))
            .collect::<FxHashMap<_, _>>();
        debug!(
            "Opened bigWig {} with {} chromosomes",
            path.display(),
            chrom_sizes.len()
        );
        Ok(BigWigTrack { path, chrom_sizes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chrom_size(&self, chr: &str) -> Option<u32> {
        self.chrom_sizes.get(chr).copied()
    }
}

fn open_bigwig(path: &Path) -> Result<BigWigRead<ReopenableFile>, TrackError> {
    let path_str = path.to_string_lossy().into_owned();
    BigWigRead::open_file(path_str.as_str()).map_err(|e| TrackError::Open {
        path: path_str.clone(),
        reason: format!("{:?}", e),
    })
}

impl TrackReader for BigWigTrack {
    fn get_track(
        &self,
        chr: &str,
        start: u32,
        end: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        let chrom_size = self
            .chrom_size(chr)
            .ok_or_else(|| TrackError::UnknownChromosome(chr.to_string()))?;

        let width = end.saturating_sub(start) as usize;
        let read_end = end.min(chrom_size);

        let mut values: Vec<f64> = Vec::with_capacity(width);
        if start < read_end {
            let mut reader = open_bigwig(&self.path)?;
            let raw = reader
                .values(chr, start, read_end)
                .map_err(|e| TrackError::Read {
                    chr: chr.to_string(),
                    start,
                    end,
                    reason: format!("{:?}", e),
                })?;
            values.extend(
                raw.into_iter()
                    .map(|v| if v.is_nan() { 0.0 } else { v as f64 }),
            );
        }
        values.resize(width, 0.0);

        Ok(options.apply(values))
    }
}
