//! Providers of raw annotation records.
//!
//! The table layer only needs a list of [`FeatureRecord`]s; where they come
//! from is behind [`AnnotationSource`]. [`GtfSource`] reads plain or gzipped
//! GTF files from disk.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use log::debug;

use crate::errors::AnnotationError;
use crate::models::{FeatureRecord, Strand};
use crate::utils::get_dynamic_reader;

pub trait AnnotationSource {
    fn records(&self) -> Result<Vec<FeatureRecord>, AnnotationError>;
}

impl AnnotationSource for [FeatureRecord] {
    fn records(&self) -> Result<Vec<FeatureRecord>, AnnotationError> {
        Ok(self.to_vec())
    }
}

impl AnnotationSource for Vec<FeatureRecord> {
    fn records(&self) -> Result<Vec<FeatureRecord>, AnnotationError> {
        Ok(self.clone())
    }
}

/// A GTF (or GTF.gz) file on disk.
#[derive(Debug, Clone)]
pub struct GtfSource {
    path: PathBuf,
}

impl GtfSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        GtfSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSource for GtfSource {
    ///
    /// Parse every feature line of the file.
    ///
    /// GTF is 1-based inclusive; records come out 0-based half-open.
    ///
    fn records(&self) -> Result<Vec<FeatureRecord>, AnnotationError> {
        if !self.path.is_file() {
            return Err(AnnotationError::NotFound(self.path.clone()));
        }

        let reader = get_dynamic_reader(&self.path)?;
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            records.push(parse_gtf_line(&line, idx + 1)?);
        }

        debug!(
            "Read {} GTF records from {}",
            records.len(),
            self.path.display()
        );

        Ok(records)
    }
}

fn parse_gtf_line(line: &str, line_num: usize) -> Result<FeatureRecord, AnnotationError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(AnnotationError::RecordParseError {
            line: line_num,
            reason: format!("expected 9 columns, found {}", fields.len()),
        });
    }

    let start = fields[3]
        .parse::<u32>()
        .map_err(|e| AnnotationError::RecordParseError {
            line: line_num,
            reason: format!("start: {}", e),
        })?
        .saturating_sub(1);
    let end = fields[4]
        .parse::<u32>()
        .map_err(|e| AnnotationError::RecordParseError {
            line: line_num,
            reason: format!("end: {}", e),
        })?;

    let attributes = parse_gtf_attributes(fields[8]);
    let attr = |key: &str| attributes.get(key).map(|v| v.to_string());

    Ok(FeatureRecord {
        feature: fields[2].to_string(),
        chr: fields[0].to_string(),
        start,
        end,
        strand: Strand::from_char(fields[6].chars().next().unwrap_or('.')),
        gene_name: attr("gene_name"),
        gene_id: attr("gene_id"),
        gene_type: attr("gene_type").or_else(|| attr("gene_biotype")),
    })
}

/// Split a GTF attribute column (`key "value"; key "value";`) into pairs.
/// The first occurrence of a repeated key wins.
pub fn parse_gtf_attributes(attrs: &str) -> FxHashMap<&str, &str> {
    let mut map = FxHashMap::default();
    for pair in attrs.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        if let Some((key, value)) = pair.split_once(char::is_whitespace) {
            map.entry(key)
                .or_insert_with(|| value.trim().trim_matches('"'));
        }
    }
    map
}
