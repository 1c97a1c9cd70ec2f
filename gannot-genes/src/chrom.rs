//! Chromosome sizes and assembly gap records.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Read, Write};
use std::path::Path;

use fxhash::FxHashMap;
use gannot_core::models::Region;
use gannot_core::utils::get_dynamic_reader;
use serde::{Deserialize, Serialize};

use crate::errors::ChromGeometryError;

fn open_lines(path: &Path) -> Result<Lines<BufReader<Box<dyn Read>>>, ChromGeometryError> {
    if !path.is_file() {
        return Err(ChromGeometryError::NotFound(path.to_path_buf()));
    }
    let reader = get_dynamic_reader(path)
        .map_err(|e| ChromGeometryError::Io(std::io::Error::other(e.to_string())))?;
    Ok(reader.lines())
}

///
/// Chromosome lengths of an assembly, in file order.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromSizes {
    order: Vec<String>,
    sizes: FxHashMap<String, u32>,
}

impl ChromSizes {
    ///
    /// Read a two-column `chrom<TAB>length` file. Lines without exactly two
    /// columns are skipped.
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChromGeometryError> {
        let mut chrom_sizes = ChromSizes::default();

        for (idx, line) in open_lines(path.as_ref())?.enumerate() {
            let line = line?;
            let parts: Vec<&str> = line.trim_end().split('\t').collect();
            if parts.len() != 2 {
                continue;
            }
            let size = parts[1]
                .parse::<u32>()
                .map_err(|e| ChromGeometryError::ParseError {
                    line: idx + 1,
                    reason: format!("bad chromosome length {:?}: {}", parts[1], e),
                })?;
            chrom_sizes.insert(parts[0], size);
        }

        Ok(chrom_sizes)
    }

    pub fn insert(&mut self, chr: &str, size: u32) {
        if self.sizes.insert(chr.to_string(), size).is_none() {
            self.order.push(chr.to_string());
        }
    }

    pub fn get(&self, chr: &str) -> Option<u32> {
        self.sizes.get(chr).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(chromosome, length)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order
            .iter()
            .filter_map(|chr| self.sizes.get(chr).map(|&size| (chr.as_str(), size)))
    }

    /// Lengths for the requested chromosomes; unknown names map to `None`.
    pub fn subset<S: AsRef<str>>(&self, chromosomes: &[S]) -> Vec<(String, Option<u32>)> {
        chromosomes
            .iter()
            .map(|chr| (chr.as_ref().to_string(), self.get(chr.as_ref())))
            .collect()
    }

    /// One whole-chromosome region per entry, sorted by name.
    pub fn as_regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = self
            .iter()
            .map(|(chr, size)| Region {
                chr: chr.to_string(),
                start: 0,
                end: size,
                rest: None,
            })
            .collect();
        regions.sort_by(|a, b| a.chr.cmp(&b.chr));
        regions
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ChromGeometryError> {
        let mut writer = BufWriter::new(File::create(path)?);
        for (chr, size) in self.iter() {
            writeln!(writer, "{}\t{}", chr, size)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One AGP component or gap line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgpRecord {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub part_number: u32,
    pub component_type: String,
    pub component_id: String,
    pub component_start: String,
    pub component_end: String,
    pub orientation: String,
}

impl AgpRecord {
    pub fn as_tabix(&self) -> String {
        format!("{}:{}-{}", self.chr, self.start, self.end)
    }
}

///
/// Assembly gaps read from an AGP file.
///
/// For gap lines the seventh AGP column holds the gap type, which is what
/// [`ChromGaps::telomeres`] and [`ChromGaps::heterochromatin`] select on.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromGaps {
    records: Vec<AgpRecord>,
}

impl ChromGaps {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChromGeometryError> {
        let mut records = Vec::new();

        for (idx, line) in open_lines(path.as_ref())?.enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') || line.starts_with("chrom\t") {
                continue;
            }
            records.push(parse_agp_line(&line, idx + 1)?);
        }

        Ok(ChromGaps { records })
    }

    pub fn records(&self) -> &[AgpRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn telomeres(&self) -> Vec<&AgpRecord> {
        self.records
            .iter()
            .filter(|r| r.component_start == "telomere")
            .collect()
    }

    pub fn heterochromatin(&self) -> Vec<&AgpRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.component_start.as_str(), "heterochromatin" | "centromere"))
            .collect()
    }

    /// Space-separated `chr:start-end` strings for tabix queries.
    pub fn to_tabix(records: &[&AgpRecord]) -> String {
        records
            .iter()
            .map(|r| r.as_tabix())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_agp_line(line: &str, line_no: usize) -> Result<AgpRecord, ChromGeometryError> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 8 {
        return Err(ChromGeometryError::ParseError {
            line: line_no,
            reason: format!("expected at least 8 columns, found {}", parts.len()),
        });
    }

    let number = |col: usize| {
        parts[col]
            .parse::<u32>()
            .map_err(|e| ChromGeometryError::ParseError {
                line: line_no,
                reason: format!("column {}: {}", col + 1, e),
            })
    };

    Ok(AgpRecord {
        chr: parts[0].to_string(),
        start: number(1)?,
        end: number(2)?,
        part_number: number(3)?,
        component_type: parts[4].to_string(),
        component_id: parts[5].to_string(),
        component_start: parts[6].to_string(),
        component_end: parts[7].to_string(),
        orientation: parts.get(8).map(|s| s.to_string()).unwrap_or_default(),
    })
}
