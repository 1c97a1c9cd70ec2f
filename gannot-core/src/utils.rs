use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::errors::AnnotationError;
use crate::models::Region;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a BED-like file of regions (peaks, blacklists, ...).
///
/// Header lines (`browser`, `track`, `#`) are skipped; columns past the
/// third are kept verbatim in `rest`.
///
pub fn read_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>, AnnotationError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AnnotationError::NotFound(path.to_path_buf()));
    }

    let reader = get_dynamic_reader(path)?;
    let mut regions = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty()
            || line.starts_with("browser")
            || line.starts_with("track")
            || line.starts_with('#')
        {
            continue;
        }
        regions.push(parse_region_line(&line)?);
    }

    Ok(regions)
}

fn parse_region_line(line: &str) -> Result<Region, AnnotationError> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 3 {
        return Err(AnnotationError::RegionParseError(line.to_string()));
    }

    let start = parts[1]
        .parse::<u32>()
        .map_err(|_| AnnotationError::RegionParseError(line.to_string()))?;
    let end = parts[2]
        .parse::<u32>()
        .map_err(|_| AnnotationError::RegionParseError(line.to_string()))?;

    Ok(Region {
        chr: parts[0].to_string(),
        start,
        end,
        rest: Some(parts[3..].join("\t")).filter(|s| !s.is_empty()),
    })
}
