use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use gannot_core::models::DEFAULT_EXCLUDED_CHROMOSOMES;
use gannot_genes::{AnnotationIndex, Assembly, GencodeRelease};
use gannot_tracks::{DEFAULT_WORKERS, TrackOptions};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "gannot.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No annotation configured. Pass --gtf, or --assembly with --gencode-version, or set them in gannot.toml"
    )]
    MissingAnnotation,
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Assembly(#[from] gannot_genes::errors::ChromGeometryError),
    #[error(transparent)]
    Annotation(#[from] gannot_core::errors::AnnotationError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct TrackConfig {
    pub threads: usize,
    pub upstream: u32,
    pub downstream: u32,
    pub bin_size: Option<u32>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            threads: DEFAULT_WORKERS,
            upstream: 1000,
            downstream: 1000,
            bin_size: None,
        }
    }
}

impl TrackConfig {
    pub fn options(&self) -> TrackOptions {
        match self.bin_size {
            Some(bin_size) => TrackOptions::with_bin_size(bin_size),
            None => TrackOptions::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct GannotConfig {
    pub gtf: Option<PathBuf>,
    pub assembly: Option<Assembly>,
    pub gencode_version: Option<String>,
    pub annotation_dir: Option<PathBuf>,
    pub exclude_chromosomes: Option<Vec<String>>,
    pub chrom_sizes: Option<PathBuf>,
    pub agp: Option<PathBuf>,
    #[serde(default)]
    pub tracks: TrackConfig,
}

impl TryFrom<&Path> for GannotConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

impl GannotConfig {
    ///
    /// Build the effective configuration for a command.
    ///
    /// `--config` (or `gannot.toml` in the working directory, when present)
    /// provides the base; flags given on the command line replace file values.
    ///
    pub fn from_matches(matches: &ArgMatches) -> ConfigResult<Self> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => GannotConfig::try_from(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!("Using {}", DEFAULT_CONFIG_FILE);
                GannotConfig::try_from(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => GannotConfig::default(),
        };
        config.apply_matches(matches)?;
        Ok(config)
    }

    pub fn apply_matches(&mut self, matches: &ArgMatches) -> ConfigResult<()> {
        let get = |name: &str| {
            matches
                .try_get_one::<String>(name)
                .ok()
                .flatten()
                .cloned()
        };

        if let Some(gtf) = get("gtf") {
            self.gtf = Some(PathBuf::from(gtf));
        }
        if let Some(assembly) = get("assembly") {
            self.assembly = Some(assembly.parse::<Assembly>()?);
        }
        if let Some(version) = get("gencode-version") {
            self.gencode_version = Some(version);
        }
        if let Some(dir) = get("annotation-dir") {
            self.annotation_dir = Some(PathBuf::from(dir));
        }
        if let Ok(Some(exclude)) = matches.try_get_many::<String>("exclude") {
            self.exclude_chromosomes = Some(exclude.cloned().collect());
        }
        if let Some(path) = get("chrom-sizes") {
            self.chrom_sizes = Some(PathBuf::from(path));
        }
        if let Some(path) = get("agp") {
            self.agp = Some(PathBuf::from(path));
        }
        if let Some(threads) = get("threads") {
            self.tracks.threads = parse_number("--threads", &threads)?;
        }
        if let Some(upstream) = get("upstream") {
            self.tracks.upstream = parse_number("--upstream", &upstream)?;
        }
        if let Some(downstream) = get("downstream") {
            self.tracks.downstream = parse_number("--downstream", &downstream)?;
        }
        if let Some(bin_size) = get("bin-size") {
            self.tracks.bin_size = Some(parse_number("--bin-size", &bin_size)?);
        }
        Ok(())
    }

    pub fn exclude_chromosomes(&self) -> Vec<&str> {
        match &self.exclude_chromosomes {
            Some(chroms) => chroms.iter().map(String::as_str).collect(),
            None => DEFAULT_EXCLUDED_CHROMOSOMES.to_vec(),
        }
    }

    /// The GENCODE release named by `assembly` + `gencode_version`, if any.
    pub fn gencode_release(&self) -> Option<GencodeRelease> {
        let assembly = self.assembly?;
        let version = self.gencode_version.as_deref()?;
        let dir = self
            .annotation_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Some(GencodeRelease::new(assembly, version, dir))
    }

    /// Path of the annotation file this configuration points at.
    pub fn annotation_path(&self) -> ConfigResult<PathBuf> {
        if let Some(gtf) = &self.gtf {
            return Ok(gtf.clone());
        }
        self.gencode_release()
            .map(|release| release.gtf_path())
            .ok_or(ConfigError::MissingAnnotation)
    }

    pub fn load_index(&self) -> ConfigResult<AnnotationIndex> {
        let exclude = self.exclude_chromosomes();
        if let Some(gtf) = &self.gtf {
            return Ok(AnnotationIndex::from_gtf(gtf, &exclude)?);
        }
        match self.gencode_release() {
            Some(release) => Ok(release.load(&exclude)?),
            None => Err(ConfigError::MissingAnnotation),
        }
    }
}
