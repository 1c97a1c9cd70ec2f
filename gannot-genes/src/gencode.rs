//! GENCODE release naming per genome assembly.
//!
//! Only names and locations are resolved here; fetching is left to the
//! caller. Files are expected under an annotation directory.

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use gannot_core::errors::AnnotationError;
use serde::{Deserialize, Serialize};

use crate::errors::ChromGeometryError;
use crate::index::AnnotationIndex;

const GENCODE_HUMAN: &str = "http://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human";
const GENCODE_MOUSE: &str = "http://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_mouse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assembly {
    Hg38,
    Hg19,
    Mm10,
}

impl Assembly {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assembly::Hg38 => "hg38",
            Assembly::Hg19 => "hg19",
            Assembly::Mm10 => "mm10",
        }
    }

    /// Local file name of the basic GENCODE annotation for `version`.
    pub fn gtf_file_name(&self, version: &str) -> String {
        match self {
            Assembly::Hg38 => format!("gencode.v{}.basic.annotation.gtf.gz", version),
            Assembly::Mm10 => format!("gencode.mm10.v{}.basic.annotation.gtf.gz", version),
            Assembly::Hg19 => format!("gencode.v{}lift37.basic.annotation.gtf.gz", version),
        }
    }

    /// Remote location of the basic GENCODE annotation for `version`.
    pub fn gtf_url(&self, version: &str) -> String {
        match self {
            Assembly::Hg38 => format!(
                "{}/release_{}/gencode.v{}.basic.annotation.gtf.gz",
                GENCODE_HUMAN, version, version
            ),
            Assembly::Mm10 => format!(
                "{}/release_{}/gencode.v{}.basic.annotation.gtf.gz",
                GENCODE_MOUSE, version, version
            ),
            Assembly::Hg19 => format!(
                "{}/release_{}/GRCh37_mapping/gencode.v{}lift37.basic.annotation.gtf.gz",
                GENCODE_HUMAN, version, version
            ),
        }
    }

    pub fn chrom_sizes_file_name(&self) -> String {
        format!("{}_chrom_sizes.txt", self.as_str())
    }

    pub fn agp_file_name(&self) -> String {
        format!("{}_agp.txt", self.as_str())
    }
}

impl FromStr for Assembly {
    type Err = ChromGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hg38" => Ok(Assembly::Hg38),
            "hg19" => Ok(Assembly::Hg19),
            "mm10" => Ok(Assembly::Mm10),
            other => Err(ChromGeometryError::UnknownAssembly(other.to_string())),
        }
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A GENCODE release of one assembly, stored under `annotation_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GencodeRelease {
    pub assembly: Assembly,
    pub version: String,
    pub annotation_dir: PathBuf,
}

impl GencodeRelease {
    pub fn new<P: AsRef<Path>>(assembly: Assembly, version: &str, annotation_dir: P) -> Self {
        GencodeRelease {
            assembly,
            version: version.to_string(),
            annotation_dir: annotation_dir.as_ref().to_path_buf(),
        }
    }

    pub fn gtf_path(&self) -> PathBuf {
        self.annotation_dir
            .join(self.assembly.gtf_file_name(&self.version))
    }

    pub fn url(&self) -> String {
        self.assembly.gtf_url(&self.version)
    }

    pub fn chrom_sizes_path(&self) -> PathBuf {
        self.annotation_dir
            .join(self.assembly.chrom_sizes_file_name())
    }

    pub fn agp_path(&self) -> PathBuf {
        self.annotation_dir.join(self.assembly.agp_file_name())
    }

    /// Load the release's GTF from disk. A missing file is reported with the
    /// expected path; the remote location is logged.
    pub fn load(&self, exclude_chromosomes: &[&str]) -> Result<AnnotationIndex, AnnotationError> {
        let path = self.gtf_path();
        if !path.is_file() {
            log::warn!(
                "GENCODE {} v{} not found locally, expected at {} (source: {})",
                self.assembly,
                self.version,
                path.display(),
                self.url()
            );
            return Err(AnnotationError::NotFound(path));
        }
        AnnotationIndex::from_gtf(path, exclude_chromosomes)
    }
}
