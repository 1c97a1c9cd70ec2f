use std::fmt::{self, Display};

use gannot_core::models::{FeatureRow, Strand};
use serde::{Deserialize, Serialize};

/// A single transcription start site of a gene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tss {
    pub gene_name: String,
    pub gene_id: String,
    pub chr: String,
    pub position: u32,
    pub strand: Strand,
}

impl From<&FeatureRow> for Tss {
    fn from(row: &FeatureRow) -> Self {
        Tss {
            gene_name: row.gene_name.clone(),
            gene_id: row.gene_id.clone(),
            chr: row.chr.clone(),
            position: row.start,
            strand: row.strand,
        }
    }
}

impl Display for Tss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.chr, self.position, self.strand, self.gene_name, self.gene_id
        )
    }
}
