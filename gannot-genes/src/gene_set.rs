use fxhash::FxHashMap;
use gannot_core::models::{FeatureRow, IntervalTable};

use crate::gene::Gene;

///
/// An ordered collection of [`Gene`]s with the concatenation of their TSS
/// tables.
///
/// Iteration follows construction order. Lookups by name resolve to the last
/// gene inserted under that name.
///
#[derive(Debug, Clone, Default)]
pub struct GeneSet {
    gene_names: Vec<String>,
    gene_ids: Vec<String>,
    data: FxHashMap<String, Gene>,
    tss_table: IntervalTable,
}

impl GeneSet {
    pub fn new(genes: Vec<Gene>) -> Self {
        let mut gene_names = Vec::with_capacity(genes.len());
        let mut gene_ids = Vec::with_capacity(genes.len());
        let mut rows: Vec<FeatureRow> = Vec::new();
        let mut data = FxHashMap::default();

        for gene in genes {
            gene_names.push(gene.name().to_string());
            gene_ids.push(gene.id().to_string());
            rows.extend(gene.tss_table().iter().cloned());
            data.insert(gene.name().to_string(), gene);
        }

        GeneSet {
            gene_names,
            gene_ids,
            data,
            tss_table: IntervalTable::from(rows),
        }
    }

    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    /// Concatenated TSS rows of every gene, in gene order.
    pub fn tss_table(&self) -> &IntervalTable {
        &self.tss_table
    }

    pub fn get(&self, name: &str) -> Option<&Gene> {
        self.data.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.gene_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.gene_names
            .iter()
            .filter_map(|name| self.data.get(name))
    }
}

impl FromIterator<Gene> for GeneSet {
    fn from_iter<T: IntoIterator<Item = Gene>>(iter: T) -> Self {
        GeneSet::new(iter.into_iter().collect())
    }
}
