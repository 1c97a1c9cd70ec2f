//! Gene lookups and region queries over a loaded TSS table.

use std::collections::BTreeSet;
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use gannot_core::errors::AnnotationError;
use gannot_core::models::{FeatureRow, IntervalTable, Region, Strand};
use gannot_core::sources::{AnnotationSource, GtfSource};
use log::{debug, info};

use crate::errors::GeneLookupError;
use crate::gene::Gene;
use crate::gene_set::GeneSet;
use crate::join::{PeakJoinRow, join_with_peaks};

/// Default symmetric widening for [`AnnotationIndex::join_with_peaks`].
pub const DEFAULT_JOIN_EXTENSION: u32 = 300;

/// Chromosomes never reported as gene bodies.
const GENE_BODY_EXCLUDED: [&str; 2] = ["chrM", "chrY"];

const PROTEIN_CODING: &str = "protein_coding";

///
/// A normalized TSS table plus a name index for gene lookups.
///
/// The table is never mutated after construction; every query returns new
/// values.
///
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    table: IntervalTable,
    by_name: FxHashMap<String, Vec<usize>>,
}

impl From<IntervalTable> for AnnotationIndex {
    fn from(table: IntervalTable) -> Self {
        let mut by_name: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, row) in table.iter().enumerate() {
            by_name.entry(row.gene_name.clone()).or_default().push(idx);
        }
        AnnotationIndex { table, by_name }
    }
}

impl AnnotationIndex {
    pub fn load<S: AnnotationSource + ?Sized>(
        source: &S,
        exclude_chromosomes: &[&str],
    ) -> Result<Self, AnnotationError> {
        Ok(Self::from(IntervalTable::load(source, exclude_chromosomes)?))
    }

    pub fn from_gtf<P: AsRef<Path>>(
        path: P,
        exclude_chromosomes: &[&str],
    ) -> Result<Self, AnnotationError> {
        info!("Loading annotation from {}", path.as_ref().display());
        Self::load(&GtfSource::new(path), exclude_chromosomes)
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    /// Distinct gene names, sorted.
    pub fn gene_names(&self) -> BTreeSet<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    fn gene_from_indices(&self, indices: &[usize]) -> Result<Gene, GeneLookupError> {
        let rows = self.table.rows();
        Gene::from_rows(indices.iter().map(|&idx| rows[idx].clone()).collect())
    }

    ///
    /// All TSS rows for `name` as a [`Gene`].
    ///
    /// # Arguments
    ///
    /// - name: exact gene name
    ///
    pub fn get_gene(&self, name: &str) -> Result<Gene, GeneLookupError> {
        match self.by_name.get(name) {
            Some(indices) => self.gene_from_indices(indices),
            None => Err(GeneLookupError::NoSuchGene(name.to_string())),
        }
    }

    /// All rows whose gene id starts with `prefix`. Identity comes from the
    /// first matching row.
    pub fn get_gene_by_id_prefix(&self, prefix: &str) -> Result<Gene, GeneLookupError> {
        let rows: Vec<FeatureRow> = self
            .table
            .iter()
            .filter(|row| row.gene_id.starts_with(prefix))
            .cloned()
            .collect();

        if rows.is_empty() {
            return Err(GeneLookupError::NoSuchGeneId(prefix.to_string()));
        }
        Gene::from_rows(rows)
    }

    ///
    /// Build a [`GeneSet`] for the requested names.
    ///
    /// Unknown and duplicate names are dropped without error. Genes come out
    /// sorted by name, not in request order.
    ///
    pub fn get_genes<S: AsRef<str>>(&self, names: &[S]) -> GeneSet {
        let requested: BTreeSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        let mut genes = Vec::with_capacity(requested.len());

        for name in requested {
            match self.by_name.get(name) {
                Some(indices) => {
                    if let Ok(gene) = self.gene_from_indices(indices) {
                        genes.push(gene);
                    }
                }
                None => debug!("Skipping unknown gene {}", name),
            }
        }

        if genes.len() < names.len() {
            info!("Resolved {} of {} requested genes", genes.len(), names.len());
        }

        GeneSet::new(genes)
    }

    ///
    /// Protein-coding gene spans: one row per `(chromosome, gene_name)` with
    /// the smallest start and largest end of that gene's rows.
    ///
    /// Other columns come from the gene's first row, and rows keep
    /// first-occurrence order. `names`, when given, restricts the output.
    ///
    pub fn get_gene_bodies<S: AsRef<str>>(&self, names: Option<&[S]>) -> IntervalTable {
        let mut bodies: Vec<FeatureRow> = Vec::new();
        let mut slots: FxHashMap<(&str, &str), usize> = FxHashMap::default();

        for row in self.table.iter() {
            if row.gene_type != PROTEIN_CODING || GENE_BODY_EXCLUDED.contains(&row.chr.as_str()) {
                continue;
            }

            match slots.get(&(row.chr.as_str(), row.gene_name.as_str())) {
                Some(&slot) => {
                    let body = &mut bodies[slot];
                    body.start = body.start.min(row.start);
                    body.end = body.end.max(row.end);
                }
                None => {
                    slots.insert((row.chr.as_str(), row.gene_name.as_str()), bodies.len());
                    bodies.push(row.clone());
                }
            }
        }

        if let Some(names) = names {
            let wanted: FxHashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
            bodies.retain(|body| wanted.contains(body.gene_name.as_str()));
        }

        IntervalTable::from(bodies)
    }

    /// See [`join_with_peaks`].
    pub fn join_with_peaks(&self, peaks: &[Region], extend_bp: u32) -> Vec<PeakJoinRow> {
        join_with_peaks(&self.table, peaks, extend_bp)
    }

    ///
    /// Rows on `chr` lying strictly inside `(start, end)`: `Start > start`
    /// and `End < end`. Boundary-equal rows are excluded.
    ///
    pub fn query_region(
        &self,
        chr: &str,
        start: u32,
        end: u32,
        strand: Option<Strand>,
    ) -> IntervalTable {
        self.table.filter(|row| {
            row.chr == chr
                && row.start > start
                && row.end < end
                && strand.is_none_or(|s| row.strand == s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gannot_core::models::FeatureRecord;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn record(
        chr: &str,
        start: u32,
        end: u32,
        strand: Strand,
        name: &str,
        id: &str,
        gene_type: &str,
    ) -> FeatureRecord {
        FeatureRecord {
            feature: "transcript".to_string(),
            chr: chr.to_string(),
            start,
            end,
            strand,
            gene_name: Some(name.to_string()),
            gene_id: Some(id.to_string()),
            gene_type: Some(gene_type.to_string()),
        }
    }

    #[fixture]
    fn index() -> AnnotationIndex {
        let records = vec![
            record("chr1", 1000, 5000, Strand::Plus, "GENE1", "ENSG0001.5", "protein_coding"),
            record("chr1", 1200, 5000, Strand::Plus, "GENE1", "ENSG0001.5", "protein_coding"),
            record("chr1", 100, 200, Strand::Plus, "GENE3", "ENSG0003.1", "protein_coding"),
            record("chr2", 3000, 8000, Strand::Minus, "GENE2", "ENSG0002.2", "protein_coding"),
            record("chr2", 3000, 7000, Strand::Minus, "GENE2", "ENSG0002.2", "protein_coding"),
            record("chr3", 10, 500, Strand::Plus, "LNC1", "ENSG0009.1", "lncRNA"),
        ];
        AnnotationIndex::load(&records, &["chrM", "chrY"]).unwrap()
    }

    #[rstest]
    fn test_get_gene(index: AnnotationIndex) {
        let gene = index.get_gene("GENE1").unwrap();
        assert_eq!(gene.name(), "GENE1");
        assert_eq!(gene.id(), "ENSG0001");
        assert_eq!(gene.tss_table().len(), 2);
        assert!(gene.tss_table().iter().all(|r| r.gene_name == "GENE1"));
    }

    #[rstest]
    fn test_get_gene_unknown(index: AnnotationIndex) {
        assert!(matches!(
            index.get_gene("NOPE"),
            Err(GeneLookupError::NoSuchGene(_))
        ));
    }

    #[rstest]
    fn test_get_gene_by_id_prefix(index: AnnotationIndex) {
        let gene = index.get_gene_by_id_prefix("ENSG0002").unwrap();
        assert_eq!(gene.name(), "GENE2");
        assert_eq!(gene.strand(), Strand::Minus);
        assert!(matches!(
            index.get_gene_by_id_prefix("XYZ"),
            Err(GeneLookupError::NoSuchGeneId(_))
        ));
    }

    #[rstest]
    fn test_get_genes_sorted_and_lenient(index: AnnotationIndex) {
        let genes = index.get_genes(&["GENE2", "MISSING", "GENE1", "GENE2"]);
        assert_eq!(genes.gene_names(), &["GENE1".to_string(), "GENE2".to_string()]);
        assert_eq!(genes.tss_table().len(), 4);
    }

    #[rstest]
    fn test_gene_bodies(index: AnnotationIndex) {
        let bodies = index.get_gene_bodies::<&str>(None);
        let summary: Vec<(&str, u32, u32)> = bodies
            .iter()
            .map(|r| (r.gene_name.as_str(), r.start, r.end))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("GENE1", 1000, 1200),
                ("GENE3", 100, 100),
                ("GENE2", 7000, 8000),
            ]
        );

        let filtered = index.get_gene_bodies(Some(&["GENE3"][..]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].gene_name, "GENE3");
    }

    #[rstest]
    #[case(999, 1201, None, 2)]
    #[case(1000, 1201, None, 1)]
    #[case(999, 1200, None, 1)]
    #[case(1000, 1200, None, 0)]
    #[case(0, 10_000, Some(Strand::Minus), 0)]
    #[case(0, 10_000, Some(Strand::Plus), 3)]
    fn test_query_region_is_strict(
        index: AnnotationIndex,
        #[case] start: u32,
        #[case] end: u32,
        #[case] strand: Option<Strand>,
        #[case] expected: usize,
    ) {
        assert_eq!(index.query_region("chr1", start, end, strand).len(), expected);
    }

    #[rstest]
    fn test_join_with_peaks(index: AnnotationIndex) {
        let peaks = vec![Region {
            chr: "chr1".to_string(),
            start: 1250,
            end: 1300,
            rest: None,
        }];
        let joined = index.join_with_peaks(&peaks, DEFAULT_JOIN_EXTENSION);
        let names: Vec<&str> = joined
            .iter()
            .filter_map(|r| r.feature.as_ref())
            .map(|f| f.gene_name.as_str())
            .collect();
        assert_eq!(names, vec!["GENE1", "GENE1"]);
    }
}
