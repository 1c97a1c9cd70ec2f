use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};

use crate::errors::AnnotationError;
use crate::models::{FEATURE_ROW_HEADER, FeatureRecord, FeatureRow, Strand};
use crate::sources::{AnnotationSource, GtfSource};

/// Chromosomes dropped from every table unless the caller says otherwise.
pub const DEFAULT_EXCLUDED_CHROMOSOMES: [&str; 2] = ["chrM", "chrY"];

///
/// IntervalTable struct, the normalized table of transcription start sites
/// that every gene query is answered from.
///
/// The table is read-only once built. Derived tables (query results, gene
/// bodies, joins) are fresh copies.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalTable {
    rows: Vec<FeatureRow>,
}

impl From<Vec<FeatureRow>> for IntervalTable {
    fn from(rows: Vec<FeatureRow>) -> Self {
        IntervalTable { rows }
    }
}

impl TryFrom<&Path> for IntervalTable {
    type Error = AnnotationError;

    ///
    /// Load an [IntervalTable] from a GTF file, excluding the default chromosomes.
    ///
    fn try_from(value: &Path) -> Result<Self, AnnotationError> {
        IntervalTable::load(&GtfSource::new(value), &DEFAULT_EXCLUDED_CHROMOSOMES)
    }
}

impl TryFrom<&str> for IntervalTable {
    type Error = AnnotationError;

    fn try_from(value: &str) -> Result<Self, AnnotationError> {
        IntervalTable::try_from(Path::new(value))
    }
}

impl<'a> IntoIterator for &'a IntervalTable {
    type Item = &'a FeatureRow;
    type IntoIter = std::slice::Iter<'a, FeatureRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntervalTable {
    ///
    /// Build a table from any annotation source.
    ///
    /// # Arguments
    /// - source: provider of raw feature records
    /// - exclude_chromosomes: chromosomes whose rows are dropped
    ///
    pub fn load<S: AnnotationSource + ?Sized>(
        source: &S,
        exclude_chromosomes: &[&str],
    ) -> Result<Self, AnnotationError> {
        let records = source.records()?;
        Ok(IntervalTable::from_records(records, exclude_chromosomes))
    }

    ///
    /// Normalize raw records into TSS anchor rows.
    ///
    /// Only `transcript` records are used. `+` rows anchor on the record start,
    /// `-` rows on the record end; all `+` rows precede all `-` rows. Exact
    /// duplicates are removed before the gene_id version suffix is stripped.
    /// Gene names seen on more than one chromosome (after exclusion) are dropped.
    ///
    pub fn from_records(records: Vec<FeatureRecord>, exclude_chromosomes: &[&str]) -> Self {
        let total = records.len();

        let mut positive: Vec<FeatureRow> = Vec::new();
        let mut negative: Vec<FeatureRow> = Vec::new();
        let mut missing_attributes = 0usize;

        for record in records.into_iter().filter(|r| r.is_transcript()) {
            let Some(tss) = record.tss() else {
                continue;
            };
            let (Some(gene_name), Some(gene_id)) = (record.gene_name, record.gene_id) else {
                missing_attributes += 1;
                continue;
            };
            let row = FeatureRow {
                chr: record.chr,
                start: tss,
                end: tss,
                strand: record.strand,
                gene_name,
                gene_id,
                gene_type: record.gene_type.unwrap_or_default(),
            };
            match row.strand {
                Strand::Plus => positive.push(row),
                _ => negative.push(row),
            }
        }

        if missing_attributes > 0 {
            debug!(
                "Skipped {} transcript records without gene_name or gene_id",
                missing_attributes
            );
        }

        let mut seen: FxHashSet<FeatureRow> = FxHashSet::default();
        let mut rows: Vec<FeatureRow> = positive
            .into_iter()
            .chain(negative)
            .filter(|row| seen.insert(row.clone()))
            .collect();

        for row in rows.iter_mut() {
            if let Some(stripped) = row.gene_id.split('.').next() {
                row.gene_id = stripped.to_string();
            }
        }

        let excluded: FxHashSet<&str> = exclude_chromosomes.iter().copied().collect();
        rows.retain(|row| !excluded.contains(row.chr.as_str()));

        let mut chroms_per_gene: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
        for row in &rows {
            chroms_per_gene
                .entry(row.gene_name.as_str())
                .or_default()
                .insert(row.chr.as_str());
        }
        let ambiguous: FxHashSet<String> = chroms_per_gene
            .into_iter()
            .filter(|(_, chroms)| chroms.len() != 1)
            .map(|(name, _)| name.to_string())
            .collect();

        if !ambiguous.is_empty() {
            debug!(
                "Dropping {} gene names mapped to more than one chromosome",
                ambiguous.len()
            );
            rows.retain(|row| !ambiguous.contains(&row.gene_name));
        }

        info!(
            "Loaded {} TSS rows from {} annotation records",
            rows.len(),
            total
        );

        IntervalTable { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }

    ///
    /// Copy the rows matching a predicate into a new table, keeping order.
    ///
    pub fn filter<F>(&self, predicate: F) -> IntervalTable
    where
        F: Fn(&FeatureRow) -> bool,
    {
        IntervalTable {
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    ///
    /// The distinct gene names of the table, sorted.
    ///
    pub fn gene_names(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.gene_name.as_str()).collect()
    }

    ///
    /// Iterate unique chromosomes in order of first appearance
    ///
    pub fn iter_chroms(&self) -> impl Iterator<Item = &str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.rows
            .iter()
            .map(|r| r.chr.as_str())
            .filter(move |chr| seen.insert(*chr))
    }

    ///
    /// Iterate through rows located on a specific chromosome
    ///
    pub fn iter_chr_rows<'a>(&'a self, chr: &'a str) -> impl Iterator<Item = &'a FeatureRow> {
        self.rows.iter().filter(move |r| r.chr == chr)
    }

    ///
    /// Save the table as a tab separated file with a header line
    ///
    pub fn to_tsv<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_tsv(&mut writer)
    }

    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", FEATURE_ROW_HEADER)?;
        for row in &self.rows {
            writeln!(writer, "{}", row.as_string())?;
        }
        writer.flush()
    }
}
