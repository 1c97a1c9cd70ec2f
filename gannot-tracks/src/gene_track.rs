//! Track reads anchored on a gene's TSS rows.

use gannot_genes::{Gene, GenomicRange};

use crate::errors::TrackError;
use crate::track::{Track, TrackOptions, TrackReader};

///
/// Track access for a [`Gene`].
///
/// The `range` forms read around [`Gene::genomic_range`] (smallest TSS on
/// both strands); the `tss` forms read around [`Gene::tss_window`].
///
pub trait GeneTrackExt {
    fn get_track<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError>;

    fn get_tss_track<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError>;

    fn get_track_obj<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Track, TrackError>;

    fn get_tss_track_obj<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Track, TrackError>;
}

fn read<R: TrackReader + ?Sized>(
    reader: &R,
    range: &GenomicRange,
    options: &TrackOptions,
) -> Result<Vec<f64>, TrackError> {
    reader.get_track(&range.chr, range.start, range.end, options)
}

fn read_obj<R: TrackReader + ?Sized>(
    reader: &R,
    range: &GenomicRange,
    options: &TrackOptions,
) -> Result<Track, TrackError> {
    reader.get_track_obj(&range.chr, range.start, range.end, options)
}

impl GeneTrackExt for Gene {
    fn get_track<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        read(reader, &self.genomic_range(upstream, downstream), options)
    }

    fn get_tss_track<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        read(reader, &self.tss_window(upstream, downstream), options)
    }

    fn get_track_obj<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Track, TrackError> {
        read_obj(reader, &self.genomic_range(upstream, downstream), options)
    }

    fn get_tss_track_obj<R: TrackReader + ?Sized>(
        &self,
        reader: &R,
        upstream: u32,
        downstream: u32,
        options: &TrackOptions,
    ) -> Result<Track, TrackError> {
        read_obj(reader, &self.tss_window(upstream, downstream), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gannot_core::models::{FeatureRow, Strand};
    use pretty_assertions::assert_eq;
    use rstest::*;

    /// Echoes the requested window as a two-value track.
    struct Window;

    impl TrackReader for Window {
        fn get_track(
            &self,
            _chr: &str,
            start: u32,
            end: u32,
            _options: &TrackOptions,
        ) -> Result<Vec<f64>, TrackError> {
            Ok(vec![start as f64, end as f64])
        }
    }

    fn gene(strand: Strand) -> Gene {
        let rows = [5000, 5400]
            .iter()
            .map(|&pos| FeatureRow {
                chr: "chr1".to_string(),
                start: pos,
                end: pos,
                strand,
                gene_name: "GENE1".to_string(),
                gene_id: "ENSG01".to_string(),
                gene_type: "protein_coding".to_string(),
            })
            .collect();
        Gene::from_rows(rows).unwrap()
    }

    #[rstest]
    #[case(Strand::Plus, vec![4000.0, 6000.0])]
    #[case(Strand::Minus, vec![4000.0, 6000.0])]
    fn test_range_track_anchors_on_min(#[case] strand: Strand, #[case] expected: Vec<f64>) {
        let values = gene(strand)
            .get_track(&Window, 1000, 1000, &TrackOptions::default())
            .unwrap();
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case(Strand::Plus, vec![4000.0, 5500.0])]
    #[case(Strand::Minus, vec![4900.0, 6400.0])]
    fn test_tss_track_is_strand_aware(#[case] strand: Strand, #[case] expected: Vec<f64>) {
        let values = gene(strand)
            .get_tss_track(&Window, 1000, 500, &TrackOptions::default())
            .unwrap();
        assert_eq!(values, expected);
    }

    #[rstest]
    fn test_track_obj_window() {
        let track = gene(Strand::Minus)
            .get_tss_track_obj(&Window, 1000, 1000, &TrackOptions::default())
            .unwrap();
        assert_eq!((track.chr.as_str(), track.start, track.end), ("chr1", 4400, 6400));

        let track = gene(Strand::Minus)
            .get_track_obj(&Window, 1000, 1000, &TrackOptions::default())
            .unwrap();
        assert_eq!((track.start, track.end), (4000, 6000));
    }
}
