use num_traits::{PrimInt, Unsigned, identities::zero};

use crate::traits::{Interval, Overlapper};

/// A Binary Interval Search data structure for genomic interval overlap queries.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start. A query binary-searches for the first
/// interval that could reach the query (its start is at most `max_len` before
/// the query start) and scans forward until starts pass the query end.
///
/// ```
/// use gannot_overlaprs::{Bits, Interval, Overlapper};
///
/// let tss = vec![
///     Interval { start: 100u32, end: 700, val: "GENE1" },
///     Interval { start: 200, end: 800, val: "GENE2" },
///     Interval { start: 5000, end: 5600, val: "GENE3" },
/// ];
///
/// let bits = Bits::build(tss);
/// assert_eq!(bits.find(650, 660).len(), 2);
/// assert_eq!(bits.count(650, 660), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    starts: Vec<I>,
    ends: Vec<I>,
    max_len: I,
}

impl<I, T> Overlapper<I, T> for Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Intervals are stably sorted by (start, end), so equal coordinates keep
    /// their insertion order.
    fn build(mut intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        intervals.sort();
        let (mut starts, mut ends): (Vec<_>, Vec<_>) =
            intervals.iter().map(|x| (x.start, x.end)).unzip();
        starts.sort();
        ends.sort();

        let max_len = intervals
            .iter()
            .map(|x| x.end.checked_sub(&x.start).unwrap_or_else(zero::<I>))
            .max()
            .unwrap_or_else(zero::<I>);

        Bits {
            intervals,
            starts,
            ends,
            max_len,
        }
    }

    fn find(&self, start: I, stop: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, stop).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        stop: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            off: self.first_candidate(start),
            start,
            stop,
        })
    }
}

impl<I, T> Bits<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I, T>> {
        self.intervals.iter()
    }

    /// Count overlaps with `[start, stop)` without materializing them.
    pub fn count(&self, start: I, stop: I) -> usize {
        // an empty query can exclude an interval on both ends at once
        if start >= stop {
            return self.find_iter(start, stop).count();
        }
        // every interval ending at or before `start` also starts before `stop`
        let started = self.starts.partition_point(|&s| s < stop);
        let ended = self.ends.partition_point(|&end| end <= start);
        started.saturating_sub(ended)
    }

    #[inline]
    fn first_candidate(&self, start: I) -> usize {
        let floor = start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>);
        self.intervals.partition_point(|x| x.start < floor)
    }
}

/// Iterator over the intervals of a [`Bits`] overlapping a query range.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I, T>,
    off: usize,
    start: I,
    stop: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    T: Eq + Clone + Send + Sync + 'a,
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.off < self.inner.intervals.len() {
            let interval = &self.inner.intervals[self.off];
            self.off += 1;
            if interval.overlap(self.start, self.stop) {
                return Some(interval);
            } else if interval.start >= self.stop {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn intervals() -> Vec<Interval<u32, &'static str>> {
        vec![
            Interval { start: 1, end: 5, val: "a" },
            Interval { start: 3, end: 8, val: "b" },
            Interval { start: 10, end: 15, val: "c" },
            Interval { start: 100, end: 300, val: "long" },
        ]
    }

    #[rstest]
    fn test_build_and_len(intervals: Vec<Interval<u32, &'static str>>) {
        let bits = Bits::build(intervals);
        assert_eq!(bits.len(), 4);
        assert!(!bits.is_empty());
    }

    #[rstest]
    #[case(4, 6, vec!["a", "b"])]
    #[case(5, 10, vec!["b"])]
    #[case(8, 10, vec![])]
    #[case(250, 251, vec!["long"])]
    fn test_find_is_half_open(
        intervals: Vec<Interval<u32, &'static str>>,
        #[case] start: u32,
        #[case] stop: u32,
        #[case] expected: Vec<&'static str>,
    ) {
        let bits = Bits::build(intervals);
        let found: Vec<&str> = bits.find_iter(start, stop).map(|x| x.val).collect();
        assert_eq!(found, expected);
        assert_eq!(bits.count(start, stop), expected.len());
    }

    #[rstest]
    fn test_equal_coordinates_keep_insertion_order() {
        let bits = Bits::build(vec![
            Interval { start: 10u32, end: 20, val: 2usize },
            Interval { start: 10, end: 20, val: 0 },
            Interval { start: 10, end: 20, val: 1 },
        ]);
        let vals: Vec<usize> = bits.iter().map(|x| x.val).collect();
        assert_eq!(vals, vec![2, 0, 1]);
    }

    #[rstest]
    fn test_count_empty_query_with_zero_width_intervals() {
        let bits = Bits::build(vec![
            Interval { start: 0u32, end: 10, val: "span" },
            Interval { start: 5, end: 5, val: "tss1" },
            Interval { start: 5, end: 5, val: "tss2" },
        ]);
        assert_eq!(bits.find(5, 5).len(), 1);
        assert_eq!(bits.count(5, 5), 1);
        assert_eq!(bits.count(4, 6), 3);
    }

    #[rstest]
    fn test_empty() {
        let bits: Bits<u32, bool> = Bits::build(vec![]);
        assert!(bits.find(0, 100).is_empty());
        assert_eq!(bits.count(0, 100), 0);
    }
}
