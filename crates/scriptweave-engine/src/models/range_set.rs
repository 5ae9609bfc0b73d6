use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A sorted set of non-overlapping, non-adjacent byte ranges.
///
/// Used for every per-line range attribute (formatting, notes, revisions).
/// Offsets are local to the owning line's string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeSet(Vec<Range<usize>>);

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = Range<usize>>) -> Self {
        let mut set = Self::new();
        for r in ranges {
            set.insert(r);
        }
        set
    }

    /// Adds a range, merging with any overlapping or touching ranges.
    pub fn insert(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut start = range.start;
        let mut end = range.end;

        // First existing range that could touch the new one.
        let first = self.0.partition_point(|r| r.end < start);
        let mut last = first;
        while last < self.0.len() && self.0[last].start <= end {
            start = start.min(self.0[last].start);
            end = end.max(self.0[last].end);
            last += 1;
        }
        self.0.splice(first..last, std::iter::once(start..end));
    }

    pub fn union(&self, other: &RangeSet) -> RangeSet {
        let mut out = self.clone();
        for r in &other.0 {
            out.insert(r.clone());
        }
        out
    }

    pub fn contains(&self, pos: usize) -> bool {
        let idx = self.0.partition_point(|r| r.end <= pos);
        self.0.get(idx).is_some_and(|r| r.start <= pos)
    }

    /// True if any byte of `range` is covered.
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.0.iter().any(|r| r.start < range.end && range.start < r.end)
    }

    /// True if every byte of `range` is covered.
    pub fn covers(&self, range: &Range<usize>) -> bool {
        if range.start >= range.end {
            return true;
        }
        self.0
            .iter()
            .any(|r| r.start <= range.start && range.end <= r.end)
    }

    /// Intersection with `window`, rebased so that `window.start` becomes 0.
    pub fn slice(&self, window: Range<usize>) -> RangeSet {
        let mut out = RangeSet::new();
        for r in &self.0 {
            let start = r.start.max(window.start);
            let end = r.end.min(window.end);
            if start < end {
                out.0.push(start - window.start..end - window.start);
            }
        }
        out
    }

    /// Every range moved right by `offset`.
    pub fn offset(&self, offset: usize) -> RangeSet {
        RangeSet(
            self.0
                .iter()
                .map(|r| r.start + offset..r.end + offset)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.0.iter()
    }

    /// Total number of covered bytes.
    pub fn covered_len(&self) -> usize {
        self.0.iter().map(|r| r.end - r.start).sum()
    }

    pub fn as_slice(&self) -> &[Range<usize>] {
        &self.0
    }
}

impl FromIterator<Range<usize>> for RangeSet {
    fn from_iter<T: IntoIterator<Item = Range<usize>>>(iter: T) -> Self {
        Self::from_ranges(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_merges_overlapping_and_touching() {
        let mut set = RangeSet::new();
        set.insert(5..8);
        set.insert(0..2);
        set.insert(2..3);
        set.insert(7..10);
        assert_eq!(set.as_slice(), &[0..3, 5..10]);
    }

    #[test]
    fn empty_ranges_are_ignored() {
        let mut set = RangeSet::new();
        set.insert(4..4);
        assert!(set.is_empty());
    }

    #[test]
    fn insert_spanning_several() {
        let mut set = RangeSet::from_ranges([0..1, 3..4, 6..7]);
        set.insert(1..6);
        assert_eq!(set.as_slice(), &[0..7]);
    }

    #[test]
    fn contains_respects_exclusive_end() {
        let set = RangeSet::from_ranges([2..4]);
        assert!(!set.contains(1));
        assert!(set.contains(2));
        assert!(set.contains(3));
        assert!(!set.contains(4));
    }

    #[test]
    fn slice_rebases_to_window() {
        let set = RangeSet::from_ranges([0..3, 5..9]);
        assert_eq!(set.slice(2..7).as_slice(), &[0..1, 3..5]);
    }

    #[test]
    fn covers_and_intersects() {
        let set = RangeSet::from_ranges([2..6]);
        assert!(set.covers(&(3..5)));
        assert!(!set.covers(&(1..5)));
        assert!(set.intersects(&(5..8)));
        assert!(!set.intersects(&(6..8)));
    }
}
