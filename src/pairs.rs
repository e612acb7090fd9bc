//! Enumeration of unordered track pairs

/// Unordered pair of track indices, stored with `first < second`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPair {
    /// Smaller index
    pub first: usize,

    /// Larger index
    pub second: usize,
}
//
impl IndexPair {
    /// Both indices, in ascending order
    pub fn indices(self) -> [usize; 2] {
        [self.first, self.second]
    }
}

/// Number of unordered pairs that can be drawn from `n` tracks
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Iterate over every unordered pair of indices below `n`
///
/// Pairs come out in lexicographic order: (0, 1), (0, 2)... (0, n-1),
/// (1, 2)... This order decides which pair wins when several could match the
/// same combination, so it must stay stable.
///
pub fn index_pairs(n: usize) -> IndexPairs {
    IndexPairs {
        n,
        next: IndexPair {
            first: 0,
            second: 1,
        },
    }
}

/// Iterator returned by [`index_pairs`]
#[derive(Clone, Debug)]
pub struct IndexPairs {
    /// Number of tracks
    n: usize,

    /// Next pair to be emitted, out of range once exhausted
    next: IndexPair,
}

impl Iterator for IndexPairs {
    type Item = IndexPair;

    fn next(&mut self) -> Option<IndexPair> {
        if self.next.second >= self.n {
            return None;
        }
        let result = self.next;
        self.next.second += 1;
        if self.next.second == self.n {
            self.next.first += 1;
            self.next.second = self.next.first + 1;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let IndexPair { first, second } = self.next;
        let remaining = if second >= self.n {
            0
        } else {
            // Rest of the current row, then all rows below it
            (self.n - second) + pair_count(self.n - first - 1)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndexPairs {}

impl std::iter::FusedIterator for IndexPairs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sizes() {
        assert_eq!(index_pairs(0).count(), 0);
        assert_eq!(index_pairs(1).count(), 0);
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
    }

    #[test]
    fn three_tracks() {
        let pairs: Vec<_> = index_pairs(3).map(IndexPair::indices).collect();
        assert_eq!(pairs, vec![[0, 1], [0, 2], [1, 2]]);
    }

    #[test]
    fn counts_order_and_uniqueness() {
        for n in 0..12 {
            let pairs: Vec<_> = index_pairs(n).collect();
            assert_eq!(pairs.len(), n * n.saturating_sub(1) / 2);
            assert_eq!(pairs.len(), pair_count(n));
            assert!(pairs.iter().all(|p| p.first < p.second && p.second < n));
            assert!(pairs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn exact_size_is_tracked() {
        let mut pairs = index_pairs(6);
        for remaining in (0..=15).rev() {
            assert_eq!(pairs.len(), remaining);
            pairs.next();
        }
        assert_eq!(pairs.next(), None);
    }
}
