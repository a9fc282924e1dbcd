//! Binary indexed tree over row sizes.
//!
//! Gives O(log n) size updates, prefix sums (the start offset of a row) and
//! offset-to-row lookups, which is what keeps windowing cost independent of the
//! number of rows.

#[derive(Debug, Clone, Default)]
pub(crate) struct Fenwick {
    // 1-indexed; node i covers the lowbit(i) values ending at i.
    nodes: Vec<u64>,
    total: u64,
    top_bit: usize,
}

impl Fenwick {
    /// Builds the tree in O(n).
    pub(crate) fn from_sizes(sizes: &[u32]) -> Self {
        let n = sizes.len();
        let mut nodes = vec![0u64; n + 1];
        let mut total = 0u64;

        for i in 1..=n {
            let value = u64::from(sizes[i - 1]);
            total = total.saturating_add(value);
            nodes[i] = nodes[i].saturating_add(value);
            let parent = i + lowbit(i);
            if parent <= n {
                nodes[parent] = nodes[parent].saturating_add(nodes[i]);
            }
        }

        Self {
            nodes,
            total,
            top_bit: top_bit(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Adds `delta` to the value at `index`. Out-of-range indices are ignored.
    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }

        self.total = apply_delta(self.total, delta);

        let mut i = index + 1;
        while i <= n {
            self.nodes[i] = apply_delta(self.nodes[i], delta);
            i += lowbit(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.nodes[i]);
            i &= i - 1;
        }
        sum
    }

    /// Largest `count` such that `prefix_sum(count) <= target`.
    ///
    /// For positive sizes this is the index of the row covering offset `target`,
    /// or `len()` when `target` is past the end.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut index = 0usize;
        let mut bit = self.top_bit;

        while bit != 0 {
            let next = index + bit;
            if next <= n && self.nodes[next] <= target {
                target -= self.nodes[next];
                index = next;
            }
            bit >>= 1;
        }

        index
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_prefix(sizes: &[u32], count: usize) -> u64 {
        sizes[..count].iter().map(|&s| u64::from(s)).sum()
    }

    #[test]
    fn prefix_sums_match_naive_sums() {
        let sizes = [1, 3, 2, 2, 5, 1, 1, 4, 2];
        let tree = Fenwick::from_sizes(&sizes);

        assert_eq!(tree.len(), sizes.len());
        assert_eq!(tree.total(), naive_prefix(&sizes, sizes.len()));
        for count in 0..=sizes.len() {
            assert_eq!(tree.prefix_sum(count), naive_prefix(&sizes, count));
        }
    }

    #[test]
    fn add_updates_prefix_sums_and_total() {
        let mut sizes = vec![2u32; 10];
        let mut tree = Fenwick::from_sizes(&sizes);

        tree.add(3, 5);
        sizes[3] += 5;
        tree.add(7, -1);
        sizes[7] -= 1;
        tree.add(99, 10);

        assert_eq!(tree.total(), naive_prefix(&sizes, sizes.len()));
        for count in 0..=sizes.len() {
            assert_eq!(tree.prefix_sum(count), naive_prefix(&sizes, count));
        }
    }

    #[test]
    fn lower_bound_finds_row_covering_offset() {
        // Rows cover [0,1) [1,4) [4,6) [6,7).
        let tree = Fenwick::from_sizes(&[1, 3, 2, 1]);

        assert_eq!(tree.lower_bound(0), 0);
        assert_eq!(tree.lower_bound(1), 1);
        assert_eq!(tree.lower_bound(3), 1);
        assert_eq!(tree.lower_bound(4), 2);
        assert_eq!(tree.lower_bound(6), 3);
        assert_eq!(tree.lower_bound(7), 4);
        assert_eq!(tree.lower_bound(1_000), 4);
    }

    #[test]
    fn empty_tree() {
        let tree = Fenwick::from_sizes(&[]);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.total(), 0);
        assert_eq!(tree.prefix_sum(5), 0);
        assert_eq!(tree.lower_bound(3), 0);
    }
}
