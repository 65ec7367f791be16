use alloc::vec::Vec;
use core::cmp;

/// A Fenwick tree (binary indexed tree) over per-slot `u64` values.
///
/// Slots `0..head` can be left at zero by the caller to act as head room: a zero-valued prefix
/// does not change any prefix sum, so items can later be "prepended" into it with point updates.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    max_bit: usize,
}

impl Fenwick {
    /// Builds a tree with `head` zero slots followed by `values`, in `O(n)`.
    pub(crate) fn with_head_room(head: usize, values: impl Iterator<Item = u64>) -> Self {
        let mut tree = alloc::vec![0u64; head + 1];
        let mut total = 0u64;
        for v in values {
            total = total.saturating_add(v);
            tree.push(v);
        }
        let n = tree.len() - 1;
        for i in 1..=n {
            let j = i + lsb(i);
            if j <= n {
                tree[j] = tree[j].saturating_add(tree[i]);
            }
        }
        Self {
            tree,
            total,
            max_bit: highest_power_of_two_leq(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Drops every slot at or after `new_len`.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.total = self.prefix_sum(new_len);
        self.tree.truncate(new_len + 1);
        self.max_bit = highest_power_of_two_leq(new_len);
    }

    /// Appends one slot in `O(log n)`.
    pub(crate) fn push(&mut self, value: u64) {
        let new_len = self.len() + 1;
        // tree[i] covers the lsb(i) slots ending at i; everything but the new value is already
        // reachable through prefix sums.
        let covered_from = new_len - lsb(new_len);
        let before = self
            .prefix_sum(new_len - 1)
            .saturating_sub(self.prefix_sum(covered_from));
        self.tree.push(before.saturating_add(value));
        self.total = self.total.saturating_add(value);
        self.max_bit = highest_power_of_two_leq(new_len);
    }

    pub(crate) fn add(&mut self, slot: usize, delta: i64) {
        let n = self.len();
        if slot >= n || delta == 0 {
            return;
        }
        if delta > 0 {
            self.total = self.total.saturating_add(delta as u64);
        } else {
            self.total = self.total.saturating_sub(delta.unsigned_abs());
        }
        let mut i = slot + 1;
        while i <= n {
            let next = self.tree[i] as i128 + delta as i128;
            debug_assert!(next >= 0, "Fenwick underflow (slot={slot}, delta={delta})");
            self.tree[i] = next.clamp(0, u64::MAX as i128) as u64;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` slots.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn value(&self, slot: usize) -> u64 {
        self.prefix_sum(slot + 1) - self.prefix_sum(slot)
    }

    /// Returns the largest slot count whose prefix sum is `<= target`.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    1usize << (usize::BITS - 1 - n.leading_zeros())
}
