use core::cmp;

use crate::SizeStore;
use crate::fenwick::Fenwick;

const MIN_HEAD_ROOM: usize = 64;

/// Cumulative offsets over a [`SizeStore`].
///
/// Each entry contributes `size + gap`; the trailing gap after the last entry is not part of
/// the total extent. Offsets are in logical units and start at 0 for entry 0.
///
/// Point updates, tail appends/truncations and head prepends/removals run in `O(log n)` per
/// touched entry. Prepends use zero-valued head room in front of entry 0 and only fall back to a
/// linear rebuild when that room is exhausted, which happens geometrically less often as the
/// index grows. Middle insertions and removals rebuild.
#[derive(Clone, Debug, Default)]
pub struct OffsetIndex {
    sums: Fenwick,
    head: usize,
    len: usize,
    gap: u32,
}

impl OffsetIndex {
    pub fn new(sizes: &SizeStore, gap: u32) -> Self {
        let mut index = Self {
            gap,
            ..Self::default()
        };
        index.rebuild(sizes);
        index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Spare slots in front of entry 0.
    pub fn head_room(&self) -> usize {
        self.head
    }

    /// Rebuilds the whole index from `sizes`, dropping any head room.
    pub fn rebuild(&mut self, sizes: &SizeStore) {
        self.rebuild_with_head_room(sizes, 0);
    }

    fn rebuild_with_head_room(&mut self, sizes: &SizeStore, head: usize) {
        vdebug!(len = sizes.len(), head, "OffsetIndex::rebuild");
        let gap = self.gap as u64;
        self.sums = Fenwick::with_head_room(head, sizes.iter().map(|s| s as u64 + gap));
        self.head = head;
        self.len = sizes.len();
    }

    pub fn set_gap(&mut self, gap: u32, sizes: &SizeStore) {
        if self.gap == gap {
            return;
        }
        self.gap = gap;
        let head = self.head;
        self.rebuild_with_head_room(sizes, head);
    }

    /// Offset of the start of `index`. Indexes past the end return the offset just after the
    /// last entry's gap, i.e. `offset_of(len)`.
    pub fn offset_of(&self, index: usize) -> u64 {
        let i = cmp::min(index, self.len);
        // Head room slots are zero, so the prefix up to `head` contributes nothing.
        self.sums.prefix_sum(self.head + i)
    }

    /// Offset just past `index`, excluding the trailing gap.
    pub fn item_end(&self, index: usize) -> Option<u64> {
        (index < self.len).then(|| self.offset_of(index + 1) - self.gap as u64)
    }

    /// Index of the entry covering `offset`.
    ///
    /// An offset exactly on a boundary belongs to the entry that starts there. Offsets inside a
    /// gap map to the preceding entry; offsets past the end clamp to the last entry.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let consumed = self.sums.lower_bound(offset).saturating_sub(self.head);
        Some(consumed.min(self.len - 1))
    }

    pub fn total_extent(&self) -> u64 {
        if self.len == 0 {
            return 0;
        }
        self.sums.total().saturating_sub(self.gap as u64)
    }

    /// Applies a size change of `delta` to `index`.
    pub fn resize(&mut self, index: usize, delta: i64) {
        if index >= self.len {
            return;
        }
        self.sums.add(self.head + index, delta);
    }

    /// Mirrors `count` entries appended to the back of `sizes`.
    pub fn push_back(&mut self, count: usize, sizes: &SizeStore) {
        let gap = self.gap as u64;
        for i in self.len..self.len + count {
            self.sums.push(sizes.get(i) as u64 + gap);
        }
        self.len += count;
    }

    pub fn pop_back(&mut self, count: usize) {
        let count = count.min(self.len);
        self.len -= count;
        self.sums.truncate(self.head + self.len);
    }

    /// Mirrors `count` entries prepended to the front of `sizes`.
    pub fn push_front(&mut self, count: usize, sizes: &SizeStore) {
        if count == 0 {
            return;
        }
        if count > self.head {
            let head = cmp::max(MIN_HEAD_ROOM, (self.len + count) / 2);
            self.rebuild_with_head_room(sizes, head);
            return;
        }
        let gap = self.gap as u64;
        let first = self.head - count;
        for k in 0..count {
            self.sums.add(first + k, (sizes.get(k) as u64 + gap) as i64);
        }
        self.head = first;
        self.len += count;
    }

    /// Mirrors `count` entries removed from the front of `sizes`.
    pub fn pop_front(&mut self, count: usize, sizes: &SizeStore) {
        let count = count.min(self.len);
        if count == 0 {
            return;
        }
        for k in 0..count {
            let slot = self.head + k;
            let value = self.sums.value(slot);
            self.sums.add(slot, -(value as i64));
        }
        self.head += count;
        self.len -= count;
        // Keep head room proportional to the live entries.
        if self.head > cmp::max(MIN_HEAD_ROOM, self.len) {
            let head = cmp::max(MIN_HEAD_ROOM, self.len / 2);
            self.rebuild_with_head_room(sizes, head);
        }
    }

    /// Whether this index still mirrors `sizes` entry-for-entry.
    pub fn is_in_sync(&self, sizes: &SizeStore) -> bool {
        self.len == sizes.len() && self.sums.len() == self.head + self.len
    }
}
