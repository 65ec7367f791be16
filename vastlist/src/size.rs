use alloc::collections::VecDeque;
use alloc::sync::Arc;

use crate::{Diagnostic, Diagnostics};

/// Where item sizes come from before (or instead of) measurement.
#[derive(Clone)]
pub enum ItemSize {
    /// Every item has the same, known size.
    Fixed(u32),
    /// Sizes are a pure function of the index and considered exact.
    Function(Arc<dyn Fn(usize) -> u32 + Send + Sync>),
    /// Sizes are unknown until measured; the estimate is used meanwhile.
    Estimated(u32),
}

impl ItemSize {
    pub fn function(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }
}

impl core::fmt::Debug for ItemSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Estimated(v) => f.debug_tuple("Estimated").field(v).finish(),
        }
    }
}

/// A provider of default sizes for a [`SizeStore`].
///
/// `is_exact` tells the store whether values coming from this provider count as known sizes or
/// as estimates awaiting measurement.
pub trait SizeEstimate {
    fn estimate(&self, index: usize) -> u32;
    fn is_exact(&self) -> bool;
}

impl SizeEstimate for ItemSize {
    fn estimate(&self, index: usize) -> u32 {
        match self {
            Self::Fixed(v) | Self::Estimated(v) => *v,
            Self::Function(f) => f(index),
        }
    }

    fn is_exact(&self) -> bool {
        !matches!(self, Self::Estimated(_))
    }
}

impl<F: Fn(usize) -> u32> SizeEstimate for F {
    fn estimate(&self, index: usize) -> u32 {
        self(index)
    }

    fn is_exact(&self) -> bool {
        true
    }
}

/// Per-index main-axis sizes.
///
/// Every slot holds a positive size and a flag telling whether that size is known (exact or
/// measured) or still an estimate. Invalid sizes are replaced by `default_size` and recorded as
/// [`Diagnostic::InvalidSize`].
#[derive(Clone, Debug)]
pub struct SizeStore {
    sizes: VecDeque<u32>,
    known: VecDeque<bool>,
    unknown: usize,
    default_size: u32,
    diagnostics: Diagnostics,
}

impl SizeStore {
    pub fn new(default_size: u32) -> Self {
        let mut diagnostics = Diagnostics::default();
        let default_size = if default_size == 0 {
            diagnostics.record(Diagnostic::InvalidDefaultSize {
                size: default_size,
                replacement: 1,
            });
            1
        } else {
            default_size
        };
        Self {
            sizes: VecDeque::new(),
            known: VecDeque::new(),
            unknown: 0,
            default_size,
            diagnostics,
        }
    }

    /// Creates a store with `count` entries drawn from `source`.
    pub fn with_source(count: usize, default_size: u32, source: &impl SizeEstimate) -> Self {
        let mut store = Self::new(default_size);
        store.reset(count, source);
        store
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Returns the size of `index`, or the default size when out of range.
    pub fn get(&self, index: usize) -> u32 {
        self.sizes.get(index).copied().unwrap_or(self.default_size)
    }

    pub fn is_known(&self, index: usize) -> bool {
        self.known.get(index).copied().unwrap_or(false)
    }

    /// Whether any size is still an estimate, which makes totals provisional.
    pub fn is_provisional(&self) -> bool {
        self.unknown > 0
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = u32> + DoubleEndedIterator + '_ {
        self.sizes.iter().copied()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Records a measured size. Returns `new - old`, or 0 when out of range.
    pub fn set(&mut self, index: usize, size: u32) -> i64 {
        if index >= self.sizes.len() {
            return 0;
        }
        let size = self.sanitize(index, size as f64);
        self.replace(index, size, true)
    }

    /// Records a measured size reported in fractional units (e.g. layout pixels).
    ///
    /// Non-finite and non-positive values are replaced by the default size. Positive values are
    /// rounded to the nearest unit, with a minimum of one.
    pub fn set_px(&mut self, index: usize, size: f32) -> i64 {
        if index >= self.sizes.len() {
            return 0;
        }
        let size = self.sanitize(index, size as f64);
        self.replace(index, size, true)
    }

    /// Reverts `index` to the size provided by `source`. Returns the size delta.
    pub fn invalidate(&mut self, index: usize, source: &impl SizeEstimate) -> i64 {
        if index >= self.sizes.len() {
            return 0;
        }
        let size = self.sanitize(index, source.estimate(index) as f64);
        self.replace(index, size, source.is_exact())
    }

    /// Reverts every entry to `source`.
    pub fn invalidate_all(&mut self, source: &impl SizeEstimate) {
        let count = self.sizes.len();
        self.reset(count, source);
    }

    /// Replaces all entries with `count` values from `source`.
    pub fn reset(&mut self, count: usize, source: &impl SizeEstimate) {
        vdebug!(count, exact = source.is_exact(), "SizeStore::reset");
        self.sizes.clear();
        self.known.clear();
        self.unknown = 0;
        self.sizes.reserve(count);
        self.known.reserve(count);
        self.extend_back(0, count, source);
    }

    /// Appends `count` entries; `source` is queried with the new absolute indexes.
    pub fn push_back(&mut self, count: usize, source: &impl SizeEstimate) {
        let first = self.sizes.len();
        self.extend_back(first, count, source);
    }

    /// Prepends `count` entries; `source` is queried with indexes `0..count` of the new layout.
    pub fn push_front(&mut self, count: usize, source: &impl SizeEstimate) {
        let exact = source.is_exact();
        for i in (0..count).rev() {
            let size = self.sanitize(i, source.estimate(i) as f64);
            self.sizes.push_front(size);
            self.known.push_front(exact);
        }
        if !exact {
            self.unknown += count;
        }
    }

    pub fn pop_back(&mut self, count: usize) {
        for _ in 0..count.min(self.sizes.len()) {
            self.sizes.pop_back();
            if self.known.pop_back() == Some(false) {
                self.unknown -= 1;
            }
        }
    }

    pub fn pop_front(&mut self, count: usize) {
        for _ in 0..count.min(self.sizes.len()) {
            self.sizes.pop_front();
            if self.known.pop_front() == Some(false) {
                self.unknown -= 1;
            }
        }
    }

    /// Inserts `count` entries before `at` (clamped to the length).
    pub fn insert(&mut self, at: usize, count: usize, source: &impl SizeEstimate) {
        let at = at.min(self.sizes.len());
        let exact = source.is_exact();
        for k in 0..count {
            let i = at + k;
            let size = self.sanitize(i, source.estimate(i) as f64);
            self.sizes.insert(i, size);
            self.known.insert(i, exact);
        }
        if !exact {
            self.unknown += count;
        }
    }

    /// Removes the entries in `start..end` (clamped to the length).
    pub fn remove(&mut self, start: usize, end: usize) {
        let end = end.min(self.sizes.len());
        if start >= end {
            return;
        }
        let removed_unknown = self.known.range(start..end).filter(|k| !**k).count();
        self.unknown -= removed_unknown;
        self.sizes.drain(start..end);
        self.known.drain(start..end);
    }

    fn extend_back(&mut self, first: usize, count: usize, source: &impl SizeEstimate) {
        let exact = source.is_exact();
        for i in first..first + count {
            let size = self.sanitize(i, source.estimate(i) as f64);
            self.sizes.push_back(size);
            self.known.push_back(exact);
        }
        if !exact {
            self.unknown += count;
        }
    }

    fn replace(&mut self, index: usize, size: u32, known: bool) -> i64 {
        let was_known = self.known[index];
        if was_known != known {
            if known {
                self.unknown -= 1;
            } else {
                self.unknown += 1;
            }
            self.known[index] = known;
        }
        let cur = self.sizes[index];
        self.sizes[index] = size;
        size as i64 - cur as i64
    }

    /// Coerces a raw size to a stored size. Non-finite and non-positive values are replaced by the
    /// default size and recorded.
    pub fn sanitize(&mut self, index: usize, raw: f64) -> u32 {
        if raw.is_finite() && raw > 0.0 {
            // Round half up; `as` saturates for huge values.
            let rounded = (raw + 0.5) as u32;
            return rounded.max(1);
        }
        self.diagnostics.record(Diagnostic::InvalidSize {
            index,
            size: raw,
            replacement: self.default_size,
        });
        self.default_size
    }
}
