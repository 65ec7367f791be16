use alloc::collections::VecDeque;

/// A recoverable problem that was corrected in place.
///
/// The engine never fails a frame because of bad per-item data or configuration. Instead, the
/// offending value is replaced by a safe default and a `Diagnostic` is recorded so hosts can
/// surface it in their own logging. With `feature = "tracing"`, each diagnostic is also emitted
/// as a `warn!` event.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    #[error("item {index} reported invalid size {size}; using {replacement}")]
    InvalidSize {
        index: usize,
        size: f64,
        replacement: u32,
    },
    #[error("invalid default size {size}; using {replacement}")]
    InvalidDefaultSize { size: u32, replacement: u32 },
    #[error("invalid column count {columns}; using {replacement}")]
    InvalidColumns { columns: usize, replacement: usize },
    #[error("index {requested} is out of range for {count} items; clamped to {clamped}")]
    ClampedIndex {
        requested: usize,
        count: usize,
        clamped: usize,
    },
    #[error("offset index tracks {index_len} rows but the size store holds {size_len}; rebuilt")]
    IndexOutOfSync { index_len: usize, size_len: usize },
}

/// A bounded log of recent diagnostics.
///
/// Only the most recent `capacity` entries are retained; [`Diagnostics::total`] keeps counting
/// past that.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    total: u64,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl Diagnostics {
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        vwarn!(%diagnostic, "diagnostic");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(diagnostic);
        self.total = self.total.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of diagnostics recorded since creation, including evicted ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    pub fn drain(&mut self, mut f: impl FnMut(Diagnostic)) {
        while let Some(d) = self.entries.pop_front() {
            f(d);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
