/// Default ceiling on the extent a scroll surface can address.
///
/// Browsers cap element sizes somewhere between ~17M and ~33M CSS pixels; 16M leaves headroom on
/// every engine. Hosts with other limits can override it via `ListOptions::with_virtual_limit`.
pub const DEFAULT_VIRTUAL_LIMIT: u64 = 16_000_000;

/// A snapshot of the current compression state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressionInfo {
    pub compressed: bool,
    /// `min(1, limit / logical_extent)`.
    pub ratio: f64,
    pub logical_extent: u64,
    pub virtual_extent: u64,
    /// Whether `logical_extent` still depends on estimated sizes.
    pub provisional: bool,
}

/// Maps between logical offsets and scroll-surface ("virtual") offsets.
///
/// When the logical extent fits under the limit the mapping is the identity. Otherwise offsets
/// are scaled linearly by `ratio`. The inverse is approximate; callers snap the result back onto
/// exact item boundaries with the offset index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionMapper {
    limit: u64,
    logical_extent: u64,
    ratio: f64,
}

impl Default for CompressionMapper {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_LIMIT)
    }
}

impl CompressionMapper {
    /// A zero `limit` falls back to [`DEFAULT_VIRTUAL_LIMIT`].
    pub fn new(limit: u64) -> Self {
        Self {
            limit: if limit == 0 {
                DEFAULT_VIRTUAL_LIMIT
            } else {
                limit
            },
            logical_extent: 0,
            ratio: 1.0,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn set_limit(&mut self, limit: u64) {
        let extent = self.logical_extent;
        *self = Self::new(limit);
        self.update(extent);
    }

    /// Recomputes the ratio for a new logical extent.
    pub fn update(&mut self, logical_extent: u64) {
        let was = self.is_compressed();
        self.logical_extent = logical_extent;
        self.ratio = if logical_extent > self.limit {
            self.limit as f64 / logical_extent as f64
        } else {
            1.0
        };
        if was != self.is_compressed() {
            vdebug!(
                logical_extent,
                limit = self.limit,
                ratio = self.ratio,
                "compression toggled"
            );
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn is_compressed(&self) -> bool {
        self.logical_extent > self.limit
    }

    pub fn logical_extent(&self) -> u64 {
        self.logical_extent
    }

    pub fn virtual_extent(&self) -> u64 {
        if self.is_compressed() {
            self.limit
        } else {
            self.logical_extent
        }
    }

    pub fn info(&self, provisional: bool) -> CompressionInfo {
        CompressionInfo {
            compressed: self.is_compressed(),
            ratio: self.ratio,
            logical_extent: self.logical_extent,
            virtual_extent: self.virtual_extent(),
            provisional,
        }
    }

    pub fn to_virtual(&self, logical: u64) -> u64 {
        if !self.is_compressed() {
            return logical;
        }
        round(logical as f64 * self.ratio).min(self.limit)
    }

    /// Approximate inverse of [`Self::to_virtual`].
    pub fn to_logical(&self, virtual_offset: u64) -> u64 {
        if !self.is_compressed() {
            return virtual_offset;
        }
        round(virtual_offset as f64 / self.ratio).min(self.logical_extent)
    }

    /// Maps a scroll position to the logical offset shown at the top of the viewport.
    ///
    /// Under compression, the scrollable range `[0, virtual_extent - viewport]` is mapped
    /// linearly onto `[0, logical_extent - viewport]`, so the first and last items are both
    /// reachable. Without compression this is the identity.
    pub fn scroll_to_logical(&self, position: u64, viewport: u32) -> u64 {
        if !self.is_compressed() {
            return position;
        }
        let view = viewport as u64;
        let virtual_max = self.limit.saturating_sub(view);
        let logical_max = self.logical_extent.saturating_sub(view);
        if virtual_max == 0 {
            return 0;
        }
        if position >= virtual_max {
            return logical_max;
        }
        round(position as f64 / virtual_max as f64 * logical_max as f64).min(logical_max)
    }

    /// Inverse of [`Self::scroll_to_logical`].
    pub fn logical_to_scroll(&self, logical: u64, viewport: u32) -> u64 {
        if !self.is_compressed() {
            return logical;
        }
        let view = viewport as u64;
        let virtual_max = self.limit.saturating_sub(view);
        let logical_max = self.logical_extent.saturating_sub(view);
        if logical_max == 0 {
            return 0;
        }
        if logical >= logical_max {
            return virtual_max;
        }
        round(logical as f64 / logical_max as f64 * virtual_max as f64).min(virtual_max)
    }
}

// `f64::round` lives in std; inputs here are always non-negative.
fn round(v: f64) -> u64 {
    (v + 0.5) as u64
}
