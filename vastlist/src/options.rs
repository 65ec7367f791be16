use alloc::sync::Arc;

use crate::list::VirtualList;
use crate::{DEFAULT_VIRTUAL_LIMIT, ItemSize, Layout, Orientation, Rect};

/// A callback fired when the list's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&VirtualList, bool) + Send + Sync>;

/// Configuration for [`crate::VirtualList`].
///
/// Cheap to clone: closures are stored in `Arc`s, so hosts can tweak a field and call
/// `VirtualList::set_options` without reallocating them.
#[derive(Clone)]
pub struct ListOptions {
    pub count: usize,
    pub item_size: ItemSize,
    /// Replacement for invalid sizes. Defaults to the fixed/estimated size, or 1 for functions.
    pub default_size: u32,

    pub layout: Layout,
    pub orientation: Orientation,

    /// Extra rows materialized on each side of the viewport.
    pub overscan: usize,

    /// Space between items of a linear list. Grids and masonry use their own gap.
    pub gap: u32,

    /// Padding before the first item.
    pub padding_start: u32,
    /// Padding after the last item.
    pub padding_end: u32,

    /// Additional padding applied when computing scroll-to offsets.
    pub scroll_padding_start: u32,
    /// Additional padding applied when computing scroll-to offsets.
    pub scroll_padding_end: u32,

    /// Largest extent the scroll surface can address. Content beyond it is compressed.
    pub virtual_limit: u64,

    /// Minimum scroll movement that triggers a range recomputation.
    pub scroll_threshold: u64,

    pub initial_offset: u64,
    pub initial_rect: Option<Rect>,

    /// How long the scroll position must stay still before the list counts as settled.
    pub is_scrolling_reset_delay_ms: u64,

    /// A disabled list reports no range and no items.
    pub enabled: bool,

    pub on_change: Option<OnChangeCallback>,
}

impl ListOptions {
    /// Creates options for `count` items sized by `item_size`.
    pub fn new(count: usize, item_size: ItemSize) -> Self {
        let default_size = match &item_size {
            ItemSize::Fixed(v) | ItemSize::Estimated(v) => *v,
            ItemSize::Function(_) => 1,
        };
        Self {
            count,
            item_size,
            default_size,
            layout: Layout::Linear,
            orientation: Orientation::Vertical,
            overscan: 1,
            gap: 0,
            padding_start: 0,
            padding_end: 0,
            scroll_padding_start: 0,
            scroll_padding_end: 0,
            virtual_limit: DEFAULT_VIRTUAL_LIMIT,
            scroll_threshold: 1,
            initial_offset: 0,
            initial_rect: None,
            is_scrolling_reset_delay_ms: 150,
            enabled: true,
            on_change: None,
        }
    }

    /// Shorthand for `ListOptions::new(count, ItemSize::Fixed(size))`.
    pub fn fixed(count: usize, size: u32) -> Self {
        Self::new(count, ItemSize::Fixed(size))
    }

    /// Shorthand for `ListOptions::new(count, ItemSize::Estimated(estimate))`.
    pub fn estimated(count: usize, estimate: u32) -> Self {
        Self::new(count, ItemSize::Estimated(estimate))
    }

    pub fn with_default_size(mut self, default_size: u32) -> Self {
        self.default_size = default_size;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_scroll_padding(
        mut self,
        scroll_padding_start: u32,
        scroll_padding_end: u32,
    ) -> Self {
        self.scroll_padding_start = scroll_padding_start;
        self.scroll_padding_end = scroll_padding_end;
        self
    }

    pub fn with_virtual_limit(mut self, virtual_limit: u64) -> Self {
        self.virtual_limit = virtual_limit;
        self
    }

    pub fn with_scroll_threshold(mut self, scroll_threshold: u64) -> Self {
        self.scroll_threshold = scroll_threshold;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&VirtualList, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("count", &self.count)
            .field("item_size", &self.item_size)
            .field("default_size", &self.default_size)
            .field("layout", &self.layout)
            .field("orientation", &self.orientation)
            .field("overscan", &self.overscan)
            .field("gap", &self.gap)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .field("scroll_padding_start", &self.scroll_padding_start)
            .field("scroll_padding_end", &self.scroll_padding_end)
            .field("virtual_limit", &self.virtual_limit)
            .field("scroll_threshold", &self.scroll_threshold)
            .field("initial_offset", &self.initial_offset)
            .field("initial_rect", &self.initial_rect)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
