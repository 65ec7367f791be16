use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell as NotifyCell;
use core::cmp;

use crate::range::{RangeContext, for_each_item, logical_top};
use crate::{
    Align, Cell, CompressionInfo, CompressionMapper, Diagnostic, Diagnostics, FrameState,
    ItemSize, Layout, ListOptions, ListRange, OffsetIndex, Orientation, RangeInput, Rect,
    RowModel, Rows, ScrollDirection, ScrollState, SizeStore, ViewportState, VirtualItem,
    compute_range,
};

/// A headless list virtualizer.
///
/// `VirtualList` owns the size store, offset index and compression mapper of one list and keeps
/// them consistent as items are added, removed and measured. It holds no UI objects: the host
/// feeds it viewport geometry and scroll positions, and reads back ranges and item placements.
///
/// All sizes are tracked per row. Linear lists have one item per row; grid and masonry layouts
/// pack `columns` consecutive items into each row.
///
/// For animated navigation and velocity tracking, see the `vastlist-adapter` crate.
#[derive(Clone, Debug)]
pub struct VirtualList {
    options: ListOptions,
    rect: Rect,
    scroll_position: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    rows: Rows,
    sizes: SizeStore,
    index: OffsetIndex,
    mapper: CompressionMapper,
    diagnostics: Diagnostics,

    range: Option<ListRange>,
    range_position: u64,
    range_dirty: bool,

    notify_depth: NotifyCell<usize>,
    notify_pending: NotifyCell<bool>,
}

impl VirtualList {
    /// Creates a list from options, applying `initial_rect` and `initial_offset`.
    pub fn new(options: ListOptions) -> Self {
        let rect = options.initial_rect.unwrap_or_default();
        vdebug!(
            count = options.count,
            overscan = options.overscan,
            "VirtualList::new"
        );
        let mut diagnostics = Diagnostics::default();
        let rows = Rows::pack(&options.layout, rect.cross, options.gap, &mut diagnostics);
        let row_count = rows.row_count(options.count);
        let sizes = SizeStore::with_source(
            row_count,
            options.default_size,
            &rows.estimator(options.count, &options.item_size),
        );
        let index = OffsetIndex::new(&sizes, rows.gap());
        let mut v = Self {
            rect,
            scroll_position: options.initial_offset,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            rows,
            sizes,
            index,
            mapper: CompressionMapper::new(options.virtual_limit),
            diagnostics,
            range: None,
            range_position: 0,
            range_dirty: true,
            options,
            notify_depth: NotifyCell::new(0),
            notify_pending: NotifyCell::new(false),
        };
        v.sync_extent();
        v
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Replaces the options, rebuilding only what the change requires.
    ///
    /// Changing the item size source, layout, orientation, gap or default size re-derives every
    /// row size (measurements are dropped). A count-only change keeps existing sizes.
    pub fn set_options(&mut self, options: ListOptions) {
        let prev = core::mem::replace(&mut self.options, options);
        vtrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "VirtualList::set_options"
        );

        if self.options.virtual_limit != prev.virtual_limit {
            self.mapper.set_limit(self.options.virtual_limit);
        }

        let relayout = !same_item_size(&prev.item_size, &self.options.item_size)
            || !same_layout(&prev.layout, &self.options.layout)
            || prev.gap != self.options.gap
            || prev.default_size != self.options.default_size;

        if self.options.orientation != prev.orientation {
            self.rect = Rect {
                main: self.rect.cross,
                cross: self.rect.main,
            };
            self.relayout();
        } else if relayout {
            self.relayout();
        } else if self.options.count != prev.count {
            let target = self.options.count;
            self.options.count = prev.count;
            self.resize_count(target);
        } else {
            self.sync_extent();
        }

        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&VirtualList, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    pub fn size_store(&self) -> &SizeStore {
        &self.sizes
    }

    pub fn offset_index(&self) -> &OffsetIndex {
        &self.index
    }

    pub fn mapper(&self) -> &CompressionMapper {
        &self.mapper
    }

    // Viewport

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn viewport_size(&self) -> u32 {
        self.rect.main
    }

    pub fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    pub fn set_viewport(&mut self, rect: Rect) {
        if self.rect == rect {
            return;
        }
        let cross_changed = self.rect.cross != rect.cross;
        self.rect = rect;
        self.range_dirty = true;
        if cross_changed && self.rows.set_cross(rect.cross) {
            // Measured heights belong to the old lane width.
            self.rows.forget_all();
            self.reestimate_rows();
        }
        self.notify();
    }

    /// Applies host `width`/`height`, projected through the current orientation.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        let rect = self.options.orientation.rect(width, height);
        self.set_viewport(rect);
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        let rect = Rect {
            main: size,
            cross: self.rect.cross,
        };
        self.set_viewport(rect);
    }

    /// Switches the scroll axis. The viewport's main and cross sizes swap.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.update_options(|o| o.orientation = orientation);
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.update_options(|o| o.layout = layout);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.range_dirty = true;
        self.notify();
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.range_dirty = true;
        self.notify();
    }

    pub fn set_padding(&mut self, padding_start: u32, padding_end: u32) {
        self.options.padding_start = padding_start;
        self.options.padding_end = padding_end;
        self.sync_extent();
        self.notify();
    }

    pub fn set_scroll_padding(&mut self, scroll_padding_start: u32, scroll_padding_end: u32) {
        self.options.scroll_padding_start = scroll_padding_start;
        self.options.scroll_padding_end = scroll_padding_end;
        self.notify();
    }

    pub fn set_gap(&mut self, gap: u32) {
        if self.options.gap == gap {
            return;
        }
        self.options.gap = gap;
        if self.rows.is_linear() {
            self.rows = Rows::pack(
                &self.options.layout,
                self.rect.cross,
                gap,
                &mut self.diagnostics,
            );
            self.index.set_gap(gap, &self.sizes);
            self.sync_extent();
        }
        self.notify();
    }

    // Scroll state

    /// Current scroll position in scroll-surface units.
    pub fn scroll_position(&self) -> u64 {
        self.scroll_position
    }

    /// Logical offset shown at the top of the viewport.
    pub fn logical_scroll_offset(&self) -> u64 {
        let position = self.scroll_position.min(self.max_scroll_position());
        logical_top(self.range_context(), position, self.rect.main)
    }

    pub fn set_scroll_position(&mut self, position: u64) {
        if self.scroll_position == position {
            return;
        }
        let prev = self.scroll_position;
        self.scroll_position = position;
        self.scroll_direction = match position.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_position_clamped(&mut self, position: u64) {
        let clamped = self.clamp_scroll_position(position);
        self.set_scroll_position(clamped);
    }

    /// Applies a scroll position reported by the host (wheel, drag, ...) and marks the list as
    /// scrolling.
    pub fn apply_scroll_event(&mut self, position: u64, now_ms: u64) {
        vtrace!(position, now_ms, "apply_scroll_event");
        self.batch_update(|v| {
            v.set_scroll_position(position);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_event`, but clamps the position.
    pub fn apply_scroll_event_clamped(&mut self, position: u64, now_ms: u64) {
        vtrace!(position, now_ms, "apply_scroll_event_clamped");
        self.batch_update(|v| {
            v.set_scroll_position_clamped(position);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Applies viewport geometry and scroll position in a single coalesced update.
    pub fn apply_scroll_frame(&mut self, rect: Rect, position: u64, now_ms: u64) {
        self.batch_update(|v| {
            v.set_viewport(rect);
            v.set_scroll_position_clamped(position);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn max_scroll_position(&self) -> u64 {
        self.mapper
            .virtual_extent()
            .saturating_sub(self.rect.main as u64)
    }

    pub fn clamp_scroll_position(&self, position: u64) -> u64 {
        position.min(self.max_scroll_position())
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Clears `is_scrolling` once no scroll event has been seen for
    /// `is_scrolling_reset_delay_ms`. Returns `true` when the list settled on this call.
    pub fn update_scrolling(&mut self, now_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
            return true;
        }
        false
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.rect,
            orientation: self.options.orientation,
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            position: self.scroll_position,
            is_scrolling: self.is_scrolling,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    pub fn restore_viewport_state(&mut self, viewport: ViewportState) {
        self.batch_update(|v| {
            if v.options.orientation != viewport.orientation {
                v.set_orientation(viewport.orientation);
            }
            v.set_viewport(viewport.rect);
        });
    }

    /// Restores scroll state. When `scroll.is_scrolling` is set, the settle timer restarts at
    /// `now_ms`.
    pub fn restore_scroll_state(&mut self, scroll: ScrollState, now_ms: u64) {
        if scroll.is_scrolling {
            self.apply_scroll_event_clamped(scroll.position, now_ms);
            return;
        }
        self.batch_update(|v| {
            v.set_scroll_position_clamped(scroll.position);
            v.set_is_scrolling(false);
        });
    }

    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|v| {
            v.restore_viewport_state(frame.viewport);
            v.restore_scroll_state(frame.scroll, now_ms);
        });
    }

    // Items

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.resize_count(count);
        self.notify();
    }

    /// Appends `count` items at the end. Existing offsets are untouched.
    pub fn append(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let old_count = self.options.count;
        let new_count = old_count.saturating_add(count);
        self.options.count = new_count;

        let old_rows = self.index.len();
        let new_rows = self.rows.row_count(new_count);
        if old_rows > 0 {
            // The previous last row of a packed layout may have gained items.
            self.refresh_row(old_rows - 1);
        }
        let added = new_rows - old_rows;
        let est = self.rows.estimator(new_count, &self.options.item_size);
        self.sizes.push_back(added, &est);
        self.index.push_back(added, &self.sizes);
        vtrace!(count, rows = added, "append");
        self.after_structure_change();
    }

    /// Removes `count` items from the end.
    pub fn truncate_back(&mut self, count: usize) {
        let count = count.min(self.options.count);
        if count == 0 {
            return;
        }
        let new_count = self.options.count - count;
        self.options.count = new_count;
        self.rows.shift_items(new_count, -(count as isize));

        let new_rows = self.rows.row_count(new_count);
        let removed = self.index.len() - new_rows;
        self.sizes.pop_back(removed);
        self.index.pop_back(removed);
        if new_rows > 0 {
            self.refresh_row(new_rows - 1);
        }
        vtrace!(count, rows = removed, "truncate_back");
        self.after_structure_change();
    }

    /// Inserts `count` items before item 0.
    ///
    /// Linear lists (and packed layouts when `count` is a multiple of the column count) update
    /// the offset index from the front without touching existing entries. The scroll position is
    /// left alone; use an anchor to keep the viewport on the same content.
    pub fn prepend(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let lanes = self.rows.lanes();
        self.rows.shift_items(0, count as isize);
        self.options.count = self.options.count.saturating_add(count);
        if count % lanes == 0 {
            let added = count / lanes;
            let est = self.rows.estimator(self.options.count, &self.options.item_size);
            self.sizes.push_front(added, &est);
            self.index.push_front(added, &self.sizes);
        } else {
            self.reestimate_rows();
        }
        vtrace!(count, "prepend");
        self.after_structure_change();
    }

    /// Removes `count` items from the front.
    pub fn truncate_front(&mut self, count: usize) {
        let count = count.min(self.options.count);
        if count == 0 {
            return;
        }
        let lanes = self.rows.lanes();
        self.rows.shift_items(0, -(count as isize));
        self.options.count -= count;
        if count % lanes == 0 {
            let removed = count / lanes;
            self.sizes.pop_front(removed);
            self.index.pop_front(removed, &self.sizes);
        } else {
            self.reestimate_rows();
        }
        vtrace!(count, "truncate_front");
        self.after_structure_change();
    }

    /// Inserts `count` items before `at`. Rebuilds the offset index.
    pub fn insert(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.options.count);
        if at == self.options.count {
            self.append(count);
            return;
        }
        if at == 0 {
            self.prepend(count);
            return;
        }
        self.rows.shift_items(at, count as isize);
        self.options.count = self.options.count.saturating_add(count);
        if self.rows.is_linear() {
            let est = self.rows.estimator(self.options.count, &self.options.item_size);
            self.sizes.insert(at, count, &est);
            self.index.rebuild(&self.sizes);
        } else {
            self.reestimate_rows();
        }
        self.after_structure_change();
    }

    /// Removes the items in `range`. Rebuilds the offset index.
    pub fn remove(&mut self, range: core::ops::Range<usize>) {
        let end = range.end.min(self.options.count);
        let start = range.start.min(end);
        let count = end - start;
        if count == 0 {
            return;
        }
        if end == self.options.count {
            self.truncate_back(count);
            return;
        }
        if start == 0 {
            self.truncate_front(count);
            return;
        }
        self.rows.shift_items(start, -(count as isize));
        self.options.count -= count;
        if self.rows.is_linear() {
            self.sizes.remove(start, end);
            self.index.rebuild(&self.sizes);
        } else {
            self.reestimate_rows();
        }
        self.after_structure_change();
    }

    pub fn set_item_size(&mut self, item_size: ItemSize) {
        self.update_options(|o| o.item_size = item_size);
    }

    // Sizes

    /// Records a measured main-axis size for an item.
    ///
    /// For grids the size applies to the item's row; for masonry it replaces the item's own
    /// height and its row is re-derived.
    pub fn measure(&mut self, index: usize, size: u32) {
        if index >= self.options.count {
            return;
        }
        vtrace!(index, size, "measure");
        self.apply_measure(index, size);
        self.sync_extent();
        self.notify();
    }

    /// Same as `measure`, for sizes reported in fractional units. Non-finite or non-positive
    /// values are replaced by the default size.
    pub fn measure_px(&mut self, index: usize, size: f32) {
        if index >= self.options.count {
            return;
        }
        let size = self.sizes.sanitize(index, size as f64);
        self.measure(index, size);
    }

    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) {
        for (index, size) in measurements {
            if index < self.options.count {
                self.apply_measure(index, size);
            }
        }
        self.sync_extent();
        self.notify();
    }

    /// Measures an item and, when it starts above the top of the viewport, shifts the scroll
    /// position by the size change so visible content does not jump.
    ///
    /// Returns the applied adjustment in logical units.
    pub fn resize_item(&mut self, index: usize, size: u32) -> i64 {
        if index >= self.options.count {
            return 0;
        }
        let row = self.rows.cell_of(index).row;
        let row_start = self.options.padding_start as u64 + self.index.offset_of(row);
        let logical = self.logical_scroll_offset();

        let delta = self.apply_measure(index, size);
        self.sync_extent();
        if delta == 0 || row_start >= logical {
            self.notify();
            return 0;
        }

        let target = logical.saturating_add_signed(delta);
        self.scroll_position = self.mapper.logical_to_scroll(target, self.rect.main);
        self.notify();
        delta
    }

    /// Reverts an item to its unmeasured size.
    pub fn invalidate(&mut self, index: usize) {
        if index >= self.options.count {
            return;
        }
        let row = if matches!(self.rows, Rows::Masonry(_)) {
            self.rows.forget_item(index)
        } else {
            Some(self.rows.cell_of(index).row)
        };
        if let Some(row) = row {
            if self.rows.is_linear() || matches!(self.rows, Rows::Grid(_)) {
                let est = self.rows.estimator(self.options.count, &self.options.item_size);
                let delta = self.sizes.invalidate(row, &est);
                self.index.resize(row, delta);
            } else {
                self.refresh_row(row);
            }
        }
        self.sync_extent();
        self.notify();
    }

    /// Reverts every item to its unmeasured size.
    pub fn invalidate_all(&mut self) {
        self.rows.forget_all();
        self.reestimate_rows();
        self.after_structure_change();
    }

    pub fn is_measured(&self, index: usize) -> bool {
        index < self.options.count && self.sizes.is_known(self.rows.cell_of(index).row)
    }

    /// Main-axis size of an item.
    pub fn item_size(&self, index: usize) -> Option<u32> {
        if index >= self.options.count {
            return None;
        }
        let row = self.rows.cell_of(index).row;
        Some(self.rows.item_size(index, self.sizes.get(row)))
    }

    /// Logical start offset of an item (includes `padding_start`).
    ///
    /// Indexes at or past the end return the end of the content, before `padding_end`.
    pub fn offset_of(&self, index: usize) -> u64 {
        let pad = self.options.padding_start as u64;
        if index >= self.options.count {
            return pad + self.index.total_extent();
        }
        pad + self.index.offset_of(self.rows.cell_of(index).row)
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let size = self.item_size(index)?;
        Some(self.offset_of(index).saturating_add(size as u64))
    }

    /// Row covering a logical offset.
    pub fn row_at_offset(&self, offset: u64) -> Option<usize> {
        let pad = self.options.padding_start as u64;
        self.index.index_at(offset.saturating_sub(pad))
    }

    /// First item of the row covering a logical offset.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let row = self.row_at_offset(offset)?;
        Some(self.rows.items_in_row(row, self.options.count).start)
    }

    pub fn cell_of(&self, index: usize) -> Cell {
        self.rows.cell_of(index)
    }

    pub fn item_at(&self, cell: Cell) -> Option<usize> {
        self.rows.item_at(cell, self.options.count)
    }

    /// Logical content length, including padding.
    pub fn total_extent(&self) -> u64 {
        self.options.padding_start as u64
            + self.index.total_extent()
            + self.options.padding_end as u64
    }

    /// Content length on the scroll surface.
    pub fn virtual_extent(&self) -> u64 {
        self.mapper.virtual_extent()
    }

    pub fn is_compressed(&self) -> bool {
        self.mapper.is_compressed()
    }

    pub fn compression(&self) -> CompressionInfo {
        self.mapper.info(self.sizes.is_provisional())
    }

    // Ranges

    fn range_context(&self) -> RangeContext<'_> {
        RangeContext {
            index: &self.index,
            sizes: &self.sizes,
            mapper: &self.mapper,
            rows: &self.rows,
            item_count: self.options.count,
            padding_start: self.options.padding_start,
        }
    }

    /// Computes the range for the current scroll position and viewport.
    pub fn visible_range(&self) -> Option<ListRange> {
        self.compute_range_for(self.scroll_position, self.rect.main)
    }

    pub fn compute_range_for(&self, scroll_position: u64, viewport_size: u32) -> Option<ListRange> {
        if !self.options.enabled {
            return None;
        }
        compute_range(
            self.range_context(),
            RangeInput {
                scroll_position,
                viewport: viewport_size,
                overscan: self.options.overscan,
            },
        )
    }

    /// The range computed by the last [`Self::update_range`] call.
    pub fn range(&self) -> Option<&ListRange> {
        self.range.as_ref()
    }

    /// Recomputes the cached range when something that affects it changed: the scroll position
    /// moved by at least `scroll_threshold`, or the viewport, items, sizes or layout changed.
    ///
    /// Returns the new range when a recomputation happened.
    pub fn update_range(&mut self) -> Option<ListRange> {
        let threshold = self.options.scroll_threshold.max(1);
        let moved = self.scroll_position.abs_diff(self.range_position) >= threshold;
        if !self.range_dirty && !moved && self.range.is_some() {
            return None;
        }
        self.range_dirty = false;
        self.range_position = self.scroll_position;
        self.range = self.visible_range();
        vtrace!(
            position = self.scroll_position,
            start = self.range.map(|r| r.items.start),
            end = self.range.map(|r| r.items.end),
            "update_range"
        );
        self.range
    }

    /// Calls `f` for each materialized item of `range`.
    pub fn for_each_item_in(&self, range: &ListRange, f: impl FnMut(VirtualItem)) {
        for_each_item(self.range_context(), range, f);
    }

    /// Calls `f` for each materialized item at the current scroll position.
    pub fn for_each_virtual_item(&self, f: impl FnMut(VirtualItem)) {
        if let Some(range) = self.visible_range() {
            self.for_each_item_in(&range, f);
        }
    }

    /// Collects materialized items into `out` (clears `out` first).
    pub fn collect_virtual_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_virtual_item(|it| out.push(it));
    }

    // Navigation

    /// Scroll position that brings `index` into view with `align`, clamped to the scrollable
    /// range. Out-of-range indexes are clamped to the last item.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.options.count;
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let row = self.rows.cell_of(index).row;
        let start = self.options.padding_start as u64 + self.index.offset_of(row);
        let end = start.saturating_add(self.sizes.get(row) as u64);

        let sp_start = self.options.scroll_padding_start as u64;
        let sp_end = self.options.scroll_padding_end as u64;
        let view = self.rect.main as u64;

        let target = match align {
            Align::Start => start.saturating_sub(sp_start),
            Align::End => end.saturating_add(sp_end).saturating_sub(view),
            Align::Center => {
                let center = start + (end - start) / 2;
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.logical_scroll_offset();
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    return self.clamp_scroll_position(self.scroll_position);
                } else if start < cur {
                    start.saturating_sub(sp_start)
                } else {
                    end.saturating_add(sp_end).saturating_sub(view)
                }
            }
        };

        let position = self.mapper.logical_to_scroll(target, self.rect.main);
        self.clamp_scroll_position(position)
    }

    /// Jumps to an index (no animation) and returns the applied position.
    ///
    /// This does not mark the list as scrolling.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        self.note_clamped_index(index);
        let position = self.scroll_to_index_offset(index, align);
        self.set_scroll_position(position);
        position
    }

    /// Records a [`Diagnostic::ClampedIndex`] when `index` is out of range.
    pub fn note_clamped_index(&mut self, index: usize) {
        let count = self.options.count;
        if count > 0 && index >= count {
            self.diagnostics.record(Diagnostic::ClampedIndex {
                requested: index,
                count,
                clamped: count - 1,
            });
        }
    }

    // Diagnostics

    /// Number of diagnostics recorded so far.
    pub fn diagnostic_count(&self) -> u64 {
        self.diagnostics.total() + self.sizes.diagnostics().total()
    }

    /// Iterates over retained diagnostics: list-level entries first, then size entries.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().chain(self.sizes.diagnostics().iter())
    }

    pub fn drain_diagnostics(&mut self, mut f: impl FnMut(Diagnostic)) {
        self.diagnostics.drain(&mut f);
        self.sizes.diagnostics_mut().drain(&mut f);
    }

    // Internals

    fn resize_count(&mut self, count: usize) {
        let cur = self.options.count;
        if count > cur {
            self.append(count - cur);
        } else if count < cur {
            self.truncate_back(cur - count);
        }
    }

    /// Applies a measurement to the size store and offset index. Returns the row size delta.
    fn apply_measure(&mut self, index: usize, size: u32) -> i64 {
        let row = self.rows.cell_of(index).row;
        let size = self.sizes.sanitize(index, size as f64);
        let row_size = match self.rows.measure_item(index, size) {
            Some(_) => self.rows.row_size(row, self.options.count),
            None => size,
        };
        let delta = self.sizes.set(row, row_size);
        self.index.resize(row, delta);
        delta
    }

    /// Re-derives a packed row's size from its items. No-op for linear lists and grids.
    fn refresh_row(&mut self, row: usize) {
        if !matches!(self.rows, Rows::Masonry(_)) || row >= self.sizes.len() {
            return;
        }
        let size = self.rows.row_size(row, self.options.count);
        let delta = self.sizes.set(row, size);
        self.index.resize(row, delta);
    }

    /// Re-derives every row size from the current source and rebuilds the offset index.
    ///
    /// Linear lists keep nothing; call this only when sizes are meant to be reset.
    fn reestimate_rows(&mut self) {
        let row_count = self.rows.row_count(self.options.count);
        let est = self.rows.estimator(self.options.count, &self.options.item_size);
        self.sizes.reset(row_count, &est);
        self.index.rebuild(&self.sizes);
        self.sync_extent();
    }

    fn relayout(&mut self) {
        self.rows = Rows::pack(
            &self.options.layout,
            self.rect.cross,
            self.options.gap,
            &mut self.diagnostics,
        );
        if self.sizes.default_size() != self.options.default_size {
            let diagnostics = &mut self.diagnostics;
            self.sizes.diagnostics_mut().drain(|d| diagnostics.record(d));
            self.sizes = SizeStore::new(self.options.default_size);
        }
        let row_count = self.rows.row_count(self.options.count);
        let est = self.rows.estimator(self.options.count, &self.options.item_size);
        self.sizes.reset(row_count, &est);
        self.index = OffsetIndex::new(&self.sizes, self.rows.gap());
        self.sync_extent();
    }

    fn after_structure_change(&mut self) {
        self.check_index();
        self.sync_extent();
        self.notify();
    }

    fn check_index(&mut self) {
        let in_sync = self.index.is_in_sync(&self.sizes)
            && self.sizes.len() == self.rows.row_count(self.options.count);
        debug_assert!(
            in_sync,
            "offset index out of sync (index={}, sizes={}, rows={})",
            self.index.len(),
            self.sizes.len(),
            self.rows.row_count(self.options.count)
        );
        if !in_sync {
            self.diagnostics.record(Diagnostic::IndexOutOfSync {
                index_len: self.index.len(),
                size_len: self.sizes.len(),
            });
            self.reestimate_rows();
        }
    }

    fn sync_extent(&mut self) {
        let total = self.total_extent();
        self.mapper.update(total);
        self.range_dirty = true;
    }
}

fn same_item_size(a: &ItemSize, b: &ItemSize) -> bool {
    match (a, b) {
        (ItemSize::Fixed(x), ItemSize::Fixed(y)) => x == y,
        (ItemSize::Estimated(x), ItemSize::Estimated(y)) => x == y,
        (ItemSize::Function(f), ItemSize::Function(g)) => Arc::ptr_eq(f, g),
        _ => false,
    }
}

fn same_layout(a: &Layout, b: &Layout) -> bool {
    match (a, b) {
        (Layout::Linear, Layout::Linear) => true,
        (Layout::Grid(x), Layout::Grid(y)) => x == y,
        (Layout::Masonry(x), Layout::Masonry(y)) => {
            x.columns == y.columns && x.gap == y.gap && Arc::ptr_eq(&x.item_height, &y.item_height)
        }
        _ => false,
    }
}
