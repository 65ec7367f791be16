use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn expected_offset(sizes: &[u32], gap: u32, padding_start: u32, index: usize) -> u64 {
    let mut off = padding_start as u64;
    for (i, &size) in sizes.iter().enumerate().take(index) {
        off += size as u64;
        if i + 1 < sizes.len() {
            off += gap as u64;
        }
    }
    off
}

fn expected_total(sizes: &[u32], gap: u32, padding_start: u32, padding_end: u32) -> u64 {
    expected_offset(sizes, gap, padding_start, sizes.len()) + padding_end as u64
}

fn expected_index_at(sizes: &[u32], gap: u32, padding_start: u32, offset: u64) -> Option<usize> {
    if sizes.is_empty() {
        return None;
    }
    let target = offset.saturating_sub(padding_start as u64);
    // Largest `consumed` such that the entries before it end at or before `target`.
    let mut consumed = 0usize;
    let mut prefix = 0u64;
    for &size in sizes {
        let seg = size as u64 + gap as u64;
        if prefix + seg <= target {
            prefix += seg;
            consumed += 1;
        } else {
            break;
        }
    }
    Some(consumed.min(sizes.len() - 1))
}

/// Visible rows (no overscan) for an uncompressed linear list.
fn expected_visible(
    sizes: &[u32],
    gap: u32,
    padding_start: u32,
    padding_end: u32,
    scroll_position: u64,
    viewport: u32,
) -> Option<VisibleRange> {
    if sizes.is_empty() {
        return None;
    }
    let total = expected_total(sizes, gap, padding_start, padding_end);
    let position = scroll_position.min(total.saturating_sub(viewport as u64));
    let view_end = position + viewport as u64;

    let first = expected_index_at(sizes, gap, padding_start, position)?;
    let mut last = first;
    let mut end = expected_offset(sizes, gap, padding_start, first) + sizes[first] as u64;
    while end < view_end && last + 1 < sizes.len() {
        last += 1;
        end += gap as u64 + sizes[last] as u64;
    }
    Some(VisibleRange {
        start: first,
        end: last,
    })
}

fn list(options: ListOptions, main: u32) -> VirtualList {
    let mut v = VirtualList::new(options);
    v.set_viewport_size(main);
    v
}

#[test]
fn fixed_size_range_with_overscan() {
    let mut v = list(ListOptions::fixed(10_000, 50).with_overscan(2), 500);
    v.set_scroll_position(1000);

    let r = v.visible_range().unwrap();
    assert_eq!(r.visible, VisibleRange { start: 20, end: 29 });
    assert_eq!(r.items.start, 18);
    assert_eq!(r.items.end, 31);
    assert_eq!(r.items.end_exclusive(), 32);
    assert_eq!(v.total_extent(), 500_000);
}

#[test]
fn range_clamps_at_both_ends() {
    let mut v = list(ListOptions::fixed(100, 10).with_overscan(3), 50);
    let r = v.visible_range().unwrap();
    assert_eq!(r.items, VisibleRange { start: 0, end: 7 });

    v.set_scroll_position(u64::MAX);
    let r = v.visible_range().unwrap();
    assert_eq!(r.scroll_position, 950);
    assert_eq!(r.visible, VisibleRange { start: 95, end: 99 });
    assert_eq!(r.items, VisibleRange { start: 92, end: 99 });
}

#[test]
fn empty_list_has_no_range() {
    let mut v = list(ListOptions::fixed(0, 10), 100);
    assert_eq!(v.visible_range(), None);
    assert_eq!(v.update_range(), None);
    assert_eq!(v.total_extent(), 0);
    assert_eq!(v.scroll_to_index_offset(0, Align::Start), 0);
    assert_eq!(v.index_at_offset(0), None);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    assert!(items.is_empty());
}

#[test]
fn disabled_list_reports_nothing() {
    let mut v = list(ListOptions::fixed(100, 10).with_enabled(false), 50);
    assert_eq!(v.visible_range(), None);
    assert_eq!(v.update_range(), None);
    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    assert!(items.is_empty());
    // Geometry queries still answer.
    assert_eq!(v.total_extent(), 1_000);

    v.set_enabled(true);
    assert!(v.update_range().is_some());
}

#[test]
fn zero_viewport_still_yields_a_range() {
    let v = VirtualList::new(ListOptions::fixed(100, 10));
    let r = v.visible_range().unwrap();
    assert_eq!(r.visible, VisibleRange { start: 0, end: 0 });
    assert_eq!(r.items, VisibleRange { start: 0, end: 1 });
}

#[test]
fn padding_and_gap_affect_total_and_positions() {
    let v = VirtualList::new(ListOptions::fixed(3, 2).with_padding(10, 5).with_gap(1));
    // pad_start(10) + 2 + 1 + 2 + 1 + 2 + pad_end(5)
    assert_eq!(v.total_extent(), 23);
    assert_eq!(v.offset_of(0), 10);
    assert_eq!(v.offset_of(1), 13);
    assert_eq!(v.offset_of(2), 16);
    assert_eq!(v.offset_of(3), 18);
    assert_eq!(v.offset_of(usize::MAX), 18);
    assert_eq!(v.item_end(2), Some(18));
    assert_eq!(v.item_end(3), None);

    let index = v.offset_index();
    assert_eq!(index.item_end(0), Some(2));
    assert_eq!(index.item_end(2), Some(8));
    assert_eq!(index.item_end(3), None);
}

#[test]
fn index_at_offset_with_gap_maps_into_previous_item() {
    // item0(0..2), gap(2..3), item1(3..5)
    let v = VirtualList::new(ListOptions::fixed(2, 2).with_gap(1));
    assert_eq!(v.index_at_offset(0), Some(0));
    assert_eq!(v.index_at_offset(1), Some(0));
    assert_eq!(v.index_at_offset(2), Some(0));
    assert_eq!(v.index_at_offset(3), Some(1));
    assert_eq!(v.index_at_offset(4), Some(1));
    assert_eq!(v.index_at_offset(1_000), Some(1));
}

#[test]
fn measure_updates_total_and_scroll_to_index_offset() {
    let mut v = list(ListOptions::fixed(5, 1).with_scroll_padding(2, 0), 3);
    assert_eq!(v.total_extent(), 5);

    v.measure(2, 10);
    assert_eq!(v.total_extent(), 14);
    assert!(v.is_measured(2));

    // start(2) = 2, minus scroll padding 2
    assert_eq!(v.scroll_to_index_offset(2, Align::Start), 0);
    // end(4) = 14, view = 3
    assert_eq!(v.scroll_to_index_offset(4, Align::End), 11);
    // center(2) = 2 + 5, minus half the view
    assert_eq!(v.scroll_to_index_offset(2, Align::Center), 6);
}

#[test]
fn scroll_to_last_item_end_reaches_max_position() {
    let v = list(ListOptions::fixed(10_000, 50), 500);
    let target = v.scroll_to_index_offset(9_999, Align::End);
    assert_eq!(target, 499_500);
    assert_eq!(target, v.max_scroll_position());
}

#[test]
fn align_auto_only_scrolls_when_needed() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    v.set_scroll_position(100);

    // Fully visible: stay put.
    assert_eq!(v.scroll_to_index_offset(12, Align::Auto), 100);
    // After the viewport: align the end.
    assert_eq!(v.scroll_to_index_offset(20, Align::Auto), 160);
    // Before the viewport: align the start.
    assert_eq!(v.scroll_to_index_offset(5, Align::Auto), 50);
}

#[test]
fn scroll_to_index_clamps_and_records_diagnostic() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    let position = v.scroll_to_index(500, Align::Start);
    assert_eq!(position, 950);
    assert_eq!(v.scroll_position(), 950);
    assert!(v.diagnostics().any(|d| *d
        == Diagnostic::ClampedIndex {
            requested: 500,
            count: 100,
            clamped: 99,
        }));
    // Jumping does not count as user scrolling.
    assert!(!v.is_scrolling());
}

#[test]
fn append_keeps_existing_offsets() {
    let mut v = list(ListOptions::estimated(1_000_000, 30), 600);
    v.measure(10, 45);
    v.measure(500_000, 12);
    v.measure(999_999, 80);

    let probes = [0usize, 11, 499_999, 500_001, 999_999];
    let before: Vec<u64> = probes.iter().map(|&i| v.offset_of(i)).collect();
    let total = v.total_extent();
    assert_eq!(total, 30_000_000 + 15 - 18 + 50);
    assert!(v.is_compressed());
    let ratio = v.compression().ratio;
    assert_eq!(ratio, DEFAULT_VIRTUAL_LIMIT as f64 / total as f64);

    v.append(100);

    let after: Vec<u64> = probes.iter().map(|&i| v.offset_of(i)).collect();
    assert_eq!(before, after);
    assert_eq!(v.count(), 1_000_100);
    assert_eq!(v.total_extent(), total + 100 * 30);
    assert!(v.is_compressed());
    let appended = v.compression().ratio;
    assert_eq!(appended, DEFAULT_VIRTUAL_LIMIT as f64 / (total + 3_000) as f64);
    assert!(appended < ratio);
    assert_eq!(v.item_size(999_999), Some(80));
    assert_eq!(v.item_size(1_000_050), Some(30));
}

#[test]
fn prepend_uses_head_room() {
    let mut v = VirtualList::new(ListOptions::fixed(1_000, 10));
    v.measure(0, 25);

    v.prepend(5);
    assert_eq!(v.count(), 1_005);
    assert_eq!(v.offset_of(5), 50);
    assert_eq!(v.item_size(5), Some(25));
    assert_eq!(v.total_extent(), 10_065);
    let room = v.offset_index().head_room();
    assert!(room >= 10);

    v.prepend(10);
    assert_eq!(v.offset_index().head_room(), room - 10);
    assert_eq!(v.offset_of(15), 150);
    assert_eq!(v.item_size(15), Some(25));
    assert_eq!(v.total_extent(), 10_165);

    v.truncate_front(15);
    assert_eq!(v.count(), 1_000);
    assert_eq!(v.offset_of(0), 0);
    assert_eq!(v.item_size(0), Some(25));
    assert_eq!(v.total_extent(), 10_015);
}

#[test]
fn truncate_back_drops_tail_sizes() {
    let mut v = VirtualList::new(ListOptions::estimated(10, 10));
    v.measure(8, 50);
    v.truncate_back(3);
    assert_eq!(v.count(), 7);
    assert_eq!(v.total_extent(), 70);

    v.append(3);
    // Re-added items start from the estimate again.
    assert_eq!(v.item_size(8), Some(10));
    assert_eq!(v.total_extent(), 100);

    v.truncate_back(usize::MAX);
    assert_eq!(v.count(), 0);
    assert_eq!(v.total_extent(), 0);
}

#[test]
fn insert_and_remove_keep_measurements_attached_to_items() {
    let mut v = VirtualList::new(ListOptions::fixed(10, 10));
    v.measure(5, 40);

    v.insert(2, 3);
    assert_eq!(v.count(), 13);
    assert_eq!(v.item_size(8), Some(40));
    assert_eq!(v.total_extent(), 160);

    v.remove(2..5);
    assert_eq!(v.count(), 10);
    assert_eq!(v.item_size(5), Some(40));
    assert_eq!(v.total_extent(), 130);
    assert_eq!(v.offset_of(6), 90);
}

#[test]
fn set_count_preserves_measurements_across_shrink_and_grow() {
    let mut v = VirtualList::new(ListOptions::estimated(10, 10));
    v.measure(3, 25);

    v.set_count(5);
    v.set_count(10);
    assert_eq!(v.item_size(3), Some(25));
    assert_eq!(v.item_size(7), Some(10));

    v.update_options(|o| o.count = 20);
    assert_eq!(v.count(), 20);
    assert_eq!(v.item_size(3), Some(25));
    assert_eq!(v.total_extent(), 19 * 10 + 25);
}

#[test]
fn changing_item_size_source_drops_measurements() {
    let mut v = VirtualList::new(ListOptions::estimated(10, 10));
    v.measure(3, 25);
    v.set_item_size(ItemSize::Fixed(4));
    assert_eq!(v.item_size(3), Some(4));
    assert_eq!(v.total_extent(), 40);
}

#[test]
fn function_sizes_are_exact() {
    let v = VirtualList::new(ListOptions::new(
        4,
        ItemSize::function(|i| (i as u32 + 1) * 10),
    ));
    assert_eq!(v.total_extent(), 100);
    assert_eq!(v.offset_of(3), 60);
    assert!(!v.compression().provisional);

    let v = VirtualList::new(ListOptions::estimated(4, 10));
    assert!(v.compression().provisional);
}

#[test]
fn invalid_sizes_fall_back_to_default_and_are_recorded() {
    let mut v = VirtualList::new(ListOptions::estimated(5, 10));
    v.measure_px(0, f32::NAN);
    v.measure_px(1, -5.0);
    v.measure(2, 0);
    v.measure_px(3, 12.5);

    assert_eq!(v.item_size(0), Some(10));
    assert_eq!(v.item_size(1), Some(10));
    assert_eq!(v.item_size(2), Some(10));
    assert_eq!(v.item_size(3), Some(13));
    assert_eq!(v.diagnostic_count(), 3);

    let mut drained = Vec::new();
    v.drain_diagnostics(|d| drained.push(d));
    assert_eq!(drained.len(), 3);
    assert!(matches!(
        drained[0],
        Diagnostic::InvalidSize {
            index: 0,
            replacement: 10,
            ..
        }
    ));
    assert_eq!(v.diagnostics().count(), 0);
}

#[test]
fn size_function_returning_zero_uses_default() {
    let v = VirtualList::new(ListOptions::new(5, ItemSize::function(|_| 0)));
    assert_eq!(v.item_size(0), Some(1));
    assert_eq!(v.total_extent(), 5);
    assert_eq!(v.diagnostic_count(), 5);
}

#[test]
fn resize_item_above_viewport_adjusts_scroll_position() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    v.set_scroll_position(200);

    assert_eq!(v.resize_item(5, 30), 20);
    assert_eq!(v.scroll_position(), 220);

    // Items at or below the top of the viewport do not move it.
    assert_eq!(v.resize_item(30, 30), 0);
    assert_eq!(v.scroll_position(), 220);
}

#[test]
fn invalidate_restores_estimate() {
    let mut v = VirtualList::new(ListOptions::estimated(10, 10));
    v.measure(4, 30);
    v.measure(6, 30);
    assert!(v.is_measured(4));

    v.invalidate(4);
    assert!(!v.is_measured(4));
    assert_eq!(v.total_extent(), 120);

    v.invalidate_all();
    assert!(!v.is_measured(6));
    assert_eq!(v.total_extent(), 100);
}

#[test]
fn update_range_respects_scroll_threshold() {
    let mut v = list(ListOptions::fixed(100, 10).with_scroll_threshold(10), 50);
    assert!(v.update_range().is_some());

    v.set_scroll_position(5);
    assert_eq!(v.update_range(), None);
    assert_eq!(v.range().unwrap().scroll_position, 0);

    v.set_scroll_position(12);
    let r = v.update_range().unwrap();
    assert_eq!(r.scroll_position, 12);

    // Size changes always invalidate the cached range.
    v.measure(50, 20);
    assert!(v.update_range().is_some());
    assert_eq!(v.update_range(), None);
}

#[test]
fn scroll_events_settle_after_delay() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    v.apply_scroll_event(100, 1_000);
    assert!(v.is_scrolling());
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Forward));

    assert!(!v.update_scrolling(1_100));
    v.apply_scroll_event(90, 1_100);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));
    assert!(!v.update_scrolling(1_200));
    assert!(v.update_scrolling(1_250));
    assert!(!v.is_scrolling());
    assert_eq!(v.scroll_direction(), None);
}

#[test]
fn batch_update_coalesces_notifications() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut v = VirtualList::new(ListOptions::fixed(100, 10).with_on_change(Some(
        move |_: &VirtualList, _: bool| {
            counter.fetch_add(1, Ordering::Relaxed);
        },
    )));

    v.batch_update(|v| {
        v.set_viewport_size(100);
        v.set_scroll_position(10);
        v.measure(0, 20);
        v.append(5);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    v.set_scroll_position(20);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn orientation_swaps_viewport_axes() {
    let mut v = VirtualList::new(
        ListOptions::fixed(10, 10).with_orientation(Orientation::Horizontal),
    );
    v.set_dimensions(800, 600);
    assert_eq!(v.rect(), Rect { main: 800, cross: 600 });

    v.set_orientation(Orientation::Vertical);
    assert_eq!(v.rect(), Rect { main: 600, cross: 800 });
    assert_eq!(v.orientation(), Orientation::Vertical);
}

#[test]
fn frame_state_restores_viewport_and_position() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    v.set_scroll_position(300);
    let frame = v.frame_state();

    let mut restored = VirtualList::new(ListOptions::fixed(100, 10));
    restored.restore_frame_state(frame, 0);
    assert_eq!(restored.frame_state(), frame);
    assert_eq!(restored.visible_range(), v.visible_range());
}

#[test]
fn collect_virtual_items_matches_for_each() {
    let mut v = list(ListOptions::fixed(50, 10).with_gap(2), 45);
    v.set_scroll_position(100);

    let mut a = Vec::new();
    v.for_each_virtual_item(|it| a.push(it));
    let mut b = Vec::new();
    v.collect_virtual_items(&mut b);
    assert_eq!(a, b);

    for pair in a.windows(2) {
        assert_eq!(pair[1].index, pair[0].index + 1);
        assert_eq!(pair[1].start, pair[0].end() + 2);
    }
    for it in &a {
        assert_eq!(it.virtual_offset, it.start as i64);
        assert_eq!(it.start, v.offset_of(it.index));
    }
}

#[test]
fn compression_kicks_in_above_limit() {
    let mut v = list(ListOptions::fixed(1_000_000, 50), 500);
    assert!(v.is_compressed());
    assert_eq!(v.total_extent(), 50_000_000);
    assert_eq!(v.virtual_extent(), DEFAULT_VIRTUAL_LIMIT);

    let info = v.compression();
    assert!(info.compressed);
    assert!((info.ratio - 0.32).abs() < 1e-12);
    assert!(!info.provisional);

    // The last item is reachable at the very end of the scroll surface.
    let end = v.scroll_to_index_offset(999_999, Align::End);
    assert_eq!(end, DEFAULT_VIRTUAL_LIMIT - 500);
    v.set_scroll_position(end);
    let r = v.visible_range().unwrap();
    assert_eq!(r.visible.end, 999_999);
    assert_eq!(r.items.end, 999_999);

    v.set_scroll_position(0);
    assert_eq!(v.visible_range().unwrap().visible.start, 0);
}

#[test]
fn compressed_items_are_placed_contiguously() {
    let mut v = list(ListOptions::fixed(1_000_000, 50), 500);
    let position = v.scroll_to_index(500_000, Align::Start);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    assert!(items.iter().any(|it| it.index == 500_000));
    for pair in items.windows(2) {
        assert_eq!(pair[1].virtual_offset - pair[0].virtual_offset, 50);
    }

    let target = items.iter().find(|it| it.index == 500_000).unwrap();
    assert_eq!(target.virtual_offset, position as i64);
    assert_eq!(v.visible_range().unwrap().visible.start, 500_000);
}

#[test]
fn compressed_start_alignment_puts_target_on_top() {
    // ratio 0.32: one scroll unit spans ~3 logical units.
    let mut v = list(ListOptions::fixed(1_000_000, 50), 500);
    assert!(v.is_compressed());

    for index in (1..1_000_000).step_by(9_973).chain([123_457, 777_777, 999_001]) {
        let position = v.scroll_to_index(index, Align::Start);
        assert!(position < v.max_scroll_position());

        let r = v.visible_range().unwrap();
        assert_eq!(r.visible.start, index, "index {index} at position {position}");
        assert_eq!(r.logical_offset, v.offset_of(index));
        assert_eq!(v.logical_scroll_offset(), v.offset_of(index));
        // Already fully visible: Auto keeps the position.
        assert_eq!(v.scroll_to_index_offset(index, Align::Auto), position);
    }

    // Positions between boundaries are not snapped.
    v.set_scroll_position(1_000_001);
    let r = v.visible_range().unwrap();
    assert_eq!(r.logical_offset, v.mapper().scroll_to_logical(1_000_001, 500));
}

#[test]
fn compression_mapper_round_trips_within_ratio() {
    let mut m = CompressionMapper::new(1_000);
    m.update(500);
    assert!(!m.is_compressed());
    assert_eq!(m.to_virtual(321), 321);
    assert_eq!(m.to_logical(321), 321);

    m.update(4_000);
    assert!(m.is_compressed());
    assert_eq!(m.ratio(), 0.25);
    assert_eq!(m.to_virtual(400), 100);
    assert_eq!(m.to_logical(100), 400);
    for x in (0..4_000u64).step_by(7) {
        let back = m.to_logical(m.to_virtual(x));
        assert!(back.abs_diff(x) <= 4, "x={x} back={back}");
    }

    // Scroll range endpoints map onto each other.
    assert_eq!(m.scroll_to_logical(0, 100), 0);
    assert_eq!(m.scroll_to_logical(900, 100), 3_900);
    assert_eq!(m.logical_to_scroll(3_900, 100), 900);
    assert_eq!(m.logical_to_scroll(0, 100), 0);

    m.set_limit(0);
    assert_eq!(m.limit(), DEFAULT_VIRTUAL_LIMIT);
    assert!(!m.is_compressed());
}

#[test]
fn custom_virtual_limit() {
    let v = list(ListOptions::fixed(100, 10).with_virtual_limit(500), 100);
    assert!(v.is_compressed());
    assert_eq!(v.virtual_extent(), 500);
    assert_eq!(v.max_scroll_position(), 400);
    assert_eq!(v.scroll_to_index_offset(99, Align::End), 400);
}

#[test]
fn masonry_cells_and_row_heights() {
    let masonry = MasonryLayout::new(3, |i, _w| if i == 4 { 90 } else { 30 });
    let mut v = VirtualList::new(
        ListOptions::fixed(7, 30)
            .with_layout(Layout::Masonry(masonry))
            .with_initial_rect(Some(Rect {
                main: 100,
                cross: 300,
            })),
    );

    assert_eq!(v.cell_of(7), Cell { row: 2, lane: 1 });
    assert_eq!(v.item_at(Cell { row: 2, lane: 0 }), Some(6));
    assert_eq!(v.item_at(Cell { row: 2, lane: 1 }), None);
    assert_eq!(v.row_count(), 3);

    // Rows are as tall as their tallest item.
    assert_eq!(v.total_extent(), 30 + 90 + 30);
    assert_eq!(v.item_size(3), Some(30));
    assert_eq!(v.item_size(4), Some(90));
    assert_eq!(v.offset_of(5), 30);

    v.measure(1, 100);
    assert_eq!(v.total_extent(), 100 + 90 + 30);
    assert_eq!(v.item_size(0), Some(30));
    assert_eq!(v.item_size(1), Some(100));

    v.invalidate(1);
    assert_eq!(v.total_extent(), 150);
}

#[test]
fn masonry_width_change_drops_measurements() {
    let masonry = MasonryLayout::new(2, |_, w| w / 2);
    let mut v = VirtualList::new(
        ListOptions::fixed(2, 10)
            .with_layout(Layout::Masonry(masonry))
            .with_initial_rect(Some(Rect {
                main: 100,
                cross: 200,
            })),
    );
    assert_eq!(v.total_extent(), 50);

    v.measure(0, 500);
    assert_eq!(v.item_size(0), Some(500));
    assert_eq!(v.total_extent(), 500);

    v.set_viewport(Rect {
        main: 100,
        cross: 400,
    });
    assert_eq!(v.item_size(0), Some(100));
    assert_eq!(v.item_size(1), Some(100));
    assert_eq!(v.total_extent(), 100);
}

#[test]
fn masonry_measurements_follow_items_on_prepend() {
    let masonry = MasonryLayout::new(2, |_, _| 10);
    let mut v = VirtualList::new(ListOptions::fixed(4, 10).with_layout(Layout::Masonry(masonry)));
    v.measure(1, 50);
    assert_eq!(v.total_extent(), 60);

    v.prepend(2);
    assert_eq!(v.count(), 6);
    assert_eq!(v.item_size(3), Some(50));
    assert_eq!(v.total_extent(), 70);
    assert_eq!(v.offset_of(2), 10);
}

#[test]
fn grid_aspect_rows_follow_cross_axis() {
    let grid = GridLayout::new(4, RowHeight::Aspect {
        width: 1,
        height: 1,
    })
    .with_gap(10);
    let mut v = VirtualList::new(
        ListOptions::fixed(10, 1)
            .with_layout(Layout::Grid(grid))
            .with_initial_rect(Some(Rect {
                main: 200,
                cross: 430,
            })),
    );

    // column width (430 - 3 * 10) / 4 = 100
    assert_eq!(v.row_count(), 3);
    assert_eq!(v.total_extent(), 3 * 100 + 2 * 10);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    assert_eq!(items.len(), 10);
    let six = items.iter().find(|it| it.index == 6).unwrap();
    assert_eq!((six.row, six.lane), (1, 2));
    assert_eq!(six.start, 110);
    assert_eq!(six.cross_start, 220);
    assert_eq!(six.cross_size, 100);
    assert_eq!(six.size, 100);

    v.set_viewport(Rect {
        main: 200,
        cross: 230,
    });
    assert_eq!(v.total_extent(), 3 * 50 + 2 * 10);
}

#[test]
fn grid_prepend_aligned_and_unaligned() {
    let grid = GridLayout::new(3, RowHeight::Fixed(10));
    let mut v = VirtualList::new(ListOptions::fixed(9, 1).with_layout(Layout::Grid(grid)));
    assert_eq!(v.total_extent(), 30);

    v.prepend(3);
    assert_eq!(v.row_count(), 4);
    assert_eq!(v.total_extent(), 40);

    v.prepend(1);
    assert_eq!(v.count(), 13);
    assert_eq!(v.row_count(), 5);
    assert_eq!(v.total_extent(), 50);
}

#[test]
fn grid_with_zero_columns_falls_back_to_one() {
    let grid = GridLayout::new(0, RowHeight::Fixed(10));
    let v = VirtualList::new(ListOptions::fixed(5, 1).with_layout(Layout::Grid(grid)));
    assert_eq!(v.row_count(), 5);
    assert_eq!(v.total_extent(), 50);
    assert!(v.diagnostics().any(|d| *d
        == Diagnostic::InvalidColumns {
            columns: 0,
            replacement: 1,
        }));
}

#[test]
fn property_linear_list_matches_naive_model() {
    const ESTIMATE: u32 = 7;

    for seed in [1u64, 7, 42, 1337, 2025] {
        let mut rng = Lcg::new(seed);
        let gap = rng.gen_range_u32(0, 4);
        let padding_start = rng.gen_range_u32(0, 20);
        let padding_end = rng.gen_range_u32(0, 20);
        let count = rng.gen_range_usize(0, 120);

        let mut sizes: Vec<u32> = alloc::vec![ESTIMATE; count];
        let mut v = VirtualList::new(
            ListOptions::estimated(count, ESTIMATE)
                .with_gap(gap)
                .with_padding(padding_start, padding_end)
                .with_overscan(0),
        );

        for _ in 0..200 {
            match rng.gen_range_u32(0, 7) {
                0 if !sizes.is_empty() => {
                    let i = rng.gen_range_usize(0, sizes.len());
                    let size = rng.gen_range_u32(1, 41);
                    sizes[i] = size;
                    v.measure(i, size);
                }
                1 => {
                    let k = rng.gen_range_usize(0, 20);
                    sizes.extend(core::iter::repeat_n(ESTIMATE, k));
                    v.append(k);
                }
                2 => {
                    let k = rng.gen_range_usize(0, 20);
                    sizes.splice(0..0, core::iter::repeat_n(ESTIMATE, k));
                    v.prepend(k);
                }
                3 => {
                    let k = rng.gen_range_usize(0, 10).min(sizes.len());
                    sizes.drain(0..k);
                    v.truncate_front(k);
                }
                4 => {
                    let k = rng.gen_range_usize(0, 10).min(sizes.len());
                    sizes.truncate(sizes.len() - k);
                    v.truncate_back(k);
                }
                5 => {
                    let at = rng.gen_range_usize(0, sizes.len() + 1);
                    let k = rng.gen_range_usize(0, 5);
                    sizes.splice(at..at, core::iter::repeat_n(ESTIMATE, k));
                    v.insert(at, k);
                }
                6 if !sizes.is_empty() => {
                    let start = rng.gen_range_usize(0, sizes.len());
                    let end = rng.gen_range_usize(start, sizes.len() + 1);
                    sizes.drain(start..end);
                    v.remove(start..end);
                }
                _ => {}
            }

            assert_eq!(v.count(), sizes.len());
            assert_eq!(
                v.total_extent(),
                expected_total(&sizes, gap, padding_start, padding_end)
            );
        }

        for i in 0..sizes.len() {
            assert_eq!(v.item_size(i), Some(sizes[i]));
            assert_eq!(
                v.offset_of(i),
                expected_offset(&sizes, gap, padding_start, i)
            );
            assert_eq!(v.index_at_offset(v.offset_of(i)), Some(i));
        }

        let total = expected_total(&sizes, gap, padding_start, padding_end);
        for _ in 0..50 {
            let offset = rng.gen_range_u64(0, total + 20);
            assert_eq!(
                v.index_at_offset(offset),
                expected_index_at(&sizes, gap, padding_start, offset)
            );
        }

        for _ in 0..30 {
            let viewport = rng.gen_range_u32(0, 60);
            let position = rng.gen_range_u64(0, total + 30);
            let expected =
                expected_visible(&sizes, gap, padding_start, padding_end, position, viewport);
            assert_eq!(
                v.compute_range_for(position, viewport).map(|r| r.visible),
                expected
            );
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn snapshots_serialize() {
    let mut v = list(ListOptions::fixed(100, 10), 50);
    v.apply_scroll_event(120, 0);

    let frame = v.frame_state();
    let json = serde_json::to_string(&frame).unwrap();
    let back: FrameState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, frame);

    let range = v.visible_range().unwrap();
    let json = serde_json::to_string(&range).unwrap();
    let back: ListRange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, range);
}
