//! Property-based invariant tests for the offset index, compression mapper and range math.
//!
//! 1. Offsets are cumulative: offset(i + 1) - offset(i) == size(i) + gap.
//! 2. index_at(offset_of(i)) == i.
//! 3. Head/tail edits match a full rebuild.
//! 4. Compressed round trips stay within one ratio step.
//! 5. Ranges are well-formed and cover the viewport.
//! 6. The last item's end is reachable at the end of the scroll surface.
//! 7. cell_of and item_at are inverses.
//! 8. Under compression, Start alignment puts the target item on top.

use proptest::prelude::*;
use vastlist::{
    Align, Cell, CompressionMapper, ItemSize, Layout, ListOptions, MasonryLayout, OffsetIndex,
    Rect, SizeStore, VirtualList,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn sizes(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..=500, 1..=max_len)
}

fn store(values: &[u32]) -> SizeStore {
    SizeStore::with_source(values.len(), 1, &|i: usize| values[i])
}

fn sized_list(values: &[u32], gap: u32, viewport: u32) -> VirtualList {
    let values = values.to_vec();
    let mut v = VirtualList::new(
        ListOptions::new(values.len(), ItemSize::function(move |i| values[i])).with_gap(gap),
    );
    v.set_viewport_size(viewport);
    v
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Offsets are cumulative
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offsets_are_cumulative(values in sizes(200), gap in 0u32..8) {
        let index = OffsetIndex::new(&store(&values), gap);
        prop_assert_eq!(index.offset_of(0), 0);
        for (i, &size) in values.iter().enumerate() {
            prop_assert_eq!(
                index.offset_of(i + 1) - index.offset_of(i),
                size as u64 + gap as u64,
                "entry {}", i
            );
        }
        let sum: u64 = values.iter().map(|&s| s as u64).sum();
        prop_assert_eq!(index.total_extent(), sum + gap as u64 * (values.len() as u64 - 1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. index_at(offset_of(i)) == i
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn index_at_inverts_offset_of(values in sizes(200), gap in 0u32..8) {
        let index = OffsetIndex::new(&store(&values), gap);
        for i in 0..values.len() {
            prop_assert_eq!(index.index_at(index.offset_of(i)), Some(i));
            // Last unit of the entry (including its gap) still belongs to it.
            let last = index.offset_of(i + 1) - 1;
            prop_assert_eq!(index.index_at(last), Some(i));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Head/tail edits match a full rebuild
// ═════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
enum Edit {
    PushFront(Vec<u32>),
    PopFront(usize),
    PushBack(Vec<u32>),
    PopBack(usize),
    Resize(usize, u32),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        proptest::collection::vec(1u32..=100, 0..40).prop_map(Edit::PushFront),
        (0usize..40).prop_map(Edit::PopFront),
        proptest::collection::vec(1u32..=100, 0..40).prop_map(Edit::PushBack),
        (0usize..40).prop_map(Edit::PopBack),
        (0usize..1000, 1u32..=100).prop_map(|(i, s)| Edit::Resize(i, s)),
    ]
}

proptest! {
    #[test]
    fn head_and_tail_edits_match_rebuild(
        initial in sizes(50),
        gap in 0u32..4,
        edits in proptest::collection::vec(edit(), 1..40),
    ) {
        let mut model = initial.clone();
        let mut sizes = store(&initial);
        let mut index = OffsetIndex::new(&sizes, gap);

        for e in edits {
            match e {
                Edit::PushFront(values) => {
                    sizes.push_front(values.len(), &|i: usize| values[i]);
                    index.push_front(values.len(), &sizes);
                    model.splice(0..0, values);
                }
                Edit::PopFront(k) => {
                    let k = k.min(model.len());
                    sizes.pop_front(k);
                    index.pop_front(k, &sizes);
                    model.drain(0..k);
                }
                Edit::PushBack(values) => {
                    let first = model.len();
                    sizes.push_back(values.len(), &|i: usize| values[i - first]);
                    index.push_back(values.len(), &sizes);
                    model.extend(values);
                }
                Edit::PopBack(k) => {
                    let k = k.min(model.len());
                    sizes.pop_back(k);
                    index.pop_back(k);
                    model.truncate(model.len() - k);
                }
                Edit::Resize(i, size) => {
                    if model.is_empty() {
                        continue;
                    }
                    let i = i % model.len();
                    let delta = sizes.set(i, size);
                    index.resize(i, delta);
                    model[i] = size;
                }
            }
            prop_assert!(index.is_in_sync(&sizes));
        }

        let rebuilt = OffsetIndex::new(&store(&model), gap);
        prop_assert_eq!(index.len(), model.len());
        prop_assert_eq!(index.total_extent(), rebuilt.total_extent());
        for i in 0..=model.len() {
            prop_assert_eq!(index.offset_of(i), rebuilt.offset_of(i), "offset {}", i);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Compressed round trips
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compressed_round_trip_is_bounded(
        limit in 1_000u64..1_000_000,
        factor in 1u64..64,
        probe in 0u64..u64::MAX,
    ) {
        let mut mapper = CompressionMapper::new(limit);
        let extent = limit * factor + 1;
        mapper.update(extent);
        prop_assert!(mapper.is_compressed());

        let logical = probe % extent;
        let virtual_offset = mapper.to_virtual(logical);
        prop_assert!(virtual_offset <= mapper.virtual_extent());

        let back = mapper.to_logical(virtual_offset);
        let step = (1.0 / mapper.ratio()).ceil() as u64;
        prop_assert!(back.abs_diff(logical) <= step, "{} -> {} -> {}", logical, virtual_offset, back);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Ranges are well-formed
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ranges_are_well_formed(
        values in sizes(300),
        gap in 0u32..4,
        viewport in 0u32..800,
        overscan in 0usize..5,
        position in 0u64..200_000,
    ) {
        let mut v = sized_list(&values, gap, viewport);
        v.set_overscan(overscan);
        v.set_scroll_position(position);

        let r = v.visible_range().unwrap();
        prop_assert!(r.items.start <= r.visible.start);
        prop_assert!(r.visible.start <= r.visible.end);
        prop_assert!(r.visible.end <= r.items.end);
        prop_assert!(r.items.end < values.len());
        prop_assert!(r.visible.start - r.items.start <= overscan);
        prop_assert!(r.items.end - r.visible.end <= overscan);

        // The first visible item covers the top of the viewport.
        let top = r.logical_offset;
        prop_assert!(v.offset_of(r.visible.start) <= top);
        // Visible items reach the bottom of the viewport, unless the list ran out.
        let bottom = top + viewport as u64;
        let reached = v.item_end(r.visible.end).unwrap_or(0) >= bottom;
        prop_assert!(reached || r.visible.end == values.len() - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. The last item is reachable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn last_item_end_is_reachable(
        count in 1usize..400_000,
        size in 1u32..100,
        viewport in 1u32..2_000,
    ) {
        let mut v = VirtualList::new(ListOptions::fixed(count, size));
        v.set_viewport_size(viewport);
        let target = v.scroll_to_index_offset(count - 1, Align::End);
        prop_assert_eq!(target, v.virtual_extent().saturating_sub(viewport as u64));

        v.set_scroll_position(target);
        let r = v.visible_range().unwrap();
        prop_assert_eq!(r.visible.end, count - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. cell_of and item_at are inverses
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn masonry_cells_round_trip(count in 1usize..500, columns in 1usize..8) {
        let layout = MasonryLayout::new(columns, |i, _| 10 + (i % 7) as u32);
        let v = VirtualList::new(
            ListOptions::fixed(count, 10)
                .with_layout(Layout::Masonry(layout))
                .with_initial_rect(Some(Rect { main: 400, cross: 640 })),
        );
        prop_assert_eq!(v.row_count(), count.div_ceil(columns));
        for index in 0..count {
            let cell = v.cell_of(index);
            prop_assert_eq!(cell, Cell { row: index / columns, lane: index % columns });
            prop_assert_eq!(v.item_at(cell), Some(index));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Compressed Start alignment is exact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compressed_start_alignment_is_exact(
        count in 2_000usize..50_000,
        size in 3u32..60,
        squeeze in 1u64..100,
        pick in 0.0f64..1.0,
    ) {
        // Ratio stays above 0.5, so adjacent item starts map to distinct positions.
        let total = count as u64 * size as u64;
        let limit = total - total * squeeze / 200;
        let mut v = VirtualList::new(ListOptions::fixed(count, size).with_virtual_limit(limit));
        v.set_viewport_size(100);
        prop_assert!(v.is_compressed());

        let index = ((count - 1) as f64 * pick) as usize;
        let position = v.scroll_to_index(index, Align::Start);
        if position < v.max_scroll_position() {
            let r = v.visible_range().unwrap();
            prop_assert_eq!(r.visible.start, index);
            prop_assert_eq!(r.logical_offset, v.offset_of(index));
        }
    }
}
