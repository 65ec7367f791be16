use crate::{CompressionMapper, OffsetIndex, RowModel, SizeStore, VirtualItem, VisibleRange};

/// Inputs of a range computation, all in scroll-surface units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeInput {
    pub scroll_position: u64,
    pub viewport: u32,
    pub overscan: usize,
}

/// The result of a range computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListRange {
    /// Items to materialize (visible plus overscan).
    pub items: VisibleRange,
    /// Items intersecting the viewport.
    pub visible: VisibleRange,
    /// Rows backing `items`. Identical to `items` for linear lists.
    pub rows: VisibleRange,
    /// The (clamped) scroll position the range was computed for.
    pub scroll_position: u64,
    /// Logical offset shown at the top of the viewport.
    pub logical_offset: u64,
    pub viewport: u32,
}

impl ListRange {
    /// Placement of a logical offset on the scroll surface for this range.
    pub fn placement(&self, logical: u64) -> i64 {
        self.scroll_position as i64 + (logical as i64 - self.logical_offset as i64)
    }
}

/// Everything the range calculator reads. Borrowed from the owning list for one computation.
#[derive(Clone, Copy)]
pub struct RangeContext<'a> {
    pub index: &'a OffsetIndex,
    pub sizes: &'a SizeStore,
    pub mapper: &'a CompressionMapper,
    pub rows: &'a dyn RowModel,
    pub item_count: usize,
    pub padding_start: u32,
}

/// Computes the overscanned visible range.
///
/// The scroll position is mapped to an approximate logical offset, snapped to the row that
/// covers it, then the viewport is filled by walking exact row sizes forward. The computation is
/// pure: identical inputs always produce identical output.
///
/// Returns `None` when there are no items.
pub fn compute_range(cx: RangeContext<'_>, input: RangeInput) -> Option<ListRange> {
    let row_count = cx.index.len();
    if row_count == 0 || cx.item_count == 0 {
        return None;
    }

    let view = input.viewport as u64;
    let max_scroll = cx.mapper.virtual_extent().saturating_sub(view);
    let position = input.scroll_position.min(max_scroll);
    let logical = logical_top(cx, position, input.viewport);

    let pad = cx.padding_start as u64;
    let first = cx.index.index_at(logical.saturating_sub(pad))?;
    let view_end = logical.saturating_add(view);
    let gap = cx.index.gap() as u64;

    let mut last = first;
    let mut end = pad + cx.index.offset_of(first) + cx.sizes.get(first) as u64;
    while end < view_end && last + 1 < row_count {
        last += 1;
        end = end + gap + cx.sizes.get(last) as u64;
    }

    let rows = VisibleRange {
        start: first.saturating_sub(input.overscan),
        end: last.saturating_add(input.overscan).min(row_count - 1),
    };
    let visible_rows = VisibleRange {
        start: first,
        end: last,
    };

    Some(ListRange {
        items: item_span(cx, rows),
        visible: item_span(cx, visible_rows),
        rows,
        scroll_position: position,
        logical_offset: logical,
        viewport: input.viewport,
    })
}

/// Logical offset shown at the top of the viewport for a (clamped) scroll position.
///
/// Under compression the linear mapping is only accurate to about `1 / ratio` units. The
/// result is snapped onto the start of the covering row or the next one when that boundary maps
/// back to exactly `position`, so a position produced from a row start shows that row first.
/// Both ends of the scroll range are left alone.
pub fn logical_top(cx: RangeContext<'_>, position: u64, viewport: u32) -> u64 {
    let logical = cx.mapper.scroll_to_logical(position, viewport);
    if !cx.mapper.is_compressed() || position == 0 || cx.index.is_empty() {
        return logical;
    }
    let view = viewport as u64;
    if position >= cx.mapper.virtual_extent().saturating_sub(view) {
        return logical;
    }

    let pad = cx.padding_start as u64;
    let Some(row) = cx.index.index_at(logical.saturating_sub(pad)) else {
        return logical;
    };
    let logical_max = cx.mapper.logical_extent().saturating_sub(view);
    let maps_here =
        |b: u64| b <= logical_max && cx.mapper.logical_to_scroll(b, viewport) == position;

    let start = pad + cx.index.offset_of(row);
    let next = (row + 1 < cx.index.len()).then(|| pad + cx.index.offset_of(row + 1));
    [Some(start), next]
        .into_iter()
        .flatten()
        .filter(|&b| maps_here(b))
        .min_by_key(|&b| b.abs_diff(logical))
        .unwrap_or(logical)
}

/// Calls `f` for every item of `range`, in index order.
pub fn for_each_item(cx: RangeContext<'_>, range: &ListRange, mut f: impl FnMut(VirtualItem)) {
    let gap = cx.index.gap() as u64;
    let lane_size = cx.rows.lane_size();
    let mut start = cx.padding_start as u64 + cx.index.offset_of(range.rows.start);
    for row in range.rows.iter() {
        if row >= cx.index.len() {
            break;
        }
        let row_size = cx.sizes.get(row);
        for index in cx.rows.items_in_row(row, cx.item_count) {
            let cell = cx.rows.cell_of(index);
            f(VirtualItem {
                index,
                row,
                lane: cell.lane,
                start,
                virtual_offset: range.placement(start),
                size: cx.rows.item_size(index, row_size),
                cross_start: cx.rows.lane_start(cell.lane),
                cross_size: lane_size,
            });
        }
        start = start + row_size as u64 + gap;
    }
}

fn item_span(cx: RangeContext<'_>, rows: VisibleRange) -> VisibleRange {
    let first = cx.rows.items_in_row(rows.start, cx.item_count);
    let last = cx.rows.items_in_row(rows.end, cx.item_count);
    VisibleRange {
        start: first.start,
        end: last.end.saturating_sub(1).max(first.start),
    }
}
