use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::ops::Range;

use crate::{Cell, Diagnostic, Diagnostics, SizeEstimate};

/// How the rows of a grid get their main-axis size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowHeight {
    Fixed(u32),
    /// Rows keep a `width:height` aspect ratio relative to the column width.
    Aspect { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub columns: usize,
    /// Space between columns and between rows.
    pub gap: u32,
    pub row_height: RowHeight,
}

impl GridLayout {
    pub fn new(columns: usize, row_height: RowHeight) -> Self {
        Self {
            columns,
            gap: 0,
            row_height,
        }
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }
}

/// Masonry layout: items keep their own heights, rows are as tall as their tallest item.
///
/// Items are assigned to columns left-to-right (`index % columns`), not to the shortest column.
/// This is deterministic and stateless, at the cost of some packing density.
#[derive(Clone)]
pub struct MasonryLayout {
    pub columns: usize,
    pub gap: u32,
    /// `item_height(index, column_width)`.
    pub item_height: Arc<dyn Fn(usize, u32) -> u32 + Send + Sync>,
}

impl MasonryLayout {
    pub fn new(
        columns: usize,
        item_height: impl Fn(usize, u32) -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            columns,
            gap: 0,
            item_height: Arc::new(item_height),
        }
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }
}

impl core::fmt::Debug for MasonryLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MasonryLayout")
            .field("columns", &self.columns)
            .field("gap", &self.gap)
            .finish_non_exhaustive()
    }
}

/// Layout configuration of a list.
#[derive(Clone, Debug, Default)]
pub enum Layout {
    #[default]
    Linear,
    Grid(GridLayout),
    Masonry(MasonryLayout),
}

/// The capability every layout exposes to the offset index and range calculator: a 1-D space
/// of rows, each holding up to `lanes()` consecutive items.
pub trait RowModel {
    fn lanes(&self) -> usize;

    /// Size of each lane along the cross axis.
    fn lane_size(&self) -> u32;

    /// Gap between rows along the main axis (and between lanes along the cross axis).
    fn gap(&self) -> u32;

    /// Main-axis size of `row` before any measurement.
    fn row_size(&self, row: usize, item_count: usize) -> u32;

    /// Main-axis size of a single item inside its row.
    fn item_size(&self, index: usize, row_size: u32) -> u32;

    fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.lanes())
    }

    fn cell_of(&self, index: usize) -> Cell {
        let lanes = self.lanes();
        Cell {
            row: index / lanes,
            lane: index % lanes,
        }
    }

    fn item_at(&self, cell: Cell, item_count: usize) -> Option<usize> {
        let lanes = self.lanes();
        if cell.lane >= lanes {
            return None;
        }
        let index = cell.row.checked_mul(lanes)?.checked_add(cell.lane)?;
        (index < item_count).then_some(index)
    }

    fn items_in_row(&self, row: usize, item_count: usize) -> Range<usize> {
        let lanes = self.lanes();
        let start = row.saturating_mul(lanes).min(item_count);
        let end = start.saturating_add(lanes).min(item_count);
        start..end
    }

    fn lane_start(&self, lane: usize) -> u32 {
        let step = self.lane_size().saturating_add(self.gap());
        step.saturating_mul(lane as u32)
    }
}

/// One item per row; row sizes come from the list's `ItemSize`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearRows {
    cross: u32,
    gap: u32,
}

impl RowModel for LinearRows {
    fn lanes(&self) -> usize {
        1
    }

    fn lane_size(&self) -> u32 {
        self.cross
    }

    fn gap(&self) -> u32 {
        self.gap
    }

    fn row_size(&self, _row: usize, _item_count: usize) -> u32 {
        0
    }

    fn item_size(&self, _index: usize, row_size: u32) -> u32 {
        row_size
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GridRows {
    layout: GridLayout,
    column_width: u32,
}

impl RowModel for GridRows {
    fn lanes(&self) -> usize {
        self.layout.columns
    }

    fn lane_size(&self) -> u32 {
        self.column_width
    }

    fn gap(&self) -> u32 {
        self.layout.gap
    }

    fn row_size(&self, _row: usize, _item_count: usize) -> u32 {
        match self.layout.row_height {
            RowHeight::Fixed(h) => h,
            RowHeight::Aspect { width, height } => {
                if width == 0 {
                    return 0;
                }
                (self.column_width as u64 * height as u64 / width as u64).min(u32::MAX as u64)
                    as u32
            }
        }
    }

    fn item_size(&self, _index: usize, row_size: u32) -> u32 {
        row_size
    }
}

#[derive(Clone, Debug)]
pub struct MasonryRows {
    layout: MasonryLayout,
    column_width: u32,
    measured: BTreeMap<usize, u32>,
}

impl MasonryRows {
    fn item_height(&self, index: usize) -> u32 {
        match self.measured.get(&index) {
            Some(&h) => h,
            None => (self.layout.item_height)(index, self.column_width),
        }
    }

    /// Re-keys measurements after `delta` items were inserted (`delta > 0`) or removed
    /// (`delta < 0`) at `at`. Measurements of removed items are dropped.
    fn shift(&mut self, at: usize, delta: isize) {
        let removed = if delta < 0 { delta.unsigned_abs() } else { 0 };
        let tail = self.measured.split_off(&at);
        for (index, h) in tail {
            if index < at.saturating_add(removed) {
                continue;
            }
            if let Some(moved) = index.checked_add_signed(delta) {
                self.measured.insert(moved, h);
            }
        }
    }
}

impl RowModel for MasonryRows {
    fn lanes(&self) -> usize {
        self.layout.columns
    }

    fn lane_size(&self) -> u32 {
        self.column_width
    }

    fn gap(&self) -> u32 {
        self.layout.gap
    }

    fn row_size(&self, row: usize, item_count: usize) -> u32 {
        self.items_in_row(row, item_count)
            .map(|i| self.item_height(i))
            .max()
            .unwrap_or(0)
    }

    fn item_size(&self, index: usize, row_size: u32) -> u32 {
        let h = self.item_height(index);
        if h == 0 { row_size } else { h.min(row_size) }
    }
}

/// The row model of a list: a tagged union over the supported layouts.
#[derive(Clone, Debug)]
pub enum Rows {
    Linear(LinearRows),
    Grid(GridRows),
    Masonry(MasonryRows),
}

impl Default for Rows {
    fn default() -> Self {
        Self::Linear(LinearRows::default())
    }
}

impl Rows {
    /// Packs `layout` into rows for a viewport whose cross axis is `cross` units wide.
    ///
    /// A zero column count is replaced by a single column and recorded in `diagnostics`.
    pub fn pack(layout: &Layout, cross: u32, linear_gap: u32, diagnostics: &mut Diagnostics) -> Self {
        match layout {
            Layout::Linear => Self::Linear(LinearRows {
                cross,
                gap: linear_gap,
            }),
            Layout::Grid(grid) => {
                let mut grid = *grid;
                grid.columns = checked_columns(grid.columns, diagnostics);
                Self::Grid(GridRows {
                    column_width: column_width(cross, grid.columns, grid.gap),
                    layout: grid,
                })
            }
            Layout::Masonry(masonry) => {
                let mut masonry = masonry.clone();
                masonry.columns = checked_columns(masonry.columns, diagnostics);
                Self::Masonry(MasonryRows {
                    column_width: column_width(cross, masonry.columns, masonry.gap),
                    layout: masonry,
                    measured: BTreeMap::new(),
                })
            }
        }
    }

    /// Recomputes lane sizes for a new cross-axis size. Returns `true` when row sizes may have
    /// changed and must be re-derived.
    pub fn set_cross(&mut self, cross: u32) -> bool {
        match self {
            Self::Linear(rows) => {
                rows.cross = cross;
                false
            }
            Self::Grid(rows) => {
                let width = column_width(cross, rows.layout.columns, rows.layout.gap);
                let changed = width != rows.column_width;
                rows.column_width = width;
                changed && matches!(rows.layout.row_height, RowHeight::Aspect { .. })
            }
            Self::Masonry(rows) => {
                let width = column_width(cross, rows.layout.columns, rows.layout.gap);
                let changed = width != rows.column_width;
                rows.column_width = width;
                changed
            }
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    /// Records a measured item height (masonry only). Returns the affected row.
    pub fn measure_item(&mut self, index: usize, height: u32) -> Option<usize> {
        match self {
            Self::Masonry(rows) => {
                rows.measured.insert(index, height);
                Some(rows.cell_of(index).row)
            }
            _ => None,
        }
    }

    /// Drops a masonry measurement. Returns the affected row.
    pub fn forget_item(&mut self, index: usize) -> Option<usize> {
        match self {
            Self::Masonry(rows) => rows
                .measured
                .remove(&index)
                .map(|_| rows.cell_of(index).row),
            _ => None,
        }
    }

    pub fn forget_all(&mut self) {
        if let Self::Masonry(rows) = self {
            rows.measured.clear();
        }
    }

    /// Keeps masonry measurements attached to their items when items are inserted
    /// (`delta > 0`) or removed (`delta < 0`) at `at`.
    pub fn shift_items(&mut self, at: usize, delta: isize) {
        if let Self::Masonry(rows) = self {
            rows.shift(at, delta);
        }
    }

    /// Adapts this row model into a size source for `item_count` items.
    pub fn estimator<'a>(&'a self, item_count: usize, items: &'a dyn SizeEstimate) -> RowEstimate<'a> {
        RowEstimate {
            rows: self,
            item_count,
            items,
        }
    }

    fn model(&self) -> &dyn RowModel {
        match self {
            Self::Linear(r) => r,
            Self::Grid(r) => r,
            Self::Masonry(r) => r,
        }
    }
}

impl RowModel for Rows {
    fn lanes(&self) -> usize {
        self.model().lanes()
    }

    fn lane_size(&self) -> u32 {
        self.model().lane_size()
    }

    fn gap(&self) -> u32 {
        self.model().gap()
    }

    fn row_size(&self, row: usize, item_count: usize) -> u32 {
        self.model().row_size(row, item_count)
    }

    fn item_size(&self, index: usize, row_size: u32) -> u32 {
        self.model().item_size(index, row_size)
    }
}

/// Row sizes as seen by the size store: linear rows defer to the item source, packed rows
/// derive from the layout.
pub struct RowEstimate<'a> {
    rows: &'a Rows,
    item_count: usize,
    items: &'a dyn SizeEstimate,
}

impl SizeEstimate for RowEstimate<'_> {
    fn estimate(&self, row: usize) -> u32 {
        match self.rows {
            Rows::Linear(_) => self.items.estimate(row),
            rows => rows.row_size(row, self.item_count),
        }
    }

    fn is_exact(&self) -> bool {
        match self.rows {
            Rows::Linear(_) => self.items.is_exact(),
            _ => true,
        }
    }
}

fn checked_columns(columns: usize, diagnostics: &mut Diagnostics) -> usize {
    if columns > 0 {
        return columns;
    }
    diagnostics.record(Diagnostic::InvalidColumns {
        columns,
        replacement: 1,
    });
    1
}

fn column_width(cross: u32, columns: usize, gap: u32) -> u32 {
    let columns = columns.max(1) as u64;
    let gaps = gap as u64 * (columns - 1);
    ((cross as u64).saturating_sub(gaps) / columns) as u32
}
