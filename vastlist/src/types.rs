#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Keep the current position when the item is fully visible, otherwise scroll the
    /// nearest edge into view.
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// The scroll axis of a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Projects host `width`/`height` onto the main/cross axes.
    pub fn rect(self, width: u32, height: u32) -> Rect {
        match self {
            Self::Vertical => Rect {
                main: height,
                cross: width,
            },
            Self::Horizontal => Rect {
                main: width,
                cross: height,
            },
        }
    }
}

/// Viewport geometry projected onto the scroll axis.
///
/// - `main` is the virtualized axis (height for vertical lists)
/// - `cross` is the other axis (width for vertical lists)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub main: u32,
    pub cross: u32,
}

/// An inclusive index range. Never empty: lists without items have no range at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn end_exclusive(&self) -> usize {
        self.end + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Row/lane coordinates of an item. Linear lists have a single lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub lane: usize,
}

/// A materialized item, ready to be placed by the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    pub row: usize,
    pub lane: usize,
    /// Start offset in logical space (includes `padding_start`).
    pub start: u64,
    /// Position on the scroll surface.
    ///
    /// Equal to `start` when compression is inactive. When compressed, items are placed relative
    /// to the current scroll position so that neighbours abut at their true sizes; the value can
    /// be negative for an item that starts above the top of the surface.
    pub virtual_offset: i64,
    /// Size in the scroll axis (excludes gaps).
    pub size: u32,
    /// Start offset in the cross axis.
    pub cross_start: u32,
    /// Size in the cross axis.
    pub cross_size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}
