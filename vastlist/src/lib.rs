//! A headless virtualization engine for very large lists and grids.
//!
//! For time-driven helpers (animated scroll-to-index, velocity tracking, anchoring), see the
//! `vastlist-adapter` crate.
//!
//! This crate owns the coordinate math needed to present millions of items in a fixed-size
//! viewport: a size store with lazily measured sizes, a Fenwick-tree offset index with cheap
//! head/tail updates, a compression mapper that fits huge extents into the range a scroll
//! surface can address, an overscanned visible-range calculator, and grid/masonry packing.
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - viewport dimensions
//! - scroll positions (in scroll-surface units)
//! - measured item sizes, when sizes are not known up front
//!
//! and consumes [`ListRange`] / [`VirtualItem`] values to place the materialized items.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod compression;
mod diagnostics;
mod fenwick;
mod index;
mod layout;
mod list;
mod options;
mod range;
mod size;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use compression::{CompressionInfo, CompressionMapper, DEFAULT_VIRTUAL_LIMIT};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use index::OffsetIndex;
pub use layout::{
    GridLayout, GridRows, Layout, LinearRows, MasonryLayout, MasonryRows, RowEstimate, RowHeight,
    RowModel, Rows,
};
pub use list::VirtualList;
pub use options::{ListOptions, OnChangeCallback};
pub use range::{ListRange, RangeContext, RangeInput, compute_range, for_each_item, logical_top};
pub use size::{ItemSize, SizeEstimate, SizeStore};
pub use state::{FrameState, ScrollState, ViewportState};
pub use types::{Align, Cell, Orientation, Rect, ScrollDirection, VirtualItem, VisibleRange};
