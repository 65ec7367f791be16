use vastlist::VirtualList;

/// A scroll anchor that preserves the visual position across data changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - inserts or removals above the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// Logical distance from the anchor item's start to the top of the viewport.
    pub offset_in_viewport: u64,
}

/// Captures an anchor for the first visible item.
///
/// Returns `None` if the list is disabled or empty.
pub fn capture_first_visible_anchor(list: &VirtualList) -> Option<ScrollAnchor> {
    let range = list.visible_range()?;
    capture_anchor_for(list, range.visible.start)
}

/// Captures an anchor for the item covering `offset_in_viewport` units below the top of the
/// viewport.
pub fn capture_anchor_at_offset_in_viewport(
    list: &VirtualList,
    offset_in_viewport: u64,
) -> Option<ScrollAnchor> {
    let top = list.logical_scroll_offset();
    let index = list.index_at_offset(top.saturating_add(offset_in_viewport))?;
    capture_anchor_for(list, index)
}

fn capture_anchor_for(list: &VirtualList, index: usize) -> Option<ScrollAnchor> {
    if index >= list.count() {
        return None;
    }
    let top = list.logical_scroll_offset();
    Some(ScrollAnchor {
        index,
        offset_in_viewport: top.saturating_sub(list.offset_of(index)),
    })
}

/// Applies a previously captured anchor by adjusting the scroll position.
///
/// `remap` translates the anchor's index into the *current* dataset, e.g. `|i| Some(i + 10)`
/// after prepending ten items.
///
/// Returns `true` when the anchor was applied.
pub fn apply_anchor(
    list: &mut VirtualList,
    anchor: &ScrollAnchor,
    remap: impl FnOnce(usize) -> Option<usize>,
) -> bool {
    let Some(index) = remap(anchor.index) else {
        return false;
    };
    if index >= list.count() {
        return false;
    }
    let target = list.offset_of(index).saturating_add(anchor.offset_in_viewport);
    let position = list.mapper().logical_to_scroll(target, list.viewport_size());
    list.set_scroll_position_clamped(position);
    true
}
