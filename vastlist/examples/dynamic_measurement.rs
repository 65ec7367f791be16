// Example: estimated sizes, measurement and scroll jump prevention.
use vastlist::{Align, ListOptions, VirtualList};

fn main() {
    let mut v = VirtualList::new(ListOptions::estimated(100, 10));
    v.set_viewport_size(30);
    v.set_scroll_position_clamped(200);

    println!(
        "before: position={} total={} range={:?}",
        v.scroll_position(),
        v.total_extent(),
        v.visible_range().map(|r| r.items)
    );

    // If an item before the viewport changes size, `resize_item` shifts the scroll position so
    // the visible content stays put.
    let applied = v.resize_item(0, 30);
    println!(
        "resize_item(0): applied_delta={applied} position={} total={}",
        v.scroll_position(),
        v.total_extent()
    );

    // `measure` only updates sizes.
    v.measure(50, 50);
    v.measure_px(51, 12.4);
    println!(
        "measure: total={} provisional={}",
        v.total_extent(),
        v.compression().provisional
    );

    // Invalid measurements fall back to the default size and are recorded.
    v.measure_px(52, f32::NAN);
    v.drain_diagnostics(|d| println!("diagnostic: {d}"));

    let to = v.scroll_to_index_offset(10, Align::Start);
    v.set_scroll_position_clamped(to);
    println!(
        "scroll_to_index_offset(10): position={} range={:?}",
        v.scroll_position(),
        v.visible_range().map(|r| r.items)
    );
}
