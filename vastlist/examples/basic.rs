// Example: a million fixed-size rows, compression and the scroll-to helper.
use vastlist::{Align, ListOptions, VirtualList};

fn main() {
    let mut v = VirtualList::new(ListOptions::fixed(1_000_000, 24));
    v.set_viewport_size(480);
    v.set_scroll_position(123_456);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    println!("total_extent={}", v.total_extent());
    println!("compression={:?}", v.compression());
    println!("range={:?}", v.visible_range().map(|r| r.items));
    println!("first_item={:?}", items.first());

    let position = v.scroll_to_index(999_999, Align::End);
    println!(
        "after scroll_to_index: position={position} max={} range={:?}",
        v.max_scroll_position(),
        v.visible_range().map(|r| r.visible)
    );
}
