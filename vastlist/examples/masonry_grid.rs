// Example: grid and masonry layouts.
use vastlist::{
    GridLayout, Layout, ListOptions, MasonryLayout, Rect, RowHeight, VirtualList,
};

fn main() {
    let grid = GridLayout::new(4, RowHeight::Aspect {
        width: 4,
        height: 3,
    })
    .with_gap(8);
    let mut v = VirtualList::new(
        ListOptions::fixed(10_000, 1)
            .with_layout(Layout::Grid(grid))
            .with_initial_rect(Some(Rect {
                main: 600,
                cross: 824,
            })),
    );
    println!("grid: rows={} total={}", v.row_count(), v.total_extent());

    v.set_scroll_position(5_000);
    v.for_each_virtual_item(|it| {
        if it.lane == 0 {
            println!("row {} starts at {} ({} tall)", it.row, it.start, it.size);
        }
    });

    let masonry = MasonryLayout::new(3, |i, width| width / 2 + (i as u32 * 37) % 120).with_gap(4);
    let mut m = VirtualList::new(
        ListOptions::fixed(1_000, 1)
            .with_layout(Layout::Masonry(masonry))
            .with_initial_rect(Some(Rect {
                main: 400,
                cross: 300,
            })),
    );
    println!("masonry: item 7 -> {:?}", m.cell_of(7));
    m.measure(7, 400);
    println!(
        "masonry: item 7 now {} tall, total={}",
        m.item_size(7).unwrap_or(0),
        m.total_extent()
    );
}
