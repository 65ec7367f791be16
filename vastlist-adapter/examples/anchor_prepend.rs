use vastlist::ListOptions;
use vastlist_adapter::Controller;

fn main() {
    // Example: preserve visual scroll position across "prepend" (chat/timeline load older messages).
    //
    // The adapter flow is typically:
    // 1) capture an anchor (index + offset_in_viewport) before data changes
    // 2) apply data changes
    // 3) apply the anchor with an index remapping so the same item stays in the same place
    let mut c = Controller::new(ListOptions::estimated(100, 20));
    c.on_viewport_size(200);
    c.list_mut().set_scroll_position_clamped(1_005);

    let Some(anchor) = c.capture_first_visible_anchor() else {
        return;
    };
    println!(
        "before prepend: position={} anchor={anchor:?}",
        c.list().scroll_position()
    );

    // Load 10 older items above; old items shift by +10 indexes.
    c.list_mut().prepend(10);
    let ok = c.apply_anchor(&anchor, |i| Some(i + 10));

    println!(
        "after prepend: ok={ok} position={} first_visible={:?}",
        c.list().scroll_position(),
        c.list().visible_range().map(|r| r.visible.start)
    );
}
