use vastlist::{Align, ListOptions};
use vastlist_adapter::{Controller, ControllerEvent, Easing, ScrollToOptions};

fn main() {
    // Example: a controller driving animated navigation without holding any UI objects.
    //
    // An adapter would:
    // - start a navigation (e.g. in response to a "scroll to index" command)
    // - call tick(now_ms) in a frame loop / timer
    // - apply the returned position to the real scroll container (if any)
    // - render from the Range events
    let mut c = Controller::new(ListOptions::estimated(2_000_000, 24));
    c.on_viewport_size(600);

    let options = ScrollToOptions::smooth(240).with_easing(Easing::SmoothStep);
    let first = c.scroll_to_index(1_500_000, Align::Center, options, 0);
    // A second request before the first completes wins.
    let second = c.scroll_to_index(1_999_999, Align::End, options, 32);
    println!("first={first:?} second={second:?}");

    let mut now_ms = 32u64;
    while c.is_animating() {
        now_ms += 16;
        if let Some(position) = c.tick(now_ms) {
            if now_ms % 80 == 0 {
                println!("t={now_ms} position={position} velocity={:.0}", c.velocity());
            }
        }
    }

    c.drain_events(|e| match e {
        ControllerEvent::Navigation(nav) => println!("navigation: {nav:?}"),
        ControllerEvent::Range(r) => println!("range: {:?}", r.items),
        _ => {}
    });
    println!(
        "done: position={} max={} compressed={}",
        c.list().scroll_position(),
        c.list().max_scroll_position(),
        c.list().is_compressed()
    );
}
