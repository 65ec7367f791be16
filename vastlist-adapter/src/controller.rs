use alloc::collections::VecDeque;

use vastlist::{Align, ListOptions, ListRange, Rect, VirtualList};

use crate::{
    NavigationEvent, NavigationHandle, Navigator, ScrollAnchor, ScrollToOptions,
    VelocityConfig, VelocityTracker, apply_anchor, capture_anchor_at_offset_in_viewport,
    capture_first_visible_anchor,
};

/// What a [`Controller`] reports back to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerEvent {
    /// The materialized range was recomputed.
    Range(ListRange),
    Navigation(NavigationEvent),
    /// Smoothed scroll velocity changed (units per second).
    Velocity(f64),
    /// Scrolling stopped at `position`.
    Settled { position: u64 },
}

/// A framework-neutral controller that wraps a [`VirtualList`] and provides common adapter
/// workflows (navigation, velocity, anchoring, range updates).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport` / `on_scroll` when UI events occur
/// - `tick(now_ms)` each frame/timer tick (for animation and `is_scrolling` debouncing)
///
/// and drain [`ControllerEvent`]s afterwards. For UI scroll containers (e.g. DOM), use the
/// position returned from `tick()` to set the real scroll position.
#[derive(Clone, Debug)]
pub struct Controller {
    list: VirtualList,
    navigator: Navigator,
    velocity: VelocityTracker,
    last_velocity: f64,
    events: VecDeque<ControllerEvent>,
}

impl Controller {
    pub fn new(options: ListOptions) -> Self {
        Self::from_list(VirtualList::new(options))
    }

    pub fn from_list(list: VirtualList) -> Self {
        Self {
            list,
            navigator: Navigator::new(),
            velocity: VelocityTracker::default(),
            last_velocity: 0.0,
            events: VecDeque::new(),
        }
    }

    pub fn with_velocity_config(mut self, config: VelocityConfig) -> Self {
        self.velocity = VelocityTracker::new(config);
        self
    }

    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    pub fn into_list(self) -> VirtualList {
        self.list
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn velocity(&self) -> f64 {
        self.velocity.velocity()
    }

    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    pub fn cancel_navigation(&mut self) {
        self.navigator.cancel();
        self.collect_events();
    }

    pub fn on_viewport(&mut self, rect: Rect) {
        self.list.set_viewport(rect);
        self.collect_events();
    }

    pub fn on_viewport_size(&mut self, viewport_main: u32) {
        self.list.set_viewport_size(viewport_main);
        self.collect_events();
    }

    /// Call this when the UI reports a scroll position change (e.g. user wheel/drag).
    ///
    /// A position other than the one the running navigation last wrote cancels it. Reporting
    /// that same position (the UI echoing a `tick()` write) is ignored.
    pub fn on_scroll(&mut self, position: u64, now_ms: u64) {
        if self.navigator.last_written() == Some(position) {
            atrace!(position, "scroll echo");
            self.collect_events();
            return;
        }
        self.navigator.on_user_scroll();
        self.list.apply_scroll_event(position, now_ms);
        self.velocity.record(now_ms, self.list.scroll_position());
        self.collect_events();
    }

    /// Advances the controller.
    ///
    /// - If a navigation is running, writes its next position and returns it.
    /// - Otherwise, runs `is_scrolling` debouncing and returns `None`.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let position = self.navigator.tick(&mut self.list, now_ms);
        match position {
            Some(position) => self.velocity.record(now_ms, position),
            None => {
                if self.list.update_scrolling(now_ms) {
                    self.events.push_back(ControllerEvent::Settled {
                        position: self.list.scroll_position(),
                    });
                }
                self.velocity.tick(now_ms);
            }
        }
        self.collect_events();
        position
    }

    /// Starts navigating to an index.
    pub fn scroll_to_index(
        &mut self,
        index: usize,
        align: Align,
        options: ScrollToOptions,
        now_ms: u64,
    ) -> NavigationHandle {
        let handle = self
            .navigator
            .scroll_to_index(&mut self.list, index, align, options, now_ms);
        self.collect_events();
        handle
    }

    /// Starts navigating to a scroll position.
    pub fn scroll_to_position(
        &mut self,
        position: u64,
        options: ScrollToOptions,
        now_ms: u64,
    ) -> NavigationHandle {
        let handle = self
            .navigator
            .scroll_to_position(&mut self.list, position, options, now_ms);
        self.collect_events();
        handle
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor> {
        capture_first_visible_anchor(&self.list)
    }

    /// Captures an anchor for the item at a given offset in the viewport.
    ///
    /// For example, `offset_in_viewport = 0` anchors the item at the top of the viewport.
    pub fn capture_anchor_at_offset_in_viewport(
        &self,
        offset_in_viewport: u64,
    ) -> Option<ScrollAnchor> {
        capture_anchor_at_offset_in_viewport(&self.list, offset_in_viewport)
    }

    /// Applies a previously captured anchor by adjusting the scroll position.
    ///
    /// This cancels any running navigation.
    pub fn apply_anchor(
        &mut self,
        anchor: &ScrollAnchor,
        remap: impl FnOnce(usize) -> Option<usize>,
    ) -> bool {
        self.navigator.cancel();
        let applied = apply_anchor(&mut self.list, anchor, remap);
        self.collect_events();
        applied
    }

    pub fn poll_event(&mut self) -> Option<ControllerEvent> {
        self.events.pop_front()
    }

    pub fn drain_events(&mut self, mut f: impl FnMut(ControllerEvent)) {
        while let Some(event) = self.events.pop_front() {
            f(event);
        }
    }

    fn collect_events(&mut self) {
        let events = &mut self.events;
        self.navigator
            .drain_events(|e| events.push_back(ControllerEvent::Navigation(e)));

        let velocity = self.velocity.velocity();
        if velocity != self.last_velocity {
            self.last_velocity = velocity;
            self.events.push_back(ControllerEvent::Velocity(velocity));
        }

        if let Some(range) = self.list.update_range() {
            self.events.push_back(ControllerEvent::Range(range));
        }
    }
}
