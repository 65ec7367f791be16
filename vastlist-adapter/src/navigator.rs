use alloc::collections::VecDeque;

use vastlist::{Align, VirtualList};

use crate::{Easing, Tween};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    /// Jump straight to the target.
    Auto,
    /// Animate towards the target.
    #[default]
    Smooth,
}

/// Options for a single navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToOptions {
    pub behavior: ScrollBehavior,
    /// A zero duration behaves like [`ScrollBehavior::Auto`].
    pub duration_ms: u64,
    pub easing: Easing,
    /// How late past its scheduled end an animation may still be ticked before it is abandoned.
    pub stall_timeout_ms: u64,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::Smooth,
            duration_ms: 300,
            easing: Easing::EaseInOutCubic,
            stall_timeout_ms: 1_000,
        }
    }
}

impl ScrollToOptions {
    pub fn instant() -> Self {
        Self {
            behavior: ScrollBehavior::Auto,
            ..Self::default()
        }
    }

    pub fn smooth(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_stall_timeout_ms(mut self, stall_timeout_ms: u64) -> Self {
        self.stall_timeout_ms = stall_timeout_ms;
        self
    }

    fn is_instant(&self) -> bool {
        self.behavior == ScrollBehavior::Auto || self.duration_ms == 0
    }
}

/// Identifies one navigation request. Later requests get larger handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationHandle(u64);

impl NavigationHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CancelReason {
    /// A newer request replaced this one.
    Superseded,
    /// The scroll position changed underneath the animation.
    UserScroll,
    /// The animation was not ticked in time.
    Timeout,
    Explicit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationEvent {
    Completed {
        handle: NavigationHandle,
        position: u64,
    },
    Cancelled {
        handle: NavigationHandle,
        reason: CancelReason,
    },
}

impl NavigationEvent {
    pub fn handle(&self) -> NavigationHandle {
        match *self {
            Self::Completed { handle, .. } | Self::Cancelled { handle, .. } => handle,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    Idle,
    Animating(NavigationHandle),
    Settled(NavigationHandle),
    Cancelled(NavigationHandle, CancelReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Index { index: usize, align: Align },
    Position(u64),
}

impl Target {
    fn resolve(self, list: &VirtualList) -> u64 {
        match self {
            Self::Index { index, align } => list.scroll_to_index_offset(index, align),
            Self::Position(position) => list.clamp_scroll_position(position),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    handle: NavigationHandle,
    target: Target,
    tween: Tween,
    stall_timeout_ms: u64,
    last_written: u64,
}

/// Drives "scroll to index" requests against a [`VirtualList`].
///
/// Requests either jump immediately or start an eased animation that the host advances with
/// [`Navigator::tick`]. Only one animation runs at a time: a new request, a user scroll or an
/// explicit [`Navigator::cancel`] ends the current one with a `Cancelled` event. Each tick
/// re-resolves the target, so an animation towards an index follows size measurements that land
/// mid-flight.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    next_handle: u64,
    animation: Option<Animation>,
    state: NavigationState,
    events: VecDeque<NavigationEvent>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Handle of the running animation, if any.
    pub fn active(&self) -> Option<NavigationHandle> {
        self.animation.map(|a| a.handle)
    }

    /// Position the running animation last wrote into the list.
    ///
    /// A host scroll event reporting this position is the echo of that write, not a user scroll.
    pub fn last_written(&self) -> Option<u64> {
        self.animation.map(|a| a.last_written)
    }

    /// The index the running animation is heading to.
    pub fn target_index(&self) -> Option<usize> {
        match self.animation?.target {
            Target::Index { index, .. } => Some(index),
            Target::Position(_) => None,
        }
    }

    /// Scrolls `list` so that `index` is aligned per `align`.
    ///
    /// Out-of-range indexes are clamped to the last item.
    pub fn scroll_to_index(
        &mut self,
        list: &mut VirtualList,
        index: usize,
        align: Align,
        options: ScrollToOptions,
        now_ms: u64,
    ) -> NavigationHandle {
        list.note_clamped_index(index);
        let index = index.min(list.count().saturating_sub(1));
        self.start(list, Target::Index { index, align }, options, now_ms)
    }

    /// Scrolls `list` to a scroll-surface position (clamped).
    pub fn scroll_to_position(
        &mut self,
        list: &mut VirtualList,
        position: u64,
        options: ScrollToOptions,
        now_ms: u64,
    ) -> NavigationHandle {
        self.start(list, Target::Position(position), options, now_ms)
    }

    fn start(
        &mut self,
        list: &mut VirtualList,
        target: Target,
        options: ScrollToOptions,
        now_ms: u64,
    ) -> NavigationHandle {
        self.finish_cancelled(CancelReason::Superseded);

        self.next_handle += 1;
        let handle = NavigationHandle(self.next_handle);
        let to = target.resolve(list);
        let from = list.scroll_position();

        if options.is_instant() || from == to {
            adebug!(handle = handle.0, to, "navigation jump");
            list.set_scroll_position(to);
            self.complete(handle, to);
            return handle;
        }

        adebug!(
            handle = handle.0,
            from,
            to,
            duration_ms = options.duration_ms,
            "navigation start"
        );
        self.animation = Some(Animation {
            handle,
            target,
            tween: Tween::new(from, to, now_ms, options.duration_ms, options.easing),
            stall_timeout_ms: options.stall_timeout_ms,
            last_written: from,
        });
        self.state = NavigationState::Animating(handle);
        handle
    }

    /// Advances the running animation and writes the new position into `list`.
    ///
    /// Returns the written position, or `None` when nothing was written (idle, cancelled by a
    /// user scroll, or timed out).
    pub fn tick(&mut self, list: &mut VirtualList, now_ms: u64) -> Option<u64> {
        let mut anim = self.animation?;

        if list.scroll_position() != anim.last_written {
            self.finish_cancelled(CancelReason::UserScroll);
            return None;
        }
        if now_ms > anim.tween.end_ms().saturating_add(anim.stall_timeout_ms) {
            self.finish_cancelled(CancelReason::Timeout);
            return None;
        }

        let to = anim.target.resolve(list);
        if to != anim.tween.to {
            atrace!(handle = anim.handle.0, from = anim.tween.to, to, "navigation retarget");
            anim.tween.set_target(to);
        }

        let position = list.clamp_scroll_position(anim.tween.sample(now_ms));
        list.set_scroll_position(position);
        anim.last_written = list.scroll_position();

        if anim.tween.is_done(now_ms) {
            self.animation = None;
            self.complete(anim.handle, position);
        } else {
            self.animation = Some(anim);
        }
        Some(position)
    }

    /// Cancels the running animation, if any.
    pub fn cancel(&mut self) {
        self.finish_cancelled(CancelReason::Explicit);
    }

    /// Cancels the running animation because the user took over scrolling.
    pub fn on_user_scroll(&mut self) {
        self.finish_cancelled(CancelReason::UserScroll);
    }

    pub fn poll_event(&mut self) -> Option<NavigationEvent> {
        self.events.pop_front()
    }

    pub fn drain_events(&mut self, mut f: impl FnMut(NavigationEvent)) {
        while let Some(event) = self.events.pop_front() {
            f(event);
        }
    }

    fn complete(&mut self, handle: NavigationHandle, position: u64) {
        adebug!(handle = handle.0, position, "navigation completed");
        self.state = NavigationState::Settled(handle);
        self.events
            .push_back(NavigationEvent::Completed { handle, position });
    }

    fn finish_cancelled(&mut self, reason: CancelReason) {
        let Some(anim) = self.animation.take() else {
            return;
        };
        adebug!(handle = anim.handle.0, ?reason, "navigation cancelled");
        self.state = NavigationState::Cancelled(anim.handle, reason);
        self.events.push_back(NavigationEvent::Cancelled {
            handle: anim.handle,
            reason,
        });
    }
}
