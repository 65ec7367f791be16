//! Adapter utilities for the `vastlist` crate.
//!
//! The `vastlist` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides small, framework-neutral helpers driven by host timestamps:
//!
//! - Animated scroll-to-index navigation with cancellation and settle events
//! - Scroll velocity tracking
//! - Scroll anchoring (e.g. prepend in chat/timelines without visual jumps)
//! - A [`Controller`] that wires all of the above to a [`vastlist::VirtualList`]
//!
//! Nothing here reads a clock: every time-dependent call takes `now_ms`.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod navigator;
mod tween;
mod velocity;


pub use anchor::{
    ScrollAnchor, apply_anchor, capture_anchor_at_offset_in_viewport,
    capture_first_visible_anchor,
};
pub use controller::{Controller, ControllerEvent};
pub use navigator::{
    CancelReason, NavigationEvent, NavigationHandle, NavigationState, Navigator, ScrollBehavior,
    ScrollToOptions,
};
pub use tween::{Easing, Tween};
pub use velocity::{VelocityConfig, VelocityTracker};
