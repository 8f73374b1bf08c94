//! Per-frame input resource.
//!
//! The grapple only cares about one discrete trigger. Which physical key or
//! button drives it is up to the host; it feeds the raw "is down" state into
//! [`BoolState::update`] once per frame before the grapple systems run.
use bevy_ecs::prelude::*;

/// Boolean button state with edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the button is currently held.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Feed the raw held state for this frame and recompute the edges.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-frame input relevant to the grapple.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Fire the grappling hook (default binding: right mouse button).
    pub grapple: BoolState,
}
