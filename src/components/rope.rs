//! Rope visual for the grappling hook.
//!
//! [`GrappleRope`] is a two-endpoint line primitive. The renderer draws it
//! only while `enabled` is set; the grapple systems write both endpoints
//! every frame an attempt is active.

use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GrappleRope {
    /// Gun-tip end of the rope.
    pub start: Vec3,
    /// Anchor end of the rope.
    pub end: Vec3,
    /// Whether the rope should be drawn.
    pub enabled: bool,
}

impl GrappleRope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the rope, pinning its far end to `anchor`.
    pub fn enable(&mut self, anchor: Vec3) {
        self.enabled = true;
        self.end = anchor;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn set_positions(&mut self, start: Vec3, end: Vec3) {
        self.start = start;
        self.end = end;
    }
}
