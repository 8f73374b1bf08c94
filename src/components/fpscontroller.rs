//! First-person movement controller.
//!
//! The grapple only ever writes [`FirstPersonController::freeze_movement`];
//! walking itself is handled by
//! [`first_person_movement_system`](crate::systems::movement::first_person_movement_system).

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Player-driven walking state.
///
/// While `freeze_movement` is set the movement system leaves the entity's
/// position alone. Position can still be written externally (e.g. by the
/// grapple arc).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct FirstPersonController {
    /// Walking velocity in world units per second.
    pub velocity: Vec3,
    /// When true, walking is suspended.
    pub freeze_movement: bool,
}

impl FirstPersonController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}
