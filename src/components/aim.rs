//! View and weapon-tip placement relative to the player.
//!
//! - [`Aim`] – where the sight ray starts and which way it points
//! - [`GunTip`] – where the rope leaves the grappling gun
//!
//! Offsets are expressed in world axes and added to the entity's
//! [`WorldPosition`](super::worldposition::WorldPosition); camera rotation is
//! owned by the host and only its resulting forward vector is stored here.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Camera placement used for the anchor-point query.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Aim {
    /// Eye position relative to the entity position.
    pub eye_offset: Vec3,
    /// View forward direction. Need not be normalized.
    pub forward: Vec3,
}

impl Aim {
    pub fn new(eye_offset: Vec3, forward: Vec3) -> Self {
        Self {
            eye_offset,
            forward,
        }
    }

    /// Sight-ray origin for an entity at `position`.
    pub fn origin(&self, position: Vec3) -> Vec3 {
        position + self.eye_offset
    }

    /// Unit view direction, or zero if `forward` is degenerate.
    pub fn direction(&self) -> Vec3 {
        self.forward.normalize_or_zero()
    }
}

/// Rope attachment point on the grappling gun.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct GunTip {
    pub offset: Vec3,
}

impl GunTip {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    pub fn world_position(&self, position: Vec3) -> Vec3 {
        position + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_origin_adds_eye_offset() {
        let aim = Aim::new(Vec3::new(0.0, 0.6, 0.0), Vec3::Z);
        assert_eq!(aim.origin(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(1.0, 1.6, 1.0));
    }

    #[test]
    fn test_aim_direction_is_normalized() {
        let aim = Aim::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0));
        let dir = aim.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_aim_degenerate_direction_is_zero() {
        let aim = Aim::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(aim.direction(), Vec3::ZERO);
    }

    #[test]
    fn test_gun_tip_world_position() {
        let tip = GunTip::new(Vec3::new(0.3, 0.4, 0.0));
        assert_eq!(tip.world_position(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.3, 0.4, 0.0));
    }
}
