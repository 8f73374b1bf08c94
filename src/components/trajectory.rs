//! Grapple arc trajectory.
//!
//! The player is carried from the arc start to the anchor along a straight
//! line with a single sine bump added on the vertical axis:
//!
//! ```text
//! position(t) = lerp(start, target, t) + up * sin(t * PI) * peak_height
//! ```
//!
//! `t` runs from 0.0 to 1.0. The bump is zero at both ends and reaches
//! `peak_height` at `t = 0.5`.
//!
//! [`ArcTrajectory`] is the resumable state advanced once per tick by
//! [`grapple_arc_system`](crate::systems::grapple::grapple_arc_system).

use std::f32::consts::PI;

use glam::Vec3;

/// Peak height of the arc for an anchor at `anchor_y` and a player whose
/// body center is at `player_y`.
///
/// The anchor height is measured from the player's feet (`player_y -
/// foot_offset`). Anchors at or above the feet get `relative + overshoot`;
/// anchors below them get a flat `overshoot`.
pub fn trajectory_height(anchor_y: f32, player_y: f32, foot_offset: f32, overshoot: f32) -> f32 {
    let lowest_point = player_y - foot_offset;
    let relative = anchor_y - lowest_point;
    if relative < 0.0 {
        overshoot
    } else {
        relative + overshoot
    }
}

/// Point on the arc at normalized time `t`.
///
/// `t <= 0` returns `start` and `t >= 1` returns `target` exactly.
pub fn arc_position(start: Vec3, target: Vec3, peak_height: f32, t: f32) -> Vec3 {
    if t <= 0.0 {
        return start;
    }
    if t >= 1.0 {
        return target;
    }
    let height = (t * PI).sin() * peak_height;
    start.lerp(target, t) + Vec3::Y * height
}

/// Resumable arc state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcTrajectory {
    /// Player position when the arc started.
    pub start: Vec3,
    /// Grapple anchor.
    pub target: Vec3,
    /// Maximum height above the straight start-target line.
    pub peak_height: f32,
    /// Seconds taken to go from `t = 0` to `t = 1`.
    pub duration: f32,
    /// Normalized progress.
    pub t: f32,
    /// Set once `t` reaches 1.0 and the player has been snapped to `target`.
    pub finished: bool,
}

impl ArcTrajectory {
    pub fn new(start: Vec3, target: Vec3, peak_height: f32, duration: f32) -> Self {
        Self {
            start,
            target,
            peak_height,
            duration,
            t: 0.0,
            finished: false,
        }
    }

    /// Current point on the arc.
    pub fn position(&self) -> Vec3 {
        arc_position(self.start, self.target, self.peak_height, self.t)
    }

    /// Advance by `dt` seconds and return the new position.
    ///
    /// A non-positive `duration` completes the arc on the first step.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if self.finished {
            return self.target;
        }
        if self.duration > 0.0 {
            self.t += dt.max(0.0) / self.duration;
        } else {
            self.t = 1.0;
        }
        if self.t >= 1.0 {
            self.t = 1.0;
            self.finished = true;
        }
        self.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    // ==================== HEIGHT ====================

    #[test]
    fn test_height_anchor_above_feet_adds_overshoot() {
        // relative = 5 - (0 - 1) = 6
        assert!(approx_eq(trajectory_height(5.0, 0.0, 1.0, 2.0), 8.0));
    }

    #[test]
    fn test_height_anchor_below_feet_uses_overshoot_only() {
        // relative = -10 - (0 - 1) = -9
        assert!(approx_eq(trajectory_height(-10.0, 0.0, 1.0, 2.0), 2.0));
    }

    #[test]
    fn test_height_anchor_at_feet_uses_additive_branch() {
        // relative == 0 takes relative + overshoot, which is also overshoot
        let h = trajectory_height(-1.0, 0.0, 1.0, 2.0);
        assert_eq!(h, 0.0 + 2.0);
    }

    #[test]
    fn test_height_just_below_feet_is_flat() {
        let h = trajectory_height(-1.25, 0.0, 1.0, 2.0);
        assert_eq!(h, 2.0);
    }

    // ==================== POSITION ====================

    #[test]
    fn test_arc_endpoints_are_exact() {
        let start = Vec3::new(0.1, 0.2, 0.3);
        let target = Vec3::new(10.7, -3.3, 9.9);
        assert_eq!(arc_position(start, target, 3.0, 0.0), start);
        assert_eq!(arc_position(start, target, 3.0, 1.0), target);
    }

    #[test]
    fn test_arc_midpoint_reaches_peak() {
        let p = arc_position(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 3.0, 0.5);
        assert!(vec_approx_eq(p, Vec3::new(5.0, 3.0, 5.0)));
    }

    #[test]
    fn test_arc_is_symmetric() {
        let start = Vec3::ZERO;
        let target = Vec3::new(4.0, 0.0, 0.0);
        let a = arc_position(start, target, 2.0, 0.25);
        let b = arc_position(start, target, 2.0, 0.75);
        assert!(approx_eq(a.y, b.y));
        assert!(approx_eq(a.x, 1.0));
        assert!(approx_eq(b.x, 3.0));
    }

    // ==================== ADVANCE ====================

    #[test]
    fn test_advance_uses_duration() {
        let mut arc = ArcTrajectory::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0), 3.0, 0.5);
        let p = arc.advance(0.25);
        assert!(approx_eq(arc.t, 0.5));
        assert!(!arc.finished);
        assert!(vec_approx_eq(p, Vec3::new(5.0, 3.0, 5.0)));
    }

    #[test]
    fn test_advance_snaps_to_target_on_overshoot() {
        let target = Vec3::new(10.0, 0.0, 10.0);
        let mut arc = ArcTrajectory::new(Vec3::ZERO, target, 3.0, 0.5);
        arc.advance(0.4);
        let p = arc.advance(0.4);
        assert!(arc.finished);
        assert_eq!(arc.t, 1.0);
        assert_eq!(p, target);
    }

    #[test]
    fn test_advance_after_finish_stays_at_target() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let mut arc = ArcTrajectory::new(Vec3::ZERO, target, 1.0, 0.1);
        arc.advance(1.0);
        assert_eq!(arc.advance(1.0), target);
    }

    #[test]
    fn test_advance_zero_duration_completes_immediately() {
        let target = Vec3::new(1.0, 0.0, 0.0);
        let mut arc = ArcTrajectory::new(Vec3::ZERO, target, 1.0, 0.0);
        assert_eq!(arc.advance(0.016), target);
        assert!(arc.finished);
    }

    #[test]
    fn test_advance_ignores_negative_dt() {
        let mut arc = ArcTrajectory::new(Vec3::ZERO, Vec3::X, 1.0, 1.0);
        arc.advance(-0.5);
        assert_eq!(arc.t, 0.0);
    }
}
