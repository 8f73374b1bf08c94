//! Grappling-hook controller component.
//!
//! [`Grapple`] owns the lifecycle of one player's hook:
//!
//! ```text
//! Idle --trigger--> Aiming --delay, hit--> Traversing --timeout--> Idle
//!                      \--delay, miss-----------------------------^
//! ```
//!
//! The cooldown is a separate countdown; a new attempt is rejected while it
//! is running or while an attempt is already in flight.
//!
//! # Delayed actions
//!
//! Leaving `Aiming` and leaving `Traversing` both happen a fixed time after
//! they are scheduled. Each attempt gets a fresh id, and every queued
//! [`ScheduledAction`] carries the id of the attempt that queued it. When an
//! action comes due its id is compared with the current attempt and stale
//! entries are dropped, so nothing queued by an aborted attempt can touch a
//! later one.
//!
//! # Related
//!
//! - [`crate::systems::grapple`] – systems driving this component every frame
//! - [`crate::events::grapple`] – notifications and the abort event

use bevy_ecs::prelude::Component;
use glam::Vec3;
use log::{debug, info};
use smallvec::SmallVec;

use crate::components::fpscontroller::FirstPersonController;
use crate::components::rope::GrappleRope;
use crate::components::trajectory::{ArcTrajectory, trajectory_height};
use crate::resources::anchorquery::AnchorQuery;
use crate::resources::grappleconfig::GrappleConfig;

/// Lifecycle state of a grapple attempt.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum GrapplePhase {
    /// No attempt in flight.
    #[default]
    Idle,
    /// Hook fired, waiting for the delay to resolve. `hit` tells whether the
    /// sight ray found a surface.
    Aiming { hit: bool },
    /// Player is being carried along the arc.
    Traversing { arc: ArcTrajectory },
}

/// Deferred step of an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrappleAction {
    /// Leave `Aiming` and start the arc.
    Execute,
    /// End the attempt.
    Stop,
}

/// Queued action for a given attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledAction {
    /// World time (seconds) at which the action fires.
    pub fire_at: f32,
    /// Attempt that queued the action.
    pub attempt: u64,
    pub action: GrappleAction,
}

/// Why an attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The sight ray found nothing in range.
    Missed,
    /// The traversal timeout elapsed.
    TimedOut,
    /// Ended from outside (e.g. the player died).
    Aborted,
}

/// Outcome of [`Grapple::attempt`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrappleAttempt {
    /// The hook was fired. `anchor` is the hit point, or the air anchor at
    /// max range when `hit` is false.
    Started { anchor: Vec3, hit: bool },
    /// The cooldown from the previous attempt is still running.
    RejectedCooldown { remaining: f32 },
    /// An attempt is already in flight.
    RejectedBusy,
}

/// State change produced by a scheduled action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrappleTransition {
    /// Aiming resolved on a hit and the arc has started.
    Traversing { peak_height: f32 },
    /// The attempt ended.
    Stopped(StopReason),
}

/// External state the controller writes to.
pub struct GrappleHandles<'a> {
    pub controller: &'a mut FirstPersonController,
    pub rope: &'a mut GrappleRope,
}

/// Sight ray used when firing the hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Grappling-hook controller.
#[derive(Component, Clone, Debug, Default)]
pub struct Grapple {
    phase: GrapplePhase,
    anchor: Vec3,
    cooldown_remaining: f32,
    attempt_id: u64,
    scheduled: SmallVec<[ScheduledAction; 2]>,
}

impl Grapple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &GrapplePhase {
        &self.phase
    }

    /// True while an attempt is in flight (aiming or traversing).
    pub fn is_grappling(&self) -> bool {
        !matches!(self.phase, GrapplePhase::Idle)
    }

    /// Anchor of the attempt in flight.
    pub fn current_anchor(&self) -> Option<Vec3> {
        self.is_grappling().then_some(self.anchor)
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Id of the most recent attempt. Zero before the first one.
    pub fn attempt_id(&self) -> u64 {
        self.attempt_id
    }

    pub fn scheduled(&self) -> &[ScheduledAction] {
        &self.scheduled
    }

    /// Arc currently being followed, if any.
    pub fn arc(&self) -> Option<&ArcTrajectory> {
        match &self.phase {
            GrapplePhase::Traversing { arc } => Some(arc),
            _ => None,
        }
    }

    /// Fire the hook.
    ///
    /// Rejected without side effects while the cooldown runs or another
    /// attempt is in flight. Otherwise the anchor is resolved through
    /// `query`, movement is frozen, the rope is shown and the end of the
    /// aiming delay is scheduled.
    pub fn attempt(
        &mut self,
        now: f32,
        config: &GrappleConfig,
        query: &dyn AnchorQuery,
        ray: AimRay,
        handles: GrappleHandles<'_>,
    ) -> GrappleAttempt {
        if self.cooldown_remaining > 0.0 {
            debug!(
                "Grapple rejected: cooldown {:.3}s remaining",
                self.cooldown_remaining
            );
            return GrappleAttempt::RejectedCooldown {
                remaining: self.cooldown_remaining,
            };
        }
        if self.is_grappling() {
            debug!("Grapple rejected: attempt {} in flight", self.attempt_id);
            return GrappleAttempt::RejectedBusy;
        }

        self.attempt_id += 1;
        self.scheduled.clear();

        let hit = query.cast_ray(ray.origin, ray.direction, config.max_distance, config.layer_mask);
        let (anchor, action) = match hit {
            Some(hit) => (hit.point, GrappleAction::Execute),
            None => (
                ray.origin + ray.direction * config.max_distance,
                GrappleAction::Stop,
            ),
        };
        self.anchor = anchor;
        self.phase = GrapplePhase::Aiming { hit: hit.is_some() };
        self.schedule(now + config.delay, action);

        handles.controller.freeze_movement = true;
        handles.rope.enable(anchor);

        info!(
            "Grapple attempt {} fired: anchor={:?} hit={}",
            self.attempt_id,
            anchor,
            hit.is_some()
        );

        GrappleAttempt::Started {
            anchor,
            hit: hit.is_some(),
        }
    }

    /// End the attempt in flight, whatever its phase.
    ///
    /// Unfreezes movement, hides the rope, starts the cooldown and drops
    /// every pending action. Does nothing while idle. Returns whether an
    /// attempt was ended.
    pub fn abort(&mut self, config: &GrappleConfig, handles: GrappleHandles<'_>) -> bool {
        if !self.is_grappling() {
            return false;
        }
        self.stop(config, handles, StopReason::Aborted);
        true
    }

    /// Count the cooldown down by `dt`, never below zero.
    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }
    }

    /// Run every scheduled action due at `now`, in firing order.
    ///
    /// `position` is the player's current position, used as the arc start
    /// when aiming resolves on a hit.
    pub fn run_due_actions(
        &mut self,
        now: f32,
        config: &GrappleConfig,
        position: Vec3,
        handles: GrappleHandles<'_>,
    ) -> SmallVec<[GrappleTransition; 2]> {
        let GrappleHandles { controller, rope } = handles;
        let mut transitions = SmallVec::new();

        while let Some(index) = self.next_due(now) {
            let entry = self.scheduled.remove(index);
            if entry.attempt != self.attempt_id {
                debug!(
                    "Dropping stale {:?} from attempt {} (current {})",
                    entry.action, entry.attempt, self.attempt_id
                );
                continue;
            }
            let handles = GrappleHandles {
                controller: &mut *controller,
                rope: &mut *rope,
            };
            let transition = match (entry.action, self.phase) {
                (GrappleAction::Execute, GrapplePhase::Aiming { hit: true }) => {
                    Some(self.execute(now, config, position, handles))
                }
                (GrappleAction::Stop, GrapplePhase::Aiming { .. }) => {
                    Some(self.stop(config, handles, StopReason::Missed))
                }
                (GrappleAction::Stop, GrapplePhase::Traversing { .. }) => {
                    Some(self.stop(config, handles, StopReason::TimedOut))
                }
                (action, phase) => {
                    debug!(
                        "Ignoring {:?} for attempt {} in phase {:?}",
                        action, entry.attempt, phase
                    );
                    None
                }
            };
            transitions.extend(transition);
        }

        transitions
    }

    /// Step the arc by `dt` and return the new player position, or `None`
    /// when no arc is running.
    pub fn advance_arc(&mut self, dt: f32) -> Option<Vec3> {
        match &mut self.phase {
            GrapplePhase::Traversing { arc } if !arc.finished => {
                let pos = arc.advance(dt);
                if arc.finished {
                    debug!("Grapple arc {} reached its anchor", self.attempt_id);
                }
                Some(pos)
            }
            _ => None,
        }
    }

    fn schedule(&mut self, fire_at: f32, action: GrappleAction) {
        self.scheduled.push(ScheduledAction {
            fire_at,
            attempt: self.attempt_id,
            action,
        });
    }

    fn next_due(&self, now: f32) -> Option<usize> {
        self.scheduled
            .iter()
            .enumerate()
            .filter(|(_, s)| s.fire_at <= now)
            .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at))
            .map(|(i, _)| i)
    }

    fn execute(
        &mut self,
        now: f32,
        config: &GrappleConfig,
        position: Vec3,
        handles: GrappleHandles<'_>,
    ) -> GrappleTransition {
        handles.controller.freeze_movement = false;

        let peak_height =
            trajectory_height(self.anchor.y, position.y, config.foot_offset, config.overshoot);
        let arc = ArcTrajectory::new(position, self.anchor, peak_height, config.delay);
        self.phase = GrapplePhase::Traversing { arc };
        self.schedule(now + config.traversal_timeout, GrappleAction::Stop);

        info!(
            "Grapple attempt {} traversing: start={:?} peak={:.3}",
            self.attempt_id, position, peak_height
        );

        GrappleTransition::Traversing { peak_height }
    }

    fn stop(
        &mut self,
        config: &GrappleConfig,
        handles: GrappleHandles<'_>,
        reason: StopReason,
    ) -> GrappleTransition {
        self.phase = GrapplePhase::Idle;
        self.scheduled.clear();
        self.cooldown_remaining = config.cooldown;
        handles.controller.freeze_movement = false;
        handles.rope.disable();

        info!("Grapple attempt {} stopped: {:?}", self.attempt_id, reason);

        GrappleTransition::Stopped(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::anchorquery::{LayerMask, RayHit};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Query returning the same answer for every ray.
    struct FixedQuery(Option<Vec3>);

    impl AnchorQuery for FixedQuery {
        fn cast_ray(&self, origin: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            self.0.map(|point| RayHit {
                point,
                distance: point.distance(origin),
                layer: 0,
            })
        }
    }

    struct Rig {
        grapple: Grapple,
        controller: FirstPersonController,
        rope: GrappleRope,
        config: GrappleConfig,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                grapple: Grapple::new(),
                controller: FirstPersonController::new(),
                rope: GrappleRope::new(),
                config: GrappleConfig::new(),
            }
        }

        fn abort(&mut self) -> bool {
            let handles = GrappleHandles {
                controller: &mut self.controller,
                rope: &mut self.rope,
            };
            self.grapple.abort(&self.config, handles)
        }

        fn fire(&mut self, now: f32, query: &dyn AnchorQuery) -> GrappleAttempt {
            let ray = AimRay {
                origin: Vec3::ZERO,
                direction: Vec3::Z,
            };
            let config = self.config.clone();
            let handles = GrappleHandles {
                controller: &mut self.controller,
                rope: &mut self.rope,
            };
            self.grapple.attempt(now, &config, query, ray, handles)
        }

        fn run(&mut self, now: f32, position: Vec3) -> SmallVec<[GrappleTransition; 2]> {
            let config = self.config.clone();
            let handles = GrappleHandles {
                controller: &mut self.controller,
                rope: &mut self.rope,
            };
            self.grapple.run_due_actions(now, &config, position, handles)
        }
    }

    #[test]
    fn test_new_grapple_is_idle() {
        let g = Grapple::new();
        assert!(!g.is_grappling());
        assert_eq!(g.current_anchor(), None);
        assert_eq!(g.attempt_id(), 0);
        assert!(g.scheduled().is_empty());
    }

    #[test]
    fn test_hit_starts_aiming_and_freezes() {
        let mut rig = Rig::new();
        let anchor = Vec3::new(10.0, 0.0, 10.0);
        let result = rig.fire(0.0, &FixedQuery(Some(anchor)));

        assert_eq!(result, GrappleAttempt::Started { anchor, hit: true });
        assert_eq!(*rig.grapple.phase(), GrapplePhase::Aiming { hit: true });
        assert_eq!(rig.grapple.current_anchor(), Some(anchor));
        assert!(rig.controller.freeze_movement);
        assert!(rig.rope.enabled);
        assert_eq!(rig.rope.end, anchor);
        assert_eq!(rig.grapple.scheduled().len(), 1);
        assert_eq!(rig.grapple.scheduled()[0].action, GrappleAction::Execute);
        assert!(approx_eq(rig.grapple.scheduled()[0].fire_at, 0.5));
    }

    #[test]
    fn test_miss_uses_air_anchor_at_max_range() {
        let mut rig = Rig::new();
        let result = rig.fire(1.0, &FixedQuery(None));

        let expected = Vec3::new(0.0, 0.0, 100.0);
        assert_eq!(
            result,
            GrappleAttempt::Started {
                anchor: expected,
                hit: false
            }
        );
        assert_eq!(rig.grapple.current_anchor(), Some(expected));
        assert_eq!(rig.grapple.scheduled()[0].action, GrappleAction::Stop);
        assert!(rig.controller.freeze_movement);
        assert!(rig.rope.enabled);
    }

    #[test]
    fn test_cooldown_rejects_without_side_effects() {
        let mut rig = Rig::new();
        rig.grapple.cooldown_remaining = 0.5;

        let result = rig.fire(0.0, &FixedQuery(Some(Vec3::ONE)));

        assert_eq!(result, GrappleAttempt::RejectedCooldown { remaining: 0.5 });
        assert!(!rig.grapple.is_grappling());
        assert!(!rig.rope.enabled);
        assert!(!rig.controller.freeze_movement);
        assert_eq!(rig.grapple.attempt_id(), 0);
    }

    #[test]
    fn test_busy_rejects_second_attempt() {
        let mut rig = Rig::new();
        let first = Vec3::new(1.0, 0.0, 0.0);
        rig.fire(0.0, &FixedQuery(Some(first)));

        let result = rig.fire(0.1, &FixedQuery(Some(Vec3::new(5.0, 5.0, 5.0))));

        assert_eq!(result, GrappleAttempt::RejectedBusy);
        assert_eq!(rig.grapple.current_anchor(), Some(first));
        assert_eq!(rig.grapple.attempt_id(), 1);
        assert_eq!(rig.grapple.scheduled().len(), 1);
    }

    #[test]
    fn test_execute_after_delay_starts_arc() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(Some(Vec3::new(10.0, 0.0, 10.0))));

        assert!(rig.run(0.49, Vec3::ZERO).is_empty());
        let transitions = rig.run(0.5, Vec3::ZERO);

        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Traversing { peak_height: 3.0 }]
        );
        assert!(!rig.controller.freeze_movement);
        assert!(rig.rope.enabled);
        let arc = rig.grapple.arc().unwrap();
        assert_eq!(arc.start, Vec3::ZERO);
        assert!(approx_eq(arc.duration, 0.5));
        let timeout = rig.grapple.scheduled()[0];
        assert_eq!(timeout.action, GrappleAction::Stop);
        assert!(approx_eq(timeout.fire_at, 1.5));
    }

    #[test]
    fn test_miss_stops_after_delay() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(None));

        let transitions = rig.run(0.5, Vec3::ZERO);

        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Stopped(StopReason::Missed)]
        );
        assert!(!rig.grapple.is_grappling());
        assert!(!rig.rope.enabled);
        assert!(!rig.controller.freeze_movement);
        assert_eq!(rig.grapple.cooldown_remaining(), 2.0);
        assert_eq!(rig.grapple.current_anchor(), None);
    }

    #[test]
    fn test_timeout_abandons_unfinished_arc() {
        let mut rig = Rig::new();
        rig.config.delay = 4.0;
        rig.config.traversal_timeout = 1.0;
        rig.fire(0.0, &FixedQuery(Some(Vec3::new(10.0, 0.0, 0.0))));
        rig.run(4.0, Vec3::ZERO);

        let mid = rig.grapple.advance_arc(2.0).unwrap();
        assert!(!rig.grapple.arc().unwrap().finished);

        let transitions = rig.run(5.0, mid);
        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Stopped(StopReason::TimedOut)]
        );
        assert!(!rig.grapple.is_grappling());
        assert_eq!(rig.grapple.advance_arc(0.1), None);
        assert_eq!(rig.grapple.cooldown_remaining(), 2.0);
    }

    #[test]
    fn test_huge_tick_runs_execute_then_timeout() {
        let mut rig = Rig::new();
        rig.config.traversal_timeout = 0.0;
        rig.fire(0.0, &FixedQuery(Some(Vec3::X)));

        let transitions = rig.run(10.0, Vec3::ZERO);
        assert_eq!(transitions.len(), 2);
        assert!(matches!(transitions[0], GrappleTransition::Traversing { .. }));
        assert_eq!(transitions[1], GrappleTransition::Stopped(StopReason::TimedOut));
        assert!(!rig.grapple.is_grappling());
    }

    #[test]
    fn test_abort_while_idle_is_noop() {
        let mut rig = Rig::new();
        let changed = rig.abort();

        assert!(!changed);
        assert_eq!(rig.grapple.cooldown_remaining(), 0.0);
        assert!(!rig.grapple.is_grappling());
    }

    #[test]
    fn test_abort_mid_aim_resets_everything() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(Some(Vec3::X)));

        assert!(rig.abort());

        assert!(!rig.grapple.is_grappling());
        assert!(!rig.controller.freeze_movement);
        assert!(!rig.rope.enabled);
        assert_eq!(rig.grapple.cooldown_remaining(), 2.0);
        assert!(rig.grapple.scheduled().is_empty());

        // aborting twice changes nothing
        rig.grapple.cooldown_remaining = 1.0;
        assert!(!rig.abort());
        assert_eq!(rig.grapple.cooldown_remaining(), 1.0);
    }

    #[test]
    fn test_stale_action_is_dropped() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(Some(Vec3::X)));
        let stale = rig.grapple.scheduled()[0];

        rig.abort();
        rig.grapple.cooldown_remaining = 0.0;

        rig.fire(0.2, &FixedQuery(None));
        // re-inject the first attempt's Execute, as a late callback would
        rig.grapple.scheduled.push(stale);

        let transitions = rig.run(0.5, Vec3::ZERO);
        assert!(transitions.is_empty());
        assert_eq!(*rig.grapple.phase(), GrapplePhase::Aiming { hit: false });
        assert_eq!(rig.grapple.scheduled().len(), 1);
        assert_eq!(rig.grapple.scheduled()[0].attempt, 2);

        let transitions = rig.run(0.75, Vec3::ZERO);
        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Stopped(StopReason::Missed)]
        );
    }

    #[test]
    fn test_action_not_matching_phase_is_ignored() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(None));
        // an Execute for the current attempt while aiming at thin air
        rig.grapple.schedule(0.1, GrappleAction::Execute);

        let transitions = rig.run(0.2, Vec3::ZERO);
        assert!(transitions.is_empty());
        assert_eq!(*rig.grapple.phase(), GrapplePhase::Aiming { hit: false });
        assert!(rig.controller.freeze_movement);
        assert_eq!(rig.grapple.scheduled().len(), 1);
        assert_eq!(rig.grapple.scheduled()[0].action, GrappleAction::Stop);

        let transitions = rig.run(0.5, Vec3::ZERO);
        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Stopped(StopReason::Missed)]
        );
    }

    #[test]
    fn test_cooldown_counts_down_to_zero() {
        let mut g = Grapple::new();
        g.cooldown_remaining = 0.3;
        g.tick_cooldown(0.2);
        assert!(approx_eq(g.cooldown_remaining(), 0.1));
        g.tick_cooldown(0.2);
        assert_eq!(g.cooldown_remaining(), 0.0);
        g.tick_cooldown(0.2);
        assert_eq!(g.cooldown_remaining(), 0.0);
    }

    #[test]
    fn test_low_anchor_gets_flat_arc() {
        let mut rig = Rig::new();
        rig.fire(0.0, &FixedQuery(Some(Vec3::new(0.0, -10.0, 20.0))));
        let transitions = rig.run(0.5, Vec3::ZERO);
        assert_eq!(
            transitions.as_slice(),
            &[GrappleTransition::Traversing { peak_height: 2.0 }]
        );
    }
}
