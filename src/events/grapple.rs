//! Grapple events and observers.
//!
//! - [`GrappleEvent`] is triggered by the grapple systems whenever an attempt
//!   starts, is rejected, begins traversing or ends. UI and audio layers
//!   observe it instead of polling [`Grapple`].
//! - [`GrappleAbortEvent`] asks [`grapple_abort_observer`] to end the attempt
//!   of an entity right away (player death, level change, ...).
//!
//! # Example
//!
//! ```ignore
//! world.spawn(Observer::new(grapple_abort_observer));
//! world.spawn(Observer::new(|trigger: On<GrappleEvent>| {
//!     if let GrappleEventKind::Rejected { .. } = trigger.event().kind {
//!         // play "not ready" click
//!     }
//! }));
//! world.trigger(GrappleAbortEvent { entity: player });
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};

use crate::components::fpscontroller::FirstPersonController;
use crate::components::grapple::{
    Grapple, GrappleAttempt, GrappleHandles, GrappleTransition, StopReason,
};
use crate::components::rope::GrappleRope;
use crate::resources::grappleconfig::GrappleConfig;

/// What happened to an entity's grapple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrappleEventKind {
    /// The hook was fired.
    Started { anchor: Vec3, hit: bool },
    /// The trigger was ignored. `cooldown_remaining` is set when the cooldown
    /// was the reason, `None` when another attempt was in flight.
    Rejected { cooldown_remaining: Option<f32> },
    /// The arc started.
    Traversing { peak_height: f32 },
    /// The attempt ended.
    Stopped(StopReason),
}

impl GrappleEventKind {
    pub fn from_attempt(attempt: GrappleAttempt) -> Self {
        match attempt {
            GrappleAttempt::Started { anchor, hit } => GrappleEventKind::Started { anchor, hit },
            GrappleAttempt::RejectedCooldown { remaining } => GrappleEventKind::Rejected {
                cooldown_remaining: Some(remaining),
            },
            GrappleAttempt::RejectedBusy => GrappleEventKind::Rejected {
                cooldown_remaining: None,
            },
        }
    }
}

impl From<GrappleTransition> for GrappleEventKind {
    fn from(transition: GrappleTransition) -> Self {
        match transition {
            GrappleTransition::Traversing { peak_height } => {
                GrappleEventKind::Traversing { peak_height }
            }
            GrappleTransition::Stopped(reason) => GrappleEventKind::Stopped(reason),
        }
    }
}

/// Grapple status notification.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GrappleEvent {
    /// The entity owning the grapple.
    pub entity: Entity,
    pub kind: GrappleEventKind,
}

/// Request to end the attempt in flight on `entity`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrappleAbortEvent {
    pub entity: Entity,
}

/// Observer that ends an entity's attempt on [`GrappleAbortEvent`].
///
/// Idle grapples are left untouched and no [`GrappleEvent`] is emitted for
/// them. Entities missing any grapple component are ignored.
pub fn grapple_abort_observer(
    trigger: On<GrappleAbortEvent>,
    config: Res<GrappleConfig>,
    mut query: Query<(&mut Grapple, &mut FirstPersonController, &mut GrappleRope)>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    let Ok((mut grapple, mut controller, mut rope)) = query.get_mut(entity) else {
        debug!("GrappleAbortEvent for {:?} without a grapple", entity);
        return;
    };
    let handles = GrappleHandles {
        controller: &mut *controller,
        rope: &mut *rope,
    };
    if grapple.abort(&config, handles) {
        commands.trigger(GrappleEvent {
            entity,
            kind: GrappleEventKind::Stopped(StopReason::Aborted),
        });
    }
}

/// Observer that logs every [`GrappleEvent`].
pub fn grapple_event_logger(trigger: On<GrappleEvent>) {
    let event = trigger.event();
    match event.kind {
        GrappleEventKind::Rejected { .. } => debug!("{:?}: {:?}", event.entity, event.kind),
        _ => info!("{:?}: {:?}", event.entity, event.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_attempt() {
        assert_eq!(
            GrappleEventKind::from_attempt(GrappleAttempt::RejectedBusy),
            GrappleEventKind::Rejected {
                cooldown_remaining: None
            }
        );
        assert_eq!(
            GrappleEventKind::from_attempt(GrappleAttempt::RejectedCooldown { remaining: 1.5 }),
            GrappleEventKind::Rejected {
                cooldown_remaining: Some(1.5)
            }
        );
        assert_eq!(
            GrappleEventKind::from_attempt(GrappleAttempt::Started {
                anchor: Vec3::ONE,
                hit: false
            }),
            GrappleEventKind::Started {
                anchor: Vec3::ONE,
                hit: false
            }
        );
    }

    #[test]
    fn test_kind_from_transition() {
        assert_eq!(
            GrappleEventKind::from(GrappleTransition::Stopped(StopReason::TimedOut)),
            GrappleEventKind::Stopped(StopReason::TimedOut)
        );
        assert_eq!(
            GrappleEventKind::from(GrappleTransition::Traversing { peak_height: 3.0 }),
            GrappleEventKind::Traversing { peak_height: 3.0 }
        );
    }
}
