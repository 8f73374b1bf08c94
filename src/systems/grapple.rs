//! Grapple systems.
//!
//! Every frame, in this order:
//!
//! 1. [`grapple_input_system`] – fire the hook when the trigger was just pressed
//! 2. [`grapple_cooldown_system`] – count cooldowns down
//! 3. [`grapple_scheduled_actions_system`] – resolve aiming and traversal timeouts
//! 4. [`first_person_movement_system`] – walking, unless frozen
//! 5. [`grapple_arc_system`] – carry traversing players along their arc
//! 6. [`grapple_rope_system`] – pin the rope to the gun tip and the anchor
//!
//! [`add_grapple_systems`] registers them chained in that order. The rope
//! runs last so it sees the frame's final positions. `update_world_time`
//! must run before the schedule.
//!
//! Each system emits a [`GrappleEvent`] for every state change it causes.

use bevy_ecs::prelude::*;

use crate::components::aim::{Aim, GunTip};
use crate::components::fpscontroller::FirstPersonController;
use crate::components::grapple::{AimRay, Grapple, GrappleHandles};
use crate::components::rope::GrappleRope;
use crate::components::worldposition::WorldPosition;
use crate::events::grapple::{GrappleEvent, GrappleEventKind};
use crate::resources::anchorquery::AnchorQuerySource;
use crate::resources::grappleconfig::GrappleConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::movement::first_person_movement_system;

/// Fire the hook on every grapple entity when the trigger was just pressed.
pub fn grapple_input_system(
    input: Res<InputState>,
    time: Res<WorldTime>,
    config: Res<GrappleConfig>,
    anchors: Res<AnchorQuerySource>,
    mut query: Query<(
        Entity,
        &mut Grapple,
        &WorldPosition,
        &Aim,
        &mut FirstPersonController,
        &mut GrappleRope,
    )>,
    mut commands: Commands,
) {
    if !input.grapple.just_pressed {
        return;
    }
    for (entity, mut grapple, position, aim, mut controller, mut rope) in query.iter_mut() {
        let ray = AimRay {
            origin: aim.origin(position.pos),
            direction: aim.direction(),
        };
        let handles = GrappleHandles {
            controller: &mut *controller,
            rope: &mut *rope,
        };
        let attempt = grapple.attempt(time.elapsed, &config, &**anchors, ray, handles);
        commands.trigger(GrappleEvent {
            entity,
            kind: GrappleEventKind::from_attempt(attempt),
        });
    }
}

/// Count grapple cooldowns down by the frame delta.
pub fn grapple_cooldown_system(time: Res<WorldTime>, mut query: Query<&mut Grapple>) {
    let dt = time.delta;
    for mut grapple in query.iter_mut() {
        if grapple.cooldown_remaining() > 0.0 {
            grapple.tick_cooldown(dt);
        }
    }
}

/// Run the delayed grapple actions that are due this frame.
pub fn grapple_scheduled_actions_system(
    time: Res<WorldTime>,
    config: Res<GrappleConfig>,
    mut query: Query<(
        Entity,
        &mut Grapple,
        &WorldPosition,
        &mut FirstPersonController,
        &mut GrappleRope,
    )>,
    mut commands: Commands,
) {
    let now = time.elapsed;
    for (entity, mut grapple, position, mut controller, mut rope) in query.iter_mut() {
        if grapple.scheduled().iter().all(|s| s.fire_at > now) {
            continue;
        }
        let handles = GrappleHandles {
            controller: &mut *controller,
            rope: &mut *rope,
        };
        for transition in grapple.run_due_actions(now, &config, position.pos, handles) {
            commands.trigger(GrappleEvent {
                entity,
                kind: transition.into(),
            });
        }
    }
}

/// Move traversing players along their arc.
pub fn grapple_arc_system(
    time: Res<WorldTime>,
    mut query: Query<(&mut Grapple, &mut WorldPosition)>,
) {
    let dt = time.delta;
    for (mut grapple, mut position) in query.iter_mut() {
        if grapple.arc().is_none_or(|arc| arc.finished) {
            continue;
        }
        if let Some(pos) = grapple.advance_arc(dt) {
            position.pos = pos;
        }
    }
}

/// Stretch the rope from the gun tip to the anchor while grappling.
pub fn grapple_rope_system(
    mut query: Query<(&Grapple, &WorldPosition, Option<&GunTip>, &mut GrappleRope)>,
) {
    for (grapple, position, tip, mut rope) in query.iter_mut() {
        let Some(anchor) = grapple.current_anchor() else {
            continue;
        };
        let start = tip.copied().unwrap_or_default().world_position(position.pos);
        rope.set_positions(start, anchor);
    }
}

/// Register the grapple systems, chained in frame order.
pub fn add_grapple_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (
            grapple_input_system,
            grapple_cooldown_system,
            grapple_scheduled_actions_system,
            first_person_movement_system,
            grapple_arc_system,
            grapple_rope_system,
        )
            .chain(),
    );
}
