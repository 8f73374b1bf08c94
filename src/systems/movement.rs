use bevy_ecs::prelude::*;

use crate::components::fpscontroller::FirstPersonController;
use crate::components::worldposition::WorldPosition;
use crate::resources::worldtime::WorldTime;

/// Integrate walking velocity into position, skipping frozen controllers.
pub fn first_person_movement_system(
    mut query: Query<(&mut WorldPosition, &FirstPersonController)>,
    time: Res<WorldTime>,
) {
    for (mut position, controller) in query.iter_mut() {
        if controller.freeze_movement {
            continue;
        }
        position.pos += controller.velocity * time.delta;
    }
}
