use bevy_ecs::prelude::Resource;

/// Simulation clock advanced once per frame by
/// [`update_world_time`](crate::systems::time::update_world_time).
///
/// `elapsed` and `delta` are already scaled by `time_scale`. Grapple delays,
/// cooldowns and the traversal timeout are all measured against this clock.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
