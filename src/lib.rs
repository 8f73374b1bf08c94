//! Grapplehook library.
//!
//! A first-person grappling hook built on `bevy_ecs`. The hook casts a sight
//! ray for an anchor, freezes walking for a short aiming delay, then carries
//! the player along a sine arc to the anchor while a rope is drawn from the
//! gun tip.
//!
//! This module exposes the components, resources, systems and events for use
//! by a host game and by the integration tests.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
