//! ECS components for entities.
//!
//! This module groups the component types attached to a grappling player.
//!
//! Submodules overview:
//! - [`aim`] – sight-ray origin/direction and gun-tip offset
//! - [`fpscontroller`] – first-person walking with a movement-freeze switch
//! - [`grapple`] – the grapple controller: lifecycle state, anchor, cooldown and delayed actions
//! - [`rope`] – two-endpoint rope visual
//! - [`trajectory`] – arc height, arc position and the resumable arc state
//! - [`worldposition`] – world-space position of an entity

pub mod aim;
pub mod fpscontroller;
pub mod grapple;
pub mod rope;
pub mod trajectory;
pub mod worldposition;
