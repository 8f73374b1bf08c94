//! Frame systems.
//!
//! Submodules overview
//! - [`grapple`] – input, cooldown, delayed actions, arc and rope updates
//! - [`movement`] – integrate walking velocity unless movement is frozen
//! - [`time`] – update simulation time and delta

pub mod grapple;
pub mod movement;
pub mod time;
