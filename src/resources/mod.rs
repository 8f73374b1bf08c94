//! ECS resources made available to systems.
//!
//! Overview
//! - `anchorquery` – injected scene ray cast used to find the grapple anchor
//! - `grappleconfig` – grapple tunables, loadable from an INI file
//! - `input` – per-frame state of the grapple trigger
//! - `worldtime` – simulation time and delta
pub mod anchorquery;
pub mod grappleconfig;
pub mod input;
pub mod worldtime;
