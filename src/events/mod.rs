//! Event types and observers.
//!
//! Submodules:
//! - [`grapple`] – grapple status notifications and the abort request
pub mod grapple;
