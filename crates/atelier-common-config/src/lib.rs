//! Configuration types for Atelier.
//!
//! This crate provides the configuration types used by Atelier
//! for `.atelier/config.yaml` files, plus credential access.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
