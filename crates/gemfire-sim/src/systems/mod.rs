//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Per-entity state lives in components; shared services are passed in.

pub mod cleanup;
pub mod contacts;
pub mod flight;
pub mod minis;
pub mod movement;
pub mod resolve;
pub mod snapshot;
