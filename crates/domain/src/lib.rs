//! Domain layer for Weatherdeck
//!
//! Contains the core data model, value objects, pure aggregation logic,
//! and domain errors. This layer performs no I/O and defines the
//! ubiquitous language.

pub mod aggregate;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use aggregate::{WeeklyBucket, daily, monthly, weekly};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
