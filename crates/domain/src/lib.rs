//! Domain layer for the OpenTripPlanner client
//!
//! Contains the value objects shared by the request/response models:
//! coordinates, bounding boxes and travel-mode classification.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
