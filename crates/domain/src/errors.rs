//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// A place string that does not start with a `lat,lon` pair
    #[error("Invalid place: {0}")]
    InvalidPlace(String),
}

impl From<crate::value_objects::InvalidCoordinates> for DomainError {
    fn from(_: crate::value_objects::InvalidCoordinates) -> Self {
        Self::InvalidCoordinates
    }
}
