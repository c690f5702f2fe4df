//! Value Objects - Immutable, identity-less domain primitives

mod bounds;
mod geo_location;
mod travel_mode;

pub use bounds::Bounds;
pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use travel_mode::{DEFAULT_MAP_COLOR, TravelMode};
