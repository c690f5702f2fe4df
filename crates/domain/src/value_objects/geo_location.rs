//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Separator between the coordinate pair and an optional label in an OTP place
/// string, e.g. `"41.38,2.17::Home"`.
const PLACE_LABEL_SEPARATOR: &str = "::";

/// A geographic location with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse the coordinate pair of an OTP place string (`"lat,lon[::label]"`)
    ///
    /// Anything after the first `::` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlace` if the string does not start with two
    /// comma-separated numbers, or `DomainError::InvalidCoordinates` if they are
    /// out of range.
    pub fn from_place(place: &str) -> Result<Self, DomainError> {
        let coords = place
            .split(PLACE_LABEL_SEPARATOR)
            .next()
            .unwrap_or_default();

        let mut parts = coords.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::InvalidPlace(place.to_string()));
        };

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidPlace(place.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidPlace(place.to_string()))?;

        Ok(Self::new(lat, lon)?)
    }

    /// Format as an OTP place string (`"lat,lon"`)
    #[must_use]
    pub fn to_place(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl FromStr for GeoLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_place(s)
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
