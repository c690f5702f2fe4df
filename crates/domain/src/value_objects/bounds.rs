//! Geographic bounding box value object

use serde::{Deserialize, Serialize};

use super::GeoLocation;

/// An axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing both corners, in whatever order they are given
    #[must_use]
    pub fn from_corners(a: GeoLocation, b: GeoLocation) -> Self {
        Self {
            south: a.latitude().min(b.latitude()),
            west: a.longitude().min(b.longitude()),
            north: a.latitude().max(b.latitude()),
            east: a.longitude().max(b.longitude()),
        }
    }

    /// South-west corner
    #[must_use]
    pub const fn south_west(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.south, self.west)
    }

    /// North-east corner
    #[must_use]
    pub const fn north_east(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.north, self.east)
    }

    /// `[[south, west], [north, east]]`, the shape map widgets expect
    #[must_use]
    pub const fn to_array(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    /// Whether a location lies inside the box (edges included)
    #[must_use]
    pub fn contains(&self, location: &GeoLocation) -> bool {
        (self.south..=self.north).contains(&location.latitude())
            && (self.west..=self.east).contains(&location.longitude())
    }
}
