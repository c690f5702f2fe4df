//! Travel mode classification
//!
//! OTP reports the mode of each leg as an upper-case string (`"WALK"`,
//! `"BUS"`, ...). This module classifies those strings and maps them to the
//! colors used when drawing legs on a map.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color used for modes without an entry in the color table
pub const DEFAULT_MAP_COLOR: &str = "#AAAAAA";

/// Travel mode of an itinerary leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    /// On foot
    Walk,
    /// Bicycle
    Bicycle,
    /// Private car
    Car,
    /// Any public transit (request-side umbrella mode)
    Transit,
    /// Metro / underground
    Subway,
    /// Heavy rail
    Rail,
    /// Bus
    Bus,
    /// Tram / light rail
    Tram,
    /// Gondola / aerial lift
    Gondola,
    /// Any rail-like transit (request-side umbrella mode)
    Trainish,
    /// Any bus-like transit (request-side umbrella mode)
    Busish,
    /// Anything OTP reports that is not listed above
    #[serde(other)]
    Unknown,
}

impl TravelMode {
    /// Classify an OTP mode string (case-insensitive)
    #[must_use]
    pub fn from_otp(mode: &str) -> Self {
        match mode.trim().to_ascii_uppercase().as_str() {
            "WALK" => Self::Walk,
            "BICYCLE" => Self::Bicycle,
            "CAR" => Self::Car,
            "TRANSIT" => Self::Transit,
            "SUBWAY" => Self::Subway,
            "RAIL" => Self::Rail,
            "BUS" => Self::Bus,
            "TRAM" => Self::Tram,
            "GONDOLA" => Self::Gondola,
            "TRAINISH" => Self::Trainish,
            "BUSISH" => Self::Busish,
            _ => Self::Unknown,
        }
    }

    /// The OTP wire name of this mode
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "WALK",
            Self::Bicycle => "BICYCLE",
            Self::Car => "CAR",
            Self::Transit => "TRANSIT",
            Self::Subway => "SUBWAY",
            Self::Rail => "RAIL",
            Self::Bus => "BUS",
            Self::Tram => "TRAM",
            Self::Gondola => "GONDOLA",
            Self::Trainish => "TRAINISH",
            Self::Busish => "BUSISH",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this mode is public transit
    #[must_use]
    pub const fn is_transit(&self) -> bool {
        matches!(
            self,
            Self::Transit
                | Self::Subway
                | Self::Rail
                | Self::Bus
                | Self::Tram
                | Self::Gondola
                | Self::Trainish
                | Self::Busish
        )
    }

    /// Whether this mode is walking
    #[must_use]
    pub const fn is_walk(&self) -> bool {
        matches!(self, Self::Walk)
    }

    /// Whether this mode is cycling
    #[must_use]
    pub const fn is_bicycle(&self) -> bool {
        matches!(self, Self::Bicycle)
    }

    /// Whether this mode is driving
    #[must_use]
    pub const fn is_car(&self) -> bool {
        matches!(self, Self::Car)
    }

    /// Display color for drawing a leg of this mode on a map
    #[must_use]
    pub const fn map_color(&self) -> &'static str {
        match self {
            Self::Walk | Self::Car => "#444444",
            Self::Bicycle => "#0000FF",
            Self::Subway => "#FF0000",
            Self::Rail => "#BB0000",
            Self::Bus => "#008800",
            Self::Tram => "#880000",
            _ => DEFAULT_MAP_COLOR,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_otp() {
        assert_eq!(TravelMode::from_otp("WALK"), TravelMode::Walk);
        assert_eq!(TravelMode::from_otp("bus"), TravelMode::Bus);
        assert_eq!(TravelMode::from_otp("TRAINISH"), TravelMode::Trainish);
        assert_eq!(TravelMode::from_otp("FERRY"), TravelMode::Unknown);
        assert_eq!(TravelMode::from_otp(""), TravelMode::Unknown);
    }

    #[test]
    fn test_transit_set() {
        for mode in [
            "TRANSIT", "SUBWAY", "RAIL", "BUS", "TRAM", "GONDOLA", "TRAINISH", "BUSISH",
        ] {
            assert!(TravelMode::from_otp(mode).is_transit(), "{mode} is transit");
        }
        for mode in ["WALK", "BICYCLE", "CAR", "FERRY"] {
            assert!(!TravelMode::from_otp(mode).is_transit(), "{mode} is not transit");
        }
    }

    #[test]
    fn test_street_modes() {
        assert!(TravelMode::Walk.is_walk());
        assert!(TravelMode::Bicycle.is_bicycle());
        assert!(TravelMode::Car.is_car());
        assert!(!TravelMode::Bus.is_walk());
    }

    #[test]
    fn test_map_colors() {
        assert_eq!(TravelMode::Walk.map_color(), "#444444");
        assert_eq!(TravelMode::Bicycle.map_color(), "#0000FF");
        assert_eq!(TravelMode::Subway.map_color(), "#FF0000");
        assert_eq!(TravelMode::Rail.map_color(), "#BB0000");
        assert_eq!(TravelMode::Bus.map_color(), "#008800");
        assert_eq!(TravelMode::Tram.map_color(), "#880000");
        assert_eq!(TravelMode::Car.map_color(), "#444444");
        assert_eq!(TravelMode::Gondola.map_color(), DEFAULT_MAP_COLOR);
        assert_eq!(TravelMode::Unknown.map_color(), DEFAULT_MAP_COLOR);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TravelMode::Bicycle).unwrap();
        assert_eq!(json, "\"BICYCLE\"");
        let mode: TravelMode = serde_json::from_str("\"FERRY\"").unwrap();
        assert_eq!(mode, TravelMode::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(TravelMode::Subway.to_string(), "SUBWAY");
    }
}
