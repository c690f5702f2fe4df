//! Itinerary legs, the places they connect and their walking steps

use std::fmt;

use chrono::{DateTime, Utc};
use domain::{GeoLocation, TravelMode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GTFS identifier as OTP serializes it
///
/// Older OTP releases emit `{"agencyId": "TMB", "id": "1234"}`, newer ones the
/// flat `"TMB:1234"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgencyAndId {
    /// Flat `agency:id` string
    Plain(String),
    /// Agency and id as separate fields
    #[serde(rename_all = "camelCase")]
    Split {
        /// Feed agency
        agency_id: String,
        /// Identifier within the agency
        id: String,
    },
}

impl fmt::Display for AgencyAndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(id) => write!(f, "{id}"),
            Self::Split { agency_id, id } => write!(f, "{agency_id}:{id}"),
        }
    }
}

/// A place a leg starts, ends or passes through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryStop {
    /// Display name
    pub name: Option<String>,
    /// Transit stop identifier (absent for street locations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<AgencyAndId>,
    /// Rider-facing stop code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_code: Option<String>,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lon: Option<f64>,
    /// Arrival time in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<i64>,
    /// Departure time in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure: Option<i64>,
    /// Position of the stop within the trip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_index: Option<u32>,
    /// Kind of vertex (`NORMAL`, `TRANSIT`, `BIKESHARE`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_type: Option<String>,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItineraryStop {
    /// Coordinates, if both are present and valid
    #[must_use]
    pub fn location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.lat?, self.lon?).ok()
    }

    /// Name, or the coordinates when the place is unnamed
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.name, self.location()) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(loc)) => loc.to_string(),
            _ => String::from("?"),
        }
    }
}

/// One turn-by-turn instruction of a street leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkStep {
    /// Distance covered by this step, in meters
    pub distance: f64,
    /// Direction relative to the previous step (`LEFT`, `CONTINUE`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_direction: Option<String>,
    /// Compass direction (`NORTH`, `SOUTHWEST`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_direction: Option<String>,
    /// Street the step follows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    /// Roundabout exit number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,
    /// Whether the street name is the same as in the previous step
    pub stay_on: bool,
    /// Whether the step crosses an open area such as a plaza
    pub area: bool,
    /// Whether `street_name` was generated rather than mapped
    pub bogus_name: bool,
    /// Latitude of the step start
    pub lat: Option<f64>,
    /// Longitude of the step start
    pub lon: Option<f64>,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WalkStep {
    /// Human-readable instruction, e.g. `"LEFT on Carrer de Mallorca (120 m)"`
    #[must_use]
    pub fn instruction(&self) -> String {
        let direction = self
            .relative_direction
            .as_deref()
            .or(self.absolute_direction.as_deref())
            .unwrap_or("CONTINUE");
        let street = self.street_name.as_deref().unwrap_or("unnamed path");
        format!("{direction} on {street} ({:.0} m)", self.distance)
    }
}

impl fmt::Display for WalkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction())
    }
}

/// Encoded shape of a leg
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegGeometry {
    /// Google encoded polyline
    pub points: String,
    /// Number of points encoded
    pub length: u32,
}

/// One continuous travel segment on a single mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryLeg {
    /// OTP mode string (`WALK`, `BUS`, ...)
    pub mode: String,
    /// Route name as shown to riders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Short route name (e.g. `"V15"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_short_name: Option<String>,
    /// Long route name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_long_name: Option<String>,
    /// Route color as hex without `#`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_color: Option<String>,
    /// Route text color as hex without `#`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_text_color: Option<String>,
    /// Route identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<AgencyAndId>,
    /// Operating agency name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    /// Operating agency identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    /// Operating agency website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_url: Option<String>,
    /// Destination sign of the vehicle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
    /// Trip identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<AgencyAndId>,
    /// Start time in epoch milliseconds
    pub start_time: i64,
    /// End time in epoch milliseconds
    pub end_time: i64,
    /// Distance in meters
    pub distance: f64,
    /// Whether times include real-time updates
    pub real_time: bool,
    /// Whether riders stay on the vehicle from the previous leg
    pub interline_with_previous_leg: bool,
    /// Encoded shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg_geometry: Option<LegGeometry>,
    /// Where the leg starts
    pub from: ItineraryStop,
    /// Where the leg ends
    pub to: ItineraryStop,
    /// Stops passed without alighting
    pub intermediate_stops: Vec<ItineraryStop>,
    /// Turn-by-turn instructions (street legs only)
    pub steps: Vec<WalkStep>,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItineraryLeg {
    /// Classified travel mode
    #[must_use]
    pub fn travel_mode(&self) -> TravelMode {
        TravelMode::from_otp(&self.mode)
    }

    /// Whether this leg rides public transit
    #[must_use]
    pub fn is_transit(&self) -> bool {
        self.travel_mode().is_transit()
    }

    /// Whether this leg is walked
    #[must_use]
    pub fn is_walk(&self) -> bool {
        self.travel_mode().is_walk()
    }

    /// Whether this leg is cycled
    #[must_use]
    pub fn is_bicycle(&self) -> bool {
        self.travel_mode().is_bicycle()
    }

    /// Whether this leg is driven
    #[must_use]
    pub fn is_car(&self) -> bool {
        self.travel_mode().is_car()
    }

    /// Map color for this leg's mode
    #[must_use]
    pub fn map_color(&self) -> &'static str {
        self.travel_mode().map_color()
    }

    /// Elapsed time in whole seconds
    #[must_use]
    pub const fn duration_secs(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time) / 1000
    }

    /// Start time as a timestamp
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_time)
    }

    /// End time as a timestamp
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.end_time)
    }

    /// Decoded shape of the leg; empty when OTP sent no geometry
    #[must_use]
    pub fn geometry_points(&self) -> Vec<GeoLocation> {
        self.leg_geometry
            .as_ref()
            .map(|g| crate::polyline::decode(&g.points))
            .unwrap_or_default()
    }

    /// Short route label for summaries (`"V15"`, falling back to the mode)
    #[must_use]
    pub fn route_label(&self) -> &str {
        self.route_short_name
            .as_deref()
            .or(self.route.as_deref())
            .filter(|r| !r.is_empty())
            .unwrap_or(self.mode.as_str())
    }

    /// Format this leg as a detailed line
    #[must_use]
    pub fn format_detail(&self) -> String {
        let times = match (self.start(), self.end()) {
            (Some(s), Some(e)) => format!("{}–{}", s.format("%H:%M"), e.format("%H:%M")),
            _ => String::from("--:--"),
        };
        let from = self.from.label();
        let to = self.to.label();

        if self.is_transit() {
            let headsign = self
                .headsign
                .as_deref()
                .map(|h| format!(" → {h}"))
                .unwrap_or_default();
            format!(
                "{times} {} {}{headsign} ({from} → {to})",
                self.mode,
                self.route_label()
            )
        } else {
            format!("{times} {} {:.0}m ({from} → {to})", self.mode, self.distance)
        }
    }
}

impl fmt::Display for ItineraryLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_detail())
    }
}

/// Transit classification for a bare mode string
#[must_use]
pub fn is_transit_mode(mode: &str) -> bool {
    TravelMode::from_otp(mode).is_transit()
}

/// Map color for a bare mode string
#[must_use]
pub fn map_color_for(mode: &str) -> &'static str {
    TravelMode::from_otp(mode).map_color()
}
