//! Stops-in-rectangle request and response models

use std::fmt;

use domain::{Bounds, GeoLocation};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::leg::AgencyAndId;
use crate::params::{filter_params, param_to_string};
use crate::plan_request::credential_params;

/// A geographic stop search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopsInRectangleRequest {
    /// Router to search (server default when `None`)
    pub router_id: Option<String>,
    /// Only return stops of this agency
    pub agency: Option<String>,
    /// Latitude of the upper-left corner
    pub left_up_lat: Option<f64>,
    /// Longitude of the upper-left corner
    pub left_up_lon: Option<f64>,
    /// Latitude of the lower-right corner
    pub right_down_lat: Option<f64>,
    /// Longitude of the lower-right corner
    pub right_down_lon: Option<f64>,
    /// Ask for the extended stop representation (routes included)
    pub extended: Option<bool>,
}

impl StopsInRectangleRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request covering `bounds`
    #[must_use]
    pub const fn from_bounds(bounds: Bounds) -> Self {
        Self {
            router_id: None,
            agency: None,
            left_up_lat: Some(bounds.north),
            left_up_lon: Some(bounds.west),
            right_down_lat: Some(bounds.south),
            right_down_lon: Some(bounds.east),
            extended: None,
        }
    }

    /// Create a request pre-filled with the configured router
    #[must_use]
    pub fn from_config(config: &OtpConfig) -> Self {
        Self {
            router_id: config.router_id.clone(),
            ..Self::default()
        }
    }

    /// Set the router
    #[must_use]
    pub fn with_router_id(mut self, router_id: impl Into<String>) -> Self {
        self.router_id = Some(router_id.into());
        self
    }

    /// Restrict to one agency
    #[must_use]
    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.agency = Some(agency.into());
        self
    }

    /// Set the rectangle
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.left_up_lat = Some(bounds.north);
        self.left_up_lon = Some(bounds.west);
        self.right_down_lat = Some(bounds.south);
        self.right_down_lon = Some(bounds.east);
        self
    }

    /// The rectangle, if all four coordinates are present
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Some(Bounds::from_corners(
            GeoLocation::new_unchecked(self.left_up_lat?, self.left_up_lon?),
            GeoLocation::new_unchecked(self.right_down_lat?, self.right_down_lon?),
        ))
    }

    /// Check that the rectangle is complete
    ///
    /// # Errors
    ///
    /// Returns `OtpError::IncompleteBounds` if any coordinate is missing.
    pub fn validate(&self) -> Result<(), OtpError> {
        self.bounds().map(|_| ()).ok_or(OtpError::IncompleteBounds)
    }

    /// Parameters for the HTTP call, including the configured credentials
    #[must_use]
    pub fn query_params(&self, config: &OtpConfig) -> Vec<(String, String)> {
        let params: [(&str, Value); 7] = [
            ("routerId", self.router_id.clone().into()),
            ("agency", self.agency.clone().into()),
            ("leftUpLat", self.left_up_lat.into()),
            ("leftUpLon", self.left_up_lon.into()),
            ("rightDownLat", self.right_down_lat.into()),
            ("rightDownLon", self.right_down_lon.into()),
            ("extended", self.extended.into()),
        ];

        let mut query: Vec<(String, String)> = filter_params(params)
            .into_iter()
            .map(|(k, v): (&str, Value)| (k.to_string(), param_to_string(&v)))
            .collect();
        query.extend(credential_params(config));
        query
    }
}

/// A transit stop returned by a stop search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stop {
    /// Server-issued identifier (sent as `id`, exposed as `stopId`)
    ///
    /// Object-form ids (`{"agencyId", "id"}`) are flattened to `agency:id`.
    #[serde(alias = "id", deserialize_with = "agency_and_id_string")]
    pub stop_id: String,
    /// Display name
    #[serde(alias = "stopName", deserialize_with = "null_as_empty")]
    pub name: String,
    /// Latitude
    #[serde(alias = "stopLat")]
    pub lat: Option<f64>,
    /// Longitude
    #[serde(alias = "stopLon")]
    pub lon: Option<f64>,
    /// Rider-facing stop code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Routes serving the stop (extended representation only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Value>,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stop {
    /// Create a new stop
    #[must_use]
    pub fn new(stop_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a stop with coordinates
    #[must_use]
    pub fn with_coords(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Coordinates, if both are present and valid
    #[must_use]
    pub fn location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.lat?, self.lon?).ok()
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.stop_id)
    }
}

/// Result of a stop search
#[derive(Debug, Clone, Default, Serialize)]
pub struct StopsResponse {
    /// Stops in server order
    pub stops: Vec<Stop>,
    /// The request this response answers
    #[serde(skip)]
    pub request: Option<StopsInRectangleRequest>,
}

impl StopsResponse {
    /// Parse a response body
    ///
    /// Accepts both `{"stops": [...]}` and a bare array. A body without
    /// `stops` yields an empty response.
    ///
    /// # Errors
    ///
    /// Returns `OtpError::ParseError` if the body is not JSON or a stop has
    /// the wrong shape.
    pub fn from_json(body: &str) -> Result<Self, OtpError> {
        let raw: RawStopsResponse =
            serde_json::from_str(body).map_err(|e| OtpError::ParseError(e.to_string()))?;

        let stops = match raw {
            RawStopsResponse::Wrapped { stops } => stops,
            RawStopsResponse::Bare(stops) => stops,
        };

        Ok(Self {
            stops,
            request: None,
        })
    }

    /// Attach the originating request
    #[must_use]
    pub fn with_request(mut self, request: StopsInRectangleRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Number of stops
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether no stops were found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

fn agency_and_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<AgencyAndId>::deserialize(deserializer)?
        .map(|id| id.to_string())
        .unwrap_or_default())
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawStopsResponse {
    Wrapped {
        #[serde(default)]
        stops: Vec<Stop>,
    },
    Bare(Vec<Stop>),
}
