//! Trip plan request model
//!
//! A [`PlanRequest`] is an ordered set of OTP `plan` query parameters. Every
//! parameter OTP documents is declared up front (unset), so serialization
//! always follows the same order regardless of the order fields were set in.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::GeoLocation;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::params::{filter_params, is_unset, param_to_string};

/// Plan parameters in the order they are serialized
pub const DECLARED_PARAMS: [&str; 28] = [
    "fromPlace",
    "toPlace",
    "intermediatePlaces",
    "intermediatePlacesOrdered",
    "date",
    "time",
    "routerId",
    "arriveBy",
    "wheelchair",
    "maxWalkDistance",
    "walkSpeed",
    "bikeSpeed",
    "triangleSafetyFactor",
    "triangleSlopeFactor",
    "triangleTimeFactor",
    "optimize",
    "mode",
    "minTransferTime",
    "numItineraries",
    "preferredRoutes",
    "otherThanPreferredRoutesPenalty",
    "bannedRoutes",
    "showIntermediateStops",
    "transferPenalty",
    "nonpreferredTransferPenalty",
    "maxTransfers",
    "walkReluctance",
    "waitReluctance",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M%p", "%I:%M %p"];

/// A trip planning query
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    params: Vec<(String, Value)>,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            params: DECLARED_PARAMS
                .iter()
                .map(|key| ((*key).to_string(), Value::Null))
                .collect(),
        }
    }
}

impl PlanRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request pre-filled with the configured defaults and router
    #[must_use]
    pub fn from_config(config: &OtpConfig) -> Self {
        let mut request = Self::default();
        request.set_parameters(config.default_params.clone());
        if let Some(router_id) = &config.router_id {
            request.set_parameter("routerId", router_id.as_str());
        }
        request
    }

    /// Parse a query string into a fresh request
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let mut request = Self::default();
        request.merge_query_string(query);
        request
    }

    /// Set one parameter, appending it if it is not declared
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((key, value)),
        }
    }

    /// Merge several parameters into the current state
    pub fn set_parameters<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in fields {
            self.set_parameter(key, value);
        }
    }

    /// Builder form of [`Self::set_parameter`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_parameter(key, value);
        self
    }

    /// Set the origin (`"lat,lon"` optionally followed by `::label`)
    #[must_use]
    pub fn with_from_place(self, place: impl Into<String>) -> Self {
        self.with("fromPlace", place.into())
    }

    /// Set the destination (`"lat,lon"` optionally followed by `::label`)
    #[must_use]
    pub fn with_to_place(self, place: impl Into<String>) -> Self {
        self.with("toPlace", place.into())
    }

    /// Set the requested date and time
    #[must_use]
    pub fn with_date_time(self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.with("date", date.into()).with("time", time.into())
    }

    /// Set the mode string (e.g. `"TRANSIT,WALK"`)
    #[must_use]
    pub fn with_mode(self, mode: impl Into<String>) -> Self {
        self.with("mode", mode.into())
    }

    /// Anchor the query to the arrival time instead of the departure time
    #[must_use]
    pub fn with_arrive_by(self, arrive_by: bool) -> Self {
        self.with("arriveBy", arrive_by)
    }

    /// A parameter's value, or `None` if it is unset
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !is_unset(v))
    }

    /// A parameter's value if it is a non-empty string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Check that both endpoints are present
    ///
    /// # Errors
    ///
    /// Returns `OtpError::MissingParameter` naming the first missing endpoint.
    pub fn validate(&self) -> Result<(), OtpError> {
        for key in ["fromPlace", "toPlace"] {
            if self.get(key).is_none() {
                return Err(OtpError::MissingParameter(key));
            }
        }
        Ok(())
    }

    /// All set parameters in serialization order
    #[must_use]
    pub fn non_empty_params(&self) -> Vec<(&str, Value)> {
        filter_params(self.params.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }

    /// Parameters for the HTTP call, including the configured credentials
    #[must_use]
    pub fn query_params(&self, config: &OtpConfig) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .non_empty_params()
            .into_iter()
            .map(|(k, v)| (k.to_string(), param_to_string(&v)))
            .collect();
        params.extend(credential_params(config));
        params
    }

    /// `?key=value&...` over the set parameters
    ///
    /// Values are written verbatim without percent-encoding; callers that
    /// build URLs from user input must encode them themselves.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .non_empty_params()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", param_to_string(&v)))
            .collect();
        format!("?{}", pairs.join("&"))
    }

    /// Apply the `key=value` segments of a query string
    ///
    /// A leading `?` is ignored. Segments that do not split into exactly a key
    /// and a value are skipped.
    pub fn merge_query_string(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for segment in query.split('&') {
            let parts: Vec<&str> = segment.split('=').collect();
            if let [key, value] = parts.as_slice() {
                self.set_parameter(*key, *value);
            }
        }
    }

    /// Coordinates of the origin, if it is set and starts with `lat,lon`
    #[must_use]
    pub fn origin_lat_lng(&self) -> Option<GeoLocation> {
        self.place_lat_lng("fromPlace")
    }

    /// Coordinates of the destination, if it is set and starts with `lat,lon`
    #[must_use]
    pub fn destination_lat_lng(&self) -> Option<GeoLocation> {
        self.place_lat_lng("toPlace")
    }

    fn place_lat_lng(&self, key: &str) -> Option<GeoLocation> {
        self.get_str(key)
            .and_then(|place| GeoLocation::from_place(place).ok())
    }

    /// Whether the query is anchored to the arrival time
    ///
    /// Accepts both a boolean `true` and the string `"true"`.
    #[must_use]
    pub fn is_arrive_by(&self) -> bool {
        match self.get("arriveBy") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// The instant the user asked to depart at or arrive by
    ///
    /// The wall-clock `date` and `time` are read as UTC; the difference to the
    /// server's clock is reconciled by `PlanResponse::time_offset_hours`.
    #[must_use]
    pub fn requested_instant(&self) -> Option<DateTime<Utc>> {
        let date = parse_date(self.get_str("date")?)?;
        let time = parse_time(self.get_str("time")?)?;
        Some(date.and_time(time).and_utc())
    }
}

/// `app_key` / `app_id` pairs for the configured credentials
pub(crate) fn credential_params(config: &OtpConfig) -> Vec<(String, String)> {
    [("app_key", &config.app_key), ("app_id", &config.app_id)]
        .into_iter()
        .filter_map(|(name, secret)| {
            secret
                .as_ref()
                .map(|s| (name.to_string(), s.expose_secret().to_string()))
        })
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value.trim(), fmt).ok())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value.trim(), fmt).ok())
}
