//! Trip plan response model

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::OtpError;
use crate::itinerary::{Itinerary, ItineraryList};
use crate::leg::ItineraryStop;
use crate::plan_request::PlanRequest;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Planner error reported by OTP instead of (or alongside) a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerError {
    /// Numeric error code (e.g. 404 for no path)
    pub id: Option<i64>,
    /// Localized, human-readable message
    pub msg: Option<String>,
    /// Machine-readable message key (e.g. `PATH_NOT_FOUND`)
    pub message: Option<String>,
    /// Whether the failure means no route exists
    pub no_path: bool,
    /// Request parameters OTP found missing
    pub missing: Vec<String>,
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .msg
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("planner error");
        match self.id {
            Some(id) => write!(f, "{text} ({id})"),
            None => write!(f, "{text}"),
        }
    }
}

/// Result of a trip plan query
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    /// Query date echoed by the server, in epoch milliseconds
    pub date: Option<i64>,
    /// Origin snapshot
    pub from: Option<ItineraryStop>,
    /// Destination snapshot
    pub to: Option<ItineraryStop>,
    /// Candidate itineraries in server order
    pub itineraries: ItineraryList,
    /// Other `plan` fields, kept verbatim
    pub plan_extra: Map<String, Value>,
    /// Parameters the server says it received
    pub request_parameters: Map<String, Value>,
    /// Planner error, if OTP reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PlannerError>,
    /// The request this response answers
    #[serde(skip)]
    pub request: Option<PlanRequest>,
}

impl PlanResponse {
    /// Parse a response body
    ///
    /// # Errors
    ///
    /// Returns `OtpError::ParseError` if the body is not JSON or a known field
    /// has the wrong type. Missing fields are tolerated.
    pub fn from_json(body: &str) -> Result<Self, OtpError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| OtpError::ParseError(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a response from an already decoded JSON document
    ///
    /// # Errors
    ///
    /// Returns `OtpError::ParseError` if a known field has the wrong type.
    pub fn from_value(value: Value) -> Result<Self, OtpError> {
        let raw: RawPlanEnvelope =
            serde_json::from_value(value).map_err(|e| OtpError::ParseError(e.to_string()))?;

        let error = raw.error.map(|value| {
            PlannerError::deserialize(&value).unwrap_or_else(|_| {
                warn!(%value, "Unrecognized planner error shape");
                PlannerError {
                    msg: Some(value.to_string()),
                    ..PlannerError::default()
                }
            })
        });

        let Some(plan) = raw.plan else {
            return Ok(Self {
                request_parameters: raw.request_parameters,
                error,
                ..Self::default()
            });
        };

        Ok(Self {
            date: plan.date,
            from: plan.from,
            to: plan.to,
            itineraries: ItineraryList::from(plan.itineraries),
            plan_extra: plan.extra,
            request_parameters: raw.request_parameters,
            error,
            request: None,
        })
    }

    /// Attach the originating request
    #[must_use]
    pub fn with_request(mut self, request: PlanRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Hours between the requested instant and the server's reported date
    ///
    /// Positive when the request is ahead of the server. `0.0` if either the
    /// request or the date is missing.
    #[must_use]
    pub fn time_offset_hours(&self) -> f64 {
        let (Some(request), Some(date)) = (&self.request, self.date) else {
            return 0.0;
        };
        let Some(requested) = request.requested_instant() else {
            return 0.0;
        };
        #[allow(clippy::cast_precision_loss)]
        let diff = (requested.timestamp_millis() - date) as f64;
        diff / MILLIS_PER_HOUR
    }

    /// [`Itinerary::full_duration_ms`] for the itinerary at `index`, using the
    /// attached request and this response's time offset
    #[must_use]
    pub fn full_duration_ms(&self, index: usize) -> Option<i64> {
        let request = self.request.as_ref()?;
        self.itineraries
            .get(index)?
            .full_duration_ms(request, self.time_offset_hours())
    }

    /// Whether the response holds no itineraries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }

    /// Mutable access to the itinerary list, for selection
    pub fn itineraries_mut(&mut self) -> &mut ItineraryList {
        &mut self.itineraries
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlanEnvelope {
    #[serde(default)]
    request_parameters: Map<String, Value>,
    plan: Option<RawPlan>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    date: Option<i64>,
    from: Option<ItineraryStop>,
    to: Option<ItineraryStop>,
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // 2024-01-01T09:00:00Z
    const NINE_AM: i64 = 1_704_099_600_000;

    fn sample() -> Value {
        json!({
            "requestParameters": { "fromPlace": "41.38,2.17", "toPlace": "41.41,2.15" },
            "plan": {
                "date": NINE_AM,
                "from": { "name": "Origin", "lat": 41.38, "lon": 2.17 },
                "to": { "name": "Destination", "lat": 41.41, "lon": 2.15 },
                "itineraries": [
                    { "startTime": NINE_AM, "endTime": NINE_AM + 1_800_000, "legs": [] },
                    { "startTime": NINE_AM + 600_000, "endTime": NINE_AM + 2_400_000, "legs": [] }
                ],
                "debugOutput": { "totalTime": 42 }
            }
        })
    }

    #[test]
    fn test_from_value_builds_graph() {
        let response = PlanResponse::from_value(sample()).unwrap();
        assert_eq!(response.itineraries.len(), 2);
        assert_eq!(response.itineraries.get(0).unwrap().start_time, NINE_AM);
        assert_eq!(
            response.itineraries.get(1).unwrap().start_time,
            NINE_AM + 600_000
        );
        assert_eq!(
            response.from.as_ref().unwrap().name.as_deref(),
            Some("Origin")
        );
        assert_eq!(
            response.to.as_ref().unwrap().name.as_deref(),
            Some("Destination")
        );
        assert_eq!(response.date, Some(NINE_AM));
        assert!(response.plan_extra.contains_key("debugOutput"));
        assert_eq!(response.request_parameters["fromPlace"], "41.38,2.17");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_missing_plan_is_empty() {
        let response = PlanResponse::from_value(json!({})).unwrap();
        assert!(response.is_empty());
        assert!(response.from.is_none());
        assert!(response.date.is_none());
    }

    #[test]
    fn test_plan_without_itineraries() {
        let response = PlanResponse::from_value(json!({ "plan": { "date": 1 } })).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.date, Some(1));
    }

    #[test]
    fn test_planner_error() {
        let body = r#"{
            "requestParameters": {},
            "error": { "id": 404, "msg": "No trip found.", "message": "PATH_NOT_FOUND", "noPath": true }
        }"#;
        let response = PlanResponse::from_json(body).unwrap();
        assert!(response.is_empty());
        let error = response.error.unwrap();
        assert!(error.no_path);
        assert_eq!(error.to_string(), "No trip found. (404)");
    }

    #[test]
    fn test_unrecognized_error_shape_is_kept() {
        let response = PlanResponse::from_value(json!({ "error": "boom" })).unwrap();
        assert_eq!(response.error.unwrap().msg.as_deref(), Some("\"boom\""));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PlanResponse::from_json("not json"),
            Err(OtpError::ParseError(_))
        ));
    }

    #[test]
    fn test_wrong_itineraries_type() {
        let result = PlanResponse::from_value(json!({ "plan": { "itineraries": 3 } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_time_offset_hours() {
        let request = PlanRequest::new().with_date_time("2024-01-01", "11:00");
        let response = PlanResponse::from_value(sample())
            .unwrap()
            .with_request(request);
        assert!((response.time_offset_hours() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_offset_negative() {
        let request = PlanRequest::new().with_date_time("2024-01-01", "08:30");
        let response = PlanResponse::from_value(sample())
            .unwrap()
            .with_request(request);
        assert!((response.time_offset_hours() + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_offset_without_request() {
        let response = PlanResponse::from_value(sample()).unwrap();
        assert!(response.time_offset_hours().abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_duration_through_response() {
        let request = PlanRequest::new().with_date_time("2024-01-01", "09:00");
        let response = PlanResponse::from_value(sample())
            .unwrap()
            .with_request(request);
        assert_eq!(response.full_duration_ms(0), Some(1_800_000));
        assert_eq!(response.full_duration_ms(1), Some(2_400_000));
        assert_eq!(response.full_duration_ms(2), None);
    }

    #[test]
    fn test_serialize_omits_request() {
        let response = PlanResponse::from_value(sample())
            .unwrap()
            .with_request(PlanRequest::new());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("request").is_none());
        assert_eq!(json["itineraries"].as_array().unwrap().len(), 2);
    }
}
