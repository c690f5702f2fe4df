//! OpenTripPlanner integration
//!
//! Typed access to an [OpenTripPlanner](https://www.opentripplanner.org) router:
//! trip plans built from a flat parameter set, stop searches over a
//! geographic rectangle, and the itinerary graph both return.
//!
//! # Architecture
//!
//! [`OtpClient`] defines the interface for planning and stop search and is
//! implemented over HTTP by [`HttpOtpClient`]. Requests ([`PlanRequest`],
//! [`StopsInRectangleRequest`]) validate themselves before any network call.
//! Responses ([`PlanResponse`], [`StopsResponse`]) keep a copy of the request
//! that produced them, so durations can be computed against the requested
//! time.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_otp::{HttpOtpClient, OtpClient, OtpConfig, PlanRequest};
//!
//! let config = OtpConfig::default();
//! let client = HttpOtpClient::new(&config)?;
//!
//! let request = PlanRequest::from_config(&config)
//!     .with_from_place("41.3851,2.1734")
//!     .with_to_place("41.4036,2.1744")
//!     .with_date_time("2024-06-01", "09:00");
//!
//! let mut response = client.plan(&request).await?;
//! response.itineraries_mut().activate(0);
//! ```

mod client;
mod config;
mod error;
mod itinerary;
mod leg;
mod params;
mod plan_request;
mod plan_response;
mod polyline;
mod stops;

pub use client::{HttpOtpClient, OtpClient};
pub use config::{GeocoderProvider, OtpConfig};
pub use error::{FailurePayload, OtpError};
pub use itinerary::{ActivationChange, Itinerary, ItineraryList, SelectionListener};
pub use leg::{
    AgencyAndId, ItineraryLeg, ItineraryStop, LegGeometry, WalkStep, is_transit_mode,
    map_color_for,
};
pub use params::{filter_params, is_unset, param_to_string};
pub use plan_request::{DECLARED_PARAMS, PlanRequest};
pub use plan_response::{PlanResponse, PlannerError};
pub use stops::{Stop, StopsInRectangleRequest, StopsResponse};
