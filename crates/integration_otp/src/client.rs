//! OpenTripPlanner HTTP client
//!
//! Submits plan and stop-search requests to an OTP router over its REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::OtpConfig;
use crate::error::{FailurePayload, OtpError};
use crate::plan_request::{PlanRequest, credential_params};
use crate::plan_response::PlanResponse;
use crate::stops::{StopsInRectangleRequest, StopsResponse};

/// Trait for OTP service clients
#[async_trait]
pub trait OtpClient: Send + Sync {
    /// Plan a trip
    ///
    /// Fails with `OtpError::MissingParameter` without calling the server when
    /// the request lacks an origin or destination.
    async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, OtpError>;

    /// Find the stops inside a rectangle
    ///
    /// Fails with `OtpError::IncompleteBounds` without calling the server when
    /// a corner coordinate is missing.
    async fn stops_in_rectangle(
        &self,
        request: &StopsInRectangleRequest,
    ) -> Result<StopsResponse, OtpError>;

    /// Check if the OTP router is reachable
    async fn is_healthy(&self) -> bool;
}

/// OTP client over `reqwest`
#[derive(Debug)]
pub struct HttpOtpClient {
    client: Client,
    config: OtpConfig,
}

impl HttpOtpClient {
    /// Create a new OTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &OtpConfig) -> Result<Self, OtpError> {
        config.validate().map_err(OtpError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("otp-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OtpError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// GET `url` and return the body of a successful response
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> Result<String, OtpError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OtpError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    OtpError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let payload = FailurePayload::from_body(&body);
            warn!(%status, %payload, "OTP request failed");
            return Err(OtpError::RequestFailed {
                status: status.as_u16(),
                payload,
            });
        }

        response
            .text()
            .await
            .map_err(|e| OtpError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl OtpClient for HttpOtpClient {
    #[instrument(skip(self, request), fields(from = ?request.get_str("fromPlace"), to = ?request.get_str("toPlace")))]
    async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, OtpError> {
        request.validate()?;

        let url = self.config.plan_url();
        let params = request.query_params(&self.config);

        debug!(?url, "Planning trip");

        let body = self.fetch(&url, &params).await?;
        let response = PlanResponse::from_json(&body)?.with_request(request.clone());

        if let Some(error) = &response.error {
            warn!(%error, "Planner reported an error");
        } else if response.is_empty() {
            warn!("No itineraries found");
        }

        debug!(count = response.itineraries.len(), "Itineraries found");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn stops_in_rectangle(
        &self,
        request: &StopsInRectangleRequest,
    ) -> Result<StopsResponse, OtpError> {
        request.validate()?;

        let url = self.config.stops_url();
        let params = request.query_params(&self.config);

        debug!(?url, "Searching stops in rectangle");

        let body = self.fetch(&url, &params).await?;
        let response = StopsResponse::from_json(&body)?.with_request(request.clone());

        debug!(count = response.len(), "Stops found");
        Ok(response)
    }

    async fn is_healthy(&self) -> bool {
        self.client
            .get(&self.config.base_url)
            .query(&credential_params(&self.config))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = OtpConfig {
            base_url: String::new(),
            ..OtpConfig::for_testing()
        };
        assert!(matches!(
            HttpOtpClient::new(&config),
            Err(OtpError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_new_keeps_config() {
        let config = OtpConfig::for_testing();
        let client = HttpOtpClient::new(&config).unwrap();
        assert_eq!(client.config().base_url, config.base_url);
    }

    #[tokio::test]
    async fn test_plan_validation_short_circuits() {
        // Nothing listens on this port; validation must fail before any I/O
        let config = OtpConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..OtpConfig::for_testing()
        };
        let client = HttpOtpClient::new(&config).unwrap();
        let request = PlanRequest::new().with_from_place("41.3,2.1");

        let err = client.plan(&request).await.unwrap_err();
        assert!(matches!(err, OtpError::MissingParameter("toPlace")));
    }

    #[tokio::test]
    async fn test_stops_validation_short_circuits() {
        let config = OtpConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..OtpConfig::for_testing()
        };
        let client = HttpOtpClient::new(&config).unwrap();

        let err = client
            .stops_in_rectangle(&StopsInRectangleRequest::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::IncompleteBounds));
    }

    #[test]
    fn test_unreachable_router_is_unhealthy() {
        let config = OtpConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..OtpConfig::for_testing()
        };
        let client = HttpOtpClient::new(&config).unwrap();
        assert!(!tokio_test::block_on(client.is_healthy()));
    }
}
