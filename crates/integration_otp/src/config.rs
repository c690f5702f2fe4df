//! OTP client configuration

use std::collections::BTreeMap;

use domain::GeoLocation;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Geocoding provider the front end should use for free-text places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    /// Places must be entered as coordinates
    #[default]
    None,
    /// OpenStreetMap Nominatim
    Nominatim,
    /// Esri World Geocoder
    Esri,
}

/// Configuration for an OpenTripPlanner deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Base URL of the OTP router API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the trip planning endpoint, relative to `base_url`
    #[serde(default = "default_plan_path")]
    pub plan_path: String,

    /// Path of the stops-in-rectangle endpoint, relative to `base_url`
    #[serde(default = "default_stops_path")]
    pub stops_path: String,

    /// API key sent as `app_key` on every call
    #[serde(default, skip_serializing)]
    pub app_key: Option<SecretString>,

    /// Application id sent as `app_id` on every call
    #[serde(default, skip_serializing)]
    pub app_id: Option<SecretString>,

    /// Router to query when a request does not name one
    #[serde(default)]
    pub router_id: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Parameters applied to every new plan request (e.g. `maxWalkDistance`)
    #[serde(default)]
    pub default_params: BTreeMap<String, serde_json::Value>,

    /// Mode strings offered to the user (e.g. `"TRANSIT,WALK"`)
    #[serde(default = "default_enabled_modes")]
    pub enabled_modes: Vec<String>,

    /// Geocoder selection
    #[serde(default)]
    pub geocoder: GeocoderProvider,

    /// Resolve clicked map points to addresses
    #[serde(default)]
    pub reverse_geocoding: bool,

    /// Map center shown before any query
    #[serde(default)]
    pub initial_center: Option<GeoLocation>,

    /// Map zoom shown before any query
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,

    /// Tile provider key for the base map
    #[serde(default, skip_serializing)]
    pub map_tile_key: Option<SecretString>,
}

fn default_base_url() -> String {
    "http://localhost:8080/otp/routers/default".to_string()
}

fn default_plan_path() -> String {
    "/plan".to_string()
}

fn default_stops_path() -> String {
    "/transit/stopsInRectangle".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_enabled_modes() -> Vec<String> {
    ["TRANSIT,WALK", "BUSISH,WALK", "TRAINISH,WALK", "WALK", "BICYCLE", "CAR"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_initial_zoom() -> u8 {
    13
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            plan_path: default_plan_path(),
            stops_path: default_stops_path(),
            app_key: None,
            app_id: None,
            router_id: None,
            timeout_secs: default_timeout_secs(),
            default_params: BTreeMap::new(),
            enabled_modes: default_enabled_modes(),
            geocoder: GeocoderProvider::default(),
            reverse_geocoding: false,
            initial_center: None,
            initial_zoom: default_initial_zoom(),
            map_tile_key: None,
        }
    }
}

impl OtpConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Full URL of the trip planning endpoint
    #[must_use]
    pub fn plan_url(&self) -> String {
        join_url(&self.base_url, &self.plan_path)
    }

    /// Full URL of the stops-in-rectangle endpoint
    #[must_use]
    pub fn stops_url(&self) -> String {
        join_url(&self.base_url, &self.stops_path)
    }

    /// Whether a mode string is one of the enabled modes
    #[must_use]
    pub fn is_mode_enabled(&self, mode: &str) -> bool {
        self.enabled_modes.iter().any(|m| m.eq_ignore_ascii_case(mode))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        url::Url::parse(&self.base_url).map_err(|e| format!("base_url is not a URL: {e}"))?;

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.enabled_modes.is_empty() {
            return Err("enabled_modes must not be empty".to_string());
        }

        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = OtpConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/otp/routers/default");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.app_key.is_none());
        assert_eq!(config.geocoder, GeocoderProvider::None);
        assert!(!config.reverse_geocoding);
        assert!(config.is_mode_enabled("TRANSIT,WALK"));
        assert!(config.is_mode_enabled("walk"));
        assert!(!config.is_mode_enabled("FERRY"));
    }

    #[test]
    fn test_endpoint_urls() {
        let config = OtpConfig {
            base_url: "http://otp.example.com/otp/routers/default/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.plan_url(),
            "http://otp.example.com/otp/routers/default/plan"
        );
        assert_eq!(
            config.stops_url(),
            "http://otp.example.com/otp/routers/default/transit/stopsInRectangle"
        );
    }

    #[test]
    fn test_empty_plan_path_uses_base() {
        let config = OtpConfig {
            base_url: "http://otp.example.com/ws/plan".to_string(),
            plan_path: String::new(),
            ..Default::default()
        };
        assert_eq!(config.plan_url(), "http://otp.example.com/ws/plan");
    }

    #[test]
    fn test_validation_success() {
        assert!(OtpConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = OtpConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_malformed_base_url() {
        let config = OtpConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = OtpConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_secrets() {
        let json = r#"{
            "base_url": "https://otp.example.com/otp/routers/bcn",
            "app_key": "key-123",
            "app_id": "app-456",
            "geocoder": "nominatim",
            "initial_center": { "latitude": 41.38, "longitude": 2.17 },
            "default_params": { "maxWalkDistance": 804.672 }
        }"#;
        let config: OtpConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.app_key.as_ref().unwrap().expose_secret(), "key-123");
        assert_eq!(config.app_id.as_ref().unwrap().expose_secret(), "app-456");
        assert_eq!(config.geocoder, GeocoderProvider::Nominatim);
        assert!(config.initial_center.is_some());
        assert!(config.default_params.contains_key("maxWalkDistance"));
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = OtpConfig {
            app_key: Some(SecretString::from("key-123")),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("key-123"));
        assert!(!json.contains("app_key"));
    }
}
