//! Configuration loading
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults ([`OtpConfig::default`])
//! 2. `otp.toml` in the working directory, or the file given with `--config`
//! 3. `OTP_*` environment variables (e.g. `OTP_BASE_URL`, `OTP_APP_KEY`)

use std::path::Path;

use integration_otp::OtpConfig;

const ENV_PREFIX: &str = "OTP";

/// Load the OTP configuration
///
/// An explicit `path` must exist; the default `otp.toml` is optional.
pub fn load(path: Option<&Path>) -> Result<OtpConfig, config::ConfigError> {
    build(path, None)
}

fn build(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<OtpConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("otp").required(false),
    };

    config::Config::builder()
        .add_source(file)
        // Double underscore keeps field names like `base_url` intact
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use integration_otp::GeocoderProvider;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let config = build(None, env(&[])).unwrap();
        assert_eq!(config.base_url, OtpConfig::default().base_url);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.app_key.is_none());
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otp.toml");
        fs::write(
            &path,
            r#"
base_url = "https://otp.example.org/otp/routers/bcn"
router_id = "bcn"
timeout_secs = 20
enabled_modes = ["TRANSIT,WALK", "WALK"]
geocoder = "nominatim"

[default_params]
maxWalkDistance = 800
"#,
        )
        .unwrap();

        let config = build(Some(&path), env(&[])).unwrap();
        assert_eq!(config.base_url, "https://otp.example.org/otp/routers/bcn");
        assert_eq!(config.router_id.as_deref(), Some("bcn"));
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.enabled_modes.len(), 2);
        assert_eq!(config.geocoder, GeocoderProvider::Nominatim);
        assert_eq!(config.default_params["maxWalkDistance"], 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otp.toml");
        fs::write(&path, "timeout_secs = 20\n").unwrap();

        let config = build(
            Some(&path),
            env(&[("OTP_TIMEOUT_SECS", "3"), ("OTP_ROUTER_ID", "tampa")]),
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.router_id.as_deref(), Some("tampa"));
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(build(Some(&path), env(&[])).is_err());
    }
}
