//! OpenTripPlanner CLI
//!
//! Command-line front end for planning trips and browsing stops against an
//! OTP router.

#![allow(clippy::print_stdout)]

mod output;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use integration_otp::{
    HttpOtpClient, OtpClient, OtpConfig, OtpError, PlanRequest, StopsInRectangleRequest,
};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// OpenTripPlanner CLI
#[derive(Parser)]
#[command(name = "otp-cli")]
#[command(author, version, about = "OpenTripPlanner command-line client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./otp.toml when present)
    #[arg(short, long, env = "OTP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip
    ///
    /// Example: otp-cli plan --from 41.3851,2.1734 --to 41.4036,2.1744 --mode TRANSIT,WALK
    Plan(PlanArgs),

    /// List the stops inside a rectangle
    ///
    /// Example: otp-cli stops --north 41.41 --west 2.17 --south 41.40 --east 2.18
    Stops(StopsArgs),

    /// Show the configured travel modes and their map colors
    Modes,

    /// Check that the OTP router is reachable
    Health,
}

#[derive(Args, Debug, Default)]
struct PlanArgs {
    /// Origin as `lat,lon` or `lat,lon::label`
    #[arg(long)]
    from: Option<String>,

    /// Destination as `lat,lon` or `lat,lon::label`
    #[arg(long)]
    to: Option<String>,

    /// Travel date (e.g. 2024-06-01)
    #[arg(long)]
    date: Option<String>,

    /// Travel time (e.g. 09:00)
    #[arg(long)]
    time: Option<String>,

    /// Treat date and time as the latest arrival
    #[arg(long)]
    arrive_by: bool,

    /// Mode string (e.g. TRANSIT,WALK)
    #[arg(long)]
    mode: Option<String>,

    /// Start from a saved query string (`?fromPlace=...&toPlace=...`)
    #[arg(long)]
    query: Option<String>,

    /// Extra planner parameter as key=value (repeatable)
    #[arg(short, long = "param", value_parser = parse_key_val)]
    params: Vec<(String, String)>,

    /// Itinerary to expand (1-based)
    #[arg(long, default_value_t = 1)]
    select: usize,

    /// Print turn-by-turn steps of street legs
    #[arg(long)]
    steps: bool,

    /// Print the raw response as JSON
    #[arg(long)]
    json: bool,

    /// Print the request URL instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug, Default)]
struct StopsArgs {
    /// Northern latitude
    #[arg(long, allow_negative_numbers = true)]
    north: Option<f64>,

    /// Western longitude
    #[arg(long, allow_negative_numbers = true)]
    west: Option<f64>,

    /// Southern latitude
    #[arg(long, allow_negative_numbers = true)]
    south: Option<f64>,

    /// Eastern longitude
    #[arg(long, allow_negative_numbers = true)]
    east: Option<f64>,

    /// Router to search
    #[arg(long)]
    router: Option<String>,

    /// Only stops of this agency
    #[arg(long)]
    agency: Option<String>,

    /// Include the routes serving each stop
    #[arg(long)]
    extended: bool,

    /// Print the raw response as JSON
    #[arg(long)]
    json: bool,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a `key=value` argument
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build the plan request from configuration defaults and arguments
///
/// Later sources win: config defaults, then `--query`, then the explicit flags.
fn build_plan_request(config: &OtpConfig, args: &PlanArgs) -> PlanRequest {
    let mut request = PlanRequest::from_config(config);

    if let Some(query) = &args.query {
        request.merge_query_string(query);
    }
    if let Some(from) = &args.from {
        request.set_parameter("fromPlace", from.as_str());
    }
    if let Some(to) = &args.to {
        request.set_parameter("toPlace", to.as_str());
    }
    if let Some(date) = &args.date {
        request.set_parameter("date", date.as_str());
    }
    if let Some(time) = &args.time {
        request.set_parameter("time", time.as_str());
    }
    if args.arrive_by {
        request.set_parameter("arriveBy", true);
    }
    if let Some(mode) = &args.mode {
        if !config.is_mode_enabled(mode) {
            warn!(%mode, "Mode is not among the enabled modes");
        }
        request.set_parameter("mode", mode.as_str());
    }
    request.set_parameters(args.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    request
}

fn build_stops_request(config: &OtpConfig, args: &StopsArgs) -> StopsInRectangleRequest {
    let mut request = StopsInRectangleRequest {
        left_up_lat: args.north,
        left_up_lon: args.west,
        right_down_lat: args.south,
        right_down_lon: args.east,
        extended: args.extended.then_some(true),
        ..StopsInRectangleRequest::from_config(config)
    };
    if let Some(router) = &args.router {
        request = request.with_router_id(router.as_str());
    }
    if let Some(agency) = &args.agency {
        request = request.with_agency(agency.as_str());
    }
    request
}

/// Exit with status 2 on requests rejected before any call
fn exit_on_validation(err: OtpError) -> anyhow::Error {
    if err.is_validation() {
        println!("❌ {err}");
        std::process::exit(2);
    }
    err.into()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan(args) => {
            let request = build_plan_request(&config, &args);

            if args.dry_run {
                println!("{}{}", config.plan_url(), request.to_query_string());
                return Ok(());
            }

            let client = HttpOtpClient::new(&config)?;
            let mut response = client.plan(&request).await.map_err(exit_on_validation)?;

            let itineraries = response.itineraries_mut();
            itineraries.subscribe(Arc::new(output::LoggingListener));
            if itineraries
                .activate(args.select.saturating_sub(1))
                .is_none()
                && !itineraries.is_empty()
            {
                println!(
                    "⚠️  No itinerary {}; {} available",
                    args.select,
                    itineraries.len()
                );
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", output::render_plan(&response, args.steps));
            }
        },

        Commands::Stops(args) => {
            let request = build_stops_request(&config, &args);
            let client = HttpOtpClient::new(&config)?;
            let response = client
                .stops_in_rectangle(&request)
                .await
                .map_err(exit_on_validation)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", output::render_stops(&response));
            }
        },

        Commands::Modes => {
            print!("{}", output::render_modes(&config));
        },

        Commands::Health => {
            let client = HttpOtpClient::new(&config)?;
            if client.is_healthy().await {
                println!("✅ Healthy");
            } else {
                println!("❌ Unhealthy: {} not reachable", config.base_url);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use serde_json::Value;

    use super::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        Cli::try_parse_from(os_args)
    }

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn key_val_parsing() {
        assert_eq!(
            parse_key_val("maxWalkDistance=800").unwrap(),
            ("maxWalkDistance".to_string(), "800".to_string())
        );
        assert_eq!(
            parse_key_val("bannedRoutes=").unwrap(),
            ("bannedRoutes".to_string(), String::new())
        );
        assert!(parse_key_val("noequals").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn cli_parses_plan_command() {
        let cli = parse_args(&[
            "otp-cli",
            "-vv",
            "plan",
            "--from",
            "41.3851,2.1734",
            "--to",
            "41.4036,2.1744",
            "--arrive-by",
            "-p",
            "maxWalkDistance=800",
            "--select",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Plan(args) = cli.command else {
            panic!("Expected Plan command");
        };
        assert_eq!(args.from.as_deref(), Some("41.3851,2.1734"));
        assert!(args.arrive_by);
        assert_eq!(args.select, 2);
        assert_eq!(args.params.len(), 1);
    }

    #[test]
    fn cli_parses_stops_with_negative_longitude() {
        let cli = parse_args(&[
            "otp-cli", "stops", "--north", "51.52", "--west", "-0.13", "--south", "51.50",
            "--east", "-0.10",
        ])
        .unwrap();
        let Commands::Stops(args) = cli.command else {
            panic!("Expected Stops command");
        };
        assert_eq!(args.west, Some(-0.13));
        assert_eq!(args.east, Some(-0.10));
    }

    #[test]
    fn cli_rejects_unknown_command() {
        assert!(parse_args(&["otp-cli", "unknown"]).is_err());
    }

    #[test]
    fn plan_request_layers_sources() {
        let mut config = OtpConfig::for_testing();
        config
            .default_params
            .insert("maxWalkDistance".to_string(), Value::from(1000));
        config.router_id = Some("bcn".to_string());

        let args = PlanArgs {
            from: Some("41.3851,2.1734".to_string()),
            query: Some("?fromPlace=0,0&toPlace=41.4036,2.1744&mode=WALK".to_string()),
            mode: Some("TRANSIT,WALK".to_string()),
            arrive_by: true,
            params: vec![("maxWalkDistance".to_string(), "500".to_string())],
            ..PlanArgs::default()
        };
        let request = build_plan_request(&config, &args);

        assert_eq!(request.get_str("fromPlace"), Some("41.3851,2.1734"));
        assert_eq!(request.get_str("toPlace"), Some("41.4036,2.1744"));
        assert_eq!(request.get_str("mode"), Some("TRANSIT,WALK"));
        assert_eq!(request.get_str("maxWalkDistance"), Some("500"));
        assert_eq!(request.get_str("routerId"), Some("bcn"));
        assert!(request.is_arrive_by());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn plan_request_without_destination_fails_validation() {
        let args = PlanArgs {
            from: Some("41.3851,2.1734".to_string()),
            ..PlanArgs::default()
        };
        let request = build_plan_request(&OtpConfig::for_testing(), &args);
        assert!(matches!(
            request.validate(),
            Err(OtpError::MissingParameter("toPlace"))
        ));
    }

    #[test]
    fn stops_request_from_args() {
        let args = StopsArgs {
            north: Some(41.41),
            west: Some(2.17),
            south: Some(41.40),
            east: Some(2.18),
            agency: Some("TMB".to_string()),
            ..StopsArgs::default()
        };
        let request = build_stops_request(&OtpConfig::for_testing(), &args);
        assert!(request.validate().is_ok());
        assert_eq!(request.agency.as_deref(), Some("TMB"));
        assert_eq!(request.extended, None);
    }

    #[test]
    fn stops_request_incomplete() {
        let args = StopsArgs {
            north: Some(41.41),
            ..StopsArgs::default()
        };
        let request = build_stops_request(&OtpConfig::for_testing(), &args);
        assert!(matches!(request.validate(), Err(OtpError::IncompleteBounds)));
    }
}
