//! Text rendering of plan and stop results

use std::fmt::Write as _;

use integration_otp::{
    Itinerary, OtpConfig, PlanResponse, SelectionListener, StopsResponse, is_transit_mode,
    map_color_for,
};
use tracing::info;

/// Logs itinerary selection changes
#[derive(Debug, Default)]
pub struct LoggingListener;

impl SelectionListener for LoggingListener {
    fn activated(&self, index: usize, itinerary: &Itinerary) {
        info!(index, summary = %itinerary, "Itinerary activated");
    }

    fn deactivated(&self, index: usize, _itinerary: &Itinerary) {
        info!(index, "Itinerary deactivated");
    }
}

/// Render every itinerary as a summary line, expanding the active one
pub fn render_plan(response: &PlanResponse, show_steps: bool) -> String {
    let mut out = String::new();

    if let Some(error) = &response.error {
        let _ = writeln!(out, "⚠️  Planner: {error}");
    }
    if response.is_empty() {
        out.push_str("No itineraries found\n");
        return out;
    }

    let from = response.from.as_ref().map(|s| s.label());
    let to = response.to.as_ref().map(|s| s.label());
    if let (Some(from), Some(to)) = (from, to) {
        let _ = writeln!(out, "🗺️  {from} → {to}");
    }

    let active = response.itineraries.active_index();
    for (index, itinerary) in response.itineraries.iter().enumerate() {
        let marker = if active == Some(index) { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {}. {itinerary}", index + 1);

        if active != Some(index) {
            continue;
        }

        if let Some(ms) = response.full_duration_ms(index) {
            let _ = writeln!(out, "     Door to door: {} min", ms / 60_000);
        }
        if let Some([[south, west], [north, east]]) = itinerary.bounds_array() {
            let _ = writeln!(
                out,
                "     Bounds: {south:.5},{west:.5} / {north:.5},{east:.5}"
            );
        }
        for leg in &itinerary.legs {
            let _ = writeln!(out, "     [{}] {leg}", leg.map_color());
            if show_steps {
                for step in &leg.steps {
                    let _ = writeln!(out, "         {step}");
                }
            }
        }
    }

    out
}

/// Render one line per stop
pub fn render_stops(response: &StopsResponse) -> String {
    if response.is_empty() {
        return String::from("No stops found\n");
    }

    let mut out = String::new();
    for stop in &response.stops {
        match stop.location() {
            Some(loc) => {
                let _ = writeln!(out, "🚏 {stop} @ {loc}");
            },
            None => {
                let _ = writeln!(out, "🚏 {stop}");
            },
        }
    }
    out
}

/// Render the configured mode choices with their map colors
pub fn render_modes(config: &OtpConfig) -> String {
    let mut out = String::new();
    for choice in &config.enabled_modes {
        let parts: Vec<String> = choice
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|mode| {
                let kind = if is_transit_mode(mode) { "transit" } else { "street" };
                format!("{mode} {} ({kind})", map_color_for(mode))
            })
            .collect();
        let _ = writeln!(out, "{choice}: {}", parts.join(", "));
    }
    out
}
