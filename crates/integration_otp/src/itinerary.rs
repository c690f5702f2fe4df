//! Itineraries and the ordered, single-selection list that holds them

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::Bounds;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::leg::ItineraryLeg;
use crate::plan_request::PlanRequest;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// One candidate trip plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Itinerary {
    /// Total duration in seconds
    pub duration: f64,
    /// Start time in epoch milliseconds
    pub start_time: i64,
    /// End time in epoch milliseconds
    pub end_time: i64,
    /// Seconds spent walking
    pub walk_time: f64,
    /// Seconds spent on board
    pub transit_time: f64,
    /// Seconds spent waiting
    pub waiting_time: f64,
    /// Meters walked
    pub walk_distance: f64,
    /// Whether the walk limit had to be exceeded
    pub walk_limit_exceeded: bool,
    /// Meters of descent
    pub elevation_lost: f64,
    /// Meters of ascent
    pub elevation_gained: f64,
    /// Number of transfers
    pub transfers: u32,
    /// Fare structure as reported by OTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<Value>,
    /// Legs in travel order
    pub legs: Vec<ItineraryLeg>,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Itinerary {
    /// Box spanned by the first leg's origin and the last leg's destination
    ///
    /// Intermediate points of the route are not considered. `None` when there
    /// are no legs or either endpoint lacks coordinates.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let start = self.legs.first()?.from.location()?;
        let end = self.legs.last()?.to.location()?;
        Some(Bounds::from_corners(start, end))
    }

    /// [`Self::bounds`] as `[[south, west], [north, east]]`
    #[must_use]
    pub fn bounds_array(&self) -> Option<[[f64; 2]; 2]> {
        self.bounds().map(|b| b.to_array())
    }

    /// Wall-clock milliseconds between the requested instant and this trip
    ///
    /// `offset_hours` shifts the itinerary's timestamps before comparing. For
    /// arrive-by queries this is how long before the requested arrival the
    /// trip starts; otherwise how long after the requested departure it ends.
    /// `None` when the request has no parsable date and time.
    #[must_use]
    pub fn full_duration_ms(&self, request: &PlanRequest, offset_hours: f64) -> Option<i64> {
        let requested = request.requested_instant()?.timestamp_millis();
        #[allow(clippy::cast_possible_truncation)]
        let offset_ms = (offset_hours * MILLIS_PER_HOUR).round() as i64;

        if request.is_arrive_by() {
            Some(requested.saturating_sub(self.start_time.saturating_add(offset_ms)))
        } else {
            Some(self.end_time.saturating_add(offset_ms).saturating_sub(requested))
        }
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

    /// Duration in whole minutes
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time) / 60_000
    }

    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return String::from("No itinerary data");
        };
        if self.legs.is_empty() {
            return String::from("No itinerary data");
        }

        let dep = start.format("%H:%M");
        let arr = end.format("%H:%M");
        let dur = self.duration_minutes();
        let transfers = self.transfers;

        let route = self
            .legs
            .iter()
            .map(|leg| leg.route_label().to_string())
            .collect::<Vec<_>>()
            .join(" → ");

        format!("{dep} → {arr} ({dur}min, {transfers} transfers) {route}")
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

/// Receives selection changes of an [`ItineraryList`]
#[cfg_attr(test, automock)]
pub trait SelectionListener: Send + Sync {
    /// `itinerary` (at `index`) became the active one
    fn activated(&self, index: usize, itinerary: &Itinerary);

    /// `itinerary` (at `index`) stopped being the active one
    fn deactivated(&self, index: usize, itinerary: &Itinerary);
}

/// Outcome of [`ItineraryList::activate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationChange {
    /// Index that is now active
    pub activated: usize,
    /// Index that was active before, if any and different
    pub deactivated: Option<usize>,
}

/// Itineraries in server order, with at most one active at a time
#[derive(Clone, Default)]
pub struct ItineraryList {
    itineraries: Vec<Itinerary>,
    active: Option<usize>,
    listeners: Vec<Arc<dyn SelectionListener>>,
}

impl fmt::Debug for ItineraryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItineraryList")
            .field("itineraries", &self.itineraries)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ItineraryList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for selection changes
    pub fn subscribe(&mut self, listener: Arc<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    /// Append an itinerary
    pub fn push(&mut self, itinerary: Itinerary) {
        self.itineraries.push(itinerary);
    }

    /// Number of itineraries
    #[must_use]
    pub fn len(&self) -> usize {
        self.itineraries.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }

    /// Itinerary at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Itinerary> {
        self.itineraries.get(index)
    }

    /// Iterate in server order
    pub fn iter(&self) -> std::slice::Iter<'_, Itinerary> {
        self.itineraries.iter()
    }

    /// All itineraries as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Itinerary] {
        &self.itineraries
    }

    /// Index of the active itinerary
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active itinerary
    #[must_use]
    pub fn active(&self) -> Option<&Itinerary> {
        self.active.and_then(|i| self.itineraries.get(i))
    }

    /// Make the itinerary at `index` the active one
    ///
    /// The previously active itinerary, if different, is deactivated first.
    /// Re-activating the active itinerary notifies nobody. Returns `None` if
    /// `index` is out of range.
    pub fn activate(&mut self, index: usize) -> Option<ActivationChange> {
        let itinerary = self.itineraries.get(index)?;

        if self.active == Some(index) {
            return Some(ActivationChange {
                activated: index,
                deactivated: None,
            });
        }

        let previous = self.active.take();
        if let Some(prev) = previous {
            self.notify_deactivated(prev);
        }

        self.active = Some(index);
        for listener in &self.listeners {
            listener.activated(index, itinerary);
        }

        Some(ActivationChange {
            activated: index,
            deactivated: previous,
        })
    }

    /// Clear the selection, returning the index that was active
    pub fn deactivate(&mut self) -> Option<usize> {
        let previous = self.active.take()?;
        self.notify_deactivated(previous);
        Some(previous)
    }

    fn notify_deactivated(&self, index: usize) {
        if let Some(itinerary) = self.itineraries.get(index) {
            for listener in &self.listeners {
                listener.deactivated(index, itinerary);
            }
        }
    }
}

impl From<Vec<Itinerary>> for ItineraryList {
    fn from(itineraries: Vec<Itinerary>) -> Self {
        Self {
            itineraries,
            ..Self::default()
        }
    }
}

impl<'a> IntoIterator for &'a ItineraryList {
    type Item = &'a Itinerary;
    type IntoIter = std::slice::Iter<'a, Itinerary>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ItineraryList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.itineraries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ItineraryList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Itinerary>::deserialize(deserializer).map(Self::from)
    }
}
