use serde::{Deserialize, Serialize};

use crate::position::LatLon;

/// Body posted to the route endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub from: LatLon,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteResponse {
    pub geometry: RouteGeometry,
    pub steps: Vec<RouteStep>,
}

/// The full route polyline, already converted to `(lat, lon)` order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "WireGeometry")]
pub struct RouteGeometry {
    pub coordinates: Vec<LatLon>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireStep")]
pub struct RouteStep {
    pub instruction: String,
    pub location: LatLon,
}

impl RouteStep {
    pub fn new(instruction: impl Into<String>, location: LatLon) -> Self {
        Self {
            instruction: instruction.into(),
            location,
        }
    }
}

#[derive(Deserialize)]
struct WireGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl From<WireGeometry> for RouteGeometry {
    fn from(value: WireGeometry) -> Self {
        Self {
            coordinates: value.coordinates.into_iter().map(LatLon::from_lon_lat).collect(),
        }
    }
}

#[derive(Deserialize)]
struct WireStep {
    text: String,
    location: [f64; 2],
}

impl From<WireStep> for RouteStep {
    fn from(value: WireStep) -> Self {
        Self {
            instruction: value.text,
            location: LatLon::from_lon_lat(value.location),
        }
    }
}

/// Cursor into the turn-by-turn step list. `None` is the "no step active yet" state.
#[derive(Debug, Clone, Default)]
pub struct RouteCursor {
    steps: Vec<RouteStep>,
    current: Option<usize>,
}

impl RouteCursor {
    /// Replaces the step list wholesale and rewinds to "no step active".
    pub fn load(&mut self, steps: Vec<RouteStep>) {
        self.steps = steps;
        self.current = None;
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        self.current.and_then(|i| self.steps.get(i))
    }

    /// Moves to `index` and returns the step, or `None` without moving when out of range.
    pub fn go_to(&mut self, index: usize) -> Option<&RouteStep> {
        if index >= self.steps.len() {
            return None;
        }

        self.current = Some(index);
        self.steps.get(index)
    }

    pub fn next_index(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.current.and_then(|i| i.checked_sub(1))
    }
}
