//! Snapshot served by `/api/data` and the values the dashboard, health and
//! assistant pages derive from it.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::config::HEART_RATE_SAMPLE_SECS;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Telemetry {
    pub connection_status: ConnectionStatus,
    pub health: Health,
    pub gait: Gait,
    #[serde(default)]
    pub smart_devices: BTreeMap<String, DeviceState>,
    #[serde(default)]
    pub gps: Option<GpsReading>,
    #[serde(default)]
    pub fall_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionStatus {
    pub bluetooth: LinkState,
    pub wifi: LinkState,
}

impl ConnectionStatus {
    pub fn any_disconnected(&self) -> bool {
        [self.bluetooth, self.wifi].contains(&LinkState::Disconnected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LinkState {
    Connected,
    Disconnected,
    #[serde(other)]
    Unknown,
}

impl LinkState {
    pub fn is_connected(self) -> bool {
        self == LinkState::Connected
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LinkState::Connected => "Connected",
            LinkState::Disconnected => "Disconnected",
            LinkState::Unknown => "Unknown",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    pub heart_rate: u32,
    pub oxygen_level: u32,
    #[serde(default)]
    pub history: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gait {
    pub speed: f64,
    pub step_length: u32,
    pub symmetry: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GpsReading {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    On,
    Off,
}

impl DeviceState {
    pub fn is_on(self) -> bool {
        self == DeviceState::On
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_on() { "On" } else { "Off" })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub specialty: String,
    pub distance: String,
}

impl Doctor {
    pub fn summary(&self) -> String {
        format!("{} - {} away", self.specialty, self.distance)
    }
}

/// Headline card on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    AllNormal,
    ConnectionIssue,
}

impl OverallStatus {
    pub fn of(telemetry: &Telemetry) -> Self {
        if telemetry.connection_status.any_disconnected() {
            OverallStatus::ConnectionIssue
        } else {
            OverallStatus::AllNormal
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OverallStatus::AllNormal => "All Systems Normal",
            OverallStatus::ConnectionIssue => "Connection Issue",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            OverallStatus::AllNormal => "Monitoring your health and location.",
            OverallStatus::ConnectionIssue => "One or more devices are disconnected.",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            OverallStatus::AllNormal => "card status-card-ok",
            OverallStatus::ConnectionIssue => "card status-card-alert",
        }
    }
}

/// State of the browser's own location sensor, as shown next to the link states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsStatus {
    Searching,
    Connected,
    Error,
    Unsupported,
}

impl fmt::Display for GpsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GpsStatus::Searching => "Searching...",
            GpsStatus::Connected => "Connected",
            GpsStatus::Error => "Error",
            GpsStatus::Unsupported => "Unsupported",
        };
        f.write_str(text)
    }
}

/// Points of the heart rate line chart, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

pub const CHART_SUGGESTED_MIN: u32 = 50;
pub const CHART_SUGGESTED_MAX: u32 = 100;

impl ChartSeries {
    /// Labels count back from the newest sample, e.g. `-6s`, `-3s`, `-0s`.
    pub fn heart_rate(history: &[u32]) -> Self {
        let n = history.len();
        let labels = (0..n)
            .map(|i| format!("-{}s", (n - i - 1) * HEART_RATE_SAMPLE_SECS))
            .collect();

        Self {
            labels,
            values: history.to_vec(),
        }
    }

    /// Vertical range of the chart: the suggested range, widened to fit outliers.
    pub fn y_range(&self) -> (u32, u32) {
        let min = self.values.iter().copied().min().unwrap_or(CHART_SUGGESTED_MIN);
        let max = self.values.iter().copied().max().unwrap_or(CHART_SUGGESTED_MAX);
        (min.min(CHART_SUGGESTED_MIN), max.max(CHART_SUGGESTED_MAX))
    }

    /// Maps the series onto a `width` x `height` box, y growing downwards.
    pub fn svg_points(&self, width: f64, height: f64) -> Vec<(f64, f64)> {
        let (lo, hi) = self.y_range();
        let span = f64::from(hi - lo).max(1.);
        let step = if self.values.len() > 1 {
            width / (self.values.len() - 1) as f64
        } else {
            0.
        };

        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64 * step, height - f64::from(v - lo) / span * height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "connection_status": {"bluetooth": "Connected", "wifi": "Disconnected"},
        "health": {"heart_rate": 72, "oxygen_level": 98, "history": [70, 71, 72]},
        "gait": {"speed": 1.05, "step_length": 68, "symmetry": 0.97},
        "smart_devices": {"Living Room Lamp": "Off", "Kitchen Outlet": "On"}
    }"#;

    #[test]
    fn decodes_snapshot_without_optional_fields() {
        let telemetry: Telemetry = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(telemetry.health.heart_rate, 72);
        assert_eq!(telemetry.gait.step_length, 68);
        assert_eq!(telemetry.smart_devices["Kitchen Outlet"], DeviceState::On);
        assert!(telemetry.gps.is_none());
        assert!(!telemetry.fall_detected);
    }

    #[test]
    fn any_disconnected_link_raises_connection_issue() {
        let mut telemetry: Telemetry = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(OverallStatus::of(&telemetry), OverallStatus::ConnectionIssue);

        telemetry.connection_status.wifi = LinkState::Connected;
        let status = OverallStatus::of(&telemetry);
        assert_eq!(status, OverallStatus::AllNormal);
        assert_eq!(status.title(), "All Systems Normal");
    }

    #[test]
    fn unexpected_link_text_is_unknown_not_an_error() {
        let status: ConnectionStatus =
            serde_json::from_str(r#"{"bluetooth": "Pairing", "wifi": "Connected"}"#).unwrap();
        assert_eq!(status.bluetooth, LinkState::Unknown);
        assert!(!status.any_disconnected());
    }

    #[test]
    fn chart_labels_count_back_in_three_second_steps() {
        let series = ChartSeries::heart_rate(&[70, 75, 80]);
        assert_eq!(series.labels, vec!["-6s", "-3s", "-0s"]);
        assert_eq!(series.values, vec![70, 75, 80]);
    }

    #[test]
    fn chart_range_widens_for_outliers() {
        assert_eq!(ChartSeries::heart_rate(&[70, 80]).y_range(), (50, 100));
        assert_eq!(ChartSeries::heart_rate(&[45, 120]).y_range(), (45, 120));
        assert_eq!(ChartSeries::heart_rate(&[]).y_range(), (50, 100));
    }

    #[test]
    fn svg_points_span_the_box() {
        let points = ChartSeries::heart_rate(&[50, 100]).svg_points(200., 100.);
        assert_eq!(points, vec![(0., 100.), (200., 0.)]);
    }

    #[test]
    fn doctor_summary() {
        let doctor = Doctor {
            name: "Dr. Emily Carter".into(),
            specialty: "Cardiologist".into(),
            distance: "2.5 km".into(),
        };
        assert_eq!(doctor.summary(), "Cardiologist - 2.5 km away");
    }
}
