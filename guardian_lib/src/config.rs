//! Compile-time settings shared by every page.

use const_format::concatcp;

pub const API_ROOT: &str = "/api";
pub const DATA_ENDPOINT: &str = concatcp!(API_ROOT, "/data");
pub const SOS_ENDPOINT: &str = concatcp!(API_ROOT, "/sos_alert");
pub const TOGGLE_DEVICE_ENDPOINT: &str = concatcp!(API_ROOT, "/toggle_device");
pub const ROUTE_ENDPOINT: &str = concatcp!(API_ROOT, "/get_route");
pub const AGENT_ENDPOINT: &str = concatcp!(API_ROOT, "/agent_command");
pub const DOCTORS_ENDPOINT: &str = concatcp!(API_ROOT, "/nearby_doctors");

pub const LOCATION_PAGE: &str = "/location";
pub const DESTINATION_PARAM: &str = "destination";

// Polling intervals, in milliseconds
pub const TELEMETRY_POLL_MS: u32 = 3_000;
pub const SIDEBAR_POLL_MS: u32 = 5_000;
pub const FIX_POLL_MS: u32 = 1_000;
pub const HANDOFF_DELAY_MS: u32 = 2_000;

/// Seconds between two heart rate samples reported by `/api/data`.
pub const HEART_RATE_SAMPLE_SECS: usize = 3;

pub const DEFAULT_CENTER: (f64, f64) = (51.505, -0.09);
pub const DEFAULT_ZOOM: f64 = 13.;
pub const FIX_ZOOM: f64 = 17.;
pub const DASHBOARD_ZOOM: f64 = 16.;
pub const ROUTE_BOUNDS_PADDING: f64 = 0.1;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub const SPEECH_LOCALE: &str = "en-US";
pub const SPEECH_RATE: f32 = 1.0;
