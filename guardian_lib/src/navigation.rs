//! Live tracking and turn-by-turn guidance for one navigation session.
//!
//! The session owns all mutable state of the location page: the traveled path,
//! the running distance and the cursor into the current route. Everything the
//! user sees goes out through a [`NavigationOutput`], so the same session runs
//! against the leaflet map in the browser and against a recorder in tests.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    api::{ApiError, RoutePlanner},
    position::{LatLon, Position, PositionError},
    route::{RouteCursor, RouteGeometry, RouteRequest, RouteResponse, RouteStep},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("Please enter a destination.")]
    EmptyDestination,
    #[error("Cannot get route. Your current location is not available yet.")]
    NoFix,
    #[error("Could not calculate a route. Please try another search.")]
    Route(#[source] ApiError),
}

/// State of the route button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Ready,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    Listening,
    /// The sensor is missing or was denied. The page keeps working without live tracking.
    Unavailable,
}

/// A continuous, push based location source. Fixes arrive later through
/// [`NavigationSession::on_position_update`].
pub trait LocationSource {
    fn watch(&mut self) -> Result<(), PositionError>;
}

/// Display side effects of the session.
pub trait NavigationOutput {
    /// Moves the marker and extends the drawn path. `first_fix` is set for the first sample of the session.
    fn show_position(&mut self, position: &Position, first_fix: bool);

    fn show_stats(&mut self, stats: &TripStats);

    fn show_route(&mut self, geometry: &RouteGeometry);

    fn show_instruction(&mut self, step: &RouteStep, index: usize, total: usize);

    /// Speaks `text`. Anything still being spoken must be cancelled first.
    fn speak(&mut self, text: &str);

    fn center_on(&mut self, location: LatLon);

    fn notify(&mut self, notice: &str);

    fn set_route_control(&mut self, state: ControlState);
}

/// Derived statistics of the session, ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripStats {
    pub elapsed_secs: u64,
    pub distance_m: f64,
    /// `None` until at least one second has passed.
    pub avg_speed_kmh: Option<f64>,
}

impl TripStats {
    pub fn new(start_time: DateTime<Utc>, now: DateTime<Utc>, distance_m: f64) -> Self {
        let elapsed_ms = now.signed_duration_since(start_time).num_milliseconds().max(0);
        let elapsed_secs = ((elapsed_ms as f64) / 1000.).round() as u64;

        let avg_speed_kmh = (elapsed_secs > 0).then(|| distance_m / elapsed_secs as f64 * 3.6);

        Self {
            elapsed_secs,
            distance_m,
            avg_speed_kmh,
        }
    }

    /// `mm:ss`; minutes keep counting past the hour.
    pub fn elapsed_text(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }

    pub fn distance_text(&self) -> String {
        format!("{:.2} km", self.distance_m / 1000.)
    }

    pub fn speed_text(&self) -> Option<String> {
        self.avg_speed_kmh.map(|kmh| format!("{kmh:.1} km/h"))
    }
}

pub struct NavigationSession<O: NavigationOutput> {
    output: O,
    tracking: TrackingState,
    start_time: Option<DateTime<Utc>>,
    current_position: Option<Position>,
    traveled_path: Vec<Position>,
    total_distance_m: f64,
    cursor: RouteCursor,
    routes_in_flight: usize,
}

impl<O: NavigationOutput> NavigationSession<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            tracking: TrackingState::Idle,
            start_time: None,
            current_position: None,
            traveled_path: Vec::new(),
            total_distance_m: 0.,
            cursor: RouteCursor::default(),
            routes_in_flight: 0,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.tracking
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn current_position(&self) -> Option<&Position> {
        self.current_position.as_ref()
    }

    pub fn has_fix(&self) -> bool {
        self.current_position.is_some()
    }

    pub fn traveled_path(&self) -> &[Position] {
        &self.traveled_path
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn cursor(&self) -> &RouteCursor {
        &self.cursor
    }

    pub fn route_in_flight(&self) -> bool {
        self.routes_in_flight > 0
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Option<TripStats> {
        self.start_time
            .map(|start| TripStats::new(start, now, self.total_distance_m))
    }

    /// Starts listening to `source`. Does nothing while already listening.
    pub fn start_tracking<S: LocationSource + ?Sized>(&mut self, source: &mut S) {
        if self.tracking == TrackingState::Listening {
            return;
        }

        match source.watch() {
            Ok(()) => {
                tracing::debug!("Listening for position updates");
                self.tracking = TrackingState::Listening;
            }
            Err(err) => {
                tracing::warn!("Live tracking unavailable: {err}");
                self.tracking = TrackingState::Unavailable;
                self.output.notify(&err.to_string());
            }
        }
    }

    pub fn on_position_update(&mut self, position: Position, now: DateTime<Utc>) -> TripStats {
        let first_fix = self.start_time.is_none();

        if first_fix {
            self.start_time = Some(now);
            tracing::info!("First fix at ({}, {})", position.latitude, position.longitude);
        } else if let Some(last) = self.traveled_path.last() {
            self.total_distance_m += last.distance_to(&position);
        }

        self.traveled_path.push(position);
        self.current_position = Some(position);
        self.output.show_position(&position, first_fix);

        let start = self.start_time.unwrap_or(now);
        let stats = TripStats::new(start, now, self.total_distance_m);
        self.output.show_stats(&stats);
        stats
    }

    /// Leaves the session untouched; only the user is told.
    pub fn on_position_error(&mut self, err: &PositionError) {
        tracing::error!("Geolocation error: {err}");
        self.output.notify(&err.to_string());
    }

    /// Validates the inputs and marks a request as outstanding. The caller sends
    /// the returned request and hands the result to [`Self::finish_route_request`].
    pub fn begin_route_request(&mut self, destination: &str) -> Result<RouteRequest, NavigationError> {
        let destination = destination.trim();
        let result = if destination.is_empty() {
            Err(NavigationError::EmptyDestination)
        } else if let Some(position) = &self.current_position {
            Ok(RouteRequest {
                from: position.lat_lon(),
                to: destination.to_owned(),
            })
        } else {
            Err(NavigationError::NoFix)
        };

        match &result {
            Ok(request) => {
                tracing::debug!("Requesting route to '{}'", request.to);
                self.routes_in_flight += 1;
                self.output.set_route_control(ControlState::Busy);
            }
            Err(err) => {
                tracing::warn!("Route request rejected: {err}");
                self.output.notify(&err.to_string());
            }
        }

        result
    }

    pub fn finish_route_request(&mut self, result: Result<RouteResponse, ApiError>) -> Result<(), NavigationError> {
        self.routes_in_flight = self.routes_in_flight.saturating_sub(1);
        if self.routes_in_flight == 0 {
            self.output.set_route_control(ControlState::Ready);
        }

        match result {
            Ok(response) => {
                self.load_route(response);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Routing error: {err}");
                let err = NavigationError::Route(err);
                self.output.notify(&err.to_string());
                Err(err)
            }
        }
    }

    /// Validates, asks `planner` and loads the result. Every failure has already
    /// been shown to the user when this returns `Err`.
    pub async fn request_route<P: RoutePlanner + ?Sized>(&mut self, planner: &P, destination: &str) -> Result<(), NavigationError> {
        let request = self.begin_route_request(destination)?;
        let result = planner.plan_route(&request).await;
        self.finish_route_request(result)
    }

    fn load_route(&mut self, response: RouteResponse) {
        tracing::info!("Loaded route with {} steps", response.steps.len());
        self.output.show_route(&response.geometry);
        self.cursor.load(response.steps);
        self.go_to_step(0);
    }

    /// Returns `false`, changing nothing, when `index` is out of range.
    pub fn go_to_step(&mut self, index: usize) -> bool {
        let total = self.cursor.len();
        let Some(step) = self.cursor.go_to(index) else {
            return false;
        };

        self.output.show_instruction(step, index, total);
        self.output.speak(&step.instruction);
        self.output.center_on(step.location);
        true
    }

    pub fn next_step(&mut self) -> bool {
        self.go_to_step(self.cursor.next_index())
    }

    pub fn previous_step(&mut self) -> bool {
        match self.cursor.previous_index() {
            Some(index) => self.go_to_step(index),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::testing::{route_response, FakeApi, Recorder, Shown};

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    fn fix(lat: f64, lon: f64, secs: i64) -> Position {
        Position::new(lat, lon, at(secs)).unwrap()
    }

    fn session_with_fix() -> NavigationSession<Recorder> {
        let mut session = NavigationSession::new(Recorder::default());
        session.on_position_update(fix(51.505, -0.09, 0), at(0));
        session
    }

    #[test]
    fn first_fix_sets_start_and_adds_no_distance() {
        let session = session_with_fix();
        assert_eq!(session.start_time(), Some(at(0)));
        assert_eq!(session.total_distance_m(), 0.);
        assert_eq!(session.traveled_path().len(), 1);
        assert!(session.output().shown.contains(&Shown::Position { first_fix: true }));
    }

    #[test]
    fn ten_seconds_eleven_meters() {
        let mut session = session_with_fix();
        let stats = session.on_position_update(fix(51.5051, -0.09, 10), at(10));

        assert_eq!(stats.elapsed_text(), "00:10");
        assert!((session.total_distance_m() - 11.1).abs() < 0.1);
        let speed = stats.avg_speed_kmh.unwrap();
        assert!((speed - 4.0).abs() < 0.05, "{speed}");
        assert_eq!(stats.speed_text().unwrap(), "4.0 km/h");
        assert_eq!(stats.distance_text(), "0.01 km");
        assert_eq!(session.output().stats, Some(stats));
    }

    #[test]
    fn start_time_is_set_once() {
        let mut session = session_with_fix();
        session.on_position_update(fix(51.506, -0.09, 5), at(5));
        session.on_position_update(fix(51.507, -0.09, 9), at(9));
        assert_eq!(session.start_time(), Some(at(0)));
        assert_eq!(
            session.output().shown.iter().filter(|s| **s == Shown::Position { first_fix: true }).count(),
            1
        );
    }

    #[test]
    fn distance_is_the_running_pairwise_sum_even_when_jittering_back() {
        let samples = [
            (51.5000, -0.0900),
            (51.5010, -0.0900),
            (51.5005, -0.0900), // jitter backwards
            (51.5005, -0.0890),
            (51.5005, -0.0890), // no movement
        ];

        let mut session = NavigationSession::new(Recorder::default());
        let mut previous_total = 0.;
        for (i, (lat, lon)) in samples.iter().enumerate() {
            session.on_position_update(fix(*lat, *lon, i as i64), at(i as i64));
            assert!(session.total_distance_m() >= previous_total);
            previous_total = session.total_distance_m();
        }

        let expected: f64 = session
            .traveled_path()
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum();
        assert!((session.total_distance_m() - expected).abs() < 1e-9);
        assert_eq!(session.traveled_path().len(), samples.len());
    }

    #[test]
    fn no_speed_before_a_second_has_passed() {
        let mut session = NavigationSession::new(Recorder::default());
        let stats = session.on_position_update(fix(51.5, -0.09, 0), at(0));
        assert_eq!(stats.avg_speed_kmh, None);
        assert_eq!(stats.elapsed_text(), "00:00");
    }

    #[test]
    fn elapsed_minutes_do_not_wrap() {
        let stats = TripStats::new(at(0), at(3_725), 0.);
        assert_eq!(stats.elapsed_text(), "62:05");
    }

    #[test]
    fn elapsed_rounds_to_nearest_second() {
        let stats = TripStats::new(at(0), at(9) + TimeDelta::milliseconds(600), 0.);
        assert_eq!(stats.elapsed_secs, 10);
    }

    #[test]
    fn position_error_keeps_last_fix() {
        let mut session = session_with_fix();
        session.on_position_error(&PositionError::Unavailable("timeout".into()));
        assert_eq!(session.current_position().unwrap().latitude, 51.505);
        assert_eq!(session.output().notices.len(), 1);
    }

    struct Sensor {
        result: Result<(), PositionError>,
        watches: usize,
    }

    impl LocationSource for Sensor {
        fn watch(&mut self) -> Result<(), PositionError> {
            self.watches += 1;
            self.result.clone()
        }
    }

    #[test]
    fn start_tracking_twice_watches_once() {
        let mut sensor = Sensor { result: Ok(()), watches: 0 };
        let mut session = NavigationSession::new(Recorder::default());
        session.start_tracking(&mut sensor);
        session.start_tracking(&mut sensor);
        assert_eq!(sensor.watches, 1);
        assert_eq!(session.tracking_state(), TrackingState::Listening);
    }

    #[test]
    fn denied_sensor_degrades_with_notice() {
        let mut sensor = Sensor {
            result: Err(PositionError::PermissionDenied),
            watches: 0,
        };
        let mut session = NavigationSession::new(Recorder::default());
        session.start_tracking(&mut sensor);
        assert_eq!(session.tracking_state(), TrackingState::Unavailable);
        assert_eq!(session.output().notices, vec![PositionError::PermissionDenied.to_string()]);
    }

    #[tokio::test]
    async fn empty_destination_is_rejected_before_any_request() {
        let api = FakeApi::with_route(route_response(3));
        let mut session = session_with_fix();

        let result = session.request_route(&api, "  ").await;
        assert_eq!(result, Err(NavigationError::EmptyDestination));
        assert_eq!(api.route_calls.get(), 0);
        assert_eq!(session.output().notices, vec!["Please enter a destination."]);
    }

    #[tokio::test]
    async fn no_fix_is_rejected_before_any_request() {
        let api = FakeApi::with_route(route_response(3));
        let mut session = NavigationSession::new(Recorder::default());

        let result = session.request_route(&api, "Hyde Park").await;
        assert_eq!(result, Err(NavigationError::NoFix));
        assert_eq!(api.route_calls.get(), 0);
    }

    #[tokio::test]
    async fn loaded_route_starts_at_first_step() {
        let api = FakeApi::with_route(route_response(3));
        let mut session = session_with_fix();

        session.request_route(&api, "Hyde Park").await.unwrap();

        assert_eq!(api.route_calls.get(), 1);
        assert_eq!(api.last_route_request.borrow().as_ref().unwrap().to, "Hyde Park");
        assert_eq!(session.cursor().current_index(), Some(0));
        let output = session.output();
        assert_eq!(output.instruction.as_deref(), Some("Step 0"));
        assert_eq!(output.spoken, vec!["Step 0"]);
        assert_eq!(output.centered.last(), Some(&route_response(3).steps[0].location));
        assert_eq!(output.controls, vec![ControlState::Busy, ControlState::Ready]);
        assert!(output.shown.contains(&Shown::Route { points: 3 }));
    }

    #[tokio::test]
    async fn route_without_steps_leaves_no_step_active() {
        let api = FakeApi::with_route(route_response(0));
        let mut session = session_with_fix();
        session.request_route(&api, "Nowhere").await.unwrap();
        assert_eq!(session.cursor().current_index(), None);
        assert!(session.output().spoken.is_empty());
    }

    #[tokio::test]
    async fn failed_route_keeps_previous_route() {
        let mut api = FakeApi::with_route(route_response(3));
        let mut session = session_with_fix();
        session.request_route(&api, "Hyde Park").await.unwrap();
        session.next_step();

        api.route = None;
        let result = session.request_route(&api, "Atlantis").await;

        assert!(matches!(result, Err(NavigationError::Route(_))));
        assert_eq!(session.cursor().len(), 3);
        assert_eq!(session.cursor().current_index(), Some(1));
        let output = session.output();
        assert_eq!(output.controls.last(), Some(&ControlState::Ready));
        assert_eq!(output.notices.last().unwrap(), "Could not calculate a route. Please try another search.");
    }

    #[tokio::test]
    async fn new_route_replaces_steps_and_rewinds() {
        let mut api = FakeApi::with_route(route_response(3));
        let mut session = session_with_fix();
        session.request_route(&api, "Hyde Park").await.unwrap();
        session.next_step();
        session.next_step();

        api.route = Some(route_response(2));
        session.request_route(&api, "Soho").await.unwrap();
        assert_eq!(session.cursor().len(), 2);
        assert_eq!(session.cursor().current_index(), Some(0));
    }

    #[tokio::test]
    async fn stepping_past_either_end_is_a_no_op() {
        let api = FakeApi::with_route(route_response(3));
        let mut session = session_with_fix();
        session.request_route(&api, "Hyde Park").await.unwrap();

        assert!(!session.previous_step());
        assert_eq!(session.cursor().current_index(), Some(0));
        assert_eq!(session.output().instruction.as_deref(), Some("Step 0"));

        assert!(session.next_step());
        assert!(session.next_step());
        assert!(!session.next_step());
        assert!(!session.go_to_step(7));
        assert_eq!(session.cursor().current_index(), Some(2));
        assert_eq!(session.output().instruction.as_deref(), Some("Step 2"));
        assert_eq!(session.output().spoken, vec!["Step 0", "Step 1", "Step 2"]);
    }

    #[test]
    fn overlapping_requests_keep_control_busy_until_both_finish() {
        let mut session = session_with_fix();
        session.begin_route_request("A").unwrap();
        session.begin_route_request("B").unwrap();
        assert!(session.route_in_flight());

        session.finish_route_request(Ok(route_response(1))).unwrap();
        assert_eq!(session.output().controls.last(), Some(&ControlState::Busy));

        session.finish_route_request(Ok(route_response(2))).unwrap();
        assert_eq!(session.output().controls.last(), Some(&ControlState::Ready));
        assert!(!session.route_in_flight());
        assert_eq!(session.cursor().len(), 2);
    }
}
