//! In-memory stand-ins for the browser and the backend.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use async_trait::async_trait;

use crate::{
    api::{ApiError, GuardianApi},
    assistant::{AgentCommand, AgentReply},
    commands::ToggleDevice,
    config::{ROUTE_ENDPOINT, SOS_ENDPOINT, TOGGLE_DEVICE_ENDPOINT},
    navigation::{ControlState, NavigationOutput, TripStats},
    position::{LatLon, Position},
    route::{RouteGeometry, RouteResponse, RouteStep},
    telemetry::{DeviceState, Doctor, Telemetry},
};

pub(crate) fn route_response(steps: usize) -> RouteResponse {
    let steps: Vec<RouteStep> = (0..steps)
        .map(|i| RouteStep::new(format!("Step {i}"), LatLon::new(51.5 + i as f64 * 0.001, -0.09)))
        .collect();

    RouteResponse {
        geometry: RouteGeometry {
            coordinates: steps.iter().map(|s| s.location).collect(),
        },
        steps,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shown {
    Position { first_fix: bool },
    Route { points: usize },
}

#[derive(Default)]
pub(crate) struct Recorder {
    pub shown: Vec<Shown>,
    pub stats: Option<TripStats>,
    pub instruction: Option<String>,
    pub spoken: Vec<String>,
    pub centered: Vec<LatLon>,
    pub notices: Vec<String>,
    pub controls: Vec<ControlState>,
}

impl NavigationOutput for Recorder {
    fn show_position(&mut self, _position: &Position, first_fix: bool) {
        self.shown.push(Shown::Position { first_fix });
    }

    fn show_stats(&mut self, stats: &TripStats) {
        self.stats = Some(*stats);
    }

    fn show_route(&mut self, geometry: &RouteGeometry) {
        self.shown.push(Shown::Route {
            points: geometry.coordinates.len(),
        });
    }

    fn show_instruction(&mut self, step: &RouteStep, _index: usize, _total: usize) {
        self.instruction = Some(step.instruction.clone());
    }

    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_owned());
    }

    fn center_on(&mut self, location: LatLon) {
        self.centered.push(location);
    }

    fn notify(&mut self, notice: &str) {
        self.notices.push(notice.to_owned());
    }

    fn set_route_control(&mut self, state: ControlState) {
        self.controls.push(state);
    }
}

pub(crate) struct FakeApi {
    pub offline: bool,
    pub route: Option<RouteResponse>,
    pub devices: RefCell<BTreeMap<String, DeviceState>>,
    pub route_calls: Cell<usize>,
    pub sos_calls: Cell<usize>,
    pub last_route_request: RefCell<Option<crate::route::RouteRequest>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        let devices = [
            ("Living Room Lamp", DeviceState::Off),
            ("Bedroom Fan", DeviceState::Off),
            ("Kitchen Outlet", DeviceState::On),
        ]
        .into_iter()
        .map(|(name, state)| (name.to_owned(), state))
        .collect();

        Self {
            offline: false,
            route: None,
            devices: RefCell::new(devices),
            route_calls: Cell::new(0),
            sos_calls: Cell::new(0),
            last_route_request: RefCell::new(None),
        }
    }
}

impl FakeApi {
    pub fn with_route(route: RouteResponse) -> Self {
        Self {
            route: Some(route),
            ..Default::default()
        }
    }

    fn check_online(&self, path: &str) -> Result<(), ApiError> {
        if self.offline {
            return Err(ApiError::Network {
                path: path.to_owned(),
                reason: "offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl GuardianApi for FakeApi {
    async fn telemetry(&self) -> Result<Telemetry, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn nearby_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn send_sos(&self) -> Result<(), ApiError> {
        self.check_online(SOS_ENDPOINT)?;
        self.sos_calls.set(self.sos_calls.get() + 1);
        Ok(())
    }

    async fn toggle_device(&self, request: &ToggleDevice) -> Result<DeviceState, ApiError> {
        self.check_online(TOGGLE_DEVICE_ENDPOINT)?;
        let mut devices = self.devices.borrow_mut();
        let Some(state) = devices.get_mut(&request.device) else {
            return Err(ApiError::Status {
                path: TOGGLE_DEVICE_ENDPOINT.into(),
                status: 404,
            });
        };

        *state = if state.is_on() { DeviceState::Off } else { DeviceState::On };
        Ok(*state)
    }

    async fn agent_command(&self, _command: &AgentCommand) -> Result<AgentReply, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn get_route(&self, request: &crate::route::RouteRequest) -> Result<RouteResponse, ApiError> {
        self.route_calls.set(self.route_calls.get() + 1);
        *self.last_route_request.borrow_mut() = Some(request.clone());
        self.check_online(ROUTE_ENDPOINT)?;

        self.route.clone().ok_or_else(|| ApiError::Status {
            path: ROUTE_ENDPOINT.into(),
            status: 404,
        })
    }
}
