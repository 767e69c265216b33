use async_trait::async_trait;
use thiserror::Error;

use crate::{
    assistant::{AgentCommand, AgentReply},
    commands::ToggleDevice,
    route::{RouteRequest, RouteResponse},
    telemetry::{DeviceState, Doctor, Telemetry},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {reason}")]
    Network { path: String, reason: String },
    #[error("{path} answered with status {status}")]
    Status { path: String, status: u16 },
    #[error("could not decode response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// The backend endpoints the pages talk to.
///
/// Futures are not `Send`: every implementation runs on the browser's single thread.
#[async_trait(?Send)]
pub trait GuardianApi {
    async fn telemetry(&self) -> Result<Telemetry, ApiError>;

    async fn nearby_doctors(&self) -> Result<Vec<Doctor>, ApiError>;

    /// Posts the SOS alert. Only the status is looked at, the body is ignored.
    async fn send_sos(&self) -> Result<(), ApiError>;

    async fn toggle_device(&self, request: &ToggleDevice) -> Result<DeviceState, ApiError>;

    async fn agent_command(&self, command: &AgentCommand) -> Result<AgentReply, ApiError>;

    async fn get_route(&self, request: &RouteRequest) -> Result<RouteResponse, ApiError>;
}

/// The narrow seam the navigation session needs: something that turns a request into a route.
#[async_trait(?Send)]
pub trait RoutePlanner {
    async fn plan_route(&self, request: &RouteRequest) -> Result<RouteResponse, ApiError>;
}

#[async_trait(?Send)]
impl<T: GuardianApi + ?Sized> RoutePlanner for T {
    async fn plan_route(&self, request: &RouteRequest) -> Result<RouteResponse, ApiError> {
        self.get_route(request).await
    }
}
