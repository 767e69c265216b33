use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use guardian_lib::{
    api::{ApiError, GuardianApi},
    assistant::{AgentCommand, AgentReply},
    commands::{ToggleDevice, ToggleReply},
    config::{AGENT_ENDPOINT, DATA_ENDPOINT, DOCTORS_ENDPOINT, ROUTE_ENDPOINT, SOS_ENDPOINT, TOGGLE_DEVICE_ENDPOINT},
    route::{RouteRequest, RouteResponse},
    telemetry::{DeviceState, Doctor, Telemetry},
};
use serde::{de::DeserializeOwned, Serialize};

/// JSON client for the backend, relative to the page origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HttpApi;

fn network_error(path: &str, err: gloo_net::Error) -> ApiError {
    ApiError::Network {
        path: path.to_owned(),
        reason: err.to_string(),
    }
}

fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    if !response.ok() {
        return Err(ApiError::Status {
            path: path.to_owned(),
            status: response.status(),
        });
    }

    Ok(response)
}

async fn decode<ReturnType>(path: &str, response: Response) -> Result<ReturnType, ApiError>
where
    ReturnType: DeserializeOwned,
{
    let response = check_status(path, response)?;

    response.json::<ReturnType>().await.map_err(|err| ApiError::Decode {
        path: path.to_owned(),
        reason: err.to_string(),
    })
}

pub async fn get_json<ReturnType>(path: &str) -> Result<ReturnType, ApiError>
where
    ReturnType: DeserializeOwned,
{
    let response = Request::get(path).send().await.map_err(|err| network_error(path, err))?;
    decode(path, response).await
}

pub async fn post_json<Body, ReturnType>(path: &str, body: &Body) -> Result<ReturnType, ApiError>
where
    Body: Serialize,
    ReturnType: DeserializeOwned,
{
    let request = Request::post(path).json(body).map_err(|err| network_error(path, err))?;
    let response = request.send().await.map_err(|err| network_error(path, err))?;
    decode(path, response).await
}

#[async_trait(?Send)]
impl GuardianApi for HttpApi {
    async fn telemetry(&self) -> Result<Telemetry, ApiError> {
        get_json(DATA_ENDPOINT).await
    }

    async fn nearby_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        get_json(DOCTORS_ENDPOINT).await
    }

    async fn send_sos(&self) -> Result<(), ApiError> {
        let response = Request::post(SOS_ENDPOINT)
            .send()
            .await
            .map_err(|err| network_error(SOS_ENDPOINT, err))?;

        check_status(SOS_ENDPOINT, response).map(|_| ())
    }

    async fn toggle_device(&self, request: &ToggleDevice) -> Result<DeviceState, ApiError> {
        let reply: ToggleReply = post_json(TOGGLE_DEVICE_ENDPOINT, request).await?;
        Ok(reply.new_state)
    }

    async fn agent_command(&self, command: &AgentCommand) -> Result<AgentReply, ApiError> {
        post_json(AGENT_ENDPOINT, command).await
    }

    async fn get_route(&self, request: &RouteRequest) -> Result<RouteResponse, ApiError> {
        post_json(ROUTE_ENDPOINT, request).await
    }
}
