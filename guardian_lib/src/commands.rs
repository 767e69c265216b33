//! One-shot commands sent from buttons. The pages do not branch on the
//! outcome today, but every command reports whether the backend took it.

use serde::{Deserialize, Serialize};

use crate::{api::GuardianApi, telemetry::DeviceState};

pub const SOS_CONFIRMATION: &str = "Are you sure you want to send an emergency alert?";
pub const SOS_SENT: &str = "Emergency alert sent!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Acknowledged,
    Unacknowledged,
}

impl CommandOutcome {
    pub fn is_acknowledged(self) -> bool {
        self == CommandOutcome::Acknowledged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleDevice {
    pub device: String,
}

/// Success body of the toggle endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToggleReply {
    #[serde(rename = "newState")]
    pub new_state: DeviceState,
}

/// Asks `confirm` first; nothing is sent when the user backs out.
///
/// `notify` is shown before the request goes out, matching the page behaviour of
/// telling the user right away rather than after the round trip.
pub async fn send_sos_alert<A, C, N>(api: &A, confirm: C, notify: N) -> Option<CommandOutcome>
where
    A: GuardianApi + ?Sized,
    C: FnOnce(&str) -> bool,
    N: FnOnce(&str),
{
    if !confirm(SOS_CONFIRMATION) {
        tracing::debug!("SOS alert cancelled by user");
        return None;
    }

    notify(SOS_SENT);

    match api.send_sos().await {
        Ok(()) => {
            tracing::info!("SOS alert acknowledged");
            Some(CommandOutcome::Acknowledged)
        }
        Err(err) => {
            tracing::warn!("SOS alert was not acknowledged: {err}");
            Some(CommandOutcome::Unacknowledged)
        }
    }
}

pub async fn toggle_device<A>(api: &A, device: &str) -> CommandOutcome
where
    A: GuardianApi + ?Sized,
{
    let request = ToggleDevice {
        device: device.to_owned(),
    };

    match api.toggle_device(&request).await {
        Ok(state) => {
            tracing::info!("Toggled '{device}' to '{state}'");
            CommandOutcome::Acknowledged
        }
        Err(err) => {
            tracing::warn!("Failed to toggle '{device}': {err}");
            CommandOutcome::Unacknowledged
        }
    }
}
