use gloo_console::error;
use gloo_utils::window;

pub fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        error!(format!("Failed to show alert: {message}"));
    }
}

/// A dismissed or failing dialog counts as "no".
pub fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

pub fn query_string() -> String {
    window().location().search().unwrap_or_default()
}

/// Full page navigation, so the target page starts with a fresh query string.
pub fn redirect(url: &str) {
    if let Err(err) = window().location().set_href(url) {
        error!(format!("Failed to navigate to {url}"), err);
    }
}

pub fn geolocation_supported() -> bool {
    window().navigator().geolocation().is_ok()
}
