//! Cross-page handoff of a destination through the location page's query string.

use url::form_urlencoded;

use crate::config::{DESTINATION_PARAM, LOCATION_PAGE};

/// `/location?destination=...` for the given destination.
pub fn navigation_url(destination: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(DESTINATION_PARAM, destination)
        .finish();
    format!("{LOCATION_PAGE}?{query}")
}

/// Reads the destination out of a query string (with or without the leading `?`).
/// Blank values count as absent.
pub fn destination_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == DESTINATION_PARAM)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// A destination handed over by another page, waiting for the first GPS fix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingNavigation {
    destination: Option<String>,
}

impl PendingNavigation {
    pub fn new(destination: Option<String>) -> Self {
        Self { destination }
    }

    pub fn from_query(query: &str) -> Self {
        let destination = destination_from_query(query);
        if let Some(destination) = &destination {
            tracing::info!("Destination found in URL: {destination}");
        }
        Self { destination }
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.destination.is_some()
    }

    /// Called on every poll tick. Hands out the destination exactly once, on the
    /// first tick that sees a fix; the poll should be cancelled after that.
    pub fn poll(&mut self, has_fix: bool) -> Option<String> {
        if !has_fix {
            if self.is_pending() {
                tracing::debug!("Waiting for GPS lock...");
            }
            return None;
        }

        let destination = self.destination.take();
        if destination.is_some() {
            tracing::info!("GPS lock acquired. Automatically finding route.");
        }
        destination
    }
}
