use gloo_timers::callback::Interval;
use guardian_lib::{
    api::{ApiError, GuardianApi},
    config::{DASHBOARD_ZOOM, TELEMETRY_POLL_MS},
    navigation::LocationSource,
    position::{LatLon, Position, PositionError},
    telemetry::{GpsStatus, OverallStatus, Telemetry},
};
use leaflet::Marker;
use yew::prelude::*;

use crate::{
    api::HttpApi,
    components::{
        map_component::{location_marker, to_lat_lng, MapView},
        sos_button::SosButton,
        status::StatusBadge,
    },
    geolocation::BrowserLocation,
    util,
};

pub enum Msg {
    Poll,
    Telemetry(Result<Telemetry, ApiError>),
    Fix(Result<Position, PositionError>),
    Recenter,
}

pub struct DashboardPage {
    telemetry: Option<Telemetry>,
    gps: GpsStatus,
    position: Option<LatLon>,
    map: MapView,
    marker: Marker,
    _location: BrowserLocation,
    _poll: Interval,
}

impl Component for DashboardPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        link.send_message(Msg::Poll);
        let poll = {
            let link = link.clone();
            Interval::new(TELEMETRY_POLL_MS, move || link.send_message(Msg::Poll))
        };

        let mut location = BrowserLocation::new(link.callback(Msg::Fix));
        let gps = match location.watch() {
            Ok(()) => GpsStatus::Searching,
            Err(PositionError::Unsupported) => GpsStatus::Unsupported,
            Err(_) => GpsStatus::Error,
        };

        let map = MapView::new();
        let marker = location_marker(map.map());

        Self {
            telemetry: None,
            gps,
            position: None,
            map,
            marker,
            _location: location,
            _poll: poll,
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        self.map.init();
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Poll => {
                ctx.link().send_future(async { Msg::Telemetry(HttpApi.telemetry().await) });
                false
            }
            Msg::Telemetry(Ok(telemetry)) => {
                self.telemetry = Some(telemetry);
                true
            }
            Msg::Telemetry(Err(err)) => {
                tracing::warn!("Error fetching data: {err}");
                false
            }
            Msg::Fix(Ok(position)) => {
                let location = position.lat_lon();
                self.gps = GpsStatus::Connected;
                self.position = Some(location);
                self.map.set_view(location, DASHBOARD_ZOOM);
                self.marker.set_lat_lng(&to_lat_lng(location));
                true
            }
            Msg::Fix(Err(err)) => {
                tracing::warn!("Geolocation error: {err}");
                self.gps = GpsStatus::Error;
                true
            }
            Msg::Recenter => {
                match self.position {
                    Some(location) => self.map.set_view(location, DASHBOARD_ZOOM),
                    None => util::alert("Still trying to find your location. Please wait."),
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let gps = self.gps.to_string();

        html! {
            <div class="dashboard-page">
                {self.status_card()}
                <div class="card connection-card">
                    <h2>{"Connections"}</h2>
                    if let Some(telemetry) = &self.telemetry {
                        <StatusBadge
                            label="Bluetooth"
                            status={telemetry.connection_status.bluetooth.to_string()}
                            connected={telemetry.connection_status.bluetooth.is_connected()} />
                        <StatusBadge
                            label="Wi-Fi"
                            status={telemetry.connection_status.wifi.to_string()}
                            connected={telemetry.connection_status.wifi.is_connected()} />
                    }
                    <StatusBadge label="GPS" status={gps} connected={self.gps == GpsStatus::Connected} />
                </div>
                {self.health_card()}
                <div class="card map-card">
                    <div class="map-container">
                        {self.map.render()}
                    </div>
                    <button id="recenter-button" onclick={ctx.link().callback(|_| Msg::Recenter)}>
                        {"Recenter"}
                    </button>
                </div>
                <SosButton />
            </div>
        }
    }
}

impl DashboardPage {
    fn status_card(&self) -> Html {
        let Some(telemetry) = &self.telemetry else {
            return html! {
                <div id="status-card" class="card">
                    <h2 id="status-text">{"Connecting..."}</h2>
                </div>
            };
        };

        let status = OverallStatus::of(telemetry);
        html! {
            <div id="status-card" class={status.css_class()}>
                <h2 id="status-text">{status.title()}</h2>
                <p id="status-subtext">{status.subtitle()}</p>
                if telemetry.fall_detected {
                    <div id="fall-alert" class="fall-alert">{"Fall detected!"}</div>
                }
            </div>
        }
    }

    fn health_card(&self) -> Html {
        let (heart_rate, oxygen) = self
            .telemetry
            .as_ref()
            .map(|t| (t.health.heart_rate.to_string(), t.health.oxygen_level.to_string()))
            .unwrap_or_else(|| ("--".to_owned(), "--".to_owned()));

        let reported_position = self.telemetry.as_ref().and_then(|t| t.gps).map(|gps| {
            html! {
                <p class="reported-position">
                    {format!("Device position: {:.5}, {:.5}", gps.latitude, gps.longitude)}
                </p>
            }
        });

        html! {
            <div class="card health-card">
                <div class="metric">
                    <span id="heart-rate" class="metric-value">{heart_rate}</span>
                    <span class="metric-unit">{"bpm"}</span>
                </div>
                <div class="metric">
                    <span id="oxygen-level" class="metric-value">{oxygen}</span>
                    <span class="metric-unit">{"% SpO2"}</span>
                </div>
                {reported_position}
            </div>
        }
    }
}
