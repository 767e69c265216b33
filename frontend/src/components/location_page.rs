use chrono::Utc;
use gloo_console::info;
use gloo_timers::callback::Interval;
use guardian_lib::{
    api::{ApiError, RoutePlanner},
    config::FIX_POLL_MS,
    handoff::PendingNavigation,
    navigation::NavigationSession,
    position::{Position, PositionError},
    route::RouteResponse,
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{
    api::HttpApi,
    components::{navigation_output::LeafletOutput, sos_button::SosButton},
    geolocation::BrowserLocation,
    util,
};

pub enum Msg {
    Fix(Result<Position, PositionError>),
    DestinationInput(String),
    FindRoute,
    RouteFinished(Result<RouteResponse, ApiError>),
    PreviousStep,
    NextStep,
    WaitForFix,
}

pub struct LocationPage {
    session: NavigationSession<LeafletOutput>,
    // Owns the sensor watch; dropping it stops tracking
    _location: BrowserLocation,
    pending: PendingNavigation,
    fix_poll: Option<Interval>,
    destination: String,
}

impl LocationPage {
    fn find_route(&mut self, ctx: &Context<Self>) -> bool {
        // Rejections are already shown to the user by the session
        let Ok(request) = self.session.begin_route_request(&self.destination) else {
            return true;
        };

        ctx.link().send_future(async move {
            Msg::RouteFinished(HttpApi.plan_route(&request).await)
        });
        true
    }

    fn stats_view(&self) -> Html {
        let stats = self.session.output().panel.stats;
        let distance = stats.map_or("0.00 km".to_owned(), |s| s.distance_text());
        let duration = stats.map_or("00:00".to_owned(), |s| s.elapsed_text());
        let speed = stats.and_then(|s| s.speed_text()).unwrap_or_else(|| "0.0 km/h".to_owned());

        html! {
            <div class="stats-panel card">
                <div class="stat"><span class="stat-label">{"Distance"}</span><span id="distance-traveled">{distance}</span></div>
                <div class="stat"><span class="stat-label">{"Duration"}</span><span id="duration">{duration}</span></div>
                <div class="stat"><span class="stat-label">{"Avg. speed"}</span><span id="avg-speed">{speed}</span></div>
            </div>
        }
    }

    fn instruction_view(&self, ctx: &Context<Self>) -> Html {
        let panel = &self.session.output().panel;
        let Some(instruction) = &panel.instruction else {
            return html! {};
        };

        let step_label = panel
            .step
            .map(|(index, total)| format!("Step {} of {}", index + 1, total))
            .unwrap_or_default();

        html! {
            <div id="instruction-panel" class="instruction-panel">
                <button id="prev-step-btn" onclick={ctx.link().callback(|_| Msg::PreviousStep)}>{"◀"}</button>
                <div class="instruction">
                    <span class="step-label">{step_label}</span>
                    <p id="instruction-text">{instruction.clone()}</p>
                </div>
                <button id="next-step-btn" onclick={ctx.link().callback(|_| Msg::NextStep)}>{"▶"}</button>
            </div>
        }
    }
}

impl Component for LocationPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();

        let mut session = NavigationSession::new(LeafletOutput::new());
        let mut location = BrowserLocation::new(link.callback(Msg::Fix));
        session.start_tracking(&mut location);

        let pending = PendingNavigation::from_query(&util::query_string());
        let destination = pending.destination().unwrap_or_default().to_owned();

        let fix_poll = pending.is_pending().then(|| {
            info!("Waiting for a GPS fix before routing");
            let link = link.clone();
            Interval::new(FIX_POLL_MS, move || link.send_message(Msg::WaitForFix))
        });

        Self {
            session,
            _location: location,
            pending,
            fix_poll,
            destination,
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        self.session.output_mut().map.init();
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Fix(Ok(position)) => {
                self.session.on_position_update(position, Utc::now());
                true
            }
            Msg::Fix(Err(err)) => {
                self.session.on_position_error(&err);
                false
            }
            Msg::DestinationInput(destination) => {
                self.destination = destination;
                false
            }
            Msg::FindRoute => self.find_route(ctx),
            Msg::RouteFinished(result) => {
                let _ = self.session.finish_route_request(result);
                true
            }
            Msg::PreviousStep => self.session.previous_step(),
            Msg::NextStep => self.session.next_step(),
            Msg::WaitForFix => {
                let Some(destination) = self.pending.poll(self.session.has_fix()) else {
                    return false;
                };

                if let Some(poll) = self.fix_poll.take() {
                    poll.cancel();
                }
                self.destination = destination;
                self.find_route(ctx)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let busy = self.session.output().panel.route_busy;

        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::DestinationInput(input.value())
        });

        let onkeydown = ctx.link().batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::FindRoute));

        html! {
            <div class="location-page">
                <div class="route-search card">
                    <input
                        id="destination-input"
                        type="text"
                        placeholder="Where do you want to go?"
                        value={self.destination.clone()}
                        {oninput}
                        {onkeydown}
                    />
                    <button id="get-route-btn" disabled={busy} onclick={ctx.link().callback(|_| Msg::FindRoute)}>
                        {if busy { "Calculating..." } else { "Find Route" }}
                    </button>
                </div>
                {self.instruction_view(ctx)}
                <div class="map-container">
                    {self.session.output().map.render()}
                </div>
                {self.stats_view()}
                <SosButton />
            </div>
        }
    }
}
