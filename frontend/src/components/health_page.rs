use gloo_timers::callback::Interval;
use guardian_lib::{
    api::{ApiError, GuardianApi},
    config::TELEMETRY_POLL_MS,
    telemetry::{ChartSeries, Doctor, Telemetry},
};
use yew::prelude::*;

use crate::{
    api::HttpApi,
    components::sos_button::SosButton,
    util,
};

const CHART_WIDTH: f64 = 600.;
const CHART_HEIGHT: f64 = 200.;

pub enum Msg {
    Poll,
    Telemetry(Result<Telemetry, ApiError>),
    Doctors(Result<Vec<Doctor>, ApiError>),
    Contact(usize),
}

pub struct HealthPage {
    telemetry: Option<Telemetry>,
    doctors: Option<Vec<Doctor>>,
    _poll: Interval,
}

impl Component for HealthPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        link.send_message(Msg::Poll);
        link.send_future(async { Msg::Doctors(HttpApi.nearby_doctors().await) });

        let poll = Interval::new(TELEMETRY_POLL_MS, move || link.send_message(Msg::Poll));

        Self {
            telemetry: None,
            doctors: None,
            _poll: poll,
        }
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
                tracing::warn!("Error fetching health data: {err}");
                false
            }
            Msg::Doctors(Ok(doctors)) => {
                self.doctors = Some(doctors);
                true
            }
            Msg::Doctors(Err(err)) => {
                tracing::warn!("Error fetching nearby doctors: {err}");
                false
            }
            Msg::Contact(index) => {
                if let Some(doctor) = self.doctors.as_ref().and_then(|doctors| doctors.get(index)) {
                    util::alert(&format!("Initiating contact with {}.", doctor.name));
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let value = |f: fn(&Telemetry) -> String| self.telemetry.as_ref().map(f).unwrap_or_else(|| "--".to_owned());

        let history = self.telemetry.as_ref().map(|t| t.health.history.clone()).unwrap_or_default();

        html! {
            <div class="health-page">
                <div class="card vitals">
                    <div class="metric"><span class="metric-label">{"Heart rate"}</span>
                        <span id="heart-rate">{value(|t| t.health.heart_rate.to_string())}</span></div>
                    <div class="metric"><span class="metric-label">{"Oxygen"}</span>
                        <span id="oxygen-level">{value(|t| t.health.oxygen_level.to_string())}</span></div>
                </div>
                <div class="card gait">
                    <div class="metric"><span class="metric-label">{"Gait speed"}</span>
                        <span id="gait-speed">{value(|t| t.gait.speed.to_string())}</span></div>
                    <div class="metric"><span class="metric-label">{"Step length"}</span>
                        <span id="gait-length">{value(|t| t.gait.step_length.to_string())}</span></div>
                    <div class="metric"><span class="metric-label">{"Symmetry"}</span>
                        <span id="gait-symmetry">{value(|t| t.gait.symmetry.to_string())}</span></div>
                </div>
                <div class="card chart-card">
                    <HeartRateChart {history} />
                </div>
                <div class="card doctors-card">
                    <h2>{"Nearby doctors"}</h2>
                    {self.doctor_list(ctx)}
                </div>
                <SosButton />
            </div>
        }
    }
}

impl HealthPage {
    fn doctor_list(&self, ctx: &Context<Self>) -> Html {
        let Some(doctors) = &self.doctors else {
            return html! { <p>{"Loading..."}</p> };
        };

        html! {
            <ul id="doctor-list">
                { for doctors.iter().enumerate().map(|(i, doctor)| html! {
                    <li>
                        <div class="doctor-info">
                            <strong>{doctor.name.clone()}</strong>
                            <span>{doctor.summary()}</span>
                        </div>
                        <button class="action-button" onclick={ctx.link().callback(move |_| Msg::Contact(i))}>
                            {"Contact"}
                        </button>
                    </li>
                }) }
            </ul>
        }
    }
}

#[derive(PartialEq, Properties, Clone)]
pub struct ChartProps {
    pub history: Vec<u32>,
}

#[function_component]
pub fn HeartRateChart(props: &ChartProps) -> Html {
    let series = ChartSeries::heart_rate(&props.history);
    let points = series
        .svg_points(CHART_WIDTH, CHART_HEIGHT)
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");

    let step = if series.labels.len() > 1 {
        CHART_WIDTH / (series.labels.len() - 1) as f64
    } else {
        0.
    };

    html! {
        <svg id="healthChart" class="heart-rate-chart" viewBox={format!("0 -10 {CHART_WIDTH} {}", CHART_HEIGHT + 30.)}>
            <polyline points={points} fill="none" stroke="#4A90E2" stroke-width="3" />
            { for series.labels.iter().enumerate().map(|(i, label)| html! {
                <text x={format!("{:.1}", i as f64 * step)} y={format!("{}", CHART_HEIGHT + 18.)} class="chart-label">
                    {label.clone()}
                </text>
            }) }
        </svg>
    }
}
