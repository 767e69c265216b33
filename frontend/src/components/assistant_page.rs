use gloo_timers::callback::{Interval, Timeout};
use guardian_lib::{
    api::{ApiError, GuardianApi},
    assistant::{AgentReply, ChatLog, FollowUp, Sender, SUGGESTIONS},
    commands::{toggle_device, CommandOutcome},
    config::{HANDOFF_DELAY_MS, SIDEBAR_POLL_MS},
    telemetry::{GpsStatus, Telemetry},
};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{
    api::HttpApi,
    components::{sos_button::SosButton, status::StatusBadge},
    util,
};

pub enum Msg {
    Input(String),
    Submit,
    Suggestion(&'static str),
    Reply(Result<AgentReply, ApiError>),
    RefreshSidebar,
    Sidebar(Result<Telemetry, ApiError>),
    Toggle(String),
    Toggled(CommandOutcome),
}

pub struct AssistantPage {
    chat: ChatLog,
    input: String,
    sidebar: Option<Telemetry>,
    _redirect: Option<Timeout>,
    _poll: Interval,
}

impl AssistantPage {
    fn send(&mut self, ctx: &Context<Self>, text: &str) -> bool {
        let Some(command) = self.chat.submit(text) else {
            return false;
        };

        self.input.clear();
        ctx.link().send_future(async move { Msg::Reply(HttpApi.agent_command(&command).await) });
        true
    }

    fn sidebar_view(&self, ctx: &Context<Self>) -> Html {
        let gps = if util::geolocation_supported() { GpsStatus::Connected } else { GpsStatus::Unsupported };
        let gps_badge = html! {
            <StatusBadge label="GPS" status={gps.to_string()} connected={gps == GpsStatus::Connected} />
        };

        let Some(telemetry) = &self.sidebar else {
            return html! {
                <aside class="sidebar">
                    {gps_badge}
                </aside>
            };
        };

        let links = &telemetry.connection_status;
        html! {
            <aside class="sidebar">
                <div class="card">
                    <h2>{"Connectivity"}</h2>
                    <StatusBadge label="Bluetooth" status={links.bluetooth.to_string()} connected={links.bluetooth.is_connected()} />
                    <StatusBadge label="Wi-Fi" status={links.wifi.to_string()} connected={links.wifi.is_connected()} />
                    {gps_badge}
                </div>
                <div class="card">
                    <h2>{"Smart home"}</h2>
                    <ul id="device-list">
                        { for telemetry.smart_devices.iter().map(|(name, state)| {
                            let device = name.clone();
                            let onchange = ctx.link().callback(move |_: Event| Msg::Toggle(device.clone()));
                            html! {
                                <li>
                                    <span>{name.clone()}</span>
                                    <div class="device-status">
                                        <span class="status-text">{state.to_string()}</span>
                                        <label class="switch">
                                            <input type="checkbox" checked={state.is_on()} {onchange} />
                                            <span class="slider"></span>
                                        </label>
                                    </div>
                                </li>
                            }
                        }) }
                    </ul>
                </div>
            </aside>
        }
    }
}

impl Component for AssistantPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        link.send_message(Msg::RefreshSidebar);
        let poll = Interval::new(SIDEBAR_POLL_MS, move || link.send_message(Msg::RefreshSidebar));

        Self {
            chat: ChatLog::default(),
            input: String::new(),
            sidebar: None,
            _redirect: None,
            _poll: poll,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(text) => {
                self.input = text;
                false
            }
            Msg::Submit => {
                let text = std::mem::take(&mut self.input);
                self.send(ctx, &text)
            }
            Msg::Suggestion(text) => self.send(ctx, text),
            Msg::Reply(reply) => {
                match self.chat.receive(reply) {
                    FollowUp::Redirect(url) => {
                        self._redirect = Some(Timeout::new(HANDOFF_DELAY_MS, move || util::redirect(&url)));
                    }
                    FollowUp::RefreshSidebar => ctx.link().send_message(Msg::RefreshSidebar),
                    FollowUp::Nothing => {}
                }
                true
            }
            Msg::RefreshSidebar => {
                ctx.link().send_future(async { Msg::Sidebar(HttpApi.telemetry().await) });
                false
            }
            Msg::Sidebar(Ok(telemetry)) => {
                self.sidebar = Some(telemetry);
                true
            }
            Msg::Sidebar(Err(err)) => {
                // Keep showing the last known state
                tracing::warn!("Sidebar refresh failed: {err}");
                false
            }
            Msg::Toggle(device) => {
                ctx.link().send_future(async move { Msg::Toggled(toggle_device(&HttpApi, &device).await) });
                false
            }
            Msg::Toggled(_) => {
                ctx.link().send_message(Msg::RefreshSidebar);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Input(input.value())
        });

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="assistant-page">
                <section class="chat card">
                    <div id="chat-box" class="chat-box">
                        { for self.chat.messages().iter().map(|message| {
                            let (class, icon) = match message.sender {
                                Sender::User => ("user-message", "fa-solid fa-user"),
                                Sender::Assistant => ("ai-message", "fa-solid fa-robot"),
                            };
                            html! {
                                <div {class}>
                                    <i class={icon}></i>
                                    <p>{message.text.clone()}</p>
                                </div>
                            }
                        }) }
                        if self.chat.awaiting_reply() {
                            <div id="typing-indicator" class="ai-message">
                                <i class="fa-solid fa-robot"></i>
                                <div class="typing-dots"><span></span><span></span><span></span></div>
                            </div>
                        }
                    </div>
                    <div id="suggestion-chips" class="chips">
                        { for SUGGESTIONS.into_iter().map(|text| html! {
                            <button class="chip" onclick={ctx.link().callback(move |_| Msg::Suggestion(text))}>
                                {text}
                            </button>
                        }) }
                    </div>
                    <form id="chat-form" {onsubmit}>
                        <input id="chat-input" type="text" placeholder="Ask me anything..." value={self.input.clone()} {oninput} />
                        <button type="submit">{"Send"}</button>
                    </form>
                </section>
                {self.sidebar_view(ctx)}
                <SosButton />
            </div>
        }
    }
}
