use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct StatusProps {
    pub label: AttrValue,
    pub status: AttrValue,
    pub connected: bool,
}

/// A labelled dot that lights up when the link is connected.
#[function_component]
pub fn StatusBadge(props: &StatusProps) -> Html {
    let dot = if props.connected { "status-dot connected" } else { "status-dot" };

    html! {
        <div class="status-item">
            <span class="status-label">{props.label.clone()}</span>
            <span class={dot}></span>
            <span class="status-text">{props.status.clone()}</span>
        </div>
    }
}
