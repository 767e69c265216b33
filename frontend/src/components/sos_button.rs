use guardian_lib::commands::send_sos_alert;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{api::HttpApi, util};

#[function_component]
pub fn SosButton() -> Html {
    let onclick = Callback::from(|_| {
        spawn_local(async {
            send_sos_alert(&HttpApi, util::confirm, util::alert).await;
        });
    });

    html! {
        <button id="sos-button" class="sos-button" {onclick}>
            {"SOS"}
        </button>
    }
}
