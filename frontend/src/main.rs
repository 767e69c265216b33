use components::{
    assistant_page::AssistantPage, dashboard_page::DashboardPage, health_page::HealthPage,
    location_page::LocationPage,
};
use gloo_console::info;
use yew::prelude::*;
use yew_router::{prelude::Link, BrowserRouter, Routable, Switch};

mod api;
mod components;
mod geolocation;
mod speech;
mod util;

#[derive(Clone, Debug, PartialEq, Routable)]
enum Route {
    #[at("/")]
    Dashboard,
    #[at("/location")]
    Location,
    #[at("/health")]
    Health,
    #[at("/assistant")]
    Assistant,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    info!(format!("Route: {:?}", route));

    match route {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Location => html! { <LocationPage /> },
        Route::Health => html! { <HealthPage /> },
        Route::Assistant => html! { <AssistantPage /> },
        Route::NotFound => html! {
            <div class="card not-found">
                <h2>{"Page not found"}</h2>
                <Link<Route> to={Route::Dashboard}>{"Back to the dashboard"}</Link<Route>>
            </div>
        },
    }
}

#[function_component]
fn NavBar() -> Html {
    html! {
        <nav class="nav-bar">
            <Link<Route> to={Route::Dashboard} classes={classes!("nav-link")}>{"Dashboard"}</Link<Route>>
            <Link<Route> to={Route::Location} classes={classes!("nav-link")}>{"Location"}</Link<Route>>
            <Link<Route> to={Route::Health} classes={classes!("nav-link")}>{"Health"}</Link<Route>>
            <Link<Route> to={Route::Assistant} classes={classes!("nav-link")}>{"Assistant"}</Link<Route>>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <NavBar />
            <main class="page">
                <Switch<Route> render={switch} />
            </main>
        </BrowserRouter>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
