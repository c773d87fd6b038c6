mod components;
mod config;
mod dataset;
mod error;
mod forms;
mod lifetime;
mod listing;
mod lookups;
mod request;
mod summary;

use log::{info, warn};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::config::config;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/dashboard")]
    Dashboard,
    #[at("/patients")]
    Patients,
    #[at("/devices")]
    Devices,
    #[at("/mesures")]
    Measurements,
    #[at("/alerts")]
    Alerts,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Dashboard => "Dashboard",
            Route::Patients => "Patients",
            Route::Devices => "Devices",
            Route::Measurements => "Measurements",
            Route::Alerts => "Alerts",
            Route::NotFound => "404",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub current_route: Route,
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub route: Route,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(Page)]
pub fn page(props: &PageProps) -> Html {
    html! {
        <div class="container-fluid">
            <div class="row">
                <Sidebar current_route={props.route.clone()}/>
                <div class="col-sm-9 col-sm-offset-3 col-md-10 col-md-offset-2 main">
                    <h1 class="page-header">{props.route.title()}</h1>
                    {props.children.clone()}
                </div>
            </div>
        </div>
    }
}

#[function_component(PageHome)]
pub fn page_home() -> Html {
    html! {
        <Page route={Route::Home}>
            <p>{"Patient monitoring: follow patients, their devices, the readings they send and the alerts they raise."}</p>
            <div class="home-links">
                <Link<Route> to={Route::Dashboard} classes="btn btn-primary">{"Open the dashboard"}</Link<Route>>
                <Link<Route> to={Route::Patients} classes="btn btn-default">{"Manage patients"}</Link<Route>>
            </div>
        </Page>
    }
}

#[function_component(Sidebar)]
pub fn sidebar(props: &Props) -> Html {
    let cr = &props.current_route;
    let class_active = move |r| {
        if *cr == r {
            "active"
        } else {
            ""
        }
    };

    html! {
        <div class="col-sm-3 col-md-2 sidebar">
            <ul class="nav nav-sidebar">
                <li class={class_active(Route::Home)}>
                    <Link<Route> to={Route::Home}>{"⌂ Home"}</Link<Route>>
                </li>
                <li class={class_active(Route::Dashboard)}>
                    <Link<Route> to={Route::Dashboard}>{"▦ Dashboard"}</Link<Route>>
                </li>
                <li class={class_active(Route::Patients)}>
                    <Link<Route> to={Route::Patients}>{"👤 Patients"}</Link<Route>>
                </li>
                <li class={class_active(Route::Devices)}>
                    <Link<Route> to={Route::Devices}>{"🖴 Devices"}</Link<Route>>
                </li>
                <li class={class_active(Route::Measurements)}>
                    <Link<Route> to={Route::Measurements}>{"🗠 Measurements"}</Link<Route>>
                </li>
                <li class={class_active(Route::Alerts)}>
                    <Link<Route> to={Route::Alerts}>{"⚠ Alerts"}</Link<Route>>
                </li>
            </ul>

            <ul class="nav nav-sidebar fix-bottom">
                {format!("v{}", env!("CARGO_PKG_VERSION"))}
            </ul>
        </div>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <PageHome/> },
        Route::Dashboard => html! {
            <Page {route}><components::dashboard::DashboardView /></Page>
        },
        Route::Patients => html! {
            <Page {route}><components::patients::Patients /></Page>
        },
        Route::Devices => html! {
            <Page {route}><components::devices::Devices /></Page>
        },
        Route::Measurements => html! {
            <Page {route}><components::measurements::Measurements /></Page>
        },
        Route::Alerts => html! {
            <Page {route}><components::alerts::Alerts /></Page>
        },
        Route::NotFound => html! { <Page {route}><p>{"Nothing here."}</p></Page> },
    }
}

fn main() {
    // up before the settings are read, narrowed once they are known
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    let config = config();
    for problem in &config.problems {
        warn!("{problem}");
    }
    log::set_max_level(config.log_level.to_level_filter());
    info!("api at {}", config.api_base_url);
    yew::Renderer::<App>::new().render();
}
