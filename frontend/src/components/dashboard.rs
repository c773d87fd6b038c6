use log::warn;
use yew::prelude::*;
use yew_hooks::use_mount;

use super::{
    alerts::alert_table, chart_plotly::ChartPlotly, use_api, use_lifetime, use_lookups, ErrorPanel,
};
use crate::{
    config::config,
    summary::{load_dashboard, Dashboard},
};

#[derive(Clone, PartialEq)]
enum State {
    Loading,
    Loaded(Dashboard),
    Failed(String),
}

#[function_component(DashboardView)]
pub fn dashboard_view() -> Html {
    let state = use_state(|| State::Loading);
    let api = use_api();
    let lifetime = use_lifetime();
    let lookups = use_lookups();

    let load = {
        let state = state.clone();
        Callback::from(move |_: ()| {
            let state = state.clone();
            let api = api.clone();
            let lifetime = lifetime.clone();

            state.set(State::Loading);
            wasm_bindgen_futures::spawn_local(async move {
                let result = match api.get() {
                    Ok(api) => load_dashboard(api, config().dashboard_alert_limit).await,
                    Err(err) => Err(err),
                };
                lifetime.run(|| {
                    state.set(match result {
                        Ok(dashboard) => State::Loaded(dashboard),
                        Err(err) => {
                            warn!("dashboard failed: {err}");
                            State::Failed(err.message())
                        }
                    })
                });
            });
        })
    };
    {
        let load = load.clone();
        use_mount(move || load.emit(()));
    }

    let dashboard = match &*state {
        State::Loading => return html! { <div class="loading">{"Loading…"}</div> },
        State::Failed(message) => {
            return html! { <ErrorPanel message={message.clone()} on_retry={load} /> };
        }
        State::Loaded(dashboard) => dashboard,
    };

    let counter = |label: &'static str, value: u64| {
        html! {
            <div class="border-rounded card counter">
                <div class="card-item">{label}</div>
                <div class="counter-value">{value}</div>
            </div>
        }
    };
    let stats = dashboard.stats;

    html! {
        <>
            <div class="counters">
                {counter("Patients", stats.patients)}
                {counter("Devices", stats.devices)}
                {counter("Measurements", stats.measurements)}
                {counter("Alerts", stats.alerts)}
            </div>
            <div class="toolbar">
                <button class="btn btn-default" onclick={load.reform(|_: MouseEvent| ())}>{"⟳ Refresh"}</button>
            </div>
            <h2>{"Recent temperatures"}</h2>
            <ChartPlotly id="dashboard-temperature" series={dashboard.temperatures.clone()} />
            <h2>{"Recent alerts"}</h2>
            {lookups.banner()}
            {alert_table(&dashboard.alerts, &lookups)}
        </>
    }
}
