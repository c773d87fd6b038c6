use common::req::{Measurement, MeasurementType};
use yew::prelude::*;

use super::{
    chart_plotly::ChartPlotly, forms::MeasurementForm, list_banner, list_controls, list_status,
    refresh_button, use_list, use_lookups,
};
use crate::{
    dataset::{group_measurements, series, Snapshot},
    lookups::Lookups,
};

const CHART_POINTS: usize = 15;
const CHARTS: [MeasurementType; 3] = [
    MeasurementType::Temperature,
    MeasurementType::HeartRate,
    MeasurementType::BloodPressure,
];

#[derive(Clone, Copy, PartialEq)]
enum Layout {
    Grouped,
    Table,
}

fn snapshot_card(snapshot: &Snapshot, lookups: &Lookups) -> Html {
    let key = format!("{}-{}-{}", snapshot.patient, snapshot.device, snapshot.minute.timestamp());
    let cards: Html = snapshot
        .cards()
        .map(|(kind, slot)| match slot {
            Some(slot) => html! {
                <div class="reading received" key={kind.as_str().to_owned()}>
                    <div class="card-item">{kind.name().to_owned()}</div>
                    <div class="reading-value">{format!("{} {}", slot.value, kind.unit())}</div>
                    <div class="reading-state">{"✓ received"}</div>
                </div>
            },
            None => html! {
                <div class="reading pending" key={kind.as_str().to_owned()}>
                    <div class="card-item">{kind.name().to_owned()}</div>
                    <div class="reading-value">{format!("-- {}", kind.unit())}</div>
                    <div class="reading-state">{"⏳ missing"}</div>
                </div>
            },
        })
        .collect();

    html! {
        <div class="border-rounded card snapshot" key={key}>
            <div class="card-header">
                <div class="card-item">{lookups.patient_label(snapshot.patient)}</div>
                <div>{lookups.device_label(snapshot.device)}</div>
                <div>{snapshot.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string()}</div>
                <hr/>
            </div>
            <div class="card-content readings">{cards}</div>
        </div>
    }
}

#[function_component(Measurements)]
pub fn measurements() -> Html {
    let list = use_list::<Measurement>();
    let lookups = use_lookups();
    let layout = use_state(|| Layout::Grouped);
    let editor = use_state(|| None::<Option<Measurement>>);

    let items = &list.view().items;
    let snapshots = use_memo(items.clone(), |items| group_measurements(items));

    let on_layout = |target: Layout| {
        let layout = layout.clone();
        Callback::from(move |_: MouseEvent| layout.set(target))
    };
    let on_new = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| editor.set(Some(None)))
    };
    let on_saved = {
        let editor = editor.clone();
        let list = list.clone();
        Callback::from(move |_: Measurement| {
            editor.set(None);
            list.refresh();
        })
    };
    let on_cancel = {
        let editor = editor.clone();
        Callback::from(move |_| editor.set(None))
    };

    let form = match &*editor {
        None => html! {},
        Some(editing) => {
            let key = editing.as_ref().map_or("new".to_owned(), |m| m.id.to_string());
            html! {
                <MeasurementForm key={key} editing={editing.clone()} lookups={lookups.shared()} {on_saved} {on_cancel} />
            }
        }
    };

    let charts: Html = CHARTS
        .iter()
        .map(|kind| {
            html! {
                <ChartPlotly key={kind.as_str().to_owned()} id={format!("chart-{}", kind.as_str())}
                    series={series(items, kind.clone(), CHART_POINTS)} />
            }
        })
        .collect();

    let body = list_status(&list).unwrap_or_else(|| match *layout {
        Layout::Grouped if snapshots.is_empty() => html! {
            <div class="empty">{"No measurements yet."}</div>
        },
        Layout::Grouped => snapshots
            .iter()
            .map(|snapshot| snapshot_card(snapshot, &lookups))
            .collect(),
        Layout::Table => {
            let rows: Html = items
                .iter()
                .map(|m| {
                    let on_edit = {
                        let editor = editor.clone();
                        let m = m.clone();
                        Callback::from(move |_: MouseEvent| editor.set(Some(Some(m.clone()))))
                    };
                    let on_delete = {
                        let list = list.clone();
                        let id = m.id;
                        Callback::from(move |_: MouseEvent| list.delete(id, "Delete this measurement?"))
                    };

                    html! {
                        <tr key={m.id}>
                            <td>{lookups.patient_label(m.patient)}</td>
                            <td>{lookups.device_label(m.device)}</td>
                            <td>{m.type_donne.name().to_owned()}</td>
                            <td>{format!("{} {}", m.valeur, m.type_donne.unit())}</td>
                            <td>{m.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string()}</td>
                            <td>
                                <button class="btn btn-default btn-xs" onclick={on_edit}>{"Edit"}</button>
                                <button class="btn btn-danger btn-xs" onclick={on_delete}>{"Delete"}</button>
                            </td>
                        </tr>
                    }
                })
                .collect();

            html! {
                <table class="table table-hover">
                    <thead>
                        <tr>
                            <th>{"Patient"}</th><th>{"Device"}</th><th>{"Type"}</th>
                            <th>{"Value"}</th><th>{"Time"}</th><th/>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            }
        }
    });

    let toggle_class = |target: Layout| {
        if *layout == target {
            "btn btn-primary"
        } else {
            "btn btn-default"
        }
    };

    html! {
        <>
            <div class="toolbar">
                <div class="btn-group">
                    <button class={toggle_class(Layout::Grouped)} onclick={on_layout(Layout::Grouped)}>{"Grouped"}</button>
                    <button class={toggle_class(Layout::Table)} onclick={on_layout(Layout::Table)}>{"Table"}</button>
                </div>
                {refresh_button(&list)}
                <button class="btn btn-primary" onclick={on_new}>{"+ New measurement"}</button>
            </div>
            {form}
            <div class="charts">{charts}</div>
            {list_banner(&list)}
            {lookups.banner()}
            {body}
            {list_controls(&list, "measurements")}
        </>
    }
}
