use common::req::Device;
use yew::prelude::*;

use super::{
    forms::DeviceForm, list_banner, list_controls, list_status, refresh_button, use_list,
    use_lookups,
};

#[function_component(Devices)]
pub fn device_list() -> Html {
    let list = use_list::<Device>();
    let lookups = use_lookups();
    // Some(None) creates, Some(Some(device)) edits
    let editor = use_state(|| None::<Option<Device>>);

    let on_new = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| editor.set(Some(None)))
    };
    let on_saved = {
        let editor = editor.clone();
        let list = list.clone();
        Callback::from(move |_: Device| {
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
            let key = editing.as_ref().map_or("new".to_owned(), |d| d.id.to_string());
            html! {
                <DeviceForm key={key} editing={editing.clone()} lookups={lookups.shared()} {on_saved} {on_cancel} />
            }
        }
    };

    let body = list_status(&list).unwrap_or_else(|| {
        let rows: Html = list
            .view()
            .items
            .iter()
            .map(|device| {
                let on_edit = {
                    let editor = editor.clone();
                    let device = device.clone();
                    Callback::from(move |_: MouseEvent| editor.set(Some(Some(device.clone()))))
                };
                let on_delete = {
                    let list = list.clone();
                    let id = device.id;
                    Callback::from(move |_: MouseEvent| list.delete(id, "Delete this device?"))
                };

                html! {
                    <tr key={device.id}>
                        <td>{device.device_id.clone()}</td>
                        <td>{lookups.patient_label(device.patient)}</td>
                        <td>{device.type_capteur.clone()}</td>
                        if device.status {
                            <td>{"🟢 Active"}</td>
                        } else {
                            <td class="warning">{"🔴 Inactive"}</td>
                        }
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
                        <th>{"Device"}</th><th>{"Patient"}</th><th>{"Sensor"}</th><th>{"Status"}</th><th/>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        }
    });

    html! {
        <>
            <div class="toolbar">
                {refresh_button(&list)}
                <button class="btn btn-primary" onclick={on_new}>{"+ New device"}</button>
            </div>
            {form}
            {list_banner(&list)}
            {lookups.banner()}
            {body}
            {list_controls(&list, "devices")}
        </>
    }
}
