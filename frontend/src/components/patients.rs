use common::req::Patient;
use yew::prelude::*;

use super::{
    forms::PatientForm, list_banner, list_controls, list_status, refresh_button, use_list,
};

#[derive(Clone, PartialEq)]
enum Editor {
    Closed,
    New,
    Edit(Patient),
}

#[function_component(Patients)]
pub fn patients() -> Html {
    let list = use_list::<Patient>();
    let editor = use_state(|| Editor::Closed);

    let on_new = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| editor.set(Editor::New))
    };
    let on_saved = {
        let editor = editor.clone();
        let list = list.clone();
        Callback::from(move |_: Patient| {
            editor.set(Editor::Closed);
            list.refresh();
        })
    };
    let on_cancel = {
        let editor = editor.clone();
        Callback::from(move |_| editor.set(Editor::Closed))
    };

    let form = match &*editor {
        Editor::Closed => html! {},
        Editor::New => html! {
            <PatientForm key="new" {on_saved} {on_cancel} />
        },
        Editor::Edit(patient) => html! {
            <PatientForm key={patient.id.to_string()} editing={patient.clone()} {on_saved} {on_cancel} />
        },
    };

    let body = list_status(&list).unwrap_or_else(|| {
        let view = list.view();
        if view.items.is_empty() {
            return html! { <div class="empty">{"No patients yet."}</div> };
        }

        view.items
            .iter()
            .map(|patient| {
                let on_edit = {
                    let editor = editor.clone();
                    let patient = patient.clone();
                    Callback::from(move |_: MouseEvent| editor.set(Editor::Edit(patient.clone())))
                };
                let on_delete = {
                    let list = list.clone();
                    let id = patient.id;
                    Callback::from(move |_: MouseEvent| {
                        list.delete(id, "Are you sure you want to delete this patient?")
                    })
                };
                let created = patient.created_at.map_or("-".to_owned(), |ts| {
                    ts.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string()
                });

                html! {
                    <div class="border-rounded card" key={patient.id}>
                        <div class="card-header">
                            <div class="card-item">{patient.nom.clone()}</div>
                            <hr/>
                        </div>
                        <div class="card-content">
                            <div class="card-item">{"Age"}</div><div>{patient.age}</div>
                            <div class="card-item">{"Sex"}</div><div>{patient.sexe.label()}</div>
                            <div class="card-item">{"Email"}</div><div>{patient.email.clone()}</div>
                            <div class="card-item">{"Registered"}</div><div>{created}</div>
                        </div>
                        <div class="card-actions">
                            <button class="btn btn-default" onclick={on_edit}>{"Edit"}</button>
                            <button class="btn btn-danger" onclick={on_delete}>{"Delete"}</button>
                        </div>
                    </div>
                }
            })
            .collect()
    });

    html! {
        <>
            <div class="toolbar">
                {refresh_button(&list)}
                <button class="btn btn-primary" onclick={on_new}>{"+ New patient"}</button>
            </div>
            {form}
            {list_banner(&list)}
            <div class="card-grid">{body}</div>
            {list_controls(&list, "patients")}
        </>
    }
}
