use std::rc::Rc;

use common::req::{Device, Measurement, MeasurementType, Patient, Resource, Sex};
use log::info;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::{use_api, use_lifetime, ApiHandle};
use crate::{
    forms::{Draft, DeviceDraft, EntityForm, FormAction, MeasurementDraft, PatientDraft},
    lifetime::Lifetime,
    lookups::Lookups,
};

#[derive(Properties, PartialEq)]
pub struct Props<E: PartialEq + 'static> {
    /// Entity being edited, `None` to create one. The parent keys the form by its id.
    #[prop_or_default]
    pub editing: Option<E>,
    pub on_saved: Callback<E>,
    pub on_cancel: Callback<()>,
    #[prop_or_default]
    pub lookups: Rc<Lookups>,
}

pub struct FormHandle<D: Draft> {
    state: UseReducerHandle<EntityForm<D>>,
    api: ApiHandle,
    lifetime: Lifetime,
    on_saved: Callback<D::Entity>,
}

impl<D: Draft> Clone for FormHandle<D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
            lifetime: self.lifetime.clone(),
            on_saved: self.on_saved.clone(),
        }
    }
}

impl<D: Draft> FormHandle<D> {
    pub fn form(&self) -> &EntityForm<D> {
        &self.state
    }

    fn update(&self, set: impl FnOnce(&mut D)) {
        let mut draft = self.state.draft.clone();
        set(&mut draft);
        self.state.dispatch(FormAction::Edit(draft));
    }

    pub fn text(&self, set: impl Fn(&mut D, String) + 'static) -> Callback<InputEvent> {
        let form = self.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            form.update(|draft| set(draft, value));
        })
    }

    pub fn select(&self, set: impl Fn(&mut D, String) + 'static) -> Callback<Event> {
        let form = self.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            form.update(|draft| set(draft, value));
        })
    }

    pub fn check(&self, set: impl Fn(&mut D, bool) + 'static) -> Callback<Event> {
        let form = self.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            form.update(|draft| set(draft, checked));
        })
    }

    pub fn submit(&self) -> Callback<SubmitEvent> {
        let form = self.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let mut next = (*form.state).clone();
            let request = next.begin_submit();
            form.state.dispatch(FormAction::Replace(next));
            let Ok(request) = request else {
                return;
            };

            let form = form.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match form.api.get() {
                    Ok(api) => request.send::<D::Entity, _>(api).await,
                    Err(err) => Err(err),
                };
                form.lifetime.run(|| {
                    form.state.dispatch(FormAction::finished(&result));
                    if let Ok(entity) = result {
                        info!("saved {}", D::Entity::item_path(entity.id()));
                        form.on_saved.emit(entity);
                    }
                });
            });
        })
    }
}

/// A create form is seeded again whenever `lookups` changes, so defaults that depend on
/// patients and devices show up once those arrive.
#[hook]
pub fn use_entity_form<D, F>(
    editing: Option<D::Entity>,
    lookups: Rc<Lookups>,
    blank: F,
    on_saved: Callback<D::Entity>,
) -> FormHandle<D>
where
    D: Draft,
    F: FnOnce(&Lookups) -> D + 'static,
{
    let state = {
        let lookups = lookups.clone();
        use_reducer(move || match &editing {
            Some(entity) => EntityForm::edit(entity),
            None => EntityForm::create(blank(&lookups)),
        })
    };
    {
        let state = state.clone();
        use_effect_with(lookups, move |lookups| {
            state.dispatch(FormAction::Seed(lookups.clone()));
        });
    }

    FormHandle {
        state,
        api: use_api(),
        lifetime: use_lifetime(),
        on_saved,
    }
}

fn form_footer<D: Draft>(form: &FormHandle<D>, on_cancel: &Callback<()>) -> Html {
    let state = form.form();
    let on_cancel = on_cancel.reform(|_: MouseEvent| ());
    let label = match (state.submitting, state.is_edit()) {
        (true, _) => "Saving…",
        (false, true) => "Save",
        (false, false) => "Create",
    };

    html! {
        <div class="form-actions">
            <button type="button" class="btn btn-default" onclick={on_cancel}>{"Cancel"}</button>
            <button type="submit" class="btn btn-primary" disabled={state.submitting}>{label}</button>
        </div>
    }
}

fn form_error<D: Draft>(form: &FormHandle<D>) -> Html {
    match &form.form().error {
        Some(message) => html! { <div class="alert alert-danger">{message.clone()}</div> },
        None => html! {},
    }
}

fn patient_options(lookups: &Lookups, selected: Option<u64>) -> Html {
    lookups
        .patients
        .iter()
        .map(|p| {
            html! {
                <option value={p.id.to_string()} selected={Some(p.id) == selected}>{p.nom.clone()}</option>
            }
        })
        .collect()
}

#[function_component(PatientForm)]
pub fn patient_form(props: &Props<Patient>) -> Html {
    let form = use_entity_form::<PatientDraft, _>(
        props.editing.clone(),
        props.lookups.clone(),
        |_| PatientDraft::default(),
        props.on_saved.clone(),
    );
    let draft = &form.form().draft;

    html! {
        <form class="entity-form" onsubmit={form.submit()}>
            <h2>{ if form.form().is_edit() { "Edit patient" } else { "New patient" } }</h2>
            {form_error(&form)}
            <label for="nom">{"Name"}</label>
            <input id="nom" type="text" value={draft.nom.clone()}
                oninput={form.text(|d, v| d.nom = v)} />
            <label for="age">{"Age"}</label>
            <input id="age" type="number" min="0" value={draft.age.clone()}
                oninput={form.text(|d, v| d.age = v)} />
            <label for="sexe">{"Sex"}</label>
            <select id="sexe" onchange={form.select(|d, v| d.sexe = Sex::from(v))}>
                { for Sex::ALL.iter().map(|s| html! {
                    <option value={s.as_str()} selected={*s == draft.sexe}>{s.label()}</option>
                }) }
            </select>
            <label for="email">{"Email"}</label>
            <input id="email" type="email" value={draft.email.clone()}
                oninput={form.text(|d, v| d.email = v)} />
            {form_footer(&form, &props.on_cancel)}
        </form>
    }
}

#[function_component(DeviceForm)]
pub fn device_form(props: &Props<Device>) -> Html {
    let form = use_entity_form::<DeviceDraft, _>(
        props.editing.clone(),
        props.lookups.clone(),
        DeviceDraft::new,
        props.on_saved.clone(),
    );
    let draft = &form.form().draft;

    html! {
        <form class="entity-form" onsubmit={form.submit()}>
            <h2>{ if form.form().is_edit() { "Edit device" } else { "New device" } }</h2>
            {form_error(&form)}
            <label for="patient">{"Patient"}</label>
            <select id="patient" onchange={form.select(|d, v| d.patient = v.parse().ok())}>
                {patient_options(&props.lookups, draft.patient)}
            </select>
            <label for="device_id">{"Device identifier"}</label>
            <input id="device_id" type="text" value={draft.device_id.clone()}
                oninput={form.text(|d, v| d.device_id = v)} />
            <label for="type_capteur">{"Sensor type"}</label>
            <select id="type_capteur" onchange={form.select(|d, v| d.type_capteur = v)}>
                { for MeasurementType::KNOWN.iter().map(|t| html! {
                    <option value={t.as_str().to_owned()} selected={t.as_str() == draft.type_capteur}>{t.name().to_owned()}</option>
                }) }
            </select>
            <label class="checkbox">
                <input type="checkbox" checked={draft.status}
                    onchange={form.check(|d, v| d.status = v)} />
                {" Active"}
            </label>
            {form_footer(&form, &props.on_cancel)}
        </form>
    }
}

#[function_component(MeasurementForm)]
pub fn measurement_form(props: &Props<Measurement>) -> Html {
    let form = use_entity_form::<MeasurementDraft, _>(
        props.editing.clone(),
        props.lookups.clone(),
        MeasurementDraft::new,
        props.on_saved.clone(),
    );
    let draft = &form.form().draft;
    let on_patient = {
        let lookups = props.lookups.clone();
        form.select(move |d, v| d.select_patient(v.parse().ok(), &lookups))
    };

    html! {
        <form class="entity-form" onsubmit={form.submit()}>
            <h2>{ if form.form().is_edit() { "Edit measurement" } else { "New measurement" } }</h2>
            {form_error(&form)}
            <label for="patient">{"Patient"}</label>
            <select id="patient" onchange={on_patient}>
                {patient_options(&props.lookups, draft.patient)}
            </select>
            <label for="device">{"Device"}</label>
            <select id="device" onchange={form.select(|d, v| d.device = v.parse().ok())}>
                { for props.lookups.device_choices(draft.patient).into_iter().map(|dev| html! {
                    <option value={dev.id.to_string()} selected={Some(dev.id) == draft.device}>{dev.device_id.clone()}</option>
                }) }
            </select>
            <label for="type_donne">{"Type"}</label>
            <select id="type_donne" onchange={form.select(|d, v| d.type_donne = MeasurementType::from(v))}>
                { for MeasurementType::KNOWN.iter().map(|t| html! {
                    <option value={t.as_str().to_owned()} selected={*t == draft.type_donne}>{t.name().to_owned()}</option>
                }) }
            </select>
            <label for="valeur">{"Value"}</label>
            <input id="valeur" type="number" step="any" value={draft.valeur.clone()}
                oninput={form.text(|d, v| d.valeur = v)} />
            {form_footer(&form, &props.on_cancel)}
        </form>
    }
}
