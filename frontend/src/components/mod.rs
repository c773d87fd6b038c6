pub mod alerts;
pub mod chart_plotly;
pub mod dashboard;
pub mod devices;
pub mod forms;
pub mod measurements;
pub mod patients;

use std::{ops::Deref, rc::Rc};

use common::req::Resource;
use log::{info, warn};
use yew::prelude::*;
use yew_hooks::{use_mount, use_unmount};

use crate::{
    config::config,
    error::ApiError,
    forms::{Draft, EntityForm, FormAction},
    lifetime::Lifetime,
    listing::{delete_then_reload, reload, ListAction, ListView, Reload},
    lookups::Lookups,
    request::Api,
};

impl<R: Resource> Reducible for ListView<R> {
    type Action = ListAction<R>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

impl<D: Draft> Reducible for EntityForm<D> {
    type Action = FormAction<D>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Client built once per view from the embedded config.
#[derive(Debug, Clone)]
pub struct ApiHandle(Rc<Result<Api, ApiError>>);

impl ApiHandle {
    pub fn get(&self) -> Result<&Api, ApiError> {
        self.0.as_ref().as_ref().map_err(|err| err.clone())
    }
}

#[hook]
pub fn use_api() -> ApiHandle {
    ApiHandle(use_memo((), |_| Api::from_config(config())))
}

/// Ended when the calling component unmounts.
#[hook]
pub fn use_lifetime() -> Lifetime {
    let lifetime = (*use_memo((), |_| Lifetime::default())).clone();
    {
        let lifetime = lifetime.clone();
        use_unmount(move || lifetime.end());
    }
    lifetime
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Paginated collection of one resource, loaded on mount.
pub struct ListHandle<R: Resource> {
    state: UseReducerHandle<ListView<R>>,
    api: ApiHandle,
    lifetime: Lifetime,
}

impl<R: Resource> Clone for ListHandle<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
            lifetime: self.lifetime.clone(),
        }
    }
}

impl<R: Resource> ListHandle<R> {
    pub fn view(&self) -> &ListView<R> {
        &self.state
    }

    fn load(&self, target: Reload) {
        let state = self.state.clone();
        let api = self.api.clone();
        let lifetime = self.lifetime.clone();

        state.dispatch(ListAction::Started);
        wasm_bindgen_futures::spawn_local(async move {
            let action = match api.get() {
                Ok(api) => reload::<R, _>(api, target).await,
                Err(err) => ListAction::Finished {
                    path: target.path,
                    result: Err(err),
                },
            };
            lifetime.run(|| state.dispatch(action));
        });
    }

    fn reload_target(&self) -> Reload {
        match self.api.get() {
            Ok(api) => self.state.reload_target(api),
            Err(_) => Reload::exact(self.state.current_path()),
        }
    }

    /// `cursor` is a `next`/`previous` url, `None` for the first page.
    pub fn go(&self, cursor: Option<&str>) {
        let path = match self.api.get() {
            Ok(api) => self.state.path_for(api, cursor),
            Err(_) => R::COLLECTION.to_owned(),
        };
        self.load(Reload::exact(path));
    }

    pub fn next(&self) {
        if let Some(url) = self.state.next.clone() {
            self.go(Some(&url));
        }
    }

    pub fn previous(&self) {
        if let Some(url) = self.state.previous.clone() {
            self.go(Some(&url));
        }
    }

    /// Reloads the page on screen, or the one before it if it no longer exists.
    pub fn refresh(&self) {
        self.load(self.reload_target());
    }

    /// Asks the user first. A failed delete is reported and leaves the page as it is.
    pub fn delete(&self, id: u64, question: &str) {
        if !confirm(question) {
            return;
        }

        let list = self.clone();
        let target = self.reload_target();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match list.api.get() {
                Ok(api) => delete_then_reload::<R, _>(api, id, target).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(action) => {
                    info!("deleted {}", R::item_path(id));
                    list.lifetime.run(|| list.state.dispatch(action));
                }
                Err(err) => {
                    warn!("delete of {} failed: {err}", R::item_path(id));
                    list.lifetime
                        .run(|| alert(&format!("Delete failed: {}", err.message())));
                }
            }
        });
    }
}

#[hook]
pub fn use_list<R: Resource>() -> ListHandle<R> {
    let list = ListHandle {
        state: use_reducer(ListView::<R>::default),
        api: use_api(),
        lifetime: use_lifetime(),
    };
    {
        let list = list.clone();
        use_mount(move || list.go(None));
    }
    list
}

/// Patients and devices for labels and selects. Labels fall back to ids while they are
/// missing.
#[derive(Clone)]
pub struct LookupsHandle {
    lookups: UseStateHandle<Rc<Lookups>>,
    error: UseStateHandle<Option<String>>,
    load: Callback<()>,
}

impl LookupsHandle {
    pub fn shared(&self) -> Rc<Lookups> {
        (*self.lookups).clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Warning with Retry after a failed fetch, nothing otherwise.
    pub fn banner(&self) -> Html {
        let Some(message) = self.error() else {
            return html! {};
        };
        let onclick = self.load.reform(|_: MouseEvent| ());

        html! {
            <div class="alert alert-warning">
                {format!("Patient and device names are unavailable: {message} ")}
                <button class="btn btn-default" {onclick}>{"Retry"}</button>
            </div>
        }
    }
}

impl Deref for LookupsHandle {
    type Target = Lookups;

    fn deref(&self) -> &Lookups {
        &self.lookups
    }
}

/// Fetched on mount.
#[hook]
pub fn use_lookups() -> LookupsHandle {
    let lookups = use_state(|| Rc::new(Lookups::default()));
    let error = use_state(|| None::<String>);
    let api = use_api();
    let lifetime = use_lifetime();

    let load = {
        let lookups = lookups.clone();
        let error = error.clone();
        Callback::from(move |_: ()| {
            let lookups = lookups.clone();
            let error = error.clone();
            let api = api.clone();
            let lifetime = lifetime.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match api.get() {
                    Ok(api) => Lookups::fetch(api).await,
                    Err(err) => Err(err),
                };
                lifetime.run(|| match result {
                    Ok(fetched) => {
                        lookups.set(Rc::new(fetched));
                        error.set(None);
                    }
                    Err(err) => {
                        warn!("cannot load patients and devices: {err}");
                        error.set(Some(err.message()));
                    }
                });
            });
        })
    };
    {
        let load = load.clone();
        use_mount(move || load.emit(()));
    }

    LookupsHandle {
        lookups,
        error,
        load,
    }
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub count: u64,
    pub noun: AttrValue,
    pub has_previous: bool,
    pub has_next: bool,
    pub on_previous: Callback<()>,
    pub on_next: Callback<()>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let on_previous = props.on_previous.reform(|_: MouseEvent| ());
    let on_next = props.on_next.reform(|_: MouseEvent| ());

    html! {
        <div class="pagination-bar">
            <span>{format!("Total: {} {}", props.count, props.noun)}</span>
            <div>
                <button class="btn btn-default" disabled={!props.has_previous} onclick={on_previous}>{"← Previous"}</button>
                <button class="btn btn-default" disabled={!props.has_next} onclick={on_next}>{"Next →"}</button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorPanelProps {
    pub message: AttrValue,
    pub on_retry: Callback<()>,
}

/// Replaces a view that never loaded.
#[function_component(ErrorPanel)]
pub fn error_panel(props: &ErrorPanelProps) -> Html {
    let on_retry = props.on_retry.reform(|_: MouseEvent| ());

    html! {
        <div class="error-panel">
            <h2>{"⚠ Loading failed"}</h2>
            <p>{props.message.clone()}</p>
            <button class="btn btn-primary" onclick={on_retry}>{"Retry"}</button>
        </div>
    }
}

/// Body of a list page: error panel before the first page arrived, a banner afterwards.
pub fn list_status<R: Resource>(list: &ListHandle<R>) -> Option<Html> {
    let view = list.view();
    let on_retry = {
        let list = list.clone();
        Callback::from(move |_| list.refresh())
    };

    match (&view.error, view.is_loaded()) {
        (Some(message), false) => Some(html! {
            <ErrorPanel message={message.clone()} {on_retry} />
        }),
        (None, false) => Some(html! { <div class="loading">{"Loading…"}</div> }),
        _ => None,
    }
}

/// Error of a reload while an older page is still shown.
pub fn list_banner<R: Resource>(list: &ListHandle<R>) -> Html {
    match &list.view().error {
        Some(message) if list.view().is_loaded() => html! {
            <div class="alert alert-danger">{message.clone()}</div>
        },
        _ => html! {},
    }
}

/// Refresh button and pagination wired to a list.
pub fn list_controls<R: Resource>(list: &ListHandle<R>, noun: &'static str) -> Html {
    let view = list.view();
    let on_previous = {
        let list = list.clone();
        Callback::from(move |_| list.previous())
    };
    let on_next = {
        let list = list.clone();
        Callback::from(move |_| list.next())
    };

    html! {
        <Pagination count={view.count} noun={noun}
            has_previous={view.has_previous()} has_next={view.has_next()}
            {on_previous} {on_next} />
    }
}

pub fn refresh_button<R: Resource>(list: &ListHandle<R>) -> Html {
    let onclick = {
        let list = list.clone();
        Callback::from(move |_: MouseEvent| list.refresh())
    };
    let loading = list.view().loading;

    html! {
        <button class="btn btn-default" disabled={loading} {onclick}>
            { if loading { "⟳ Loading…" } else { "⟳ Refresh" } }
        </button>
    }
}
