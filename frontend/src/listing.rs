use common::req::{Page, Resource};
use log::debug;

use crate::{
    error::ApiError,
    request::{ApiClient, Transport},
};

/// One page of a collection plus its cursors, as shown by the list pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<R> {
    pub items: Vec<R>,
    pub next: Option<String>,     // absolute url from the server
    pub previous: Option<String>, // absolute url from the server
    pub count: u64,
    pub loading: bool,
    pub error: Option<String>,
    cursor: Option<String>, // last requested path, relative to the base url
    loaded: bool,
}

pub enum ListAction<R> {
    Started,
    Finished {
        path: String,
        result: Result<Page<R>, ApiError>,
    },
}

impl<R> Default for ListView<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next: None,
            previous: None,
            count: 0,
            loading: false,
            error: None,
            cursor: None,
            loaded: false,
        }
    }
}

impl<R: Resource> ListView<R> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Whether any page made it to the screen yet. Decides between error panel and banner.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Path of the page currently shown, the first page before anything was loaded.
    pub fn current_path(&self) -> String {
        self.cursor
            .clone()
            .unwrap_or_else(|| R::COLLECTION.to_owned())
    }

    /// Path to fetch for `cursor`, a full url from `next`/`previous`, or the first page.
    pub fn path_for<T: Transport>(&self, api: &ApiClient<T>, cursor: Option<&str>) -> String {
        match cursor {
            Some(url) => api.strip_base(url),
            None => R::COLLECTION.to_owned(),
        }
    }

    pub fn previous_path<T: Transport>(&self, api: &ApiClient<T>) -> Option<String> {
        self.previous.as_deref().map(|url| api.strip_base(url))
    }

    pub fn apply(&mut self, action: ListAction<R>) {
        match action {
            ListAction::Started => {
                self.loading = true;
            }
            ListAction::Finished { path, result } => {
                self.loading = false;
                match result {
                    Ok(page) => {
                        self.items = page.results;
                        self.next = page.next;
                        self.previous = page.previous;
                        self.count = page.count;
                        self.cursor = Some(path);
                        self.error = None;
                        self.loaded = true;
                    }
                    // previous page stays on screen
                    Err(err) => self.error = Some(err.message()),
                }
            }
        }
    }

    /// Reload of the page on screen. A vanished page falls back to its predecessor, or to
    /// the first page when there is none.
    pub fn reload_target<T: Transport>(&self, api: &ApiClient<T>) -> Reload {
        Reload {
            path: self.current_path(),
            fallback: self
                .previous_path(api)
                .unwrap_or_else(|| R::COLLECTION.to_owned()),
        }
    }
}

/// Page to fetch, and the page to try once if that one answers 404.
#[derive(Debug, Clone, PartialEq)]
pub struct Reload {
    pub path: String,
    pub fallback: String,
}

impl Reload {
    /// No fallback: a 404 is reported as is.
    pub fn exact(path: String) -> Self {
        Self {
            fallback: path.clone(),
            path,
        }
    }
}

pub async fn fetch<R: Resource, T: Transport>(api: &ApiClient<T>, path: String) -> ListAction<R> {
    let result = api.list::<R>(&path).await;
    ListAction::Finished { path, result }
}

/// Fetches `target.path`, then `target.fallback` if the first page no longer exists.
pub async fn reload<R: Resource, T: Transport>(
    api: &ApiClient<T>,
    target: Reload,
) -> ListAction<R> {
    match fetch(api, target.path.clone()).await {
        ListAction::Finished {
            result: Err(ApiError::Http { status: 404, .. }),
            ..
        } if target.fallback != target.path => {
            debug!("{} is gone, loading {}", target.path, target.fallback);
            fetch(api, target.fallback).await
        }
        action => action,
    }
}

/// Deletes `id`, then reloads `target`.
///
/// `Err` is the delete's own failure, in which case nothing is reloaded. A failed reload
/// after a successful delete comes back inside the returned action.
pub async fn delete_then_reload<R: Resource, T: Transport>(
    api: &ApiClient<T>,
    id: u64,
    target: Reload,
) -> Result<ListAction<R>, ApiError> {
    api.delete::<R>(id).await?;
    Ok(reload(api, target).await)
}
