// keep in sync with the urls of the backend
use std::time::Duration;

use common::req::{Page, Resource};
use log::{debug, warn};
use reqwest::{header::ACCEPT, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{config::Config, error::ApiError};

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request to the backend and back. Status codes are not interpreted here.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        // fetch() in the browser has no client side timeout
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout);
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

pub type Api = ApiClient<HttpTransport>;

impl Api {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.api_base_url,
            HttpTransport::new(config.api_timeout)?,
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute urls (pagination cursors of a foreign host) pass through untouched.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Turns a cursor url returned by the server into a path relative to the base url.
    /// Anything not below the base url is kept whole; `url_for` passes it through.
    pub fn strip_base(&self, url: &str) -> String {
        match url.strip_prefix(&self.base_url) {
            Some("") => "/".to_owned(),
            Some(path) if path.starts_with('/') => path.to_owned(),
            // a longer segment (`/api2/...`) or a query on the base itself
            _ => url.to_owned(),
        }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        let url = self.url_for(path);
        debug!("{method} {url}");

        let resp = match self.transport.send(method.clone(), &url, body).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("{method} {url} failed: {err}");
                return Err(err);
            }
        };

        if !resp.is_success() {
            let err = ApiError::from_response(resp.status, &resp.body);
            warn!("{method} {url} returned {}: {}", resp.status, err.message());
            return Err(err);
        }

        Ok(resp)
    }

    pub async fn get<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        let resp = self.call(Method::GET, path, None).await?;
        Ok(serde_json::from_str(&resp.body)?)
    }

    pub async fn list<R: Resource>(&self, path: &str) -> Result<Page<R>, ApiError> {
        self.get(path).await
    }

    pub async fn create<R: Resource, P: Serialize>(&self, payload: &P) -> Result<R, ApiError> {
        let body = serde_json::to_value(payload)?;
        let resp = self.call(Method::POST, R::COLLECTION, Some(body)).await?;
        Ok(serde_json::from_str(&resp.body)?)
    }

    pub async fn update<R: Resource, P: Serialize>(
        &self,
        id: u64,
        payload: &P,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(payload)?;
        let resp = self.call(Method::PUT, &R::item_path(id), Some(body)).await?;
        Ok(serde_json::from_str(&resp.body)?)
    }

    pub async fn delete<R: Resource>(&self, id: u64) -> Result<(), ApiError> {
        // body is ignored, usually 204 No Content
        self.call(Method::DELETE, &R::item_path(id), None).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        cell::RefCell,
        collections::{HashMap, VecDeque},
    };

    use reqwest::Method;
    use serde_json::{json, Value};

    use super::{ApiClient, RawResponse, Transport};
    use crate::error::ApiError;

    pub const BASE: &str = "http://localhost:8000/api";

    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub method: Method,
        pub path: String,
        pub body: Option<Value>,
    }

    type Reply = Result<RawResponse, ApiError>;

    /// Scripted backend. Replies queue up per route, the last one is repeated.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        routes: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
        requests: RefCell<Vec<Recorded>>,
    }

    impl FakeTransport {
        pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
            self.push(
                method,
                path,
                Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
            );
        }

        pub fn fail(&self, method: Method, path: &str, err: ApiError) {
            self.push(method, path, Err(err));
        }

        fn push(&self, method: Method, path: &str, reply: Reply) {
            self.routes
                .borrow_mut()
                .entry((method, format!("{BASE}{path}")))
                .or_default()
                .push_back(reply);
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.borrow().clone()
        }

        pub fn calls(&self) -> Vec<(Method, String)> {
            self.requests
                .borrow()
                .iter()
                .map(|r| (r.method.clone(), r.path.clone()))
                .collect()
        }
    }

    impl Transport for FakeTransport {
        async fn send(
            &self,
            method: Method,
            url: &str,
            body: Option<Value>,
        ) -> Result<RawResponse, ApiError> {
            self.requests.borrow_mut().push(Recorded {
                method: method.clone(),
                path: url.strip_prefix(BASE).unwrap_or(url).to_owned(),
                body,
            });

            let mut routes = self.routes.borrow_mut();
            match routes.get_mut(&(method, url.to_owned())) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Ok(RawResponse {
                    status: 404,
                    body: json!({"detail": "Not found."}).to_string(),
                }),
            }
        }
    }

    pub fn fake_api() -> ApiClient<FakeTransport> {
        ApiClient::new(BASE, FakeTransport::default())
    }

    pub fn patient_json(id: u64, nom: &str) -> Value {
        json!({
            "id": id,
            "nom": nom,
            "age": 40,
            "sexe": "F",
            "email": format!("{}@example.com", id),
            "created_at": "2024-05-01T09:00:00Z",
        })
    }

    pub fn device_json(id: u64, patient: u64, device_id: &str) -> Value {
        json!({
            "id": id,
            "Patient": patient,
            "device_id": device_id,
            "type_capteur": "temperature",
            "status": true,
        })
    }

    pub fn measurement_json(id: u64, kind: &str, value: f64, timestamp: &str) -> Value {
        json!({
            "id": id,
            "Patient": 1,
            "device": 1,
            "type_donne": kind,
            "valeur": value,
            "timestamp": timestamp,
        })
    }

    pub fn alert_json(id: u64, level: &str) -> Value {
        json!({
            "id": id,
            "type_alerte": "threshold",
            "niveau": level,
            "message": format!("alert {id}"),
            "created_at": "2024-05-01T10:00:00Z",
            "Patient": 1,
            "device": null,
        })
    }

    pub fn page(count: u64, next: Option<&str>, previous: Option<&str>, results: Vec<Value>) -> Value {
        json!({
            "count": count,
            "next": next.map(|p| format!("{BASE}{p}")),
            "previous": previous.map(|p| format!("{BASE}{p}")),
            "results": results,
        })
    }
}

#[cfg(test)]
mod tests {
    use common::req::{Measurement, Patient, PatientPayload, Sex};
    use reqwest::Method;
    use serde_json::json;

    use super::testing::*;
    use super::*;

    #[test]
    fn urls_and_cursors() {
        let api = fake_api();
        assert_eq!(api.url_for("/patients/"), format!("{BASE}/patients/"));
        assert_eq!(api.url_for("patients/"), format!("{BASE}/patients/"));
        assert_eq!(
            api.url_for("https://elsewhere.example.org/api/patients/?page=3"),
            "https://elsewhere.example.org/api/patients/?page=3"
        );

        assert_eq!(
            api.strip_base(&format!("{BASE}/patients/?page=2")),
            "/patients/?page=2"
        );
        assert_eq!(
            api.strip_base("https://elsewhere.example.org/api/patients/?page=3"),
            "https://elsewhere.example.org/api/patients/?page=3"
        );
    }

    #[test]
    fn strip_base_stops_at_path_boundaries() {
        let api = fake_api();
        assert_eq!(api.strip_base(BASE), "/");
        assert_eq!(
            api.strip_base(&format!("{BASE}2/patients/?page=2")),
            format!("{BASE}2/patients/?page=2")
        );
        assert_eq!(api.strip_base(&format!("{BASE}?page=2")), format!("{BASE}?page=2"));
        assert_eq!(
            api.url_for(&api.strip_base(&format!("{BASE}2/x"))),
            "http://localhost:8000/api2/x"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:8000/api/", FakeTransport::default());
        assert_eq!(api.base_url(), BASE);
    }

    #[tokio::test]
    async fn create_posts_payload_to_collection() {
        let api = fake_api();
        api.transport()
            .reply(Method::POST, "/patients/", 201, patient_json(12, "Jean Dupont"));

        let payload = PatientPayload {
            nom: "Jean Dupont".to_owned(),
            age: 45,
            sexe: Sex::Male,
            email: "jean@example.com".to_owned(),
        };
        let created: Patient = api.create(&payload).await.unwrap();

        assert_eq!(created.id, 12);
        let requests = api.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/patients/");
        assert_eq!(
            requests[0].body,
            Some(json!({"nom": "Jean Dupont", "age": 45, "sexe": "M", "email": "jean@example.com"}))
        );
    }

    #[tokio::test]
    async fn error_status_carries_detail() {
        let api = fake_api();
        api.transport().reply(
            Method::PUT,
            "/mesures/4/",
            400,
            json!({"detail": "Device does not belong to patient."}),
        );

        let err = api
            .update::<Measurement, _>(4, &json!({"valeur": 1.0}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                detail: Some("Device does not belong to patient.".to_owned())
            }
        );
    }

    #[tokio::test]
    async fn delete_ignores_empty_body() {
        let api = fake_api();
        api.transport()
            .reply(Method::DELETE, "/patients/3/", 204, Value::Null);

        api.delete::<Patient>(3).await.unwrap();
        assert_eq!(
            api.transport().calls(),
            vec![(Method::DELETE, "/patients/3/".to_owned())]
        );
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let api = fake_api();
        api.transport()
            .fail(Method::GET, "/patients/", ApiError::Timeout);

        let err = api.list::<Patient>("/patients/").await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);
    }

    #[tokio::test]
    async fn undecodable_body_is_a_parse_error() {
        let api = fake_api();
        api.transport()
            .reply(Method::GET, "/patients/", 200, json!({"unexpected": true}));

        let err = api.list::<Patient>("/patients/").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
