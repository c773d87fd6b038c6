use common::req::{Alert, Device, Listing, Measurement, MeasurementType, Patient, Resource};
use futures_util::try_join;
use log::debug;

use crate::{
    dataset::{series, Series},
    error::ApiError,
    request::{ApiClient, Transport},
};

/// Number of temperature points on the dashboard chart.
pub const DASHBOARD_POINTS: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub patients: u64,
    pub devices: u64,
    pub measurements: u64,
    pub alerts: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub temperatures: Series,
    pub alerts: Vec<Alert>,
}

/// Fetches the four dashboard sources concurrently. The first failure fails the whole load.
pub async fn load_dashboard<T: Transport>(
    api: &ApiClient<T>,
    alert_limit: usize,
) -> Result<Dashboard, ApiError> {
    let patients_path = format!("{}?limit=1", Patient::COLLECTION);
    let devices_path = format!("{}?limit=1", Device::COLLECTION);
    let alerts_path = format!("{}?ordering=-created_at&limit={alert_limit}", Alert::COLLECTION);

    let (patients, devices, measurements, alerts) = try_join!(
        api.get::<Listing<Patient>>(&patients_path),
        api.get::<Listing<Device>>(&devices_path),
        api.get::<Listing<Measurement>>(Measurement::COLLECTION),
        api.get::<Listing<Alert>>(&alerts_path),
    )?;

    let stats = DashboardStats {
        patients: patients.total(),
        devices: devices.total(),
        measurements: measurements.total(),
        alerts: alerts.total(),
    };
    debug!("dashboard: {stats:?}");

    let measurements = measurements.into_items();
    let mut alerts = alerts.into_items();
    alerts.truncate(alert_limit);

    Ok(Dashboard {
        stats,
        temperatures: series(&measurements, MeasurementType::Temperature, DASHBOARD_POINTS),
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::{json, Value};

    use super::*;
    use crate::request::testing::*;

    const ALERTS: &str = "/alerts/?ordering=-created_at&limit=5";

    fn temperatures(n: u64) -> Vec<Value> {
        (1..=n)
            .map(|i| {
                measurement_json(i, "temperature", 36.0 + i as f64 / 10.0, &format!("2024-05-01T10:{i:02}:00Z"))
            })
            .collect()
    }

    fn script_counts(api: &ApiClient<FakeTransport>) {
        api.transport().reply(
            Method::GET,
            "/patients/?limit=1",
            200,
            page(12, Some("/patients/?limit=1&offset=1"), None, vec![patient_json(1, "a")]),
        );
        api.transport().reply(
            Method::GET,
            "/devices/?limit=1",
            200,
            page(5, Some("/devices/?limit=1&offset=1"), None, vec![device_json(1, 1, "ESP")]),
        );
        api.transport().reply(
            Method::GET,
            ALERTS,
            200,
            page(3, None, None, vec![alert_json(3, "danger"), alert_json(2, "warning"), alert_json(1, "info")]),
        );
    }

    #[tokio::test]
    async fn counters_from_envelopes_and_bare_lists() {
        let api = fake_api();
        script_counts(&api);
        api.transport()
            .reply(Method::GET, "/mesures/", 200, Value::Array(temperatures(40)));

        let dashboard = load_dashboard(&api, 5).await.unwrap();

        assert_eq!(
            dashboard.stats,
            DashboardStats {
                patients: 12,
                devices: 5,
                measurements: 40,
                alerts: 3,
            }
        );
        assert_eq!(dashboard.alerts.len(), 3);
        assert_eq!(dashboard.temperatures.data.len(), DASHBOARD_POINTS);
        assert_eq!(dashboard.temperatures.data.last().map(|(_, v)| *v), Some(40.0));

        let api = fake_api();
        script_counts(&api);
        api.transport().reply(
            Method::GET,
            "/mesures/",
            200,
            page(40, Some("/mesures/?page=2"), None, temperatures(10)),
        );

        let dashboard = load_dashboard(&api, 5).await.unwrap();
        assert_eq!(dashboard.stats.measurements, 40);
        assert_eq!(dashboard.temperatures.data.len(), 10);
    }

    #[tokio::test]
    async fn one_failure_fails_the_dashboard() {
        let api = fake_api();
        script_counts(&api);
        api.transport().reply(
            Method::GET,
            "/mesures/",
            500,
            json!({"detail": "Internal server error."}),
        );

        let err = load_dashboard(&api, 5).await.unwrap_err();
        assert_eq!(err.message(), "Internal server error.");
    }

    #[tokio::test]
    async fn alert_limit_is_part_of_the_query() {
        let api = fake_api();
        script_counts(&api);
        api.transport()
            .reply(Method::GET, "/mesures/", 200, json!([]));
        api.transport().reply(
            Method::GET,
            "/alerts/?ordering=-created_at&limit=2",
            200,
            json!([alert_json(3, "danger"), alert_json(2, "warning"), alert_json(1, "info")]),
        );

        let dashboard = load_dashboard(&api, 2).await.unwrap();
        assert_eq!(dashboard.alerts.len(), 2);
        assert_eq!(dashboard.stats.alerts, 3);
        assert!(dashboard.temperatures.data.is_empty());
    }
}
