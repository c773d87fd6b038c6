use common::req::{Device, Patient, Resource};
use futures_util::try_join;

use crate::{
    error::ApiError,
    request::{ApiClient, Transport},
};

/// Patients and devices used to label references and fill the selects of the forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookups {
    pub patients: Vec<Patient>,
    pub devices: Vec<Device>,
}

impl Lookups {
    /// First page of both collections, fetched concurrently.
    pub async fn fetch<T: Transport>(api: &ApiClient<T>) -> Result<Self, ApiError> {
        let (patients, devices) = try_join!(
            api.list::<Patient>(Patient::COLLECTION),
            api.list::<Device>(Device::COLLECTION),
        )?;

        Ok(Self {
            patients: patients.results,
            devices: devices.results,
        })
    }

    pub fn patient_label(&self, id: u64) -> String {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.nom.clone())
            .unwrap_or_else(|| format!("Patient {id}"))
    }

    pub fn device_label(&self, id: u64) -> String {
        self.devices
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.device_id.clone())
            .unwrap_or_else(|| format!("Device {id}"))
    }

    pub fn optional_patient_label(&self, id: Option<u64>) -> String {
        id.map_or_else(|| "-".to_owned(), |id| self.patient_label(id))
    }

    pub fn optional_device_label(&self, id: Option<u64>) -> String {
        id.map_or_else(|| "-".to_owned(), |id| self.device_label(id))
    }

    pub fn devices_of(&self, patient: Option<u64>) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| Some(d.patient) == patient)
            .collect()
    }

    /// Device select of the measurement form: the patient's devices, every device if
    /// the patient has none.
    pub fn device_choices(&self, patient: Option<u64>) -> Vec<&Device> {
        let own = self.devices_of(patient);
        if own.is_empty() {
            self.devices.iter().collect()
        } else {
            own
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::request::testing::*;

    #[tokio::test]
    async fn labels_fall_back_to_ids() {
        let api = fake_api();
        api.transport().reply(
            Method::GET,
            "/patients/",
            200,
            page(1, None, None, vec![patient_json(1, "Marie Curie")]),
        );
        api.transport().reply(
            Method::GET,
            "/devices/",
            200,
            page(2, None, None, vec![device_json(4, 1, "ESP-TEMP-01"), device_json(5, 2, "ESP-HR-02")]),
        );

        let lookups = Lookups::fetch(&api).await.unwrap();

        assert_eq!(lookups.patient_label(1), "Marie Curie");
        assert_eq!(lookups.patient_label(9), "Patient 9");
        assert_eq!(lookups.device_label(4), "ESP-TEMP-01");
        assert_eq!(lookups.device_label(6), "Device 6");
        assert_eq!(lookups.optional_patient_label(None), "-");
        assert_eq!(lookups.optional_device_label(Some(5)), "ESP-HR-02");

        let ids: Vec<_> = lookups.devices_of(Some(1)).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn device_choices_follow_the_patient() {
        let lookups = Lookups {
            patients: vec![],
            devices: vec![
                serde_json::from_value(device_json(4, 1, "ESP-TEMP-01")).unwrap(),
                serde_json::from_value(device_json(5, 2, "ESP-HR-02")).unwrap(),
                serde_json::from_value(device_json(6, 2, "ESP-BP-03")).unwrap(),
            ],
        };
        let ids = |patient| -> Vec<u64> {
            lookups.device_choices(patient).iter().map(|d| d.id).collect()
        };

        assert_eq!(ids(Some(2)), vec![5, 6]);
        assert_eq!(ids(Some(1)), vec![4]);
        assert_eq!(ids(Some(8)), vec![4, 5, 6]);
        assert_eq!(ids(None), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn one_failure_fails_the_fetch() {
        let api = fake_api();
        api.transport().reply(
            Method::GET,
            "/patients/",
            200,
            page(0, None, None, vec![]),
        );
        api.transport()
            .fail(Method::GET, "/devices/", ApiError::Timeout);

        assert_eq!(Lookups::fetch(&api).await.unwrap_err(), ApiError::Timeout);
    }
}
