// keep in sync with the serializers of the backend
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// A collection exposed by the backend under `/<name>/`, items under `/<name>/<id>/`.
pub trait Resource: DeserializeOwned + Clone + PartialEq + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> u64;

    fn item_path(id: u64) -> String {
        format!("{}{}/", Self::COLLECTION, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    #[default]
    Male,
    Female,
    Other,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "Other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        match value.as_str() {
            "M" => Sex::Male,
            "F" => Sex::Female,
            _ => Sex::Other,
        }
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Patient {
    pub id: u64, // unique, key
    pub nom: String,
    pub age: u32,
    pub sexe: Sex,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>, // assigned by the server
}

impl Resource for Patient {
    const COLLECTION: &'static str = "/patients/";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Device {
    pub id: u64, // unique, key
    #[serde(rename = "Patient")]
    pub patient: u64,
    pub device_id: String, // external identifier printed on the sensor
    pub type_capteur: String,
    pub status: bool, // active
}

impl Resource for Device {
    const COLLECTION: &'static str = "/devices/";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Kind of a measurement. The backend does not restrict the tag, unknown ones are kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum MeasurementType {
    Temperature,
    HeartRate,
    BloodPressure,
    Glucose,
    Other(String),
}

impl MeasurementType {
    pub const KNOWN: [MeasurementType; 4] = [
        MeasurementType::Temperature,
        MeasurementType::HeartRate,
        MeasurementType::BloodPressure,
        MeasurementType::Glucose,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MeasurementType::Temperature => "temperature",
            MeasurementType::HeartRate => "heart_rate",
            MeasurementType::BloodPressure => "blood_pressure",
            MeasurementType::Glucose => "glucose",
            MeasurementType::Other(tag) => tag,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MeasurementType::Temperature => "Temperature",
            MeasurementType::HeartRate => "Heart Rate",
            MeasurementType::BloodPressure => "Blood Pressure",
            MeasurementType::Glucose => "Glucose",
            MeasurementType::Other(tag) => tag,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementType::Temperature => "°C",
            MeasurementType::HeartRate => "BPM",
            MeasurementType::BloodPressure => "mmHg",
            MeasurementType::Glucose => "mg/dL",
            MeasurementType::Other(_) => "",
        }
    }

    /// Position in [`MeasurementType::KNOWN`], `None` for unknown tags.
    pub fn slot(&self) -> Option<usize> {
        match self {
            MeasurementType::Temperature => Some(0),
            MeasurementType::HeartRate => Some(1),
            MeasurementType::BloodPressure => Some(2),
            MeasurementType::Glucose => Some(3),
            MeasurementType::Other(_) => None,
        }
    }
}

impl From<String> for MeasurementType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "temperature" => MeasurementType::Temperature,
            "heart_rate" => MeasurementType::HeartRate,
            "blood_pressure" => MeasurementType::BloodPressure,
            "glucose" => MeasurementType::Glucose,
            _ => MeasurementType::Other(value),
        }
    }
}

impl From<MeasurementType> for String {
    fn from(value: MeasurementType) -> Self {
        match value {
            MeasurementType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Measurement {
    pub id: u64, // unique, key
    #[serde(rename = "Patient")]
    pub patient: u64,
    pub device: u64,
    pub type_donne: MeasurementType,
    pub valeur: f64,
    pub timestamp: DateTime<Utc>, // capture time
}

impl Resource for Measurement {
    const COLLECTION: &'static str = "/mesures/";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum AlertLevel {
    Danger,
    Warning,
    #[default]
    Info,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Danger => "danger",
            AlertLevel::Warning => "warning",
            AlertLevel::Info => "info",
        }
    }
}

impl From<String> for AlertLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "danger" => AlertLevel::Danger,
            "warning" => AlertLevel::Warning,
            _ => AlertLevel::Info,
        }
    }
}

impl From<AlertLevel> for String {
    fn from(value: AlertLevel) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Alert {
    pub id: u64, // unique, key
    pub type_alerte: String,
    pub niveau: AlertLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Patient", default)]
    pub patient: Option<u64>,
    #[serde(default)]
    pub device: Option<u64>,
}

impl Resource for Alert {
    const COLLECTION: &'static str = "/alerts/";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Pagination envelope shared by every collection endpoint.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64, // total size of the collection, not of this page
    #[serde(default)]
    pub next: Option<String>, // absolute url
    #[serde(default)]
    pub previous: Option<String>, // absolute url
    pub results: Vec<T>,
}

/// Response of an endpoint that may or may not be paginated.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn total(&self) -> u64 {
        match self {
            Listing::Page(page) => page.count,
            Listing::Items(items) => items.len() as u64,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.results,
            Listing::Items(items) => items,
        }
    }
}

// ===============================================
// payloads
// ===============================================
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PatientPayload {
    pub nom: String,
    pub age: u32,
    pub sexe: Sex,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DevicePayload {
    #[serde(rename = "Patient")]
    pub patient: u64,
    pub device_id: String,
    pub type_capteur: String,
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MeasurementPayload {
    #[serde(rename = "Patient")]
    pub patient: u64,
    pub device: u64,
    pub type_donne: MeasurementType,
    pub valeur: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_measurement_type_is_kept() {
        let m: Measurement = serde_json::from_str(
            r#"{"id":1,"Patient":2,"device":3,"type_donne":"spo2","valeur":97.0,"timestamp":"2024-05-01T10:00:30Z"}"#,
        )
        .unwrap();
        assert_eq!(m.type_donne, MeasurementType::Other("spo2".to_owned()));
        assert_eq!(m.type_donne.slot(), None);
        assert_eq!(serde_json::to_value(&m.type_donne).unwrap(), "spo2");
    }

    #[test]
    fn known_measurement_types_use_backend_tags() {
        for kind in MeasurementType::KNOWN {
            let json = serde_json::to_value(&kind).unwrap();
            let back: MeasurementType = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(
            serde_json::to_value(MeasurementType::HeartRate).unwrap(),
            "heart_rate"
        );
    }

    #[test]
    fn alert_level_falls_back_to_info() {
        let a: Alert = serde_json::from_str(
            r#"{"id":7,"type_alerte":"fever","niveau":"critical","message":"39.5","created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(a.niveau, AlertLevel::Info);
        assert_eq!(a.patient, None);
        assert_eq!(a.device, None);
    }

    #[test]
    fn page_envelope() {
        let page: Page<Patient> = serde_json::from_str(
            r#"{"count":25,"next":"http://localhost:8000/api/patients/?page=2","previous":null,
                "results":[{"id":1,"nom":"Jean Dupont","age":45,"sexe":"M","email":"jean@example.com","created_at":"2024-05-01T09:00:00Z"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 25);
        assert!(page.previous.is_none());
        assert_eq!(page.results[0].sexe, Sex::Male);
        assert_eq!(Patient::item_path(page.results[0].id), "/patients/1/");
    }

    #[test]
    fn listing_accepts_bare_lists() {
        let listing: Listing<Device> = serde_json::from_str(
            r#"[{"id":1,"Patient":4,"device_id":"ESP-01","type_capteur":"temperature","status":true}]"#,
        )
        .unwrap();
        assert_eq!(listing.total(), 1);
        assert_eq!(listing.into_items()[0].patient, 4);

        let listing: Listing<Device> =
            serde_json::from_str(r#"{"count":9,"next":null,"previous":null,"results":[]}"#).unwrap();
        assert_eq!(listing.total(), 9);
    }

    #[test]
    fn payload_field_names() {
        let payload = DevicePayload {
            patient: 3,
            device_id: "ESP-01".to_owned(),
            type_capteur: "temperature".to_owned(),
            status: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Patient"], 3);
        assert_eq!(json["status"], true);
    }
}
