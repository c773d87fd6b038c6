use std::{rc::Rc, str::FromStr};

use common::req::{
    Device, DevicePayload, Measurement, MeasurementPayload, MeasurementType, Patient,
    PatientPayload, Resource, Sex,
};
use serde::Serialize;

use crate::{
    error::{ApiError, FormError},
    lookups::Lookups,
    request::{ApiClient, Transport},
};

/// Field values of a form, as typed by the user.
pub trait Draft: Clone + PartialEq + 'static {
    type Entity: Resource;
    type Payload: Serialize + 'static;

    fn from_entity(entity: &Self::Entity) -> Self;

    /// Fills references still unset with the first known choice.
    fn seed(&mut self, _lookups: &Lookups) {}

    /// Validates and converts the fields. Nothing is sent when this fails.
    fn payload(&self) -> Result<Self::Payload, FormError>;
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(value.to_owned())
    }
}

fn number<N: FromStr>(value: &str, field: &'static str) -> Result<N, FormError> {
    value
        .trim()
        .parse()
        .map_err(|_| FormError::NotANumber(field))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientDraft {
    pub nom: String,
    pub age: String,
    pub sexe: Sex,
    pub email: String,
}

impl Default for PatientDraft {
    fn default() -> Self {
        Self {
            nom: String::new(),
            age: "30".to_owned(),
            sexe: Sex::Male,
            email: String::new(),
        }
    }
}

impl Draft for PatientDraft {
    type Entity = Patient;
    type Payload = PatientPayload;

    fn from_entity(patient: &Patient) -> Self {
        Self {
            nom: patient.nom.clone(),
            age: patient.age.to_string(),
            sexe: patient.sexe,
            email: patient.email.clone(),
        }
    }

    fn payload(&self) -> Result<PatientPayload, FormError> {
        Ok(PatientPayload {
            nom: required(&self.nom, "name")?,
            age: number(&self.age, "age")?,
            sexe: self.sexe,
            email: required(&self.email, "email")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDraft {
    pub patient: Option<u64>,
    pub device_id: String,
    pub type_capteur: String,
    pub status: bool,
}

impl DeviceDraft {
    /// Blank draft, attached to the first known patient.
    pub fn new(lookups: &Lookups) -> Self {
        let mut draft = Self {
            patient: None,
            device_id: String::new(),
            type_capteur: MeasurementType::Temperature.as_str().to_owned(),
            status: true,
        };
        draft.seed(lookups);
        draft
    }
}

impl Draft for DeviceDraft {
    type Entity = Device;
    type Payload = DevicePayload;

    fn from_entity(device: &Device) -> Self {
        Self {
            patient: Some(device.patient),
            device_id: device.device_id.clone(),
            type_capteur: device.type_capteur.clone(),
            status: device.status,
        }
    }

    fn seed(&mut self, lookups: &Lookups) {
        if self.patient.is_none() {
            self.patient = lookups.patients.first().map(|p| p.id);
        }
    }

    fn payload(&self) -> Result<DevicePayload, FormError> {
        Ok(DevicePayload {
            patient: self.patient.ok_or(FormError::Missing("patient"))?,
            device_id: required(&self.device_id, "device id")?,
            type_capteur: required(&self.type_capteur, "sensor type")?,
            status: self.status,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementDraft {
    pub patient: Option<u64>,
    pub device: Option<u64>,
    pub type_donne: MeasurementType,
    pub valeur: String,
}

impl MeasurementDraft {
    /// Blank draft, attached to the first known patient and one of its devices.
    pub fn new(lookups: &Lookups) -> Self {
        let mut draft = Self {
            patient: None,
            device: None,
            type_donne: MeasurementType::Temperature,
            valeur: "0".to_owned(),
        };
        draft.seed(lookups);
        draft
    }

    /// Picks another patient. The device follows unless it still belongs to the choices.
    pub fn select_patient(&mut self, patient: Option<u64>, lookups: &Lookups) {
        self.patient = patient;
        let choices = lookups.device_choices(patient);
        if !choices.iter().any(|d| Some(d.id) == self.device) {
            self.device = choices.first().map(|d| d.id);
        }
    }
}

impl Draft for MeasurementDraft {
    type Entity = Measurement;
    type Payload = MeasurementPayload;

    fn from_entity(measurement: &Measurement) -> Self {
        Self {
            patient: Some(measurement.patient),
            device: Some(measurement.device),
            type_donne: measurement.type_donne.clone(),
            valeur: measurement.valeur.to_string(),
        }
    }

    fn seed(&mut self, lookups: &Lookups) {
        if self.patient.is_none() {
            self.patient = lookups.patients.first().map(|p| p.id);
        }
        if self.device.is_none() {
            self.device = lookups.device_choices(self.patient).first().map(|d| d.id);
        }
    }

    fn payload(&self) -> Result<MeasurementPayload, FormError> {
        let valeur: f64 = number(&self.valeur, "value")?;
        if !valeur.is_finite() {
            return Err(FormError::NotANumber("value"));
        }

        Ok(MeasurementPayload {
            patient: self.patient.ok_or(FormError::Missing("patient"))?,
            device: self.device.ok_or(FormError::Missing("device"))?,
            type_donne: self.type_donne.clone(),
            valeur,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest<P> {
    Create(P),
    Update(u64, P),
}

impl<P: Serialize> SaveRequest<P> {
    pub async fn send<R: Resource, T: Transport>(&self, api: &ApiClient<T>) -> Result<R, ApiError> {
        match self {
            SaveRequest::Create(payload) => api.create::<R, P>(payload).await,
            SaveRequest::Update(id, payload) => api.update::<R, P>(*id, payload).await,
        }
    }
}

/// State of a create or edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityForm<D> {
    pub draft: D,
    pub id: Option<u64>, // set when editing
    pub submitting: bool,
    pub error: Option<String>,
}

pub enum FormAction<D> {
    Edit(D),
    Replace(EntityForm<D>),
    /// Lookups arrived or changed. Only a create form picks up new defaults.
    Seed(Rc<Lookups>),
    Finished(Result<(), ApiError>),
}

impl<D> FormAction<D> {
    pub fn finished<E>(result: &Result<E, ApiError>) -> Self {
        FormAction::Finished(result.as_ref().map(|_| ()).map_err(|err| err.clone()))
    }
}

impl<D: Draft> EntityForm<D> {
    pub fn create(draft: D) -> Self {
        Self {
            draft,
            id: None,
            submitting: false,
            error: None,
        }
    }

    pub fn edit(entity: &D::Entity) -> Self {
        Self {
            draft: D::from_entity(entity),
            id: Some(entity.id()),
            submitting: false,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// PUT to the item when editing, POST to the collection otherwise.
    pub fn begin_submit(&mut self) -> Result<SaveRequest<D::Payload>, FormError> {
        match self.draft.payload() {
            Ok(payload) => {
                self.submitting = true;
                self.error = None;
                Ok(match self.id {
                    Some(id) => SaveRequest::Update(id, payload),
                    None => SaveRequest::Create(payload),
                })
            }
            Err(err) => {
                self.error = Some(err.message());
                Err(err)
            }
        }
    }

    /// Fields are kept either way, so a rejected submission can be corrected.
    pub fn finish_submit<E>(&mut self, result: &Result<E, ApiError>) {
        self.submitting = false;
        if let Err(err) = result {
            self.error = Some(err.message());
        }
    }

    pub fn apply(&mut self, action: FormAction<D>) {
        match action {
            FormAction::Edit(draft) => self.draft = draft,
            FormAction::Replace(form) => *self = form,
            FormAction::Seed(lookups) => {
                if !self.is_edit() {
                    self.draft.seed(&lookups);
                }
            }
            FormAction::Finished(result) => self.finish_submit(&result),
        }
    }
}
