// libs/patient-cell/src/services/patient.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared_store::MemoryStore;

use crate::models::{CreatePatientRequest, Patient, PatientError};

pub struct PatientService {
    store: Arc<MemoryStore>,
}

impl PatientService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientError> {
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(PatientError::Validation(
                "A valid email address is required".to_string(),
            ));
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            created_at: Utc::now(),
        };
        self.store.insert_patient(patient.clone()).await;
        info!("Patient {} registered", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<Patient, PatientError> {
        self.store
            .get_patient(id)
            .await
            .map_err(|_| PatientError::NotFound)
    }
}
