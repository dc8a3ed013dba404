// libs/doctor-cell/src/services/directory.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{MemoryStore, StoreError};

use crate::models::{
    CreateDepartmentRequest, CreateDoctorRequest, Department, DirectoryError, Doctor,
};

/// Department/doctor directory backing the first two stages of the booking
/// workflow.
pub struct DirectoryService {
    store: Arc<MemoryStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_department(
        &self,
        request: CreateDepartmentRequest,
    ) -> Result<Department, DirectoryError> {
        if request.name.trim().is_empty() {
            return Err(DirectoryError::Validation(
                "Department name must not be empty".to_string(),
            ));
        }

        let department = Department {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
        };
        self.store.insert_department(department.clone()).await;
        info!("Department {} created: {}", department.id, department.name);
        Ok(department)
    }

    pub async fn list_departments(&self) -> Vec<Department> {
        self.store.list_departments().await
    }

    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, DirectoryError> {
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(DirectoryError::Validation(
                "Doctor name must not be empty".to_string(),
            ));
        }

        let doctor = Doctor {
            id: Uuid::new_v4(),
            department_id: request.department_id,
            first_name: request.first_name,
            last_name: request.last_name,
            title: request.title,
            specialty: request.specialty,
            created_at: Utc::now(),
        };
        self.store
            .insert_doctor(doctor.clone())
            .await
            .map_err(|e| match e {
                StoreError::DepartmentNotFound => DirectoryError::DepartmentNotFound,
                other => DirectoryError::Validation(other.to_string()),
            })?;

        info!("Doctor {} created: {}", doctor.id, doctor.full_name());
        Ok(doctor)
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<Doctor, DirectoryError> {
        self.store
            .get_doctor(id)
            .await
            .map_err(|_| DirectoryError::DoctorNotFound)
    }

    pub async fn list_doctors(&self, department_id: Uuid) -> Result<Vec<Doctor>, DirectoryError> {
        // Listing an unknown department is a caller mistake, not an empty result.
        self.store
            .get_department(department_id)
            .await
            .map_err(|_| DirectoryError::DepartmentNotFound)?;

        let doctors = self.store.list_doctors_by_department(department_id).await;
        debug!(
            "Listed {} doctors for department {}",
            doctors.len(),
            department_id
        );
        Ok(doctors)
    }
}
