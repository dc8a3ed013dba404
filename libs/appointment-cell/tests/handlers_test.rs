// libs/appointment-cell/tests/handlers_test.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveTime, Utc};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::router::appointment_routes;
use doctor_cell::models::{CreateDepartmentRequest, CreateDoctorRequest};
use doctor_cell::services::directory::DirectoryService;
use patient_cell::models::CreatePatientRequest;
use patient_cell::services::patient::PatientService;
use schedule_cell::models::CreateScheduleRequest;
use schedule_cell::services::catalog::ScheduleCatalogService;
use shared_config::AppConfig;
use shared_store::AppState;

struct Seeded {
    state: Arc<AppState>,
    patient_a: Uuid,
    patient_b: Uuid,
    doctor_id: Uuid,
    schedule_id: Uuid,
}

async fn seed(max_capacity: u32) -> Seeded {
    let state = Arc::new(AppState::new(AppConfig::default()));

    let directory = DirectoryService::new(state.store.clone());
    let patients = PatientService::new(state.store.clone());
    let catalog = ScheduleCatalogService::new(state.store.clone());

    let department = directory
        .create_department(CreateDepartmentRequest {
            name: "Pediatrics".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let doctor = directory
        .create_doctor(CreateDoctorRequest {
            department_id: department.id,
            first_name: "Sam".to_string(),
            last_name: "Reed".to_string(),
            title: Some("Dr.".to_string()),
            specialty: "Pediatrics".to_string(),
        })
        .await
        .unwrap();

    let patient_a = patients
        .create_patient(CreatePatientRequest {
            first_name: "Ada".to_string(),
            last_name: "Nwosu".to_string(),
            email: "ada.nwosu@example.com".to_string(),
            phone_number: None,
        })
        .await
        .unwrap();
    let patient_b = patients
        .create_patient(CreatePatientRequest {
            first_name: "Bram".to_string(),
            last_name: "Visser".to_string(),
            email: "bram.visser@example.com".to_string(),
            phone_number: None,
        })
        .await
        .unwrap();

    let schedule = catalog
        .create_schedule(CreateScheduleRequest {
            doctor_id: doctor.id,
            date: Utc::now().date_naive() + Duration::days(7),
            start_time: NaiveTime::parse_from_str("09:00", "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str("12:00", "%H:%M").unwrap(),
            max_capacity,
        })
        .await
        .unwrap();

    Seeded {
        state,
        patient_a: patient_a.id,
        patient_b: patient_b.id,
        doctor_id: doctor.id,
        schedule_id: schedule.id,
    }
}

fn create_test_app(state: Arc<AppState>) -> Router {
    appointment_routes(state)
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn book(seeded: &Seeded, patient_id: Uuid) -> (StatusCode, serde_json::Value) {
    post_json(
        create_test_app(seeded.state.clone()),
        "/",
        json!({
            "patient_id": patient_id,
            "doctor_id": seeded.doctor_id,
            "schedule_id": seeded.schedule_id,
        }),
    )
    .await
}

#[tokio::test]
async fn test_book_appointment_endpoint() {
    let seeded = seed(3).await;

    let (status, body) = book(&seeded, seeded.patient_a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["appointment"]["appointment_id"].is_string());
}

#[tokio::test]
async fn test_book_unknown_schedule_is_404() {
    let seeded = seed(3).await;

    let (status, body) = post_json(
        create_test_app(seeded.state.clone()),
        "/",
        json!({
            "patient_id": seeded.patient_a,
            "doctor_id": seeded.doctor_id,
            "schedule_id": Uuid::new_v4(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_losing_patient_gets_409_then_books_the_freed_slot() {
    let seeded = seed(1).await;

    // A takes the only slot.
    let (status, body) = book(&seeded, seeded.patient_a).await;
    assert_eq!(status, StatusCode::OK);
    let appointment_id = body["appointment"]["appointment_id"]
        .as_str()
        .unwrap()
        .to_string();

    // B is turned away while it is held.
    let (status, body) = book(&seeded, seeded.patient_b).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "capacity_exceeded");

    // A cancels well before the cutoff.
    let (status, body) = post_json(
        create_test_app(seeded.state.clone()),
        &format!("/{}/cancel", appointment_id),
        json!({
            "reason": "Travel plans changed",
            "cancelled_by": "patient",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "cancelled");

    // The freed slot is B's to take.
    let (status, _) = book(&seeded, seeded.patient_b).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_booking_is_409() {
    let seeded = seed(3).await;

    let (status, _) = book(&seeded, seeded.patient_a).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = book(&seeded, seeded.patient_a).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");
}

#[tokio::test]
async fn test_complete_by_wrong_doctor_is_403() {
    let seeded = seed(1).await;

    let (_, body) = book(&seeded, seeded.patient_a).await;
    let appointment_id = body["appointment"]["appointment_id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        create_test_app(seeded.state.clone()),
        &format!("/{}/complete", appointment_id),
        json!({ "doctor_id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "forbidden");
}

#[tokio::test]
async fn test_cancel_completed_appointment_is_409() {
    let seeded = seed(1).await;

    let (_, body) = book(&seeded, seeded.patient_a).await;
    let appointment_id = body["appointment"]["appointment_id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        create_test_app(seeded.state.clone()),
        &format!("/{}/complete", appointment_id),
        json!({ "doctor_id": seeded.doctor_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        create_test_app(seeded.state.clone()),
        &format!("/{}/cancel", appointment_id),
        json!({
            "reason": "Second thoughts",
            "cancelled_by": "patient",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "invalid_transition");
}

#[tokio::test]
async fn test_patient_appointment_listing_endpoint() {
    let seeded = seed(3).await;

    let (_, body) = book(&seeded, seeded.patient_a).await;
    let appointment_id = body["appointment"]["appointment_id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/patients/{}", seeded.patient_a))
        .body(Body::empty())
        .unwrap();
    let response = create_test_app(seeded.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["id"], appointment_id);
    assert_eq!(appointments[0]["status"], "booked");
}
