// libs/schedule-cell/tests/catalog_test.rs
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use schedule_cell::models::{CreateScheduleRequest, ScheduleError};
use schedule_cell::services::catalog::ScheduleCatalogService;
use shared_models::{Department, Doctor};
use shared_store::MemoryStore;

async fn seed_doctor(store: &MemoryStore) -> Uuid {
    let department = Department {
        id: Uuid::new_v4(),
        name: "Cardiology".to_string(),
        description: None,
    };
    let doctor = Doctor {
        id: Uuid::new_v4(),
        department_id: department.id,
        first_name: "Grace".to_string(),
        last_name: "Okafor".to_string(),
        title: Some("Dr.".to_string()),
        specialty: "Cardiology".to_string(),
        created_at: Utc::now(),
    };
    let doctor_id = doctor.id;
    store.insert_department(department).await;
    store.insert_doctor(doctor).await.unwrap();
    doctor_id
}

fn request(doctor_id: Uuid, date: NaiveDate, start: &str, end: &str, cap: u32) -> CreateScheduleRequest {
    CreateScheduleRequest {
        doctor_id,
        date,
        start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
        end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        max_capacity: cap,
    }
}

#[tokio::test]
async fn test_create_schedule_starts_empty_and_active() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    let schedule = catalog
        .create_schedule(request(doctor_id, date, "09:00", "12:00", 5))
        .await
        .unwrap();

    assert_eq!(schedule.claimed, 0);
    assert!(schedule.active);
    assert_eq!(schedule.remaining(), 5);
}

#[tokio::test]
async fn test_create_schedule_rejects_zero_capacity() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    let result = catalog
        .create_schedule(request(doctor_id, date, "09:00", "12:00", 0))
        .await;

    assert_matches!(result, Err(ScheduleError::Validation(_)));
}

#[tokio::test]
async fn test_create_schedule_rejects_inverted_times() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    let result = catalog
        .create_schedule(request(doctor_id, date, "12:00", "09:00", 5))
        .await;

    assert_matches!(result, Err(ScheduleError::Validation(_)));
}

#[tokio::test]
async fn test_create_schedule_rejects_unknown_doctor() {
    let store = Arc::new(MemoryStore::new());
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    let result = catalog
        .create_schedule(request(Uuid::new_v4(), date, "09:00", "12:00", 5))
        .await;

    assert_matches!(result, Err(ScheduleError::DoctorNotFound));
}

#[tokio::test]
async fn test_list_by_date_sorted_by_start_time() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    catalog
        .create_schedule(request(doctor_id, date, "14:00", "17:00", 3))
        .await
        .unwrap();
    catalog
        .create_schedule(request(doctor_id, date, "09:00", "12:00", 3))
        .await
        .unwrap();

    let schedules = catalog.list_by_date(date).await;
    assert_eq!(schedules.len(), 2);
    assert!(schedules[0].start_time < schedules[1].start_time);
}

#[tokio::test]
async fn test_bookable_excludes_inactive_full_and_past() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store.clone());

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let yesterday = Utc::now().date_naive() - Duration::days(1);

    let open = catalog
        .create_schedule(request(doctor_id, tomorrow, "09:00", "12:00", 2))
        .await
        .unwrap();
    let closed = catalog
        .create_schedule(request(doctor_id, tomorrow, "13:00", "16:00", 2))
        .await
        .unwrap();
    let full = catalog
        .create_schedule(request(doctor_id, tomorrow, "16:00", "18:00", 1))
        .await
        .unwrap();
    catalog
        .create_schedule(request(doctor_id, yesterday, "09:00", "12:00", 2))
        .await
        .unwrap();

    catalog.set_active(closed.id, false).await.unwrap();
    store.try_claim(full.id).await.unwrap();

    let bookable = catalog.list_bookable(doctor_id, Utc::now()).await;
    assert_eq!(bookable.len(), 1);
    assert_eq!(bookable[0].schedule_id, open.id);
    assert_eq!(bookable[0].remaining, 2);
}

#[tokio::test]
async fn test_delete_refused_while_claims_outstanding() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store.clone());

    let date = Utc::now().date_naive() + Duration::days(1);
    let schedule = catalog
        .create_schedule(request(doctor_id, date, "09:00", "12:00", 2))
        .await
        .unwrap();

    store.try_claim(schedule.id).await.unwrap();
    let result = catalog.delete_schedule(schedule.id).await;
    assert_matches!(result, Err(ScheduleError::OutstandingBookings));

    // Once the claim is returned the delete goes through.
    store.release(schedule.id).await.unwrap();
    catalog.delete_schedule(schedule.id).await.unwrap();
    assert_matches!(
        catalog.get_schedule(schedule.id).await,
        Err(ScheduleError::NotFound)
    );
}

#[tokio::test]
async fn test_reactivated_schedule_is_offered_again() {
    let store = Arc::new(MemoryStore::new());
    let doctor_id = seed_doctor(&store).await;
    let catalog = ScheduleCatalogService::new(store);

    let date = Utc::now().date_naive() + Duration::days(1);
    let schedule = catalog
        .create_schedule(request(doctor_id, date, "09:00", "12:00", 2))
        .await
        .unwrap();

    catalog.set_active(schedule.id, false).await.unwrap();
    assert!(catalog.list_bookable(doctor_id, Utc::now()).await.is_empty());

    catalog.set_active(schedule.id, true).await.unwrap();
    assert_eq!(catalog.list_bookable(doctor_id, Utc::now()).await.len(), 1);
}
