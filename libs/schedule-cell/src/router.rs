// libs/schedule-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_schedule))
        .route("/", get(handlers::list_schedules_by_date))
        .route("/doctors/{doctor_id}", get(handlers::list_schedules_by_doctor))
        .route("/doctors/{doctor_id}/bookable", get(handlers::list_bookable_schedules))
        .route("/{schedule_id}/active", patch(handlers::set_schedule_active))
        .route("/{schedule_id}", delete(handlers::delete_schedule))
        .with_state(state)
}
