// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers;

pub fn directory_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/departments", post(handlers::create_department))
        .route("/departments", get(handlers::list_departments))
        .route("/departments/{department_id}/doctors", get(handlers::list_department_doctors))
        .route("/doctors", post(handlers::create_doctor))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .with_state(state)
}
