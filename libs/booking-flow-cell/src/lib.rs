pub mod error;
pub mod models;
pub mod services;

pub use error::BookingFlowError;
pub use models::*;
pub use services::flow::BookingFlowService;
