//! Client library for the gymdesk club management backend.
//!
//! - `ApiClient` sends every request through one refresh-and-replay pipeline
//! - `AuthSession` owns stored credentials and the single-flight refresh
//! - `models` holds the typed records the backend exchanges
//! - `recurrence` and `booking` hold the client-side scheduling helpers

mod api;
pub mod booking;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod resource;
pub mod session;
pub mod single_flight;
pub mod store;

pub use api::{Enrollment, OfficeBookingFilter};
pub use client::{ApiClient, Reply};
pub use config::{AuthScheme, GymdeskConfig};
pub use error::{ApiError, ApiResult};
pub use resource::{Entity, Resources};
pub use session::AuthSession;
