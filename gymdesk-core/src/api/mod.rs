//! Resource-specific endpoints layered on [`ApiClient`](crate::client::ApiClient).

mod auth;
mod bookings;
mod classes;
mod revenue;

pub use bookings::OfficeBookingFilter;
pub use classes::Enrollment;
