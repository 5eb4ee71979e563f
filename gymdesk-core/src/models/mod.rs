//! Typed records exchanged with the gymdesk backend.
//!
//! Required fields are non-optional so a malformed payload fails at the
//! boundary with [`ApiError::Decode`](crate::error::ApiError::Decode)
//! instead of leaking half-filled records into the caller.

pub mod auth;
pub mod class;
pub mod club;
pub mod instructor;
pub mod member;
pub mod office;
pub mod restaurant;
pub mod revenue;
pub mod user;

mod serde_helpers;

pub use auth::*;
pub use class::*;
pub use club::*;
pub use instructor::*;
pub use member::*;
pub use office::*;
pub use restaurant::*;
pub use revenue::*;
pub use user::*;

use crate::error::{ApiError, ApiResult};

/// Client-side checks mirroring the dashboard's form constraints.
/// Run before any network call.
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Invalid(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn require_at_least(field: &str, value: i64, min: i64) -> ApiResult<()> {
    if value < min {
        return Err(ApiError::Invalid(format!(
            "{} must be at least {}",
            field, min
        )));
    }
    Ok(())
}
