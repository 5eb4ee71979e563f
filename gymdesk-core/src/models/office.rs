//! Rentable offices and their bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_empty;
use super::{Validate, require_at_least, require_non_empty};
use crate::error::{ApiError, ApiResult};
use crate::resource::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// private, shared, meeting_room, phone_booth
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub amenities: Vec<String>,
    pub hourly_rate: f64,
    #[serde(default)]
    pub daily_rate: f64,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Office {
    const COLLECTION: &'static str = "offices";
    const LABEL: &'static str = "office";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Office {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Name", &self.name)?;
        require_at_least("Capacity", self.capacity, 1)?;
        if self.hourly_rate < 0.0 || self.daily_rate < 0.0 {
            return Err(ApiError::Invalid("Rates cannot be negative".into()));
        }
        Ok(())
    }
}

/// A time-boxed reservation of an office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeBooking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// confirmed, cancelled, completed, no-show
    pub status: String,
    pub total_cost: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for OfficeBooking {
    const COLLECTION: &'static str = "office-bookings";
    const LABEL: &'static str = "office booking";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for OfficeBooking {
    fn validate(&self) -> ApiResult<()> {
        if self.member_id.as_deref().is_none_or(str::is_empty) {
            return Err(ApiError::Invalid("Please select a member".into()));
        }
        if self.end_time <= self.start_time {
            return Err(ApiError::Invalid(
                "End time must be after start time".into(),
            ));
        }
        Ok(())
    }
}
