//! Fitness classes and class bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{calendar_date, null_as_empty};
use super::{Member, Validate, require_at_least, require_non_empty};
use crate::error::{ApiError, ApiResult};
use crate::resource::Entity;

/// A scheduled fitness session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub instructor: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    /// Minutes
    pub duration: i64,
    pub capacity: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enrolled_members: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wait_list: Vec<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recurring_days: Vec<String>,
    /// scheduled, in-progress, completed, cancelled
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "scheduled".to_string()
}

impl Class {
    /// A new class draft with no enrollments.
    pub fn draft(
        name: impl Into<String>,
        instructor: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        capacity: i64,
    ) -> ApiResult<Self> {
        let start_time = start_time.into();
        let end_time = end_time.into();
        let duration = minutes_between(&start_time, &end_time)?;

        Ok(Class {
            id: None,
            club_id: None,
            name: name.into(),
            description: String::new(),
            instructor: instructor.into(),
            date,
            start_time,
            end_time,
            duration,
            capacity,
            enrolled_members: Vec::new(),
            wait_list: Vec::new(),
            recurring: false,
            recurring_days: Vec::new(),
            status: default_status(),
            created_at: None,
            updated_at: None,
        })
    }

    pub fn spots_left(&self) -> i64 {
        (self.capacity - self.enrolled_members.len() as i64).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == 0
    }
}

/// Minutes from `start` to `end`, both `HH:MM` on the same day.
fn minutes_between(start: &str, end: &str) -> ApiResult<i64> {
    let parse = |s: &str| {
        chrono::NaiveTime::parse_from_str(s, "%H:%M")
            .map_err(|_| ApiError::Invalid(format!("Invalid time '{}'. Expected HH:MM", s)))
    };
    let minutes = (parse(end)? - parse(start)?).num_minutes();

    if minutes <= 0 {
        return Err(ApiError::Invalid(
            "End time must be after start time".into(),
        ));
    }

    Ok(minutes)
}

impl Entity for Class {
    const COLLECTION: &'static str = "classes";
    const LABEL: &'static str = "class";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Class {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Name", &self.name)?;
        require_non_empty("Instructor", &self.instructor)?;
        require_at_least("Capacity", self.capacity, 1)?;
        require_at_least("Duration", self.duration, 1)?;
        Ok(())
    }
}

/// `GET /api/classes/{id}/details`
#[derive(Debug, Clone, Deserialize)]
pub struct ClassWithMembers {
    #[serde(flatten)]
    pub class: Class,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enrolled_members_details: Vec<Member>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wait_list_details: Vec<Member>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollRequest<'a> {
    pub member_id: &'a str,
}

/// A member's booking of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBooking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub class_id: Option<String>,
    pub member_id: Option<String>,
    /// confirmed, waitlist, cancelled, attended, no-show
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

impl Validate for ClassBooking {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Status", &self.status)
    }
}

impl Entity for ClassBooking {
    const COLLECTION: &'static str = "class-bookings";
    const LABEL: &'static str = "class booking";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn draft_computes_duration() {
        let class = Class::draft("Yoga", "Sam", date("2025-03-10"), "09:00", "10:15", 12).unwrap();
        assert_eq!(class.duration, 75);
        assert_eq!(class.status, "scheduled");
        assert!(class.validate().is_ok());
    }

    #[test]
    fn draft_rejects_inverted_times() {
        let err = Class::draft("Yoga", "Sam", date("2025-03-10"), "10:00", "09:00", 12).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");
    }

    #[test]
    fn zero_capacity_fails_validation() {
        let class = Class::draft("Yoga", "Sam", date("2025-03-10"), "09:00", "10:00", 0).unwrap();
        assert_eq!(
            class.validate().unwrap_err().to_string(),
            "Capacity must be at least 1"
        );
    }

    #[test]
    fn date_serializes_short_form() {
        let class = Class::draft("Yoga", "Sam", date("2025-03-10"), "09:00", "10:00", 5).unwrap();
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["date"], "2025-03-10");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn details_flatten_the_class() {
        let json = r#"{
            "id": "c1", "name": "Spin", "instructor": "Lee",
            "date": "2025-03-10T00:00:00Z", "start_time": "18:00", "end_time": "19:00",
            "duration": 60, "capacity": 1,
            "enrolled_members": ["m1"], "wait_list": null,
            "enrolled_members_details": [], "wait_list_details": null
        }"#;

        let details: ClassWithMembers = serde_json::from_str(json).unwrap();
        assert_eq!(details.class.id.as_deref(), Some("c1"));
        assert!(details.class.is_full());
        assert!(details.wait_list_details.is_empty());
    }
}
