//! Club restaurants and table reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_at_least, require_non_empty};
use crate::error::ApiResult;
use crate::resource::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub capacity: i64,
    /// HH:MM
    #[serde(default)]
    pub opening_time: String,
    /// HH:MM
    #[serde(default)]
    pub closing_time: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Restaurant {
    const COLLECTION: &'static str = "restaurants";
    const LABEL: &'static str = "restaurant";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Restaurant {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Name", &self.name)?;
        require_at_least("Capacity", self.capacity, 1)
    }
}

/// A restaurant seating booking for a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub guest_name: String,
    #[serde(default)]
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    pub party_size: i64,
    pub date_time: DateTime<Utc>,
    /// confirmed, cancelled, completed, no-show
    pub status: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    pub fn new(
        restaurant_id: impl Into<String>,
        guest_name: impl Into<String>,
        party_size: i64,
        date_time: DateTime<Utc>,
    ) -> Self {
        Reservation {
            id: None,
            restaurant_id: Some(restaurant_id.into()),
            member_id: None,
            guest_name: guest_name.into(),
            guest_email: String::new(),
            guest_phone: String::new(),
            party_size,
            date_time,
            status: "confirmed".to_string(),
            special_requests: String::new(),
            notes: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Entity for Reservation {
    const COLLECTION: &'static str = "reservations";
    const LABEL: &'static str = "reservation";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Reservation {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Guest name", &self.guest_name)?;
        require_at_least("Party size", self.party_size, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_party_is_rejected() {
        let r = Reservation::new("r1", "Grace", 0, Utc::now());
        assert_eq!(
            r.validate().unwrap_err().to_string(),
            "Party size must be at least 1"
        );
    }

    #[test]
    fn new_reservation_is_confirmed() {
        let r = Reservation::new("r1", "Grace", 4, Utc::now());
        assert_eq!(r.status, "confirmed");
        assert!(r.validate().is_ok());
    }
}
