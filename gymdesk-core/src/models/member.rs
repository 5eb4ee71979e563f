//! Member records (gym customers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_empty;
use super::{Validate, require_non_empty};
use crate::error::ApiResult;
use crate::resource::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub club_ids: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// basic, premium, vip, ...
    pub membership_type: String,
    /// active, inactive, suspended, ...
    pub status: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renewal: bool,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub billing_history: Vec<BillingEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single billing transaction for a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingEntry {
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub description: String,
    /// paid, pending, failed, refunded
    pub status: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn total_paid(&self) -> f64 {
        self.billing_history
            .iter()
            .filter(|b| b.status == "paid")
            .map(|b| b.amount)
            .sum()
    }
}

impl Entity for Member {
    const COLLECTION: &'static str = "members";
    const LABEL: &'static str = "member";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Member {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("First name", &self.first_name)?;
        require_non_empty("Last name", &self.last_name)?;
        require_non_empty("Email", &self.email)?;
        require_non_empty("Membership type", &self.membership_type)?;
        Ok(())
    }
}
