use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_empty;
use super::{Validate, require_non_empty};
use crate::error::ApiResult;
use crate::resource::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub club_ids: Vec<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Instructor {
    const COLLECTION: &'static str = "instructors";
    const LABEL: &'static str = "instructor";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for Instructor {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Name", &self.name)?;
        require_non_empty("Email", &self.email)
    }
}
