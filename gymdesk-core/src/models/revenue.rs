//! Revenue analytics (`GET /api/revenue`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_empty;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
}

/// Query string for the revenue endpoint. Unset dates let the backend
/// pick its default window (last 30 days).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevenueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub group_by: GroupBy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueDataPoint {
    pub date: String,
    pub revenue: f64,
    #[serde(default)]
    pub booking_revenue: f64,
    #[serde(default)]
    pub billing_revenue: f64,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueAnalytics {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<RevenueDataPoint>,
    pub total_revenue: f64,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
}

impl RevenueAnalytics {
    /// The bucket with the highest revenue, if any.
    pub fn best(&self) -> Option<&RevenueDataPoint> {
        self.data
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_serializes_dates_and_grouping() {
        let q = RevenueQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: None,
            group_by: GroupBy::Month,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["group_by"], "month");
        assert!(json.get("end_date").is_none());
    }

    #[test]
    fn best_bucket() {
        let json = r#"{
            "data": [
                {"date": "2025-01-01", "revenue": 10.0},
                {"date": "2025-01-02", "revenue": 40.0, "count": 2}
            ],
            "total_revenue": 50.0, "period": "day",
            "start_date": "2025-01-01", "end_date": "2025-01-02"
        }"#;
        let analytics: RevenueAnalytics = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.best().map(|p| p.date.as_str()), Some("2025-01-02"));
    }
}
