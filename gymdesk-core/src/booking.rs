//! Office booking drafts and cost.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{ApiError, ApiResult};
use crate::models::{Office, OfficeBooking};

/// Whole started hours between `start` and `end`, times `hourly_rate`.
///
/// A booking from 09:00 to 10:01 is billed for two hours.
pub fn booking_cost(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: f64,
) -> ApiResult<f64> {
    if end <= start {
        return Err(ApiError::Invalid(
            "End time must be after start time".into(),
        ));
    }

    let millis = (end - start).num_milliseconds();
    let hours = (millis + 3_600_000 - 1) / 3_600_000;

    Ok(hours as f64 * hourly_rate)
}

/// Combine `YYYY-MM-DD` and `HH:MM` as local wall-clock time.
pub fn parse_local(date: &str, time: &str) -> ApiResult<DateTime<Utc>> {
    let naive = parse_naive(date, time)?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ApiError::Invalid(format!("{} {} does not exist in the local time zone", date, time))
        })
}

fn parse_naive(date: &str, time: &str) -> ApiResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Invalid(format!("Invalid date '{}'. Expected YYYY-MM-DD", date)))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| ApiError::Invalid(format!("Invalid time '{}'. Expected HH:MM", time)))?;

    Ok(date.and_time(time))
}

impl OfficeBooking {
    /// A confirmed booking of `office` with its cost filled in.
    pub fn draft(
        office: &Office,
        member_id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: impl Into<String>,
    ) -> ApiResult<Self> {
        let member_id = member_id.into();
        if member_id.trim().is_empty() {
            return Err(ApiError::Invalid("Please select a member".into()));
        }

        let total_cost = booking_cost(start_time, end_time, office.hourly_rate)?;

        Ok(OfficeBooking {
            id: None,
            office_id: office.id.clone(),
            member_id: Some(member_id),
            start_time,
            end_time,
            status: "confirmed".to_string(),
            total_cost,
            notes: notes.into(),
            created_at: None,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Validate;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn office(rate: f64) -> Office {
        serde_json::from_value(serde_json::json!({
            "id": "o1", "name": "Suite A", "type": "private",
            "capacity": 2, "hourly_rate": rate
        }))
        .unwrap()
    }

    #[test]
    fn partial_hours_round_up() {
        let cost = booking_cost(at("2025-03-10T09:00:00Z"), at("2025-03-10T10:01:00Z"), 25.0).unwrap();
        assert_eq!(cost, 50.0);
    }

    #[test]
    fn exact_hours_are_not_rounded() {
        let cost = booking_cost(at("2025-03-10T09:00:00Z"), at("2025-03-10T12:00:00Z"), 12.5).unwrap();
        assert_eq!(cost, 37.5);
    }

    #[test]
    fn spans_days() {
        let cost = booking_cost(at("2025-03-10T22:00:00Z"), at("2025-03-11T01:30:00Z"), 10.0).unwrap();
        assert_eq!(cost, 40.0);
    }

    #[test]
    fn end_before_start_is_invalid() {
        let err = booking_cost(at("2025-03-10T10:00:00Z"), at("2025-03-10T10:00:00Z"), 10.0).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");
    }

    #[test]
    fn draft_fills_cost_and_status() {
        let booking = OfficeBooking::draft(
            &office(30.0),
            "m1",
            at("2025-03-10T09:00:00Z"),
            at("2025-03-10T10:30:00Z"),
            "",
        )
        .unwrap();

        assert_eq!(booking.total_cost, 60.0);
        assert_eq!(booking.status, "confirmed");
        assert_eq!(booking.office_id.as_deref(), Some("o1"));
        assert!(booking.validate().is_ok());
    }

    #[test]
    fn draft_requires_member() {
        let err = OfficeBooking::draft(
            &office(30.0),
            " ",
            at("2025-03-10T09:00:00Z"),
            at("2025-03-10T10:00:00Z"),
            "",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please select a member");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_local("2025-13-01", "09:00").is_err());
        assert!(parse_local("2025-03-10", "9am").is_err());
        assert!(parse_naive("2025-03-10", "09:30").is_ok());
    }
}
