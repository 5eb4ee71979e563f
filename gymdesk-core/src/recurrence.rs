//! Recurring class expansion.
//!
//! A recurring class is entered once (base date, weekdays, number of weeks)
//! and stored as one independent class record per occurrence.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{ApiError, ApiResult};
use crate::models::Class;

/// Longest series the class form accepts.
pub const MAX_RECURRING_WEEKS: u32 = 52;

/// Parse weekday names ("Monday", "wed", "FRIDAY"), comma or space separated.
pub fn parse_weekdays(input: &str) -> ApiResult<Vec<Weekday>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            Weekday::from_str(s)
                .map_err(|_| ApiError::Invalid(format!("Unknown weekday '{}'", s)))
        })
        .collect()
}

/// Full English name, as the backend stores in `recurring_days`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Dates of every (week, weekday) occurrence, sorted ascending.
///
/// Week 0 uses the first occurrence of each weekday strictly after
/// `base`: a weekday equal to or before the base weekday rolls forward a
/// full week. Week `n` adds `7 * n` days to that. Repeated weekdays are
/// counted once. A date past the end of the calendar is `Invalid`.
pub fn expand_recurring(
    base: NaiveDate,
    weekdays: &[Weekday],
    weeks: u32,
) -> ApiResult<Vec<NaiveDate>> {
    let base_index = i64::from(base.weekday().num_days_from_sunday());

    let mut seen = HashSet::new();
    let days: Vec<Weekday> = weekdays.iter().copied().filter(|d| seen.insert(*d)).collect();

    let weeks_hint = weeks.min(MAX_RECURRING_WEEKS) as usize;
    let mut dates = Vec::with_capacity(days.len() * weeks_hint);

    for week in 0..i64::from(weeks) {
        for day in &days {
            let mut offset = i64::from(day.num_days_from_sunday()) - base_index;
            if offset <= 0 {
                offset += 7;
            }
            offset += week * 7;

            let date = base
                .checked_add_signed(Duration::days(offset))
                .ok_or_else(|| {
                    ApiError::Invalid(format!("Recurring dates run past {}", NaiveDate::MAX))
                })?;
            dates.push(date);
        }
    }

    dates.sort();
    Ok(dates)
}

/// Recurring creation stopped part-way.
///
/// Classes are created one at a time in date order; `created` holds the
/// ones the backend accepted before `failed_date` was rejected. Nothing is
/// rolled back.
#[derive(Debug, thiserror::Error)]
#[error("Created {} of {total} classes; {failed_date} failed: {source}", .created.len())]
pub struct RecurringCreateError {
    pub created: Vec<Class>,
    pub total: usize,
    pub failed_date: NaiveDate,
    #[source]
    pub source: ApiError,
}

/// One class draft per occurrence, identical to `template` except `date`.
///
/// `weeks` must be between 1 and [`MAX_RECURRING_WEEKS`], and at least one
/// weekday is required.
pub fn recurring_instances(
    template: &Class,
    weekdays: &[Weekday],
    weeks: u32,
) -> ApiResult<Vec<Class>> {
    if !(1..=MAX_RECURRING_WEEKS).contains(&weeks) {
        return Err(ApiError::Invalid(format!(
            "Weeks must be between 1 and {}",
            MAX_RECURRING_WEEKS
        )));
    }
    if weekdays.is_empty() {
        return Err(ApiError::Invalid("Select at least one day".into()));
    }

    let mut seen = HashSet::new();
    let names: Vec<String> = weekdays
        .iter()
        .filter(|d| seen.insert(**d))
        .map(|d| weekday_name(*d).to_string())
        .collect();

    let instances = expand_recurring(template.date, weekdays, weeks)?
        .into_iter()
        .map(|date| Class {
            id: None,
            date,
            recurring: true,
            recurring_days: names.clone(),
            ..template.clone()
        })
        .collect();
    Ok(instances)
}
