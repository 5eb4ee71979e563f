use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gymdesk_core::ApiClient;
use gymdesk_core::booking::parse_local;
use gymdesk_core::models::Reservation;
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct NewReservation {
    pub restaurant_id: String,
    pub guest_name: String,
    pub party_size: i64,
    pub date_time: String,
    pub member: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub requests: Option<String>,
}

/// `2025-03-10T19:30` (local) or a full RFC 3339 timestamp.
fn parse_date_time(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let (date, time) = input
        .split_once(['T', ' '])
        .with_context(|| format!("Invalid date/time '{}'. Expected YYYY-MM-DDTHH:MM", input))?;
    Ok(parse_local(date, time)?)
}

pub async fn create(client: &ApiClient, args: NewReservation) -> Result<()> {
    let date_time = parse_date_time(&args.date_time)?;

    let mut reservation = Reservation::new(args.restaurant_id, args.guest_name, args.party_size, date_time);
    reservation.member_id = args.member;
    reservation.guest_email = args.email.unwrap_or_default();
    reservation.guest_phone = args.phone.unwrap_or_default();
    reservation.special_requests = args.requests.unwrap_or_default();

    let created = client.resources::<Reservation>().create(&reservation).await?;
    println!("{} {}", "+".green(), created.render());
    Ok(())
}

pub async fn for_restaurant(client: &ApiClient, restaurant_id: &str) -> Result<()> {
    let reservations = client.restaurant_reservations(restaurant_id).await?;
    if reservations.is_empty() {
        println!("{}", "No reservations".dimmed());
    }
    for reservation in &reservations {
        println!("{}", reservation.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc3339() {
        let dt = parse_date_time("2025-03-10T19:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-10T17:30:00+00:00");
    }

    #[test]
    fn accepts_local_date_and_time() {
        assert!(parse_date_time("2025-03-10T19:30").is_ok());
        assert!(parse_date_time("2025-03-10 19:30").is_ok());
        assert!(parse_date_time("tomorrow").is_err());
    }
}
