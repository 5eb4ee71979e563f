use anyhow::Result;
use dialoguer::Confirm;
use gymdesk_core::booking::parse_local;
use gymdesk_core::models::{Office, OfficeBooking};
use gymdesk_core::{ApiClient, OfficeBookingFilter};
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct BookOffice {
    pub office_id: String,
    pub member_id: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub yes: bool,
}

pub async fn book(client: &ApiClient, args: BookOffice) -> Result<()> {
    let office = client.resources::<Office>().get(&args.office_id).await?;

    let start = parse_local(&args.start_date, &args.start_time)?;
    let end = parse_local(&args.end_date, &args.end_time)?;
    let booking = OfficeBooking::draft(
        &office,
        args.member_id,
        start,
        end,
        args.notes.unwrap_or_default(),
    )?;

    println!("{}", office.render());
    println!(
        "   {} {}",
        "Cost".bold(),
        format!("${:.2}", booking.total_cost).green()
    );

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt("Create booking?")
            .default(true)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let created = client.resources::<OfficeBooking>().create(&booking).await?;
    println!("{} {}", "+".green(), created.render());
    Ok(())
}

pub async fn bookings(client: &ApiClient, filter: OfficeBookingFilter) -> Result<()> {
    let bookings = client.office_bookings(&filter).await?;
    if bookings.is_empty() {
        println!("{}", "No office bookings found".dimmed());
    }
    for booking in &bookings {
        println!("{}", booking.render());
    }
    Ok(())
}
