use anyhow::{Context, Result};
use chrono::NaiveDate;
use gymdesk_core::models::Class;
use gymdesk_core::recurrence::{parse_weekdays, recurring_instances};
use gymdesk_core::{ApiClient, Enrollment};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui::{self, pluralize};

pub struct NewClass {
    pub name: String,
    pub instructor: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub capacity: i64,
    pub description: Option<String>,
    pub club: Option<String>,
    pub days: Option<String>,
    pub weeks: u32,
}

pub async fn create(client: &ApiClient, args: NewClass) -> Result<()> {
    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", args.date))?;

    let mut class = Class::draft(args.name, args.instructor, date, args.start, args.end, args.capacity)?;
    class.description = args.description.unwrap_or_default();
    class.club_id = args.club;

    let Some(days) = args.days else {
        let created = client.resources::<Class>().create(&class).await?;
        println!("{} {}", "+".green(), created.render());
        return Ok(());
    };

    let weekdays = parse_weekdays(&days)?;
    let drafts = recurring_instances(&class, &weekdays, args.weeks)?;

    let spinner = tui::create_spinner(format!(
        "Creating {} {}",
        drafts.len(),
        pluralize("class", drafts.len())
    ));
    let result = client.create_recurring(drafts).await;
    spinner.finish_and_clear();

    match result {
        Ok(created) => {
            for class in &created {
                println!("{} {}", "+".green(), class.render());
            }
            println!("Created {} recurring {}", created.len(), pluralize("class", created.len()));
            Ok(())
        }
        Err(e) => {
            for class in &e.created {
                println!("{} {}", "+".green(), class.render());
            }
            Err(e.into())
        }
    }
}

pub async fn details(client: &ApiClient, class_id: &str) -> Result<()> {
    let details = client.class_details(class_id).await?;
    println!("{}", details.render());
    Ok(())
}

pub async fn enroll(client: &ApiClient, class_id: &str, member_ids: &[String]) -> Result<()> {
    let results = client.enroll_many(class_id, member_ids).await;

    let mut failed = 0;
    for (member_id, result) in &results {
        match result {
            Ok(Enrollment::Enrolled) => println!("{} {} enrolled", "+".green(), member_id),
            Ok(Enrollment::WaitListed) => {
                println!("{} {} added to wait list", "~".yellow(), member_id)
            }
            Err(e) => {
                failed += 1;
                println!("{} {} {}", "!".red(), member_id, e.to_string().red());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} enrollments failed", failed, results.len());
    }
    Ok(())
}

pub async fn unenroll(client: &ApiClient, class_id: &str, member_id: &str) -> Result<()> {
    client.unenroll(class_id, member_id).await?;
    println!("{} {} removed from {}", "-".red(), member_id, class_id);
    Ok(())
}

pub async fn cancel_booking(client: &ApiClient, booking_id: &str) -> Result<()> {
    let message = client.cancel_class_booking(booking_id).await?;
    println!("{}", message.message);
    Ok(())
}
