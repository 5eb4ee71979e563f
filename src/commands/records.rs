//! Generic list / show / delete over every backend collection.

use anyhow::{Context, Result};
use clap::ValueEnum;
use gymdesk_core::models::{
    Class, ClassBooking, Club, Instructor, Member, Office, OfficeBooking, Reservation, Restaurant,
    User,
};
use gymdesk_core::{ApiClient, Entity};
use owo_colors::OwoColorize;
use tracing::warn;

use crate::render::Render;
use crate::utils::tui::{self, pluralize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Members,
    Classes,
    Instructors,
    Clubs,
    Restaurants,
    Reservations,
    Offices,
    OfficeBookings,
    ClassBookings,
    Users,
}

/// Runs `$body` with `$t` bound to the record type of `$kind`.
macro_rules! with_entity {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ResourceKind::Members => { type $t = Member; $body }
            ResourceKind::Classes => { type $t = Class; $body }
            ResourceKind::Instructors => { type $t = Instructor; $body }
            ResourceKind::Clubs => { type $t = Club; $body }
            ResourceKind::Restaurants => { type $t = Restaurant; $body }
            ResourceKind::Reservations => { type $t = Reservation; $body }
            ResourceKind::Offices => { type $t = Office; $body }
            ResourceKind::OfficeBookings => { type $t = OfficeBooking; $body }
            ResourceKind::ClassBookings => { type $t = ClassBooking; $body }
            ResourceKind::Users => { type $t = User; $body }
        }
    };
}

/// Split `key=value` filter arguments.
pub fn parse_filters(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|f| {
            let (k, v) = f
                .split_once('=')
                .with_context(|| format!("Invalid filter '{}'. Expected key=value", f))?;
            if k.trim().is_empty() {
                anyhow::bail!("Invalid filter '{}'. Key is empty", f);
            }
            Ok((k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

pub async fn list(client: &ApiClient, kind: ResourceKind, filters: Vec<(String, String)>) -> Result<()> {
    // Banner only; a failure here should not block the listing.
    match client.session().cached_user() {
        Ok(Some(user)) => println!("{}", format!("Signed in as {}", user.display_name()).dimmed()),
        Ok(None) => {}
        Err(e) => warn!("could not read cached user: {}", e),
    }

    with_entity!(kind, T => list_records::<T>(client, &filters).await)
}

async fn list_records<T: Entity + Render>(client: &ApiClient, filters: &[(String, String)]) -> Result<()> {
    let pairs: Vec<(&str, &str)> = filters.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

    let spinner = tui::create_spinner(format!("Loading {}", T::COLLECTION));
    let result = client.resources::<T>().list_where(&pairs).await;
    spinner.finish_and_clear();

    let records = result?;
    if records.is_empty() {
        println!("{}", format!("No {} found", T::COLLECTION).dimmed());
        return Ok(());
    }

    for record in &records {
        println!("{}", record.render());
    }
    println!(
        "{}",
        format!("{} {}", records.len(), pluralize(T::LABEL, records.len())).dimmed()
    );
    Ok(())
}

pub async fn show(client: &ApiClient, kind: ResourceKind, id: &str) -> Result<()> {
    with_entity!(kind, T => show_record::<T>(client, id).await)
}

async fn show_record<T: Entity + Render>(client: &ApiClient, id: &str) -> Result<()> {
    let record = client.resources::<T>().get(id).await?;

    println!("{}", record.render());
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub async fn delete(client: &ApiClient, kind: ResourceKind, ids: &[String]) -> Result<()> {
    with_entity!(kind, T => delete_records::<T>(client, ids).await)
}

async fn delete_records<T: Entity>(client: &ApiClient, ids: &[String]) -> Result<()> {
    let spinner = tui::create_spinner(format!("Deleting {} {}", ids.len(), pluralize(T::LABEL, ids.len())));
    let results = client.resources::<T>().delete_many(ids).await;
    spinner.finish_and_clear();

    let mut failed = 0;
    for (id, result) in &results {
        match result {
            Ok(()) => println!("{} {}", "-".red(), id),
            Err(e) => {
                failed += 1;
                println!("{} {} {}", "!".yellow(), id, e.to_string().red());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} deletes failed", failed, results.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_split_on_first_equals() {
        let parsed = parse_filters(&["status=confirmed".into(), "note=a=b".into()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("status".to_string(), "confirmed".to_string()),
                ("note".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn filters_need_a_key() {
        assert!(parse_filters(&["=x".into()]).is_err());
        assert!(parse_filters(&["novalue".into()]).is_err());
    }
}
