//! Terminal rendering for gymdesk records.
//!
//! One line per record; `show` prints the full JSON below the line.

use gymdesk_core::models::{
    Class, ClassBooking, ClassWithMembers, Club, Instructor, Member, Office, OfficeBooking,
    Reservation, Restaurant, RevenueAnalytics, User,
};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

fn id_of(id: &Option<String>) -> String {
    id.as_deref().unwrap_or("-").dimmed().to_string()
}

fn status(s: &str) -> String {
    match s {
        "active" | "confirmed" | "scheduled" | "paid" | "attended" => s.green().to_string(),
        "cancelled" | "suspended" | "failed" | "no-show" => s.red().to_string(),
        "waitlist" | "pending" | "in-progress" => s.yellow().to_string(),
        _ => s.dimmed().to_string(),
    }
}

fn active(flag: bool) -> String {
    if flag {
        status("active")
    } else {
        "inactive".dimmed().to_string()
    }
}

impl Render for Member {
    fn render(&self) -> String {
        format!(
            "{} {} {} {} {}",
            id_of(&self.id),
            self.full_name().bold(),
            self.email,
            self.membership_type.cyan(),
            status(&self.status)
        )
    }
}

impl Render for Class {
    fn render(&self) -> String {
        let seats = format!("{}/{}", self.enrolled_members.len(), self.capacity);
        let seats = if self.is_full() {
            seats.red().to_string()
        } else {
            seats.green().to_string()
        };

        let mut line = format!(
            "{} {} {} {}-{} with {} {}",
            id_of(&self.id),
            self.name.bold(),
            self.date.format("%a %Y-%m-%d"),
            self.start_time,
            self.end_time,
            self.instructor,
            seats
        );
        if !self.wait_list.is_empty() {
            line.push_str(&format!(" (+{} waiting)", self.wait_list.len()).yellow().to_string());
        }
        if self.status != "scheduled" {
            line.push_str(&format!(" {}", status(&self.status)));
        }
        line
    }
}

impl Render for ClassWithMembers {
    fn render(&self) -> String {
        let mut lines = vec![self.class.render()];

        lines.push(format!("   {}", "Enrolled".bold()));
        if self.enrolled_members_details.is_empty() {
            lines.push(format!("   {}", "(none)".dimmed()));
        }
        for member in &self.enrolled_members_details {
            lines.push(format!("   {} {}", "•".green(), member.full_name()));
        }

        if !self.wait_list_details.is_empty() {
            lines.push(format!("   {}", "Wait list".bold()));
            for (i, member) in self.wait_list_details.iter().enumerate() {
                lines.push(format!("   {} {}", format!("{}.", i + 1).yellow(), member.full_name()));
            }
        }

        lines.join("\n")
    }
}

impl Render for ClassBooking {
    fn render(&self) -> String {
        format!(
            "{} class {} member {} {}",
            id_of(&self.id),
            self.class_id.as_deref().unwrap_or("-"),
            self.member_id.as_deref().unwrap_or("-"),
            status(&self.status)
        )
    }
}

impl Render for Instructor {
    fn render(&self) -> String {
        format!(
            "{} {} {} {} {}",
            id_of(&self.id),
            self.name.bold(),
            self.email,
            self.specialty.cyan(),
            active(self.active)
        )
    }
}

impl Render for Club {
    fn render(&self) -> String {
        format!(
            "{} {} {}, {} {}",
            id_of(&self.id),
            self.name.bold(),
            self.address,
            self.city,
            active(self.active)
        )
    }
}

impl Render for Restaurant {
    fn render(&self) -> String {
        format!(
            "{} {} {} {}-{} seats {} {}",
            id_of(&self.id),
            self.name.bold(),
            self.cuisine.cyan(),
            self.opening_time,
            self.closing_time,
            self.capacity,
            active(self.active)
        )
    }
}

impl Render for Reservation {
    fn render(&self) -> String {
        format!(
            "{} {} party of {} at {} {}",
            id_of(&self.id),
            self.guest_name.bold(),
            self.party_size,
            self.date_time.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            status(&self.status)
        )
    }
}

impl Render for Office {
    fn render(&self) -> String {
        format!(
            "{} {} {} cap {} ${:.2}/h {}",
            id_of(&self.id),
            self.name.bold(),
            self.kind.cyan(),
            self.capacity,
            self.hourly_rate,
            active(self.active)
        )
    }
}

impl Render for OfficeBooking {
    fn render(&self) -> String {
        let fmt = "%Y-%m-%d %H:%M";
        format!(
            "{} office {} {} → {} ${:.2} {}",
            id_of(&self.id),
            self.office_id.as_deref().unwrap_or("-"),
            self.start_time.with_timezone(&chrono::Local).format(fmt),
            self.end_time.with_timezone(&chrono::Local).format(fmt),
            self.total_cost,
            status(&self.status)
        )
    }
}

impl Render for User {
    fn render(&self) -> String {
        format!(
            "{} {} {} {} {}",
            id_of(&self.id),
            self.display_name().bold(),
            self.email,
            self.role.cyan(),
            active(self.active)
        )
    }
}

impl Render for RevenueAnalytics {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} to {} (by {})",
            "Revenue".bold(),
            self.start_date,
            self.end_date,
            self.period
        )];

        let peak = self.best().map(|p| p.revenue).unwrap_or(0.0);
        for point in &self.data {
            let bar_len = if peak > 0.0 {
                ((point.revenue / peak) * 30.0).round() as usize
            } else {
                0
            };
            lines.push(format!(
                "   {} {:>10.2} {}",
                point.date,
                point.revenue,
                "█".repeat(bar_len).green()
            ));
        }

        lines.push(format!("   {} {:>10.2}", "Total".bold(), self.total_revenue));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn revenue(points: &[f64]) -> RevenueAnalytics {
        let data: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, r)| json!({"date": format!("2025-03-0{}", i + 1), "revenue": r}))
            .collect();
        serde_json::from_value(json!({
            "data": data,
            "total_revenue": points.iter().sum::<f64>(),
            "period": "day",
            "start_date": "2025-03-01",
            "end_date": "2025-03-31",
        }))
        .unwrap()
    }

    fn bar(line: &str) -> usize {
        line.matches('█').count()
    }

    #[test]
    fn revenue_bars_scale_to_the_best_day() {
        let text = revenue(&[50.0, 100.0]).render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(bar(lines[1]), 15);
        assert_eq!(bar(lines[2]), 30);
        assert!(lines[3].contains("150.00"));
    }

    #[test]
    fn revenue_without_income_draws_no_bars() {
        for points in [&[0.0, 0.0][..], &[-20.0, -5.0][..], &[][..]] {
            let text = revenue(points).render();
            assert_eq!(bar(&text), 0);
            assert!(text.contains("Total"));
        }
    }

    #[test]
    fn negative_days_get_an_empty_bar() {
        let text = revenue(&[-50.0, 100.0]).render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(bar(lines[1]), 0);
        assert_eq!(bar(lines[2]), 30);
    }

    #[test]
    fn class_line_shows_schedule_and_seats() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let class = Class::draft("HIIT", "Jo", date, "07:00", "07:45", 20).unwrap();
        let line = class.render();

        assert!(line.contains("HIIT"));
        assert!(line.contains("Mon 2025-03-10"));
        assert!(line.contains("07:00-07:45"));
        assert!(line.contains("0/20"));
        assert!(!line.contains("waiting"));
    }

    #[test]
    fn member_without_id_renders_a_dash() {
        let member: Member = serde_json::from_value(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "membership_type": "premium",
            "status": "active",
            "join_date": "2024-01-15T00:00:00Z",
        }))
        .unwrap();
        let line = member.render();

        assert!(line.contains("Ada Lovelace"));
        assert!(line.contains("premium"));
        assert!(line.contains('-'));
    }
}
