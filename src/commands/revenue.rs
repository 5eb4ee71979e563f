use anyhow::{Context, Result};
use chrono::NaiveDate;
use gymdesk_core::ApiClient;
use gymdesk_core::models::{GroupBy, RevenueQuery};

use crate::render::Render;
use crate::utils::tui;

fn parse_date(flag: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .with_context(|| format!("Invalid {} '{}'. Expected YYYY-MM-DD", flag, v))
        })
        .transpose()
}

pub async fn run(
    client: &ApiClient,
    from: Option<String>,
    to: Option<String>,
    group_by: GroupBy,
) -> Result<()> {
    let query = RevenueQuery {
        start_date: parse_date("--from", from)?,
        end_date: parse_date("--to", to)?,
        group_by,
    };

    if let (Some(start), Some(end)) = (query.start_date, query.end_date)
        && end < start
    {
        anyhow::bail!("--to must not be before --from");
    }

    let spinner = tui::create_spinner("Loading revenue");
    let result = client.revenue_analytics(&query).await;
    spinner.finish_and_clear();

    println!("{}", result?.render());
    Ok(())
}
