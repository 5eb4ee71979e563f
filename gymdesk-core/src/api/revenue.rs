use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{GroupBy, RevenueAnalytics, RevenueQuery};

impl RevenueQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        let group_by = match self.group_by {
            GroupBy::Day => "day",
            GroupBy::Month => "month",
        };
        pairs.push(("group_by", group_by.to_string()));
        pairs
    }
}

impl ApiClient {
    /// `GET /api/revenue`
    pub async fn revenue_analytics(&self, query: &RevenueQuery) -> ApiResult<RevenueAnalytics> {
        let pairs = query.pairs();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        self.get_json_query(self.endpoint(["api", "revenue"]), &borrowed)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn query_pairs() {
        let query = RevenueQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 28),
            group_by: GroupBy::Month,
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("start_date", "2025-02-01".to_string()),
                ("end_date", "2025-02-28".to_string()),
                ("group_by", "month".to_string()),
            ]
        );
    }

    #[test]
    fn default_query_only_groups() {
        assert_eq!(
            RevenueQuery::default().pairs(),
            vec![("group_by", "day".to_string())]
        );
    }
}
