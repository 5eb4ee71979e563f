use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Message, Office, OfficeBooking, Reservation, User};

/// Filters for `GET /api/office-bookings`. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct OfficeBookingFilter {
    pub office_id: Option<String>,
    pub member_id: Option<String>,
    pub status: Option<String>,
}

impl OfficeBookingFilter {
    fn pairs(&self) -> Vec<(&str, &str)> {
        [
            ("office_id", self.office_id.as_deref()),
            ("member_id", self.member_id.as_deref()),
            ("status", self.status.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

impl ApiClient {
    /// `POST /api/class-bookings/{id}/cancel`
    pub async fn cancel_class_booking(&self, booking_id: &str) -> ApiResult<Message> {
        self.execute::<()>(
            Method::POST,
            self.endpoint(["api", "class-bookings", booking_id, "cancel"]),
            &[],
            None,
        )
        .await?
        .json()
    }

    /// Reservations for one restaurant.
    pub async fn restaurant_reservations(&self, restaurant_id: &str) -> ApiResult<Vec<Reservation>> {
        self.resources::<Reservation>()
            .list_where(&[("restaurant_id", restaurant_id)])
            .await
    }

    pub async fn office_bookings(&self, filter: &OfficeBookingFilter) -> ApiResult<Vec<OfficeBooking>> {
        self.resources::<OfficeBooking>()
            .list_where(&filter.pairs())
            .await
    }

    pub async fn club_offices(&self, club_id: &str) -> ApiResult<Vec<Office>> {
        self.resources::<Office>()
            .list_where(&[("club_id", club_id)])
            .await
    }

    /// `GET /api/users`, optionally narrowed by role and club.
    pub async fn users(&self, role: Option<&str>, club_id: Option<&str>) -> ApiResult<Vec<User>> {
        let filters: Vec<(&str, &str)> = [("role", role), ("club_id", club_id)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();

        self.resources::<User>().list_where(&filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_skips_unset_fields() {
        let filter = OfficeBookingFilter {
            office_id: Some("o1".into()),
            status: Some("confirmed".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.pairs(),
            vec![("office_id", "o1"), ("status", "confirmed")]
        );
        assert!(OfficeBookingFilter::default().pairs().is_empty());
    }
}
