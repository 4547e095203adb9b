use crate::domain::model::{Booking, BookingStatus, PaymentStatus};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Filters for listing bookings. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub user_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub limit: Option<usize>,
}

impl BookingQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking and return the stored row.
    async fn create(&self, booking: &Booking) -> Result<Booking>;
    async fn get(&self, id: &str) -> Result<Option<Booking>>;
    /// Newest first.
    async fn list(&self, query: &BookingQuery) -> Result<Vec<Booking>>;
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking>;
    async fn update_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        payment_intent_id: Option<&str>,
    ) -> Result<Booking>;
}
