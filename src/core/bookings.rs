use crate::config::toml_config::DEFAULT_BOOKINGS_TABLE;
use crate::core::client::BackendClient;
use crate::domain::model::{Booking, BookingStatus, PaymentStatus};
use crate::domain::ports::{BookingQuery, BookingRepository};
use crate::utils::error::{BackendError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::Serialize;

const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

/// Bookings stored in a REST-exposed table of the hosted backend.
pub struct RestBookingStore<'a> {
    client: &'a BackendClient,
    table: String,
}

#[derive(Serialize)]
struct StatusPatch {
    status: BookingStatus,
}

#[derive(Serialize)]
struct PaymentPatch<'p> {
    payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_intent_id: Option<&'p str>,
}

impl<'a> RestBookingStore<'a> {
    pub fn new(client: &'a BackendClient) -> Self {
        Self::with_table(client, DEFAULT_BOOKINGS_TABLE)
    }

    pub fn with_table(client: &'a BackendClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn patch<B: Serialize + Sync>(&self, id: &str, body: &B) -> Result<Booking> {
        validate_non_empty_string("id", id)?;

        let (prefer, representation) = RETURN_REPRESENTATION;
        let response = self
            .client
            .table_request(Method::PATCH, &self.table)?
            .query(&[("id", format!("eq.{}", id))])
            .header(prefer, representation)
            .json(body)
            .send()
            .await?;

        read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound {
                resource: "booking".to_string(),
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl<'a> BookingRepository for RestBookingStore<'a> {
    async fn create(&self, booking: &Booking) -> Result<Booking> {
        booking.validate()?;

        tracing::debug!(table = %self.table, booking_type = %booking.booking_type, "Creating booking");
        let (prefer, representation) = RETURN_REPRESENTATION;
        let response = self
            .client
            .table_request(Method::POST, &self.table)?
            .header(prefer, representation)
            .json(booking)
            .send()
            .await?;

        let created = read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::UnexpectedResponse {
                message: "insert returned no rows".to_string(),
            })?;

        tracing::info!(id = ?created.id, "Booking created");
        Ok(created)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>> {
        validate_non_empty_string("id", id)?;

        let response = self
            .client
            .table_request(Method::GET, &self.table)?
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        Ok(read_rows(response).await?.into_iter().next())
    }

    async fn list(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(user_id) = &query.user_id {
            params.push(("user_id", format!("eq.{}", user_id)));
        }
        if let Some(status) = query.status {
            params.push(("status", format!("eq.{}", status)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let response = self
            .client
            .table_request(Method::GET, &self.table)?
            .query(&params)
            .send()
            .await?;

        let rows = read_rows(response).await?;
        tracing::debug!(count = rows.len(), "Listed bookings");
        Ok(rows)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking> {
        tracing::debug!(id, %status, "Updating booking status");
        self.patch(id, &StatusPatch { status }).await
    }

    async fn update_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        payment_intent_id: Option<&str>,
    ) -> Result<Booking> {
        tracing::debug!(id, %payment_status, "Updating booking payment");
        self.patch(
            id,
            &PaymentPatch {
                payment_status,
                payment_intent_id,
            },
        )
        .await
    }
}

/// 解析回應：非 2xx 轉成 `Status` 錯誤，優先使用後端的 `message` 欄位
async fn read_rows(response: Response) -> Result<Vec<Booking>> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);
        tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
        return Err(BackendError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&body).map_err(|e| BackendError::UnexpectedResponse {
        message: format!("response is not a list of bookings: {}", e),
    })
}
