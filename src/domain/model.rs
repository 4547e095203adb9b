use crate::utils::error::{BackendError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative, Validate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 計價方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Distance,
    Hourly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

/// Lifecycle state of a booking. Transitions are owned by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

macro_rules! string_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = BackendError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(BackendError::validation(format!(
                        "unknown {} '{}', expected one of: {}",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum!(BookingType, "booking_type", {
    Distance => "distance",
    Hourly => "hourly",
});

string_enum!(PaymentStatus, "payment_status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
});

string_enum!(BookingStatus, "status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// Validated pricing mode of a booking.
///
/// The wire record keeps `hours` and `distance` as two independent optional
/// fields; this type is derived from them on demand via [`Booking::pricing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pricing {
    Distance { distance: f64 },
    Hourly { hours: f64 },
}

impl Pricing {
    pub fn booking_type(&self) -> BookingType {
        match self {
            Pricing::Distance { .. } => BookingType::Distance,
            Pricing::Hourly { .. } => BookingType::Hourly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub pickup: String,
    pub dropoff: String,
    pub date: String,
    pub time: String,
}

/// A single transport reservation as stored in the `bookings` table.
///
/// Optional fields are omitted on serialization so that the backend fills in
/// `id`, `created_at` and `updated_at` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub pickup: String,
    pub dropoff: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub booking_type: BookingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Booking {
    /// 建立尚未送出的訂單，付款與訂單狀態皆為 pending
    pub fn new(contact: Contact, trip: Trip, pricing: Pricing, price: f64) -> Self {
        let mut booking = Self {
            id: None,
            user_id: None,
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            pickup: trip.pickup,
            dropoff: trip.dropoff,
            date: trip.date,
            time: trip.time,
            notes: None,
            booking_type: pricing.booking_type(),
            hours: None,
            distance: None,
            price,
            flight_number: None,
            payment_status: PaymentStatus::default(),
            payment_intent_id: None,
            status: BookingStatus::default(),
            created_at: None,
            updated_at: None,
        };
        booking.set_pricing(pricing);
        booking
    }

    pub fn with_flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.flight_number = Some(flight_number.into());
        self
    }

    /// Derive the pricing mode, requiring the field that matches
    /// `booking_type`. The other field is ignored.
    pub fn pricing(&self) -> Result<Pricing> {
        match self.booking_type {
            BookingType::Distance => {
                let distance = self.distance.ok_or_else(|| {
                    BackendError::validation("distance is required for distance bookings")
                })?;
                validate_non_negative("distance", distance)?;
                Ok(Pricing::Distance { distance })
            }
            BookingType::Hourly => {
                let hours = self.hours.ok_or_else(|| {
                    BackendError::validation("hours is required for hourly bookings")
                })?;
                validate_non_negative("hours", hours)?;
                Ok(Pricing::Hourly { hours })
            }
        }
    }

    pub fn set_pricing(&mut self, pricing: Pricing) {
        self.booking_type = pricing.booking_type();
        match pricing {
            Pricing::Distance { distance } => {
                self.distance = Some(distance);
                self.hours = None;
            }
            Pricing::Hourly { hours } => {
                self.hours = Some(hours);
                self.distance = None;
            }
        }
    }

    /// `date` + `time` as entered on the booking form. `None` when either
    /// field is not in `YYYY-MM-DD` / `HH:MM[:SS]` form.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(self.time.trim(), "%H:%M:%S"))
            .ok()?;
        Some(date.and_time(time))
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref())
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

impl Validate for Booking {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("phone", &self.phone)?;
        validate_non_empty_string("email", &self.email)?;
        validate_non_empty_string("pickup", &self.pickup)?;
        validate_non_empty_string("dropoff", &self.dropoff)?;
        validate_non_empty_string("date", &self.date)?;
        validate_non_empty_string("time", &self.time)?;
        self.pricing()?;
        validate_non_negative("price", self.price)?;
        Ok(())
    }
}
