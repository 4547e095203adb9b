pub mod bookings;
pub mod client;

pub use crate::domain::model::{Booking, BookingStatus, BookingType, PaymentStatus, Pricing};
pub use crate::domain::ports::{BookingQuery, BookingRepository};
pub use crate::utils::error::Result;
