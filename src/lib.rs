pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use config::{toml_config::TomlConfig, BackendConfig};
pub use crate::core::bookings::RestBookingStore;
pub use crate::core::client::{init_shared, shared, BackendClient, Service, SharedClient};
pub use domain::model::{
    Booking, BookingStatus, BookingType, Contact, PaymentStatus, Pricing, Trip,
};
pub use domain::ports::{BookingQuery, BookingRepository};
pub use utils::error::{BackendError, Result};
