use crate::domain::model::{BookingStatus, PaymentStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ride-backend")]
#[command(about = "Manage ride bookings stored in the hosted backend")]
pub struct CliConfig {
    /// TOML configuration file; the environment is used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize the client and print the service endpoints
    Check,
    /// List bookings, newest first
    List {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        status: Option<BookingStatus>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fetch one booking by id
    Get { id: String },
    /// Create a booking from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Set the lifecycle status of a booking
    SetStatus { id: String, status: BookingStatus },
    /// Record the payment outcome of a booking
    SetPayment {
        id: String,
        status: PaymentStatus,
        #[arg(long)]
        intent: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_filters() {
        let cli = CliConfig::try_parse_from([
            "ride-backend",
            "list",
            "--user-id",
            "u-1",
            "--status",
            "confirmed",
            "--limit",
            "10",
        ])
        .unwrap();

        match cli.command {
            Command::List {
                user_id,
                status,
                limit,
            } => {
                assert_eq!(user_id.as_deref(), Some("u-1"));
                assert_eq!(status, Some(BookingStatus::Confirmed));
                assert_eq!(limit, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_set_payment_and_globals() {
        let cli = CliConfig::try_parse_from([
            "ride-backend",
            "set-payment",
            "b-1",
            "paid",
            "--intent",
            "pi_123",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::SetPayment { id, status, intent } => {
                assert_eq!(id, "b-1");
                assert_eq!(status, PaymentStatus::Paid);
                assert_eq!(intent.as_deref(), Some("pi_123"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(CliConfig::try_parse_from(["ride-backend", "set-status", "b-1", "archived"]).is_err());
    }
}
