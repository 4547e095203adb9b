use anyhow::Context;
use clap::Parser;
use ride_backend::config::toml_config::DEFAULT_BOOKINGS_TABLE;
use ride_backend::utils::logger;
use ride_backend::{
    init_shared, shared, BackendClient, BackendError, Booking, BookingQuery, BookingRepository,
    CliConfig, Command, RestBookingStore, Service, TomlConfig,
};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    // .env 檔案可有可無
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 設定缺漏時直接結束，不進入任何指令
    let (client, table) = match initialize(&cli) {
        Ok(initialized) => initialized,
        Err(e) => fail(&e.into()),
    };

    if let Err(e) = run(&cli.command, client, &table).await {
        fail(&e);
    }

    Ok(())
}

fn initialize(cli: &CliConfig) -> ride_backend::Result<(&'static BackendClient, String)> {
    match &cli.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)?;
            let table = config.bookings_table().to_string();
            let client = init_shared(|| config.backend_config())?;
            Ok((client, table))
        }
        None => Ok((shared()?, DEFAULT_BOOKINGS_TABLE.to_string())),
    }
}

async fn run(command: &Command, client: &BackendClient, table: &str) -> anyhow::Result<()> {
    let store = RestBookingStore::with_table(client, table);

    match command {
        Command::Check => {
            let endpoints = serde_json::json!({
                "url": client.base_url().as_str(),
                "rest": client.service_url(Service::Rest)?.as_str(),
                "auth": client.service_url(Service::Auth)?.as_str(),
                "storage": client.service_url(Service::Storage)?.as_str(),
                "realtime": client.service_url(Service::Realtime)?.as_str(),
                "schema": client.config().schema,
                "timeout_seconds": client.config().timeout_seconds,
                "bookings_table": table,
            });
            print_json(&endpoints)?;
        }
        Command::List {
            user_id,
            status,
            limit,
        } => {
            let query = BookingQuery {
                user_id: user_id.clone(),
                status: *status,
                limit: *limit,
            };
            print_json(&store.list(&query).await?)?;
        }
        Command::Get { id } => match store.get(id).await? {
            Some(booking) => print_json(&booking)?,
            None => {
                return Err(BackendError::NotFound {
                    resource: "booking".to_string(),
                    id: id.clone(),
                }
                .into())
            }
        },
        Command::Create { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let booking: Booking =
                serde_json::from_str(&content).map_err(BackendError::Serialization)?;
            print_json(&store.create(&booking).await?)?;
        }
        Command::SetStatus { id, status } => {
            print_json(&store.update_status(id, *status).await?)?;
        }
        Command::SetPayment { id, status, intent } => {
            print_json(&store.update_payment(id, *status, intent.as_deref()).await?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 設定錯誤 3，後端狀態錯誤 2，其餘 1
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BackendError>() {
        Some(e) if e.is_configuration_error() => 3,
        Some(BackendError::Status { .. }) => 2,
        _ => 1,
    }
}

fn fail(err: &anyhow::Error) -> ! {
    match err.downcast_ref::<BackendError>() {
        Some(e) => {
            tracing::debug!(severity = ?e.severity(), "Command failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
        None => eprintln!("❌ {:#}", err),
    }

    std::process::exit(exit_code(err))
}
