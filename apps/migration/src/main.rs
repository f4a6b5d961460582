//! Migration CLI.
//!
//! ```text
//! newsdesk-migrate [up | down [N] | status | fresh]
//! ```
//!
//! Connection settings come from the same environment variables as the
//! application pool (`DATABASE_URL`, `DB_*`), optionally loaded from `.env`.

mod telemetry;

use std::process::ExitCode;

use migration::{DbErr, Migrator, MigratorTrait};
use newsdesk_infra::{ConfigError, ConnectionPool, DatabaseConfig};

use telemetry::{TelemetryConfig, init_telemetry};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Usage: newsdesk-migrate [up | down [N] | status | fresh]")]
    Usage,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Up,
    Down(u32),
    Status,
    Fresh,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        match args {
            [] => Ok(Self::Up),
            [cmd] if cmd == "up" => Ok(Self::Up),
            [cmd] if cmd == "down" => Ok(Self::Down(1)),
            [cmd, steps] if cmd == "down" => {
                steps.parse().map(Self::Down).map_err(|_| CliError::Usage)
            }
            [cmd] if cmd == "status" => Ok(Self::Status),
            [cmd] if cmd == "fresh" => Ok(Self::Fresh),
            _ => Err(CliError::Usage),
        }
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    let config = DatabaseConfig::from_env()?;
    let pool = ConnectionPool::connect(&config).await?;
    let conn = pool.conn();

    match command {
        Command::Up => pool.migrate().await?,
        Command::Down(steps) => {
            Migrator::down(conn, Some(steps)).await?;
            tracing::info!(steps, "Rolled back migrations");
        }
        Command::Status => Migrator::status(conn).await?,
        Command::Fresh => {
            Migrator::fresh(conn).await?;
            tracing::info!("Schema dropped and re-created");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_telemetry(&TelemetryConfig::from_env());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match Command::parse(&args) {
        Ok(command) => run(command).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Migration failed");
            ExitCode::FAILURE
        }
    }
}
