use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use newsdesk_core::PostService;

use super::config::DatabaseConfig;
use super::repo::{DbPostRepository, DbSubjectRegistry, DbUserRepository, DbVoteLedger};

/// Pooled access to the newsdesk database.
///
/// Every repository operation checks out one connection (or opens one
/// transaction) for its own duration. Checkout waits at most
/// `acquire_timeout`; beyond that the operation fails with a connection
/// error instead of blocking.
///
/// # Example
/// ```ignore
/// let pool = ConnectionPool::connect(&DatabaseConfig::from_env()?).await?;
/// pool.migrate().await?;
/// let posts = pool.post_service();
/// let id = posts.create_post(payload, author_id).await?;
/// ```
#[derive(Clone)]
pub struct ConnectionPool {
    conn: Arc<DatabaseConnection>,
}

impl ConnectionPool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .sqlx_logging(config.sql_logging)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
            "Database connected"
        );

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already established connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending schema migrations.
    pub async fn migrate(&self) -> Result<(), DbErr> {
        Migrator::up(self.conn(), None).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    pub fn posts(&self) -> DbPostRepository {
        DbPostRepository::new(Arc::clone(&self.conn))
    }

    pub fn subjects(&self) -> DbSubjectRegistry {
        DbSubjectRegistry::new(Arc::clone(&self.conn))
    }

    pub fn votes(&self) -> DbVoteLedger {
        DbVoteLedger::new(Arc::clone(&self.conn))
    }

    pub fn users(&self) -> DbUserRepository {
        DbUserRepository::new(Arc::clone(&self.conn))
    }

    /// Post service wired to this pool's repositories.
    pub fn post_service(&self) -> PostService {
        PostService::new(Arc::new(self.posts()), Arc::new(self.votes()))
    }
}
