//! Repository tests against an in-memory SQLite database migrated with the
//! production `Migrator`, plus `MockDatabase` for error classification.

mod errors;

use newsdesk_core::domain::{NewUser, PostId, PostPayload, UserId};
use newsdesk_core::ports::{PostRepository, UserRepository};

use crate::database::{ConnectionPool, DatabaseConfig};

/// A freshly migrated single-connection in-memory database. Callers are
/// serialized on its one connection; see `concurrency` for parallel access.
pub(super) async fn test_pool() -> ConnectionPool {
    let mut config = DatabaseConfig::new("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;

    let pool = ConnectionPool::connect(&config).await.unwrap();
    pool.migrate().await.unwrap();
    pool
}

pub(super) async fn add_user(pool: &ConnectionPool, name: &str) -> UserId {
    pool.users()
        .create(NewUser::new(name, format!("{}@example.com", name)))
        .await
        .unwrap()
        .id
}

pub(super) async fn add_post(
    pool: &ConnectionPool,
    author_id: UserId,
    title: &str,
    subject: &str,
) -> PostId {
    let payload = PostPayload::new(title, "A short introduction", subject, "Body text");
    pool.posts()
        .create(payload.into_new_post(author_id))
        .await
        .unwrap()
}
