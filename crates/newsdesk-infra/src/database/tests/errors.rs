use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, TransactionTrait, Value};

use newsdesk_core::domain::{NewUser, PostChanges};
use newsdesk_core::error::{DomainError, RepoError};
use newsdesk_core::ports::{PostRepository, UserRepository};

use super::{add_user, test_pool};
use crate::database::entity::post;
use crate::database::{ConnectionPool, DatabaseConfig, DbPostRepository};

#[tokio::test]
async fn find_post_by_id_decodes_view_row() {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let row = BTreeMap::from([
        ("id", Value::from(7i32)),
        ("title", Value::from("Mocked")),
        ("introduction", Value::from("Intro")),
        ("image", Value::String(None)),
        ("body", Value::from("Body")),
        ("created_at", Value::from(now)),
        ("author_id", Value::from(3i32)),
        ("author_name", Value::from("carol")),
        ("subject", Value::from("mocks")),
        ("upvote_count", Value::from(4i64)),
        ("downvote_count", Value::from(1i64)),
    ]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let post = DbPostRepository::new(Arc::new(db)).find_by_id(7).await.unwrap().unwrap();
    assert_eq!(post.id, 7);
    assert_eq!(post.title, "Mocked");
    assert_eq!(post.image, None);
    assert_eq!(post.author_name, "carol");
    assert_eq!((post.upvote_count, post.downvote_count), (4, 1));
}

#[tokio::test]
async fn query_failure_maps_to_storage_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("relation \"posts\" does not exist".to_owned())])
        .into_connection();

    let err = DbPostRepository::new(Arc::new(db)).list().await.unwrap_err();
    assert!(matches!(err, RepoError::Query(_)));
    assert!(matches!(DomainError::from(err), DomainError::Storage));
}

#[tokio::test]
async fn update_of_concurrently_deleted_post_is_not_found() {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let stored = post::Model {
        id: 5,
        title: "Before".to_owned(),
        introduction: "Intro".to_owned(),
        image: None,
        body: "Body".to_owned(),
        created_at: now,
        author_id: 1,
    };

    // The read sees the row; the UPDATE ... RETURNING finds it gone.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored], vec![]])
        .into_connection();

    let changes = PostChanges {
        title: Some("After".to_string()),
        ..Default::default()
    };
    let err = DbPostRepository::new(Arc::new(db))
        .update(5, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity_type: "post", id: 5 }));
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_violation() {
    let pool = test_pool().await;
    add_user(&pool, "alice").await;

    let err = pool
        .users()
        .create(NewUser::new("alice2", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
    assert!(matches!(DomainError::from(err), DomainError::Conflict(_)));

    let found = pool
        .users()
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.user_name, "alice");

    let by_id = pool.users().find_by_id(found.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "alice@example.com");
}

#[tokio::test]
async fn exhausted_pool_reports_storage_unavailable() {
    let mut config = DatabaseConfig::new("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;
    config.acquire_timeout = Duration::from_millis(200);

    let pool = ConnectionPool::connect(&config).await.unwrap();
    pool.migrate().await.unwrap();

    // Hold the only connection.
    let txn = pool.conn().begin().await.unwrap();

    let err = pool.posts().list().await.unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));
    assert!(matches!(DomainError::from(err), DomainError::StorageUnavailable));

    txn.rollback().await.unwrap();
    assert!(pool.posts().list().await.unwrap().is_empty());
}
