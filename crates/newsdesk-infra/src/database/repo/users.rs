use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use newsdesk_core::domain::{NewUser, User, UserId};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::UserRepository;

use crate::database::entity::user;
use crate::database::error::repo_err;

/// User directory backed by the `users` table.
#[derive(Clone)]
pub struct DbUserRepository {
    db: Arc<DatabaseConnection>,
}

impl DbUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Mask an email address for logging.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{}***@{}", first, domain),
            _ => format!("***@{}", domain),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            user_name: Set(user.user_name),
            email: Set(user.email),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(repo_err)?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}
