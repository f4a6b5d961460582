use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity handed over by the identity provider, already authenticated.
pub type UserId = i32;

/// User entity - the author or voter behind an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to register a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: email.into(),
        }
    }
}
