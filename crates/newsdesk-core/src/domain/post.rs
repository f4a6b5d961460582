use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::subject::SUBJECT_NAME_MAX_LEN;
use super::user::UserId;
use crate::error::DomainError;

pub type PostId = i32;

/// Longest title accepted, in characters.
pub const TITLE_MAX_LEN: usize = 150;
/// Longest introduction accepted, in characters.
pub const INTRODUCTION_MAX_LEN: usize = 300;

/// Post entity - a news article as read back from the store.
///
/// The vote counts are aggregated from the vote ledger at read time and are
/// zero for a post nobody voted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub introduction: String,
    pub body: String,
    /// Opaque reference issued by the image store.
    pub image: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

/// A validated post ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub introduction: String,
    pub body: String,
    pub image: Option<String>,
    pub author_id: UserId,
    pub subject: String,
}

/// Incoming post content, as submitted by an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub introduction: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostPayload {
    pub fn new(
        title: impl Into<String>,
        introduction: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            introduction: introduction.into(),
            subject: subject.into(),
            body: body.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check every field against the length rules.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text("title", &self.title, Some(TITLE_MAX_LEN))?;
        check_text(
            "introduction",
            &self.introduction,
            Some(INTRODUCTION_MAX_LEN),
        )?;
        check_text("subject", &self.subject, Some(SUBJECT_NAME_MAX_LEN))?;
        check_text("body", &self.body, None)
    }

    pub fn into_new_post(self, author_id: UserId) -> NewPost {
        NewPost {
            title: self.title,
            introduction: self.introduction,
            body: self.body,
            image: self.image,
            author_id,
            subject: self.subject,
        }
    }
}

/// Partial update of a post. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.introduction.is_none()
            && self.body.is_none()
            && self.image.is_none()
            && self.subject.is_none()
    }

    /// Check the provided fields against the same rules as a new post.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            check_text("title", title, Some(TITLE_MAX_LEN))?;
        }
        if let Some(introduction) = &self.introduction {
            check_text("introduction", introduction, Some(INTRODUCTION_MAX_LEN))?;
        }
        if let Some(subject) = &self.subject {
            check_text("subject", subject, Some(SUBJECT_NAME_MAX_LEN))?;
        }
        if let Some(body) = &self.body {
            check_text("body", body, None)?;
        }
        Ok(())
    }
}

fn check_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(DomainError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}
