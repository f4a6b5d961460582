//! Post store: post rows, their subject link and the vote aggregates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, TransactionTrait,
};

use newsdesk_core::domain::{NewPost, Post, PostChanges, PostId, UserId};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::PostRepository;

use super::subjects::resolve_subject;
use crate::database::entity::{post, post_subject, subject, user, vote};
use crate::database::error::repo_err;

/// Post store backed by `posts`, `post_subjects` and `votes`.
#[derive(Clone)]
pub struct DbPostRepository {
    db: Arc<DatabaseConnection>,
}

/// One row of the joined post view.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: i32,
    title: String,
    introduction: String,
    image: Option<String>,
    body: String,
    created_at: DateTimeWithTimeZone,
    author_id: i32,
    author_name: String,
    subject: String,
    upvote_count: i64,
    downvote_count: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            introduction: row.introduction,
            body: row.body,
            image: row.image,
            author_id: row.author_id,
            author_name: row.author_name,
            subject: row.subject,
            created_at: row.created_at.into(),
            upvote_count: row.upvote_count,
            downvote_count: row.downvote_count,
        }
    }
}

/// Posts joined with author, subject and vote totals, newest first.
///
/// Votes are outer-joined so a post without votes still shows up, with
/// both totals at zero.
fn post_view() -> Select<post::Entity> {
    post::Entity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::Title,
            post::Column::Introduction,
            post::Column::Image,
            post::Column::Body,
            post::Column::CreatedAt,
            post::Column::AuthorId,
        ])
        .column_as(user::Column::UserName, "author_name")
        .column_as(subject::Column::Name, "subject")
        .expr_as(vote_total(vote::Column::UpVote), "upvote_count")
        .expr_as(vote_total(vote::Column::DownVote), "downvote_count")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::InnerJoin, post::Relation::PostSubject.def())
        .join(JoinType::InnerJoin, post_subject::Relation::Subject.def())
        .join(JoinType::LeftJoin, post::Relation::Vote.def())
        .group_by(post::Column::Id)
        .group_by(user::Column::UserName)
        .group_by(subject::Column::Name)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

fn vote_total(flag: vote::Column) -> SimpleExpr {
    Func::coalesce([Expr::col((vote::Entity, flag)).sum(), Expr::val(0).into()]).into()
}

/// Case-insensitive "subject name contains `fragment`" with LIKE wildcards
/// in the fragment taken literally.
fn subject_contains(fragment: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));

    Expr::expr(Func::lower(Expr::col((subject::Entity, subject::Column::Name))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl DbPostRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn fetch_all(&self, query: Select<post::Entity>) -> Result<Vec<Post>, RepoError> {
        let rows = query
            .into_model::<PostRow>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_subjects(&self, fragment: &str) -> Result<Vec<Post>, RepoError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_all(post_view().filter(subject_contains(fragment)))
            .await
    }
}

fn post_not_found(id: PostId) -> RepoError {
    RepoError::NotFound {
        entity_type: "post",
        id: id.into(),
    }
}

#[async_trait]
impl PostRepository for DbPostRepository {
    async fn create(&self, post: NewPost) -> Result<PostId, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let subject_id = resolve_subject(&txn, &post.subject)
            .await
            .map_err(repo_err)?;

        let row = post::ActiveModel {
            title: Set(post.title),
            introduction: Set(post.introduction),
            image: Set(post.image),
            body: Set(post.body),
            created_at: Set(Utc::now().into()),
            author_id: Set(post.author_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;

        post_subject::ActiveModel {
            post_id: Set(row.id),
            subject_id: Set(subject_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        tracing::debug!(post_id = row.id, subject_id, "Post inserted");
        Ok(row.id)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let row = post_view()
            .filter(post::Column::Id.eq(id))
            .into_model::<PostRow>()
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        self.fetch_all(post_view()).await
    }

    async fn list_by_keyword(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        self.search_subjects(keyword).await
    }

    async fn list_by_subject(&self, subject: &str) -> Result<Vec<Post>, RepoError> {
        self.search_subjects(subject).await
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        self.fetch_all(post_view().filter(post::Column::AuthorId.eq(author_id)))
            .await
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let current = post::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| post_not_found(id))?;

        let mut row = current.into_active_model();
        if let Some(title) = changes.title {
            row.title = Set(title);
        }
        if let Some(introduction) = changes.introduction {
            row.introduction = Set(introduction);
        }
        if let Some(body) = changes.body {
            row.body = Set(body);
        }
        if let Some(image) = changes.image {
            row.image = Set(Some(image));
        }
        if row.is_changed() {
            row.update(&txn).await.map_err(|err| match err {
                // Removed by a concurrent delete after the read above.
                DbErr::RecordNotUpdated => post_not_found(id),
                err => repo_err(err),
            })?;
        }

        if let Some(subject) = changes.subject {
            let subject_id = resolve_subject(&txn, &subject).await.map_err(repo_err)?;

            let repointed = post_subject::Entity::update_many()
                .col_expr(post_subject::Column::SubjectId, Expr::value(subject_id))
                .filter(post_subject::Column::PostId.eq(id))
                .exec(&txn)
                .await
                .map_err(repo_err)?;

            // Only a post that lost its link gets a fresh one.
            if repointed.rows_affected == 0 {
                post_subject::ActiveModel {
                    post_id: Set(id),
                    subject_id: Set(subject_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(repo_err)?;
            }

            tracing::debug!(post_id = id, subject_id, "Post subject repointed");
        }

        txn.commit().await.map_err(repo_err)
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        post::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| post_not_found(id))?;

        // Dependents first, then the post itself.
        let votes = vote::Entity::delete_many()
            .filter(vote::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        post_subject::Entity::delete_many()
            .filter(post_subject::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        post::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        tracing::debug!(
            post_id = id,
            votes_removed = votes.rows_affected,
            "Post removed with its votes and subject link"
        );
        Ok(())
    }
}
