//! Post service - the façade request handlers talk to.

use std::sync::Arc;

use crate::domain::{Post, PostChanges, PostId, PostPayload, UserId, VoteDirection, VoteState};
use crate::error::{DomainError, DomainResult};
use crate::ports::{PostRepository, VoteLedger};

/// Validates business rules and delegates persistence to the post store and
/// vote ledger.
///
/// Callers pass identities that the identity provider already verified.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    votes: Arc<dyn VoteLedger>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, votes: Arc<dyn VoteLedger>) -> Self {
        Self { posts, votes }
    }

    pub async fn list_posts(&self) -> DomainResult<Vec<Post>> {
        Ok(self.posts.list().await?)
    }

    pub async fn get_post(&self, id: PostId) -> DomainResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Search posts by subject keyword. A blank keyword matches nothing.
    pub async fn search_posts(&self, keyword: &str) -> DomainResult<Vec<Post>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.posts.list_by_keyword(keyword).await?)
    }

    pub async fn list_posts_by_subject(&self, subject: &str) -> DomainResult<Vec<Post>> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.posts.list_by_subject(subject).await?)
    }

    pub async fn list_posts_by_author(&self, author_id: UserId) -> DomainResult<Vec<Post>> {
        Ok(self.posts.list_by_author(author_id).await?)
    }

    /// Create a post. Any authenticated user may do so.
    pub async fn create_post(&self, payload: PostPayload, author_id: UserId) -> DomainResult<PostId> {
        payload.validate()?;

        let subject = payload.subject.clone();
        let id = self.posts.create(payload.into_new_post(author_id)).await?;

        tracing::info!(post_id = id, author_id, subject = %subject, "Post created");
        Ok(id)
    }

    /// Apply a partial update on behalf of the post's author.
    pub async fn update_post(
        &self,
        id: PostId,
        changes: PostChanges,
        requester_id: UserId,
    ) -> DomainResult<()> {
        changes.validate()?;
        self.owned_post(id, requester_id).await?;

        if changes.is_empty() {
            return Ok(());
        }

        self.posts.update(id, changes).await?;
        tracing::info!(post_id = id, "Post updated");
        Ok(())
    }

    /// Delete a post on behalf of its author.
    pub async fn delete_post(&self, id: PostId, requester_id: UserId) -> DomainResult<()> {
        self.owned_post(id, requester_id).await?;

        self.posts.delete(id).await?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    pub async fn vote(
        &self,
        post_id: PostId,
        voter_id: UserId,
        direction: VoteDirection,
    ) -> DomainResult<VoteState> {
        self.get_post(post_id).await?;

        let state = self.votes.cast_vote(post_id, voter_id, direction).await?;
        tracing::debug!(post_id, voter_id, %direction, "Vote cast");
        Ok(state)
    }

    pub async fn retract_vote(&self, post_id: PostId, voter_id: UserId) -> DomainResult<()> {
        self.get_post(post_id).await?;

        if self.votes.retract_vote(post_id, voter_id).await? {
            tracing::debug!(post_id, voter_id, "Vote retracted");
        }
        Ok(())
    }

    pub async fn get_vote_state(&self, post_id: PostId, voter_id: UserId) -> DomainResult<VoteState> {
        self.get_post(post_id).await?;
        Ok(self.votes.get_vote(post_id, voter_id).await?)
    }

    async fn owned_post(&self, id: PostId, requester_id: UserId) -> DomainResult<Post> {
        let post = self.get_post(id).await?;

        if post.author_id != requester_id {
            tracing::warn!(
                post_id = id,
                requester_id,
                author_id = post.author_id,
                "Rejected change to a post by someone other than its author"
            );
            return Err(DomainError::Forbidden(format!(
                "post {} belongs to another user",
                id
            )));
        }

        Ok(post)
    }
}
