use async_trait::async_trait;

use crate::domain::{
    NewPost, NewUser, Post, PostChanges, PostId, Subject, SubjectId, User, UserId, VoteDirection,
    VoteState,
};
use crate::error::RepoError;

/// Subject registry - maps subject names to stable ids.
#[async_trait]
pub trait SubjectRegistry: Send + Sync {
    /// Resolve a subject by exact name, creating it if absent.
    ///
    /// Concurrent callers asking for the same new name get the same id.
    async fn ensure_subject(&self, name: &str) -> Result<SubjectId, RepoError>;

    /// Look up a subject by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, RepoError>;
}

/// Post store.
///
/// Every read joins the subject name, the author's display name and the
/// aggregated vote counts. Lists are ordered newest first.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a post together with its subject link. Returns the new id.
    async fn create(&self, post: NewPost) -> Result<PostId, RepoError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts whose subject name contains `keyword`, ignoring case.
    async fn list_by_keyword(&self, keyword: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts whose subject name contains `subject`.
    async fn list_by_subject(&self, subject: &str) -> Result<Vec<Post>, RepoError>;

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError>;

    /// Apply a partial update, repointing the subject link when a subject is given.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<(), RepoError>;

    /// Remove a post along with its votes and subject link.
    async fn delete(&self, id: PostId) -> Result<(), RepoError>;
}

/// Vote ledger - at most one vote per (post, voter).
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Record or change a vote. Casting the current direction again is a no-op.
    async fn cast_vote(
        &self,
        post_id: PostId,
        voter_id: UserId,
        direction: VoteDirection,
    ) -> Result<VoteState, RepoError>;

    /// Withdraw a vote. Returns whether there was one.
    async fn retract_vote(&self, post_id: PostId, voter_id: UserId) -> Result<bool, RepoError>;

    async fn get_vote(&self, post_id: PostId, voter_id: UserId) -> Result<VoteState, RepoError>;
}

/// User directory.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}
