use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    NewPost, Post, PostChanges, PostId, PostPayload, UserId, VoteDirection, VoteState,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, VoteLedger};
use crate::service::PostService;

/// In-memory stand-in for the post store and vote ledger.
#[derive(Default)]
struct InMemoryStore {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: PostId,
    posts: BTreeMap<PostId, NewPost>,
    votes: HashMap<(PostId, UserId), VoteDirection>,
}

impl State {
    fn view(&self, id: PostId) -> Option<Post> {
        let post = self.posts.get(&id)?;
        let count = |wanted: VoteDirection| {
            self.votes
                .iter()
                .filter(|((post_id, _), direction)| *post_id == id && **direction == wanted)
                .count() as i64
        };
        Some(Post {
            id,
            title: post.title.clone(),
            introduction: post.introduction.clone(),
            body: post.body.clone(),
            image: post.image.clone(),
            author_id: post.author_id,
            author_name: format!("user-{}", post.author_id),
            subject: post.subject.clone(),
            created_at: Utc::now(),
            upvote_count: count(VoteDirection::Up),
            downvote_count: count(VoteDirection::Down),
        })
    }

    fn matching(&self, predicate: impl Fn(&NewPost) -> bool) -> Vec<Post> {
        self.posts
            .iter()
            .rev()
            .filter(|(_, post)| predicate(post))
            .filter_map(|(id, _)| self.view(*id))
            .collect()
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<PostId, RepoError> {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.posts.insert(id, post);
        Ok(id)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.inner.lock().unwrap().view(id))
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.inner.lock().unwrap().matching(|_| true))
    }

    async fn list_by_keyword(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        let keyword = keyword.to_lowercase();
        Ok(self
            .inner
            .lock()
            .unwrap()
            .matching(|post| post.subject.to_lowercase().contains(&keyword)))
    }

    async fn list_by_subject(&self, subject: &str) -> Result<Vec<Post>, RepoError> {
        self.list_by_keyword(subject).await
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .matching(|post| post.author_id == author_id))
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<(), RepoError> {
        let mut state = self.inner.lock().unwrap();
        let post = state.posts.get_mut(&id).ok_or(RepoError::NotFound {
            entity_type: "post",
            id: id.into(),
        })?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(introduction) = changes.introduction {
            post.introduction = introduction;
        }
        if let Some(body) = changes.body {
            post.body = body;
        }
        if let Some(image) = changes.image {
            post.image = Some(image);
        }
        if let Some(subject) = changes.subject {
            post.subject = subject;
        }
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut state = self.inner.lock().unwrap();
        state.votes.retain(|(post_id, _), _| *post_id != id);
        state.posts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl VoteLedger for InMemoryStore {
    async fn cast_vote(
        &self,
        post_id: PostId,
        voter_id: UserId,
        direction: VoteDirection,
    ) -> Result<VoteState, RepoError> {
        self.inner
            .lock()
            .unwrap()
            .votes
            .insert((post_id, voter_id), direction);
        Ok(direction.into())
    }

    async fn retract_vote(&self, post_id: PostId, voter_id: UserId) -> Result<bool, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .remove(&(post_id, voter_id))
            .is_some())
    }

    async fn get_vote(&self, post_id: PostId, voter_id: UserId) -> Result<VoteState, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .get(&(post_id, voter_id))
            .map_or(VoteState::NoVote, |direction| (*direction).into()))
    }
}

fn service() -> (PostService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    (PostService::new(store.clone(), store.clone()), store)
}

fn cats_post() -> PostPayload {
    PostPayload::new("T", "I", "cats", "B")
}

#[tokio::test]
async fn created_post_reads_back_with_zero_votes() {
    let (service, _) = service();

    let id = service.create_post(cats_post(), 1).await.unwrap();
    let post = service.get_post(id).await.unwrap();

    assert_eq!(post.title, "T");
    assert_eq!(post.introduction, "I");
    assert_eq!(post.subject, "cats");
    assert_eq!(post.body, "B");
    assert_eq!((post.upvote_count, post.downvote_count), (0, 0));
}

#[tokio::test]
async fn invalid_payload_never_reaches_the_store() {
    let (service, store) = service();

    let mut payload = cats_post();
    payload.title = "x".repeat(151);

    let err = service.create_post(payload, 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(store.inner.lock().unwrap().posts.is_empty());
}

#[tokio::test]
async fn missing_post_is_not_found() {
    let (service, _) = service();

    let err = service.get_post(42).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity_type: "post",
            id: 42
        }
    ));
}

#[tokio::test]
async fn non_author_cannot_update() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();

    let changes = PostChanges {
        title: Some("hijacked".into()),
        ..Default::default()
    };
    let err = service.update_post(id, changes, 2).await.unwrap_err();

    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(service.get_post(id).await.unwrap().title, "T");
}

#[tokio::test]
async fn non_author_cannot_delete() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();

    let err = service.delete_post(id, 2).await.unwrap_err();

    assert!(matches!(err, DomainError::Forbidden(_)));
    assert!(service.get_post(id).await.is_ok());
}

#[tokio::test]
async fn author_updates_only_given_fields() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();

    let changes = PostChanges {
        body: Some("B2".into()),
        ..Default::default()
    };
    service.update_post(id, changes, 1).await.unwrap();

    let post = service.get_post(id).await.unwrap();
    assert_eq!(post.body, "B2");
    assert_eq!(post.title, "T");
    assert_eq!(post.subject, "cats");
}

#[tokio::test]
async fn invalid_changes_are_rejected_before_ownership() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();

    let changes = PostChanges {
        subject: Some("s".repeat(26)),
        ..Default::default()
    };
    let err = service.update_post(id, changes, 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn author_deletes_post() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();
    service.vote(id, 2, VoteDirection::Up).await.unwrap();

    service.delete_post(id, 1).await.unwrap();

    assert!(matches!(
        service.get_post(id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn voting_on_missing_post_is_not_found() {
    let (service, store) = service();

    let err = service.vote(9, 2, VoteDirection::Up).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
    assert!(store.inner.lock().unwrap().votes.is_empty());
}

#[tokio::test]
async fn vote_scenario_up_then_down() {
    let (service, _) = service();
    let id = service.create_post(cats_post(), 1).await.unwrap();

    let state = service.vote(id, 2, VoteDirection::Up).await.unwrap();
    assert_eq!(state, VoteState::UpVoted);
    let post = service.get_post(id).await.unwrap();
    assert_eq!((post.upvote_count, post.downvote_count), (1, 0));

    service.vote(id, 2, VoteDirection::Down).await.unwrap();
    let post = service.get_post(id).await.unwrap();
    assert_eq!((post.upvote_count, post.downvote_count), (0, 1));
    assert_eq!(
        service.get_vote_state(id, 2).await.unwrap(),
        VoteState::DownVoted
    );

    service.retract_vote(id, 2).await.unwrap();
    assert_eq!(service.get_vote_state(id, 2).await.unwrap(), VoteState::NoVote);
}

#[tokio::test]
async fn blank_search_is_an_empty_result() {
    let (service, _) = service();
    service.create_post(cats_post(), 1).await.unwrap();

    assert!(service.search_posts("").await.unwrap().is_empty());
    assert!(service.search_posts("   ").await.unwrap().is_empty());
    assert!(service.search_posts("dogs").await.unwrap().is_empty());
    assert_eq!(service.search_posts("CAT").await.unwrap().len(), 1);
}

#[tokio::test]
async fn lists_by_author() {
    let (service, _) = service();
    service.create_post(cats_post(), 1).await.unwrap();
    service.create_post(cats_post(), 2).await.unwrap();
    service.create_post(cats_post(), 1).await.unwrap();

    let mine = service.list_posts_by_author(1).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|post| post.author_id == 1));
    assert_eq!(service.list_posts().await.unwrap().len(), 3);
}
