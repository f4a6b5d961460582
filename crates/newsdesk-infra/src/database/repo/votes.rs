use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use newsdesk_core::domain::{PostId, UserId, VoteDirection, VoteState};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::VoteLedger;

use crate::database::entity::vote;
use crate::database::error::repo_err;

/// Vote ledger backed by the `votes` table.
///
/// Every write is one statement keyed on the unique `(post_id, user_id)`
/// index, so concurrent voters never produce a second row for the same pair.
#[derive(Clone)]
pub struct DbVoteLedger {
    db: Arc<DatabaseConnection>,
}

impl DbVoteLedger {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VoteLedger for DbVoteLedger {
    async fn cast_vote(
        &self,
        post_id: PostId,
        voter_id: UserId,
        direction: VoteDirection,
    ) -> Result<VoteState, RepoError> {
        let (up_vote, down_vote) = direction.flags();
        let row = vote::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(voter_id),
            up_vote: Set(up_vote),
            down_vote: Set(down_vote),
            ..Default::default()
        };

        vote::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([vote::Column::PostId, vote::Column::UserId])
                    .update_columns([vote::Column::UpVote, vote::Column::DownVote])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        tracing::debug!(post_id, voter_id, %direction, "Vote recorded");
        Ok(direction.into())
    }

    async fn retract_vote(&self, post_id: PostId, voter_id: UserId) -> Result<bool, RepoError> {
        let result = vote::Entity::delete_many()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::UserId.eq(voter_id))
            .exec(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn get_vote(&self, post_id: PostId, voter_id: UserId) -> Result<VoteState, RepoError> {
        let row = vote::Entity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::UserId.eq(voter_id))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(row.map_or(VoteState::NoVote, Into::into))
    }
}
