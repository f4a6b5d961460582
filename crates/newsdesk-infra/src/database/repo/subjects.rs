use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};

use newsdesk_core::domain::{Subject, SubjectId};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::SubjectRegistry;

use crate::database::entity::subject;
use crate::database::error::repo_err;

/// Subject registry backed by the `subjects` table.
#[derive(Clone)]
pub struct DbSubjectRegistry {
    db: Arc<DatabaseConnection>,
}

impl DbSubjectRegistry {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Resolve `name` to its subject id on `conn`, creating the subject if needed.
///
/// The insert is conditional on the unique name index, so callers racing on
/// the same new name all end up reading the one row that won.
pub(crate) async fn resolve_subject<C>(conn: &C, name: &str) -> Result<SubjectId, DbErr>
where
    C: ConnectionTrait,
{
    let row = subject::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    };

    let inserted = subject::Entity::insert(row)
        .on_conflict(
            OnConflict::column(subject::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    if inserted > 0 {
        tracing::debug!(subject = %name, "Subject created");
    }

    subject::Entity::find()
        .filter(subject::Column::Name.eq(name))
        .one(conn)
        .await?
        .map(|model| model.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("subject '{}'", name)))
}

#[async_trait]
impl SubjectRegistry for DbSubjectRegistry {
    async fn ensure_subject(&self, name: &str) -> Result<SubjectId, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let id = resolve_subject(&txn, name).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, RepoError> {
        let result = subject::Entity::find()
            .filter(subject::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}
