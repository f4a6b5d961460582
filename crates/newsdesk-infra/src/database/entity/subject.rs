//! Subject entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_subject::Entity")]
    PostSubject,
}

impl Related<super::post_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostSubject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for newsdesk_core::domain::Subject {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
