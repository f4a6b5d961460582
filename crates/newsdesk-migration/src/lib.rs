//! # Newsdesk Migrations
//!
//! Versioned schema for users, posts, subjects, post/subject links and votes.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_news_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_news_tables::Migration)]
    }
}
