//! SeaORM entities mirroring the migrated schema.

pub mod post;
pub mod post_subject;
pub mod subject;
pub mod user;
pub mod vote;
