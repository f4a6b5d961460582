//! SeaORM repository implementations.

mod posts;
mod subjects;
mod users;
mod votes;

pub use posts::DbPostRepository;
pub use subjects::DbSubjectRegistry;
pub use users::DbUserRepository;
pub use votes::DbVoteLedger;
