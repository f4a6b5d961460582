//! Domain entities - the core business objects.

mod post;
mod subject;
mod user;
mod vote;

pub use post::{
    INTRODUCTION_MAX_LEN, NewPost, Post, PostChanges, PostId, PostPayload, TITLE_MAX_LEN,
};
pub use subject::{SUBJECT_NAME_MAX_LEN, Subject, SubjectId};
pub use user::{NewUser, User, UserId};
pub use vote::{VoteDirection, VoteState};
