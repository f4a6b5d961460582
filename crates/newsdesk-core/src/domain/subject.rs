use serde::{Deserialize, Serialize};

pub type SubjectId = i32;

/// Longest subject name accepted, in characters.
pub const SUBJECT_NAME_MAX_LEN: usize = 25;

/// Subject - a short named category attached to a post.
///
/// Names are unique and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}
