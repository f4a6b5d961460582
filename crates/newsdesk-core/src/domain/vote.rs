use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Direction of a cast vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Ledger flags `(up_vote, down_vote)` stored for this direction.
    pub fn flags(self) -> (i16, i16) {
        match self {
            VoteDirection::Up => (1, 0),
            VoteDirection::Down => (0, 1),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => f.write_str("up"),
            VoteDirection::Down => f.write_str("down"),
        }
    }
}

impl FromStr for VoteDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(DomainError::Validation(format!(
                "Unknown vote direction '{}', expected 'up' or 'down'",
                other
            ))),
        }
    }
}

/// A voter's current position on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    NoVote,
    UpVoted,
    DownVoted,
}

impl VoteState {
    /// Decode a ledger row's flags. A row with neither flag set counts as no vote.
    pub fn from_flags(up_vote: i16, down_vote: i16) -> Self {
        if up_vote > 0 {
            VoteState::UpVoted
        } else if down_vote > 0 {
            VoteState::DownVoted
        } else {
            VoteState::NoVote
        }
    }
}

impl From<VoteDirection> for VoteState {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => VoteState::UpVoted,
            VoteDirection::Down => VoteState::DownVoted,
        }
    }
}
