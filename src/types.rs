use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{PrviewError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    #[default]
    Merge,
    Squash,
    Rebase,
}

impl MergeMethod {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            MergeMethod::Merge => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl FromStr for PrState {
    type Err = PrviewError;

    /// Case-insensitive. Anything outside the three known states is rejected
    /// rather than mapped to a fallback.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(PrState::Open),
            "merged" => Ok(PrState::Merged),
            "closed" => Ok(PrState::Closed),
            _ => Err(PrviewError::UnknownState(s.to_string())),
        }
    }
}

/// GitHub reaction content, ordered the way github.com lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Laugh,
    Hooray,
    Confused,
    Heart,
    Rocket,
    Eyes,
    #[serde(other)]
    Other,
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let emoji = match self {
            ReactionKind::ThumbsUp => "👍",
            ReactionKind::ThumbsDown => "👎",
            ReactionKind::Laugh => "😄",
            ReactionKind::Hooray => "🎉",
            ReactionKind::Confused => "😕",
            ReactionKind::Heart => "❤",
            ReactionKind::Rocket => "🚀",
            ReactionKind::Eyes => "👀",
            ReactionKind::Other => "?",
        };
        write!(f, "{}", emoji)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitRef {
    pub id: String,
    /// Content hash, used when navigating to the commit.
    pub oid: String,
    pub message: String,
    pub author: String,
}

impl CommitRef {
    pub fn short_oid(&self) -> &str {
        &self.oid[..7.min(self.oid.len())]
    }
}

/// Snapshot of a pull request as returned by the forge. Never edited after
/// construction; a refresh produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    /// Raw upstream state string. Parsed on use so that bad data surfaces
    /// where it is rendered instead of being silently defaulted at decode.
    pub state: String,
    pub author: String,
    pub reactions: BTreeMap<ReactionKind, u64>,
    pub comments: Vec<Comment>,
    pub commits: Vec<CommitRef>,
}
