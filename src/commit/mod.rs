mod ancestry;
mod parse;
mod write;

pub use ancestry::{is_ancestor, Ancestors};

use crate::digest::Digest;
use crate::timestamp::Timestamp;

/// A history node: a root tree, at most one parent, a message and the time it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree_id: Digest,
    parent: Option<Digest>,
    message: String,
    timestamp: Timestamp,
}

impl Commit {
    pub fn new(parent: Option<Digest>, tree_id: Digest, message: impl Into<String>) -> Self {
        Self::with_timestamp(parent, tree_id, message, Timestamp::now())
    }

    pub fn with_timestamp(
        parent: Option<Digest>,
        tree_id: Digest,
        message: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            tree_id,
            parent,
            message: message.into(),
            timestamp,
        }
    }

    pub fn tree_id(&self) -> &Digest {
        &self.tree_id
    }

    pub fn parent(&self) -> Option<&Digest> {
        self.parent.as_ref()
    }

    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn pretty(&self) -> String {
        String::from_utf8_lossy(&self.format()).into_owned()
    }
}
