use tracing::*;

use crate::commit::Commit;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::tree::build_tree;
use crate::{Error, Result};

impl<F: Filesystem> super::Repo<F> {
    /// Snapshot the index as a new commit on the current branch.
    pub fn commit(&self, message: &str) -> Result<Digest> {
        trace!(path = %self.root, %message, "Starting commit");
        let index = self.load_index()?;
        if index.is_empty() {
            return Err(Error::NothingToCommit);
        }

        let root = build_tree(&index, &self.database)?;

        let head = self.refs.read_head()?;
        let parent = self.refs.head_commit()?;
        if self.tree_of(parent.as_ref())? == Some(root) {
            return Err(Error::NothingToCommit);
        }

        let commit = Commit::new(parent, root, message);
        let oid = commit.store(&self.database)?;
        self.refs.update_branch(head.branch(), &oid)?;

        info!(branch = head.branch(), commit = %oid, tree = %root, "Created commit");
        Ok(oid)
    }
}
