use tracing::*;

use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// HEAD already points at the branch; nothing was touched.
    AlreadyOn(String),
    Switched {
        branch: String,
        commit: Option<Digest>,
    },
}

impl<F: Filesystem> super::Repo<F> {
    /// Switch to an existing branch, updating the working tree and index to its commit.
    pub fn checkout(&self, name: &str) -> Result<Checkout> {
        let head = self.refs.read_head()?;
        if head.branch() == name {
            return Ok(Checkout::AlreadyOn(name.to_owned()));
        }

        let current = self.refs.head_commit()?;
        let target = self.refs.read_branch(name)?;
        // A branch with no commits picks up wherever we are now.
        let adopt = target.is_none() && current.is_some();
        let target = target.or(current);

        self.switch_snapshot(current.as_ref(), target.as_ref())?;
        if let (true, Some(oid)) = (adopt, target) {
            self.refs.update_branch(name, &oid)?;
        }
        self.refs.set_head(name)?;

        info!(branch = %name, commit = ?target, "Switched branch");
        Ok(Checkout::Switched {
            branch: name.to_owned(),
            commit: target,
        })
    }
}
