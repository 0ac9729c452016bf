use tracing::*;

use crate::fs::Filesystem;
use crate::Result;

impl<F: Filesystem> super::Repo<F> {
    /// Create a branch at the current commit and switch to it.
    ///
    /// The working tree and index are left alone: the new branch points where HEAD already did.
    pub fn branch(&self, name: &str) -> Result<()> {
        let tip = self.refs.head_commit()?;
        self.refs.create_branch(name, tip.as_ref())?;
        self.refs.set_head(name)?;
        info!(branch = %name, "Created and switched to branch");
        Ok(())
    }

    /// Every branch, paired with whether it is the one HEAD points to.
    pub fn list_branches(&self) -> Result<Vec<(String, bool)>> {
        let head = self.refs.read_head()?;
        Ok(self
            .refs
            .list_branches()?
            .into_iter()
            .map(|name| {
                let current = name == head.branch();
                (name, current)
            })
            .collect())
    }
}
