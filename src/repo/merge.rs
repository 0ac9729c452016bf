use tracing::*;

use crate::commit::is_ancestor;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    AlreadyUpToDate,
    FastForward { from: Option<Digest>, to: Digest },
}

impl<F: Filesystem> super::Repo<F> {
    /// Fast-forward the current branch to the tip of `name`.
    ///
    /// Anything other than a fast-forward, including an incoming branch that is behind the
    /// current one, is refused with [`Error::NonFastForward`].
    pub fn merge(&self, name: &str) -> Result<Merge> {
        let head = self.refs.read_head()?;
        if head.branch() == name {
            debug!(branch = %name, "Merging a branch into itself");
            return Ok(Merge::AlreadyUpToDate);
        }

        let incoming = match self.refs.read_branch(name)? {
            Some(oid) => oid,
            None => return Ok(Merge::AlreadyUpToDate),
        };
        let current = self.refs.head_commit()?;

        if let Some(current) = current {
            if current == incoming {
                return Ok(Merge::AlreadyUpToDate);
            }
            if !is_ancestor(&self.database, &current, Some(&incoming))? {
                return Err(Error::NonFastForward { current, incoming });
            }
        }

        self.switch_snapshot(current.as_ref(), Some(&incoming))?;
        self.refs.update_branch(head.branch(), &incoming)?;

        info!(branch = head.branch(), from = ?current, to = %incoming, "Fast-forwarded");
        Ok(Merge::FastForward {
            from: current,
            to: incoming,
        })
    }
}
