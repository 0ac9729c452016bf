use crate::commit::{Ancestors, Commit};
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::Result;

impl<F: Filesystem> super::Repo<F> {
    /// The current branch's history, newest first, following first parents.
    pub fn log(&self) -> Result<Vec<(Digest, Commit)>> {
        let head = self.refs.head_commit()?;
        Ancestors::new(&self.database, head).collect()
    }
}
