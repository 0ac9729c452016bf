use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::Result;

use super::Commit;

/// Walks first parents backwards from a starting commit, loading each commit as it goes.
pub struct Ancestors<'a, F: Filesystem> {
    database: &'a Database<F>,
    next: Option<Digest>,
}

impl<'a, F: Filesystem> Ancestors<'a, F> {
    pub fn new(database: &'a Database<F>, start: Option<Digest>) -> Self {
        Self {
            database,
            next: start,
        }
    }
}

impl<F: Filesystem> Iterator for Ancestors<'_, F> {
    type Item = Result<(Digest, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;
        match self.database.load_commit(&oid) {
            Ok(commit) => {
                self.next = commit.parent().copied();
                Some(Ok((oid, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Whether `candidate` is `start` or one of its ancestors.
///
/// Only `candidate`'s presence in the chain matters, so the walk stops as soon as it is seen and
/// never loads it. An empty `start` has no ancestors.
pub fn is_ancestor<F: Filesystem>(
    database: &Database<F>,
    candidate: &Digest,
    start: Option<&Digest>,
) -> Result<bool> {
    let mut next = start.copied();
    while let Some(oid) = next {
        if oid == *candidate {
            trace!(%candidate, "Found ancestor");
            return Ok(true);
        }
        next = database.load_commit(&oid)?.parent().copied();
    }
    trace!(%candidate, start = ?start, "Reached root without finding ancestor");
    Ok(false)
}
