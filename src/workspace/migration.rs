//! Bringing the working tree from one snapshot to another.
//!
//! The change is planned in full before anything on disk is touched. Applying a plan removes
//! every deleted path before writing anything, so a path that switches between file and
//! directory is always gone by the time its replacement is written.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::tree::{Tree, TreeEntry};
use crate::Result;

use super::Workspace;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Migration {
    deletions: Vec<Utf8PathBuf>,
    writes: Vec<(Utf8PathBuf, TreeEntry)>,
}

impl Migration {
    /// Diff the tree `old` (or nothing) against `new`.
    pub fn plan<F: Filesystem>(
        database: &Database<F>,
        new: &Digest,
        old: Option<&Digest>,
    ) -> Result<Self> {
        let new_tree = database.load_tree(new)?;
        let old_tree = match old {
            Some(oid) => database.load_tree(oid)?,
            None => Tree::default(),
        };

        let mut migration = Self::default();
        migration.diff(database, Utf8Path::new(""), &old_tree, &new_tree)?;
        debug!(
            deletions = migration.deletions.len(),
            writes = migration.writes.len(),
            "Planned migration"
        );
        Ok(migration)
    }

    fn diff<F: Filesystem>(
        &mut self,
        database: &Database<F>,
        prefix: &Utf8Path,
        old: &Tree,
        new: &Tree,
    ) -> Result<()> {
        for before in old.entries() {
            if new.get(before.name()).is_none() {
                self.deletions.push(prefix.join(before.name()));
            }
        }

        for after in new.entries() {
            let path = prefix.join(after.name());
            let before = match old.get(after.name()) {
                Some(before) => before,
                None => {
                    self.writes.push((path, after.clone()));
                    continue;
                }
            };

            if before.oid() == after.oid() && before.mode() == after.mode() {
                continue;
            }
            match (before.is_directory(), after.is_directory()) {
                (true, true) => {
                    let old = database.load_tree(before.oid())?;
                    let new = database.load_tree(after.oid())?;
                    self.diff(database, &path, &old, &new)?;
                }
                (false, false) => self.writes.push((path, after.clone())),
                _ => {
                    self.deletions.push(path.clone());
                    self.writes.push((path, after.clone()));
                }
            }
        }
        Ok(())
    }

    /// Perform the planned changes. Stops at the first failure, leaving the working tree
    /// partially updated.
    pub fn apply<F: Filesystem>(
        &self,
        workspace: &Workspace<F>,
        database: &Database<F>,
    ) -> Result<()> {
        for path in &self.deletions {
            workspace.remove(path)?;
        }
        for (path, entry) in &self.writes {
            materialise(workspace, database, path, entry)?;
        }
        Ok(())
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Utf8Path> {
        self.deletions.iter().map(Utf8PathBuf::as_path)
    }

    pub fn written(&self) -> impl Iterator<Item = &Utf8Path> {
        self.writes.iter().map(|(path, _)| path.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.writes.is_empty()
    }
}

/// Write a file from its blob, or create a directory and fill it from its tree.
fn materialise<F: Filesystem>(
    workspace: &Workspace<F>,
    database: &Database<F>,
    path: &Utf8Path,
    entry: &TreeEntry,
) -> Result<()> {
    if entry.is_directory() {
        workspace.make_directory(path)?;
        for child in database.load_tree(entry.oid())?.entries() {
            materialise(workspace, database, &path.join(child.name()), child)?;
        }
    } else {
        let data = database.load_blob(entry.oid())?;
        workspace.write_file(path, &data)?;
    }
    Ok(())
}

/// Make the working tree, currently matching `old`, match `new`.
pub fn diff_and_apply<F: Filesystem>(
    workspace: &Workspace<F>,
    database: &Database<F>,
    new: &Digest,
    old: Option<&Digest>,
) -> Result<Migration> {
    let migration = Migration::plan(database, new, old)?;
    if migration.is_empty() {
        debug!(%new, "Working tree already up to date");
        return Ok(migration);
    }
    migration.apply(workspace, database)?;
    info!(
        %new,
        deleted = migration.deletions.len(),
        written = migration.writes.len(),
        "Updated working tree"
    );
    Ok(migration)
}
