mod add;
mod branch;
mod checkout;
mod commit;
mod init;
mod log;
mod merge;

pub use checkout::Checkout;
pub use merge::Merge;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::fs::{DiskFs, Filesystem};
use crate::index::Index;
use crate::refs::Refs;
use crate::tree::tree_to_index;
use crate::workspace::{self, Workspace};
use crate::{Error, Result};

/// Name of the directory at the repository root holding objects, refs and the index.
pub const CONTROL_DIR: &str = ".minigit";

pub struct Repo<F: Filesystem = DiskFs> {
    root: Utf8PathBuf,
    control_dir: Utf8PathBuf,
    index_path: Utf8PathBuf,
    pub database: Database<F>,
    pub refs: Refs<F>,
    pub workspace: Workspace<F>,
    fs: F,
}

impl Repo {
    /// Open the repository rooted at `root`.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        Self::open_with(root, DiskFs)
    }
}

impl<F: Filesystem> Repo<F> {
    pub fn open_with(root: impl Into<Utf8PathBuf>, fs: F) -> Result<Self> {
        let root = root.into();
        let repo = Self::at(root, fs);
        if !repo.fs.is_dir(&repo.control_dir) {
            return Err(Error::NotARepository(repo.root));
        }
        trace!(path = %repo.root, "Opened repo");
        Ok(repo)
    }

    fn at(root: Utf8PathBuf, fs: F) -> Self {
        let control_dir = root.join(CONTROL_DIR);
        Self {
            index_path: control_dir.join("index.json"),
            database: Database::new(&control_dir, fs.clone()),
            refs: Refs::new(&control_dir, fs.clone()),
            workspace: Workspace::new(&root, fs.clone()),
            root,
            control_dir,
            fs,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn load_index(&self) -> Result<Index> {
        Index::load(&self.fs, &self.index_path)
    }

    pub fn save_index(&self, index: &Index) -> Result<()> {
        index.save(&self.fs, &self.index_path)
    }

    /// The root tree of `commit`, if there is one.
    fn tree_of(&self, commit: Option<&Digest>) -> Result<Option<Digest>> {
        commit
            .map(|oid| self.database.load_commit(oid).map(|c| *c.tree_id()))
            .transpose()
    }

    /// Move the working tree and index from commit `from` to commit `to`.
    ///
    /// The index is only written once the working tree has been brought up to date, so a failure
    /// part way leaves it describing `from`.
    fn switch_snapshot(&self, from: Option<&Digest>, to: Option<&Digest>) -> Result<()> {
        let old_tree = self.tree_of(from)?;
        let new_tree = self.tree_of(to)?;

        let index = match new_tree {
            Some(ref new_tree) => {
                workspace::diff_and_apply(
                    &self.workspace,
                    &self.database,
                    new_tree,
                    old_tree.as_ref(),
                )?;
                tree_to_index(&self.database, new_tree, "")?
            }
            // Nothing to move to. Only happens between two unborn branches.
            None => Index::new(),
        };
        self.save_index(&index)
    }

    /// Read an object for display.
    pub fn cat_file(&self, oid: &Digest) -> Result<crate::database::LoadedItem> {
        self.database.load(oid)
    }
}
