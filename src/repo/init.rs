use camino::Utf8PathBuf;
use tracing::*;

use crate::fs::{DiskFs, Filesystem};
use crate::index::Index;
use crate::refs::DEFAULT_BRANCH;
use crate::{Error, Result};

use super::Repo;

impl Repo {
    /// Create an empty repository at `root`.
    pub fn init(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        Self::init_with(root, DiskFs)
    }
}

impl<F: Filesystem> Repo<F> {
    pub fn init_with(root: impl Into<Utf8PathBuf>, fs: F) -> Result<Self> {
        let repo = Self::at(root.into(), fs);
        trace!(path = %repo.root, "Initialising repo");
        if repo.fs.exists(&repo.control_dir) {
            return Err(Error::AlreadyInitialised(repo.root));
        }

        for d in ["objects", "refs/heads"] {
            let dir = repo.control_dir.join(d);
            trace!(path = %dir, "Creating directory");
            repo.fs
                .create_dir_all(&dir)
                .map_err(Error::fs("create directory", dir.as_path()))?;
        }
        repo.refs.create_branch(DEFAULT_BRANCH, None)?;
        repo.save_index(&Index::new())?;
        repo.refs.set_head(DEFAULT_BRANCH)?;

        info!(path = %repo.control_dir, "Initialised empty repository");
        Ok(repo)
    }
}
