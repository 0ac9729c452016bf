mod migration;

pub use migration::{diff_and_apply, Migration};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::fs::{DiskFs, Filesystem};
use crate::repo::CONTROL_DIR;
use crate::util;
use crate::{Error, Result};

/// The working directory: everything under the repository root except the control directory.
pub struct Workspace<F: Filesystem = DiskFs> {
    root_path: Utf8PathBuf,
    fs: F,
}

impl<F: Filesystem> Workspace<F> {
    const IGNORE: [&'static str; 2] = [CONTROL_DIR, ".git"];

    pub fn new(root_path: impl Into<Utf8PathBuf>, fs: F) -> Self {
        Self {
            root_path: root_path.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root_path
    }

    /// Resolve `path` against the root and check it stays inside the repository.
    ///
    /// Returns the path relative to the root; the root itself is the empty path.
    pub fn relative(&self, path: &Utf8Path) -> Result<Utf8PathBuf> {
        let absolute = util::normalize(&self.root_path.join(path));
        let relative = absolute
            .strip_prefix(&self.root_path)
            .map_err(|_| Error::PathOutsideRepository(path.to_owned()))?;
        if relative
            .components()
            .next()
            .map_or(false, |c| Self::IGNORE.contains(&c.as_str()))
        {
            return Err(Error::PathOutsideRepository(path.to_owned()));
        }
        Ok(relative.to_owned())
    }

    /// Every file at or below `path` (relative to the root), as slash-separated relative paths.
    pub fn list_files(&self, path: &Utf8Path) -> Result<Vec<String>> {
        let absolute = self.root_path.join(path);
        if !self.fs.exists(&absolute) {
            return Err(Error::PathNotFound(path.to_owned()));
        }
        if !self.fs.is_dir(&absolute) {
            return Ok(vec![util::to_slash(path)]);
        }

        let files = self
            .fs
            .walk_files(&absolute, &Self::IGNORE)
            .map_err(Error::fs("walk", absolute.as_path()))?;
        trace!(%path, count = files.len(), "Listed files");
        Ok(files
            .into_iter()
            .map(|file| util::to_slash(&path.join(file)))
            .collect())
    }

    pub fn read_file(&self, path: &Utf8Path) -> Result<Vec<u8>> {
        let absolute = self.root_path.join(path);
        self.fs
            .read(&absolute)
            .map_err(Error::fs("read", absolute.as_path()))
    }

    /// Write `data` to `path`, replacing whatever file is there.
    pub fn write_file(&self, path: &Utf8Path, data: &[u8]) -> Result<()> {
        let absolute = self.root_path.join(path);
        if let Some(parent) = absolute.parent() {
            if !self.fs.is_dir(parent) {
                self.fs
                    .create_dir_all(parent)
                    .map_err(Error::fs("create directory", parent))?;
            }
        }
        trace!(%path, len = data.len(), "Writing file");
        self.fs
            .write(&absolute, data)
            .map_err(Error::fs("write", absolute.as_path()))
    }

    pub fn make_directory(&self, path: &Utf8Path) -> Result<()> {
        let absolute = self.root_path.join(path);
        trace!(%path, "Creating directory");
        self.fs
            .create_dir_all(&absolute)
            .map_err(Error::fs("create directory", absolute.as_path()))
    }

    /// Remove a file, or a directory and everything in it.
    pub fn remove(&self, path: &Utf8Path) -> Result<()> {
        let absolute = self.root_path.join(path);
        trace!(%path, "Removing");
        self.fs
            .remove_all(&absolute)
            .map_err(Error::fs("remove", absolute.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_relative() -> Result<()> {
        let dir = TempDir::new("").unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let workspace = Workspace::new(root, DiskFs);

        assert_eq!(workspace.relative(Utf8Path::new("a/b"))?, Utf8PathBuf::from("a/b"));
        assert_eq!(workspace.relative(&root.join("a/./c"))?, Utf8PathBuf::from("a/c"));
        assert_eq!(workspace.relative(Utf8Path::new("."))?, Utf8PathBuf::from(""));

        for outside in ["../x", "a/../../x", "/elsewhere", ".minigit/HEAD"] {
            assert!(
                matches!(
                    workspace.relative(Utf8Path::new(outside)),
                    Err(Error::PathOutsideRepository(_))
                ),
                "{outside}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_list_files() -> Result<()> {
        let dir = TempDir::new("").unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let workspace = Workspace::new(root, DiskFs);

        workspace.write_file(Utf8Path::new("top"), b"t")?;
        workspace.write_file(Utf8Path::new("d/e/f"), b"f")?;
        workspace.write_file(Utf8Path::new(".minigit/index.json"), b"{}")?;

        assert_eq!(workspace.list_files(Utf8Path::new(""))?, ["d/e/f", "top"]);
        assert_eq!(workspace.list_files(Utf8Path::new("d"))?, ["d/e/f"]);
        assert_eq!(workspace.list_files(Utf8Path::new("top"))?, ["top"]);
        assert!(matches!(
            workspace.list_files(Utf8Path::new("nope")),
            Err(Error::PathNotFound(_))
        ));
        Ok(())
    }
}
