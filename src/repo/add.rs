use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::fs::Filesystem;
use crate::object::ObjectKind;
use crate::Result;

impl<F: Filesystem> super::Repo<F> {
    /// Add paths to the index, returning the repository-relative paths that were staged.
    ///
    /// Relative paths are taken from the repository root. Directories are added recursively.
    /// If `paths` is empty, do nothing.
    pub fn add(&self, paths: &[Utf8PathBuf]) -> Result<Vec<String>> {
        let mut index = self.load_index()?;
        let mut added = Vec::new();

        for path in paths {
            trace!(%path, "Adding path to repo");
            let relative = self.workspace.relative(path)?;
            for file in self.workspace.list_files(&relative)? {
                let data = self.workspace.read_file(Utf8Path::new(&file))?;
                let oid = self.database.store(ObjectKind::Blob, &data)?;
                trace!(path = %file, %oid, "Staged file");
                index.add(file.as_str(), oid);
                added.push(file);
            }
        }

        self.save_index(&index)?;
        debug!(count = added.len(), "Updated index");
        Ok(added)
    }

    pub fn add_all(&self) -> Result<Vec<String>> {
        self.add(&[".".into()])
    }
}
