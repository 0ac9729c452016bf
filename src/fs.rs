//! The filesystem capability the core performs all of its I/O through.
//!
//! [`DiskFs`] is the real thing. Tests substitute their own implementation to observe or
//! inject failures.

use std::io::{self, ErrorKind};

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

pub trait Filesystem: Clone {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;

    /// Create or truncate `path` and write `data` to it.
    fn write(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()>;

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()>;

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()>;

    /// Remove a file or a whole directory tree. Removing a path that does not exist succeeds.
    fn remove_all(&self, path: &Utf8Path) -> io::Result<()>;

    fn exists(&self, path: &Utf8Path) -> bool;

    fn is_dir(&self, path: &Utf8Path) -> bool;

    /// Names of the entries directly inside `path`.
    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<String>>;

    /// Every regular file below `path`, relative to `path`. Directories named in `skip` are not
    /// descended into.
    fn walk_files(&self, path: &Utf8Path, skip: &[&str]) -> io::Result<Vec<Utf8PathBuf>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DiskFs;

impl Filesystem for DiskFs {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()> {
        std::fs::write(path, data)
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_all(&self, path: &Utf8Path) -> io::Result<()> {
        let result = match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
            Ok(_) => std::fs::remove_file(path),
            Err(e) => Err(e),
        };
        match result {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in path.read_dir_utf8()? {
            names.push(entry?.file_name().to_owned());
        }
        names.sort();
        Ok(names)
    }

    fn walk_files(&self, path: &Utf8Path, skip: &[&str]) -> io::Result<Vec<Utf8PathBuf>> {
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name().to_str().map_or(false, |n| skip.contains(&n)))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(path)
                .map_err(|e| io::Error::new(ErrorKind::Other, e))?;
            let relative = Utf8Path::from_path(relative).ok_or_else(|| {
                io::Error::new(
                    ErrorKind::InvalidData,
                    format!("non-unicode path: {}", relative.display()),
                )
            })?;
            files.push(relative.to_owned());
        }
        Ok(files)
    }
}
