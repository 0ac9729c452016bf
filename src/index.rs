//! The staging table: repository-relative, slash-separated path → blob digest.
//!
//! Persisted as pretty-printed JSON (`index.json`). Loaded at the start of a mutating operation
//! and written back once at the end.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::util;
use crate::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: BTreeMap<String, Digest>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the index at `path`. A missing or empty file is an empty index.
    pub fn load<F: Filesystem>(fs: &F, path: &Utf8Path) -> Result<Self> {
        if !fs.exists(path) {
            trace!(%path, "No index file, starting empty");
            return Ok(Self::new());
        }
        let bytes = fs.read(path).map_err(Error::fs("read", path))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        // `null` is what an older tool leaves behind for an empty index.
        let entries: Option<BTreeMap<String, Digest>> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Index {
                path: path.to_owned(),
                source,
            })?;
        let index = Self {
            entries: entries.unwrap_or_default(),
        };
        trace!(%path, entries = index.len(), "Loaded index");
        Ok(index)
    }

    /// Write the index to `path`, replacing it in one rename.
    pub fn save<F: Filesystem>(&self, fs: &F, path: &Utf8Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|source| Error::Index {
            path: path.to_owned(),
            source,
        })?;
        let dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
        let temp_path = dir.join(util::tmp_file_name());
        fs.write(&temp_path, &json)
            .map_err(Error::fs("write", temp_path.as_path()))?;
        fs.rename(&temp_path, path)
            .map_err(Error::fs("rename", temp_path.as_path()))?;
        debug!(%path, entries = self.len(), "Wrote index");
        Ok(())
    }

    /// Stage `path` at `oid`.
    ///
    /// Any entry that could no longer coexist with `path` is dropped: a file at one of its
    /// parent directories, or files below it if it used to be a directory.
    pub fn add(&mut self, path: impl Into<String>, oid: Digest) {
        let path = path.into();

        for parent in util::parents(&path) {
            if self.entries.remove(parent).is_some() {
                trace!(%parent, replaced_by = %path, "Evicting file replaced by directory");
            }
        }

        let prefix = format!("{path}/");
        let children: Vec<String> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for child in children {
            trace!(%child, replaced_by = %path, "Evicting directory replaced by file");
            self.entries.remove(&child);
        }

        self.entries.insert(path, oid);
    }

    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Digest)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another index fragment into this one, as-is.
    pub fn extend(&mut self, other: Index) {
        self.entries.extend(other.entries);
    }

    pub fn paths(&self) -> impl Iterator<Item = Utf8PathBuf> + '_ {
        self.entries.keys().map(Utf8PathBuf::from)
    }
}

impl FromIterator<(String, Digest)> for Index {
    fn from_iter<T: IntoIterator<Item = (String, Digest)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempdir::TempDir;

    use super::*;
    use crate::fs::DiskFs;

    #[test]
    fn test_save_load() -> Result<()> {
        let dir = TempDir::new("").unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("index.json");

        assert!(Index::load(&DiskFs, &path)?.is_empty());

        let mut index = Index::new();
        index.add("a.txt", Digest::new(b"a"));
        index.add("dir/x", Digest::new(b"x"));
        index.save(&DiskFs, &path)?;

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(&format!("\"dir/x\": \"{}\"", Digest::new(b"x").to_hex())));
        assert!(text.contains('\n'), "index should be pretty-printed");

        assert_eq!(Index::load(&DiskFs, &path)?, index);
        Ok(())
    }

    #[test]
    fn test_load_legacy_forms() -> Result<()> {
        let dir = TempDir::new("").unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("index.json");

        for text in ["", "{}", "null", "  \n"] {
            std::fs::write(&path, text).unwrap();
            assert!(Index::load(&DiskFs, &path)?.is_empty(), "{text:?}");
        }

        std::fs::write(&path, "{\"a\": \"zz\"}").unwrap();
        assert!(matches!(
            Index::load(&DiskFs, &path),
            Err(Error::Index { .. })
        ));
        Ok(())
    }

    #[test]
    /// Create files "file1" and "file2". Add these to the index. Then add "file1/file3".
    ///
    /// The file "file1" should no longer be present in the index, as it cannot exist due to the
    /// existance of "file1/file3"
    fn test_dir_replaces_file() {
        let mut index = Index::new();
        index.add("file1", Digest::new(b"1"));
        index.add("file2", Digest::new(b"2"));
        index.add("file1/file3", Digest::new(b"3"));

        let paths: Vec<&str> = index.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["file1/file3", "file2"]);
    }

    #[test]
    /// Add a file to the index with the same name as a previously existing directory.
    ///
    /// The directory, and all members of that directory, should be removed from the index.
    fn test_file_replaces_dir() {
        let mut index = Index::new();
        index.add("file1/file2/file3", Digest::new(b"3"));
        index.add("file1/file2/file4", Digest::new(b"4"));
        index.add("file1.txt", Digest::new(b"t"));
        index.add("file5", Digest::new(b"5"));
        index.add("file1", Digest::new(b"1"));

        let paths: Vec<&str> = index.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["file1", "file1.txt", "file5"]);
    }
}
