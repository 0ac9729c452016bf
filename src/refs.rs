//! `HEAD` and the branch files under `refs/heads`.

use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::digest::Digest;
use crate::fs::{DiskFs, Filesystem};
use crate::{Error, Result};

pub const DEFAULT_BRANCH: &str = "master";

const HEAD_PREFIX: &str = "ref: refs/heads/";

/// Contains all characters that cannot appear in a ref name.
///
/// In git, the character `'*'` is allowed in ref names if the environment variable
/// `REFNAME_REFSPEC_PATTERN` is set. This is unsupported, so `'*'` is always disallowed.
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L48-L57>
const DISALLOWED_CHARACTERS: [char; 41] = [
    '\0', '\x01', '\x02', '\x03', '\x04', '\x05', '\x06', '\x07', '\x08', '\t', '\n', '\x0b',
    '\x0c', '\r', '\x0e', '\x0f', '\x10', '\x11', '\x12', '\x13', '\x14', '\x15', '\x16', '\x17',
    '\x18', '\x19', '\x1a', '\x1b', '\x1c', '\x1d', '\x1e', '\x1f', ' ', '*', ':', '?', '[', '\\',
    '^', '~', '\x7f',
];

/// Check whether a string is a valid branch name.
///
/// Disallowed names are any where:
/// - it (or any path component) begins with `'.'`
/// - it contains double dots `".."`
/// - it contains ASCII control characters
/// - it contains `':'`, `'?'`, `'['`, `'\\'`, `'^'`, `'~'`, `' '`, `'\t'` or `'*'`
/// - it contains `'/'`, as branches are single files directly under `refs/heads`
/// - it ends with `".lock"`
/// - it contains `"@{"`
/// - it is empty
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L59-L77>
pub fn is_valid_ref_name(name: &str) -> bool {
    !(name.is_empty()
        || name.chars().any(|c| DISALLOWED_CHARACTERS.contains(&c))
        || name.starts_with('.')
        || name.contains('/')
        || name.contains("..")
        || name.ends_with(".lock")
        || name.contains("@{"))
}

/// Where `HEAD` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Branch(String),
}

impl Head {
    pub fn branch(&self) -> &str {
        match self {
            Head::Branch(name) => name,
        }
    }
}

pub struct Refs<F: Filesystem = DiskFs> {
    head_path: Utf8PathBuf,
    heads_path: Utf8PathBuf,
    fs: F,
}

impl<F: Filesystem> Refs<F> {
    pub fn new(control_dir: &Utf8Path, fs: F) -> Self {
        Self {
            head_path: control_dir.join("HEAD"),
            heads_path: control_dir.join("refs").join("heads"),
            fs,
        }
    }

    pub fn read_head(&self) -> Result<Head> {
        if !self.fs.exists(&self.head_path) {
            return Err(Error::RefNotFound("HEAD".into()));
        }
        let contents = self
            .fs
            .read(&self.head_path)
            .map_err(Error::fs("read", self.head_path.as_path()))?;
        let contents = String::from_utf8_lossy(&contents);
        let contents = contents.trim();

        if contents.is_empty() {
            return Ok(Head::Branch(DEFAULT_BRANCH.to_owned()));
        }
        match contents.strip_prefix(HEAD_PREFIX) {
            Some(name) if is_valid_ref_name(name) => Ok(Head::Branch(name.to_owned())),
            _ => Err(Error::InvalidRef {
                name: "HEAD".into(),
                contents: contents.to_owned(),
            }),
        }
    }

    /// Point `HEAD` at `branch`.
    pub fn set_head(&self, branch: &str) -> Result<()> {
        debug!(%branch, "Updating HEAD");
        self.fs
            .write(&self.head_path, format!("{HEAD_PREFIX}{branch}\n").as_bytes())
            .map_err(Error::fs("write", self.head_path.as_path()))
    }

    /// The commit at the tip of the current branch, or `None` if it has no commits yet.
    pub fn head_commit(&self) -> Result<Option<Digest>> {
        let head = self.read_head()?;
        match self.read_branch(head.branch()) {
            Err(Error::BranchNotFound(_)) => Ok(None),
            other => other,
        }
    }

    fn branch_path(&self, name: &str) -> Result<Utf8PathBuf> {
        if !is_valid_ref_name(name) {
            return Err(Error::InvalidRefName(name.to_owned()));
        }
        Ok(self.heads_path.join(name))
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name)
            .map(|path| self.fs.exists(&path))
            .unwrap_or(false)
    }

    /// The commit a branch points to. An empty branch file is a branch with no commits.
    pub fn read_branch(&self, name: &str) -> Result<Option<Digest>> {
        let path = self.branch_path(name)?;
        if !self.fs.exists(&path) {
            return Err(Error::BranchNotFound(name.to_owned()));
        }
        let contents = self.fs.read(&path).map_err(Error::fs("read", path.as_path()))?;
        let contents = String::from_utf8_lossy(&contents);
        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(None);
        }
        Digest::from_str(contents)
            .map(Some)
            .map_err(|_| Error::InvalidRef {
                name: name.to_owned(),
                contents: contents.to_owned(),
            })
    }

    /// Move (or create) a branch to point at `oid`.
    pub fn update_branch(&self, name: &str, oid: &Digest) -> Result<()> {
        let path = self.branch_path(name)?;
        debug!(branch = %name, %oid, "Updating branch");
        self.write_ref_file(&path, Some(oid))
    }

    /// Create a new branch at `oid`, or empty if there is nothing to point it at yet.
    pub fn create_branch(&self, name: &str, oid: Option<&Digest>) -> Result<()> {
        let path = self.branch_path(name)?;
        if self.fs.exists(&path) {
            return Err(Error::BranchExists(name.to_owned()));
        }
        debug!(branch = %name, oid = ?oid, "Creating branch");
        self.write_ref_file(&path, oid)
    }

    pub fn list_branches(&self) -> Result<Vec<String>> {
        self.fs
            .list_dir(&self.heads_path)
            .map_err(Error::fs("list", self.heads_path.as_path()))
    }

    fn write_ref_file(&self, path: &Utf8Path, oid: Option<&Digest>) -> Result<()> {
        if let Some(dir) = path.parent() {
            self.fs
                .create_dir_all(dir)
                .map_err(Error::fs("create directory", dir))?;
        }
        let contents = oid.map(|oid| format!("{oid:x}\n")).unwrap_or_default();
        self.fs
            .write(path, contents.as_bytes())
            .map_err(Error::fs("write", path))
    }
}
