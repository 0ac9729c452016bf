//! Directory snapshots.
//!
//! A tree is serialised as a flat run of `"<mode> <name>\0<20 raw digest bytes>"` entries with
//! nothing between them, sorted by name so that equal directories always hash equally.

mod build;
mod parse;
mod write;

pub use build::{build_tree, tree_to_index, Node};

use std::fmt::Write;

use crate::digest::Digest;
use crate::filemode::FileMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    oid: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<String>, oid: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    pub fn file(name: impl Into<String>, oid: Digest) -> Self {
        Self::new(FileMode::REGULAR, name, oid)
    }

    pub fn directory(name: impl Into<String>, oid: Digest) -> Self {
        Self::new(FileMode::DIRECTORY, name, oid)
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> &Digest {
        &self.oid
    }

    pub fn is_directory(&self) -> bool {
        self.mode.is_directory()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries in any order.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `<mode> <kind> <oid>\t<name>` line per entry.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let kind = if entry.is_directory() { "tree" } else { "blob" };
            let _ = writeln!(out, "{} {} {:x}\t{}", entry.mode, kind, entry.oid, entry.name);
        }
        out
    }
}

impl IntoIterator for Tree {
    type Item = TreeEntry;
    type IntoIter = std::vec::IntoIter<TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
