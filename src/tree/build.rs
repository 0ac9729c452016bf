//! Conversion between the flat index and nested trees.

use std::collections::BTreeMap;

use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::index::Index;
use crate::{Error, Result};

use super::{Tree, TreeEntry};

/// An in-memory directory hierarchy, built from the index before anything is written.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    File(Digest),
    Directory(BTreeMap<String, Node>),
}

impl Node {
    pub fn from_index(index: &Index) -> Result<Self> {
        let mut root = BTreeMap::new();
        for (path, oid) in index.iter() {
            trace!(%path, "Inserting entry into tree");
            insert(&mut root, path, path, *oid)?;
        }
        Ok(Node::Directory(root))
    }

    /// Store this node and everything below it, children before parents, returning this node's
    /// digest. A file's digest is already in the database and is returned as-is.
    pub fn store<F: Filesystem>(&self, database: &Database<F>) -> Result<Digest> {
        match self {
            Node::File(oid) => Ok(*oid),
            Node::Directory(children) => {
                let mut entries = Vec::with_capacity(children.len());
                for (name, child) in children {
                    let oid = child.store(database)?;
                    entries.push(match child {
                        Node::File(_) => TreeEntry::file(name.as_str(), oid),
                        Node::Directory(_) => TreeEntry::directory(name.as_str(), oid),
                    });
                }
                let oid = Tree::new(entries).store(database)?;
                trace!(%oid, entries = children.len(), "Stored tree");
                Ok(oid)
            }
        }
    }
}

fn insert(
    dir: &mut BTreeMap<String, Node>,
    full_path: &str,
    rest: &str,
    oid: Digest,
) -> Result<()> {
    let conflict =
        || Error::MalformedTree(format!("index path {full_path:?} cannot be placed in a tree"));

    match rest.split_once('/') {
        None => {
            if rest.is_empty() || dir.contains_key(rest) {
                return Err(conflict());
            }
            dir.insert(rest.to_owned(), Node::File(oid));
        }
        Some((name, rest)) => {
            if name.is_empty() {
                return Err(conflict());
            }
            let child = dir
                .entry(name.to_owned())
                .or_insert_with(|| Node::Directory(BTreeMap::new()));
            match child {
                Node::Directory(child) => insert(child, full_path, rest, oid)?,
                Node::File(_) => return Err(conflict()),
            }
        }
    }
    Ok(())
}

/// Build and store the tree hierarchy for `index`, returning the root tree's digest.
pub fn build_tree<F: Filesystem>(index: &Index, database: &Database<F>) -> Result<Digest> {
    let root = Node::from_index(index)?;
    let oid = root.store(database)?;
    debug!(root = %oid, files = index.len(), "Built tree from index");
    Ok(oid)
}

/// Flatten the tree at `oid` into index entries, with every path prefixed by `prefix`.
pub fn tree_to_index<F: Filesystem>(
    database: &Database<F>,
    oid: &Digest,
    prefix: &str,
) -> Result<Index> {
    let mut index = Index::new();
    for entry in database.load_tree(oid)? {
        let path = if prefix.is_empty() {
            entry.name().to_owned()
        } else {
            format!("{prefix}/{}", entry.name())
        };

        if entry.is_directory() {
            index.extend(tree_to_index(database, entry.oid(), &path)?);
        } else {
            index.add(path, *entry.oid());
        }
    }
    Ok(index)
}
