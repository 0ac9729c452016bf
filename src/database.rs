//! The content-addressed object store.
//!
//! Objects live at `objects/<first two hex chars>/<remaining 38>`, zlib-compressed with their
//! `"<kind> <len>\0"` header. Objects are only ever created; nothing here mutates or deletes
//! one.

use std::io::{Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::*;

use crate::commit::Commit;
use crate::digest::Digest;
use crate::fs::{DiskFs, Filesystem};
use crate::object::{self, ObjectKind};
use crate::tree::Tree;
use crate::util;
use crate::{Error, Result};

pub struct Database<F: Filesystem = DiskFs> {
    database_root: Utf8PathBuf,
    fs: F,
}

impl<F: Filesystem> Database<F> {
    pub fn new(control_dir: impl AsRef<Utf8Path>, fs: F) -> Self {
        Self {
            database_root: control_dir.as_ref().join("objects"),
            fs,
        }
    }

    /// Store `data` as an object of type `kind`, returning its digest.
    ///
    /// Storing an object that is already present is a no-op.
    pub fn store(&self, kind: ObjectKind, data: &[u8]) -> Result<Digest> {
        let (oid, formatted) = object::format(kind, data);
        let object_path = self.object_path(&oid);

        if self.fs.exists(&object_path) {
            trace!(%oid, %kind, "Object already in database");
            return Ok(oid);
        }
        trace!(%oid, %kind, len = data.len(), "Writing object to database");

        let dirname = object_path
            .parent()
            .ok_or_else(|| Error::PathNotFound(object_path.clone()))?;
        if !self.fs.is_dir(dirname) {
            self.fs
                .create_dir_all(dirname)
                .map_err(Error::fs("create directory", dirname))?;
        }

        let compressed = {
            let mut e =
                ZlibEncoder::new(Vec::with_capacity(formatted.len()), Compression::default());
            e.write_all(&formatted)
                .map_err(Error::fs("compress", object_path.as_path()))?;
            e.finish()
                .map_err(Error::fs("compress", object_path.as_path()))?
        };

        // Write beside the final path and rename into place, so a reader never sees half an
        // object.
        let temp_path = dirname.join(util::tmp_file_name());
        self.fs
            .write(&temp_path, &compressed)
            .map_err(Error::fs("write", temp_path.as_path()))?;
        self.fs
            .rename(&temp_path, &object_path)
            .map_err(Error::fs("rename", temp_path.as_path()))?;

        Ok(oid)
    }

    pub fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        self.database_root.join(prefix).join(suffix)
    }

    pub fn exists(&self, oid: &Digest) -> bool {
        self.fs.exists(&self.object_path(oid))
    }

    /// Read an object, returning its kind and its payload with the header stripped.
    pub fn read_object(&self, oid: &Digest) -> Result<(ObjectKind, Vec<u8>)> {
        trace!(object = %oid, "Reading object from database");

        let object_path = self.object_path(oid);
        if !self.fs.exists(&object_path) {
            return Err(Error::ObjectNotFound(*oid));
        }

        let compressed = self
            .fs
            .read(&object_path)
            .map_err(Error::fs("read", object_path.as_path()))?;

        let corrupt = |reason: String| Error::CorruptObject { oid: *oid, reason };

        let mut bytes = Vec::new();
        ZlibDecoder::new(&*compressed)
            .read_to_end(&mut bytes)
            .map_err(|e| corrupt(format!("decompression failed: {e}")))?;

        let nul_idx = memchr::memchr(b'\0', &bytes)
            .ok_or_else(|| corrupt("missing header terminator".into()))?;
        let header = std::str::from_utf8(&bytes[..nul_idx])
            .map_err(|_| corrupt("header is not utf-8".into()))?;
        let (kind, len) = header
            .split_once(' ')
            .ok_or_else(|| corrupt(format!("invalid header: {header:?}")))?;
        let kind: ObjectKind = kind.parse().map_err(corrupt)?;
        let len: usize = len
            .parse()
            .map_err(|_| corrupt(format!("invalid length in header: {len:?}")))?;

        bytes.drain(..=nul_idx);
        if bytes.len() != len {
            return Err(corrupt(format!(
                "header length {len} does not match payload length {}",
                bytes.len()
            )));
        }

        Ok((kind, bytes))
    }

    /// Read an object's payload, whatever its kind.
    pub fn read(&self, oid: &Digest) -> Result<Vec<u8>> {
        self.read_object(oid).map(|(_, data)| data)
    }

    pub fn load(&self, oid: &Digest) -> Result<LoadedItem> {
        let (kind, data) = self.read_object(oid)?;
        match kind {
            ObjectKind::Blob => Ok(LoadedItem::Blob(data)),
            ObjectKind::Tree => Ok(LoadedItem::Tree(Tree::parse(&data)?)),
            ObjectKind::Commit => Ok(LoadedItem::Commit(Commit::parse(oid, &data)?)),
        }
    }

    fn read_expecting(&self, oid: &Digest, expected: ObjectKind) -> Result<Vec<u8>> {
        let (kind, data) = self.read_object(oid)?;
        if kind != expected {
            return Err(Error::CorruptObject {
                oid: *oid,
                reason: format!("expected a {expected}, found a {kind}"),
            });
        }
        Ok(data)
    }

    pub fn load_blob(&self, oid: &Digest) -> Result<Vec<u8>> {
        self.read_expecting(oid, ObjectKind::Blob)
    }

    pub fn load_tree(&self, oid: &Digest) -> Result<Tree> {
        Tree::parse(&self.read_expecting(oid, ObjectKind::Tree)?)
    }

    pub fn load_commit(&self, oid: &Digest) -> Result<Commit> {
        Commit::parse(oid, &self.read_expecting(oid, ObjectKind::Commit)?)
    }
}

pub enum LoadedItem {
    Commit(Commit),
    Tree(Tree),
    Blob(Vec<u8>),
}

impl LoadedItem {
    pub fn kind(&self) -> ObjectKind {
        match self {
            LoadedItem::Commit(_) => ObjectKind::Commit,
            LoadedItem::Tree(_) => ObjectKind::Tree,
            LoadedItem::Blob(_) => ObjectKind::Blob,
        }
    }

    pub fn into_commit(self) -> Option<Commit> {
        if let Self::Commit(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn into_tree(self) -> Option<Tree> {
        if let Self::Tree(v) = self {
            Some(v)
        } else {
            None
        }
    }
}
