use std::path::PathBuf;

use camino::Utf8PathBuf;

use crate::digest::Digest;

/// Everything the core can fail with.
///
/// Nothing in the library aborts the process; callers decide what to do with these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found in database: {0:x}")]
    ObjectNotFound(Digest),

    #[error("corrupt object {oid:x}: {reason}")]
    CorruptObject { oid: Digest, reason: String },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("malformed commit {oid:x}: {reason}")]
    MalformedCommit { oid: Digest, reason: String },

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("ref {name} holds something other than a commit digest: {contents:?}")]
    InvalidRef { name: String, contents: String },

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error(
        "cannot fast-forward {current:x} to {incoming:x}: \
         merge requires three-way resolution, which is unsupported"
    )]
    NonFastForward { current: Digest, incoming: Digest },

    #[error("path is outside repository: {0}")]
    PathOutsideRepository(Utf8PathBuf),

    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    #[error("all paths must be valid unicode: found {0:?}")]
    NonUtf8Path(PathBuf),

    #[error("not a minigit repository: {0}")]
    NotARepository(Utf8PathBuf),

    #[error("repository already exists: {0}")]
    AlreadyInitialised(Utf8PathBuf),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("invalid index file {path}")]
    Index {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {op} {path}")]
    Filesystem {
        op: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error from `op` on `path`, for use with `map_err`.
    pub(crate) fn fs(
        op: &'static str,
        path: impl Into<Utf8PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Filesystem { op, path, source }
    }
}
