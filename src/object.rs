use std::fmt::Display;
use std::str::FromStr;

use crate::digest::Digest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            _ => Err(format!("unknown object kind: {s:?}")),
        }
    }
}

/// Returns the object uncompressed but formatted `"{kind} {len}\0{data}"`, along with its
/// digest.
///
/// e.g. a blob `"hello\n"` becomes `"blob 6\0hello\n"`
pub fn format(kind: ObjectKind, data: &[u8]) -> (Digest, Vec<u8>) {
    let mut formatted = Vec::with_capacity(data.len() + 16);
    formatted.extend_from_slice(kind.as_str().as_bytes());
    formatted.push(b' ');
    formatted.extend_from_slice(data.len().to_string().as_bytes());
    formatted.push(b'\0');
    formatted.extend_from_slice(data);
    let oid = Digest::new(&formatted);
    (oid, formatted)
}
