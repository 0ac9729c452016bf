use std::fmt::Display;

/// The mode token of a tree entry.
///
/// Only [`FileMode::REGULAR`] and [`FileMode::DIRECTORY`] are ever written; executable bits and
/// symlinks are not tracked. Other modes found in a tree are carried through untouched and
/// treated as regular files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const REGULAR: FileMode = FileMode(0o100644);

    pub fn is_directory(self) -> bool {
        self == Self::DIRECTORY
    }

    /// Parse the ascii octal form used in trees, e.g. `b"040000"`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || !bytes.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return None;
        }
        let s = std::str::from_utf8(bytes).ok()?;
        u32::from_str_radix(s, 8).ok().map(FileMode)
    }
}

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

// Always six digits: directories are `040000`, not `40000`.
impl Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}
