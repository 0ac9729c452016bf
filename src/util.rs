use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use rand::prelude::*;

use crate::repo::CONTROL_DIR;

pub fn tmp_file_name() -> String {
    const ALPHANUM_CHARS: [char; 52] = [
        'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
        'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j',
        'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ];

    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .filter_map(|_| ALPHANUM_CHARS.choose(&mut rng))
        .collect();

    format!("tmp_obj_{suffix}")
}

/// The proper ancestors of a slash-separated path, shortest first.
///
/// `"a/b/c"` yields `"a"`, `"a/b"`.
pub fn parents(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(i, _)| &path[..i])
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let last_is_normal = matches!(
                    out.components().next_back(),
                    Some(Utf8Component::Normal(_))
                );
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    // `..` at the root is the root.
                    out.push("..");
                }
            }
            c => out.push(c.as_str()),
        }
    }
    out
}

/// Render a relative path with forward slashes, whatever the host separator.
pub fn to_slash(path: &Utf8Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Utf8Component::CurDir))
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk upwards from `start` looking for a directory containing the control directory.
pub fn find_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONTROL_DIR).is_dir())
        .map(Utf8Path::to_owned)
}
