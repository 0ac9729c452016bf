use crate::{digest::Digest, filemode::FileMode, Error, Result};

use super::TreeEntry;

impl super::Tree {
    /// Decode a tree payload.
    ///
    /// The format has no entry count, so the only way to detect truncation is running out of
    /// bytes part way through an entry, which is an error rather than a shorter tree.
    pub fn parse(mut bytes: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();

        while !bytes.is_empty() {
            let (entry, rest) = TreeEntry::parse(bytes, entries.len())?;
            entries.push(entry);
            bytes = rest;
        }

        Ok(Self { entries })
    }
}

impl super::TreeEntry {
    /// Parses one entry of the form `<mode> <name>\0<oid>` off the front of `bytes`, returning
    /// the remainder.
    fn parse(bytes: &[u8], index: usize) -> Result<(Self, &[u8])> {
        let malformed = |what: &str| Error::MalformedTree(format!("entry {index}: {what}"));

        let space_idx =
            memchr::memchr(b' ', bytes).ok_or_else(|| malformed("no space after mode"))?;
        let (mode, rest) = (&bytes[..space_idx], &bytes[space_idx + 1..]);
        let mode = FileMode::parse(mode).ok_or_else(|| {
            malformed(&format!("invalid mode {:?}", String::from_utf8_lossy(mode)))
        })?;

        let nul_idx =
            memchr::memchr(b'\0', rest).ok_or_else(|| malformed("no NUL after name"))?;
        let (name, rest) = (&rest[..nul_idx], &rest[nul_idx + 1..]);
        let name = std::str::from_utf8(name).map_err(|_| malformed("name is not utf-8"))?;
        if name.is_empty() || name.contains('/') {
            return Err(malformed(&format!("invalid name {name:?}")));
        }

        if rest.len() < Digest::LEN {
            return Err(malformed(&format!(
                "truncated digest ({} of {} bytes)",
                rest.len(),
                Digest::LEN
            )));
        }
        let (oid, rest) = rest.split_at(Digest::LEN);
        let oid = Digest::from_raw(oid).ok_or_else(|| malformed("bad digest"))?;

        Ok((Self::new(mode, name, oid), rest))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::Tree;
    use super::*;

    fn sample() -> Tree {
        Tree::new(vec![
            TreeEntry::file("b.txt", Digest::new(b"b")),
            TreeEntry::directory("a", Digest::new(b"a")),
            TreeEntry::file("c", Digest::new(b"c")),
        ])
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let tree = sample();
        let decoded = Tree::parse(&tree.encode())?;
        assert_eq!(decoded, tree);
        assert_eq!(
            decoded.entries().iter().map(|e| e.name()).collect::<Vec<_>>(),
            ["a", "b.txt", "c"]
        );
        assert!(decoded.get("a").unwrap().is_directory());
        assert_eq!(decoded.get("c").unwrap().oid(), &Digest::new(b"c"));
        Ok(())
    }

    #[test]
    fn test_empty_tree() -> Result<()> {
        assert!(Tree::parse(b"")?.is_empty());
        Ok(())
    }

    #[test]
    /// Every strict prefix of a valid encoding that cuts into an entry must fail, never decode
    /// to fewer entries.
    fn test_truncation_is_an_error() {
        let bytes = sample().encode();
        let boundaries: Vec<usize> = {
            let mut at = 0;
            sample()
                .entries()
                .iter()
                .map(|e| {
                    at += e.mode().to_string().len() + 1 + e.name().len() + 1 + Digest::LEN;
                    at
                })
                .collect()
        };

        for len in 1..bytes.len() {
            let result = Tree::parse(&bytes[..len]);
            if boundaries.contains(&len) {
                assert!(result.is_ok(), "prefix of {len} bytes ends on an entry");
            } else {
                assert!(
                    matches!(result, Err(Error::MalformedTree(_))),
                    "prefix of {len} bytes should be malformed"
                );
            }
        }
    }

    #[test]
    fn test_garbage() {
        let cases: [&[u8]; 6] = [
            b"100644",
            b"100644 name",
            b"100644 name\0short",
            b"xyz name\0aaaaaaaaaaaaaaaaaaaa",
            b"100644 \0aaaaaaaaaaaaaaaaaaaa",
            b"100644 a/b\0aaaaaaaaaaaaaaaaaaaa",
        ];
        for bad in cases {
            assert!(matches!(Tree::parse(bad), Err(Error::MalformedTree(_))));
        }
    }
}
