use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::digest::Digest;
use crate::timestamp::Timestamp;
use crate::{Error, Result};

use super::*;

impl Commit {
    /// Parse a decompressed commit.
    ///
    /// ## Example
    /// ```text
    /// tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
    /// parent e6a49274aa0893ce2e2928589100387aee220c5b
    ///
    /// Add the thing
    /// 1658312219 +0100
    /// ```
    pub fn parse(oid: &Digest, bytes: &[u8]) -> Result<Self> {
        static TREEID_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^tree ([[:xdigit:]]{40})$").unwrap());
        static PARENT_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^parent ([[:xdigit:]]{40})$").unwrap());

        let malformed = |reason: &str| Error::MalformedCommit {
            oid: *oid,
            reason: reason.to_owned(),
        };
        let digest = |hex: &str| Digest::from_str(hex).map_err(|_| malformed("invalid digest"));

        let text = std::str::from_utf8(bytes).map_err(|_| malformed("not utf-8"))?;
        let text = text.strip_suffix('\n').unwrap_or(text);

        let (line, rest) = text
            .split_once('\n')
            .ok_or_else(|| malformed("unexpected end of commit"))?;
        let tree_id = match TREEID_REGEX.captures(line) {
            Some(groups) => digest(&groups[1])?,
            None => return Err(malformed("tree id not found")),
        };

        let (parent, rest) = match rest.split_once('\n') {
            Some((line, tail)) if line.starts_with("parent ") => {
                let groups = PARENT_REGEX
                    .captures(line)
                    .ok_or_else(|| malformed("invalid parent line"))?;
                (Some(digest(&groups[1])?), tail)
            }
            _ => (None, rest),
        };

        let rest = rest
            .strip_prefix('\n')
            .ok_or_else(|| malformed("missing blank line before message"))?;
        let (message, timestamp) = rest
            .rsplit_once('\n')
            .ok_or_else(|| malformed("missing timestamp"))?;
        let timestamp = Timestamp::parse(timestamp).ok_or_else(|| malformed("invalid timestamp"))?;

        Ok(Self {
            tree_id,
            parent,
            message: message.to_owned(),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn oid() -> Digest {
        Digest::new(b"commit")
    }

    #[test]
    fn test_parse_commit() {
        let input = "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
parent e6a49274aa0893ce2e2928589100387aee220c5b

Merge branch 'feature'
1658312219 +0100
";

        let commit = Commit::parse(&oid(), input.as_bytes()).unwrap();
        assert_eq!(
            commit.tree_id,
            Digest::from_str("090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5").unwrap()
        );
        assert_eq!(
            commit.parent,
            Some(Digest::from_str("e6a49274aa0893ce2e2928589100387aee220c5b").unwrap())
        );
        assert_eq!(commit.message, "Merge branch 'feature'");
        assert_eq!(commit.timestamp.to_string(), "1658312219 +0100");
    }

    #[test]
    fn test_parse_root_commit() {
        let input = "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\n\nfirst\n0 +0000\n";
        let commit = Commit::parse(&oid(), input.as_bytes()).unwrap();
        assert_eq!(commit.parent, None);
        assert_eq!(commit.message, "first");
    }

    #[test]
    /// Formatting then parsing gives back the same commit, including multi-line and empty
    /// messages.
    fn test_format_parse() {
        for message in ["one line", "subject\n\nbody\nmore body", ""] {
            for parent in [None, Some(Digest::new(b"parent"))] {
                let commit = Commit::with_timestamp(
                    parent,
                    Digest::new(b"tree"),
                    message,
                    Timestamp::parse("1700000000 -0530").unwrap(),
                );
                assert_eq!(Commit::parse(&oid(), &commit.format()).unwrap(), commit);
            }
        }
    }

    #[test]
    fn test_format_layout() {
        let commit = Commit::with_timestamp(
            Some(Digest([0x22; 20])),
            Digest([0x11; 20]),
            "msg",
            Timestamp::parse("10 +0200").unwrap(),
        );
        let expected = format!(
            "tree {}\nparent {}\n\nmsg\n10 +0200\n",
            "11".repeat(20),
            "22".repeat(20)
        );
        assert_eq!(String::from_utf8(commit.format()).unwrap(), expected);
    }

    #[test]
    fn test_pretty_root_commit() {
        let commit = Commit::with_timestamp(
            None,
            Digest([0x11; 20]),
            "first",
            Timestamp::parse("0 +0000").unwrap(),
        );
        assert_eq!(commit.pretty(), format!("tree {}\n\nfirst\n0 +0000\n", "11".repeat(20)));
    }

    #[test]
    fn test_invalid_commits() {
        let cases = [
            "",
            "tree nothex\n\nmsg\n0 +0000\n",
            "parent 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\n\nmsg\n0 +0000\n",
            "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\nmsg\n0 +0000\n",
            "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\n\nmsg\nnot a time\n",
            "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\nparent 12\n\nmsg\n0 +0000\n",
        ];
        for case in cases {
            assert!(
                matches!(
                    Commit::parse(&oid(), case.as_bytes()),
                    Err(Error::MalformedCommit { .. })
                ),
                "{case:?}"
            );
        }
    }
}
