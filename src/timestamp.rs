use std::fmt::Display;

use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::offset::Local::now().into())
    }

    /// Parse a timestamp from unix seconds and a `±HHMM` offset, e.g. `1658312219 +0100`.
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_str(s, "%s %z").ok().map(Self)
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%s %z"))
    }
}
