//! A minimal version-control engine: a content-addressed object store, tree snapshots built
//! from a flat staging index, linear commit history, branches, and a working-tree reconciler
//! that applies the difference between two snapshots to disk.

#[cfg(test)]
mod test;

pub mod commit;
pub mod database;
pub mod digest;
pub mod error;
pub mod filemode;
pub mod fs;
pub mod index;
pub mod object;
pub mod refs;
pub mod repo;
pub mod timestamp;
pub mod tree;
pub mod util;
pub mod workspace;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
