use crate::database::Database;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::object::ObjectKind;
use crate::Result;

impl super::Commit {
    pub fn format(&self) -> Vec<u8> {
        format!(
            "\
            tree {}\n\
            {}\
            \n\
            {}\n\
            {}\n",
            self.tree_id.to_hex(),
            match &self.parent {
                Some(parent) => format!("parent {parent:x}\n"),
                None => String::new(),
            },
            self.message,
            self.timestamp,
        )
        .into_bytes()
    }

    pub fn store<F: Filesystem>(&self, database: &Database<F>) -> Result<Digest> {
        database.store(ObjectKind::Commit, &self.format())
    }
}
