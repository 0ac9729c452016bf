use crate::database::Database;
use crate::digest::Digest;
use crate::fs::Filesystem;
use crate::object::ObjectKind;
use crate::Result;

impl super::Tree {
    /// Encode the entries, in order, as `<mode> <name>\0<raw oid>`.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for entry in &self.entries {
            data.extend_from_slice(entry.mode.to_string().as_bytes());
            data.push(b' ');
            data.extend_from_slice(entry.name.as_bytes());
            data.push(b'\0');
            data.extend_from_slice(&*entry.oid);
        }
        data
    }

    pub fn store<F: Filesystem>(&self, database: &Database<F>) -> Result<Digest> {
        database.store(ObjectKind::Tree, &self.encode())
    }
}
