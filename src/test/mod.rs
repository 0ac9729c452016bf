mod add;

use std::cell::RefCell;
use std::io::{self, ErrorKind};
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use tempdir::TempDir;

use crate::fs::{DiskFs, Filesystem};

pub type Result<T = ()> = color_eyre::Result<T>;

/// Write each path under `$root` (creating parent directories), with `"<path>-contents\n"` as
/// its contents.
#[macro_export]
macro_rules! create_test_files {
    ($root:expr, [$($path:expr),* $(,)?]) => {{
        use std::io::Write;
        $({
            let path = $root.join($path);
            std::fs::create_dir_all(path.parent().unwrap())?;
            writeln!(std::fs::File::create(&path)?, "{}-contents", $path)?;
        })*
    }};
}

pub fn temp_root() -> Result<(TempDir, Utf8PathBuf)> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap().to_owned();
    Ok((dir, root))
}

pub fn read(root: &Utf8Path, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(root.join(path))?)
}

/// Disk access that records every mutation and can be told to fail writes below a path.
#[derive(Clone, Default)]
pub struct FaultyFs {
    fail_under: Rc<RefCell<Option<Utf8PathBuf>>>,
    log: Rc<RefCell<Vec<(&'static str, Utf8PathBuf)>>>,
}

impl FaultyFs {
    pub fn fail_writes_under(&self, path: impl Into<Utf8PathBuf>) {
        *self.fail_under.borrow_mut() = Some(path.into());
    }

    pub fn take_log(&self) -> Vec<(&'static str, Utf8PathBuf)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn record(&self, op: &'static str, path: &Utf8Path) -> io::Result<()> {
        self.log.borrow_mut().push((op, path.to_owned()));
        match &*self.fail_under.borrow() {
            Some(prefix) if op != "remove" && path.starts_with(prefix) => Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("refusing to {op} {path}"),
            )),
            _ => Ok(()),
        }
    }
}

impl Filesystem for FaultyFs {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        DiskFs.read(path)
    }

    fn write(&self, path: &Utf8Path, data: &[u8]) -> io::Result<()> {
        self.record("write", path)?;
        DiskFs.write(path, data)
    }

    fn rename(&self, from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        self.record("write", to)?;
        DiskFs.rename(from, to)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        self.record("mkdir", path)?;
        DiskFs.create_dir_all(path)
    }

    fn remove_all(&self, path: &Utf8Path) -> io::Result<()> {
        self.record("remove", path)?;
        DiskFs.remove_all(path)
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        DiskFs.exists(path)
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        DiskFs.is_dir(path)
    }

    fn list_dir(&self, path: &Utf8Path) -> io::Result<Vec<String>> {
        DiskFs.list_dir(path)
    }

    fn walk_files(&self, path: &Utf8Path, skip: &[&str]) -> io::Result<Vec<Utf8PathBuf>> {
        DiskFs.walk_files(path, skip)
    }
}
