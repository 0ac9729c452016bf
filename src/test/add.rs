use pretty_assertions::assert_eq;

use crate::object::ObjectKind;
use crate::repo::Repo;
use crate::test::{temp_root, Result};
use crate::Error;

/// Create files "file1" and "file2". Add these to the index. Then, delete "file1", and create
/// the file "file1/file3" (a directory). Then, add this new file to the index.
///
/// The file "file1" should no longer be present in the index, as it cannot exist due to the
/// existance of "file1/file3"
#[test]
fn test_dir_replaces_file() -> Result {
    let (_dir, root) = temp_root()?;
    let repo = Repo::init(&root)?;

    crate::create_test_files!(root, ["file1", "file2"]);
    repo.add(&["file1".into(), "file2".into()])?;

    std::fs::remove_file(root.join("file1"))?;
    crate::create_test_files!(root, ["file1/file3"]);
    repo.add(&["file1/file3".into()])?;

    let index = repo.load_index()?;
    assert_eq!(index.iter().map(|(p, _)| p).collect::<Vec<_>>(), ["file1/file3", "file2"]);

    Ok(())
}

/// Add a file to the index with the same name as a previously existing directory.
///
/// The directory, and all members of that directory, should be removed from the index.
#[test]
fn test_file_replaces_dir() -> Result {
    let (_dir, root) = temp_root()?;
    let repo = Repo::init(&root)?;

    crate::create_test_files!(root, ["file1/file2/file3", "file1/file2/file4", "file5"]);
    repo.add_all()?;

    std::fs::remove_dir_all(root.join("file1"))?;
    crate::create_test_files!(root, ["file1"]);
    repo.add(&["file1".into()])?;

    let index = repo.load_index()?;
    assert_eq!(index.iter().map(|(p, _)| p).collect::<Vec<_>>(), ["file1", "file5"]);

    Ok(())
}

#[test]
fn add_stores_blobs_and_skips_control_dir() -> Result {
    let (_dir, root) = temp_root()?;
    let repo = Repo::init(&root)?;

    crate::create_test_files!(root, ["a.txt", "dir/b.txt", ".git/config"]);
    let added = repo.add_all()?;
    assert_eq!(added, ["a.txt", "dir/b.txt"]);

    let index = repo.load_index()?;
    let oid = index.get("dir/b.txt").unwrap();
    let (kind, data) = repo.database.read_object(oid)?;
    assert_eq!(kind, ObjectKind::Blob);
    assert_eq!(data, b"dir/b.txt-contents\n");

    Ok(())
}

#[test]
fn add_from_absolute_subdirectory_path() -> Result {
    let (_dir, root) = temp_root()?;
    let repo = Repo::init(&root)?;

    crate::create_test_files!(root, ["top", "sub/one", "sub/deeper/two"]);
    let added = repo.add(&[root.join("sub")])?;
    assert_eq!(added, ["sub/deeper/two", "sub/one"]);
    Ok(())
}

#[test]
fn add_rejects_paths_outside_repository() -> Result {
    let (_dir, root) = temp_root()?;
    let repo = Repo::init(root.join("repo"))?;
    crate::create_test_files!(root, ["outside"]);

    assert!(matches!(
        repo.add(&["../outside".into()]),
        Err(Error::PathOutsideRepository(_))
    ));
    assert!(matches!(
        repo.add(&[root.join("outside")]),
        Err(Error::PathOutsideRepository(_))
    ));
    assert!(matches!(
        repo.add(&["missing".into()]),
        Err(Error::PathNotFound(_))
    ));
    assert!(repo.load_index()?.is_empty());
    Ok(())
}
