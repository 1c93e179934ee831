//! Materializing trees to and from the filesystem working copy.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::error::UgitResult;
use crate::error::io_err;
use crate::object_id::ObjectType;
use crate::object_id::Oid;
use crate::store::ObjectStore;
use crate::tree::EntryKind;
use crate::tree::TreeEntry;
use crate::tree::parse_tree;
use crate::tree::serialize_tree;

/// Names ignored while walking a directory to build a tree and while
/// clearing one out before checkout.
pub fn is_ignored(name: &str, repo_dir_name: &str) -> bool {
    name == repo_dir_name || name == ".git"
}

/// Recursively hashes `dir`'s contents into tree/blob objects and returns
/// the root tree's OID. Entries are read in whatever order the filesystem
/// yields them; [`serialize_tree`] imposes the canonical sort.
pub fn write_tree_from_dir(store: &ObjectStore, dir: &Path, repo_dir_name: &str) -> UgitResult<Oid> {
    let mut entries = Vec::new();
    let read_dir = fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for item in read_dir {
        let item = item.map_err(|e| io_err(dir, e))?;
        let file_name = item.file_name().to_string_lossy().into_owned();
        if is_ignored(&file_name, repo_dir_name) {
            continue;
        }
        let path = item.path();
        let file_type = item.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_symlink() {
            continue;
        } else if file_type.is_dir() {
            let oid = write_tree_from_dir(store, &path, repo_dir_name)?;
            entries.push(TreeEntry { kind: EntryKind::Tree, oid, name: file_name });
        } else {
            let content = fs::read(&path).map_err(|e| io_err(&path, e))?;
            let oid = store.put(ObjectType::Blob, &content)?;
            entries.push(TreeEntry { kind: EntryKind::Blob, oid, name: file_name });
        }
    }
    let payload = serialize_tree(entries)?;
    store.put(ObjectType::Tree, &payload)
}

/// Flattens the tree at `oid` into a `path -> blob oid` map, with `/`
/// joining path components regardless of host platform.
pub fn read_tree_to_map(store: &ObjectStore, oid: &Oid) -> UgitResult<BTreeMap<String, Oid>> {
    let mut out = BTreeMap::new();
    read_tree_into(store, oid, "", &mut out)?;
    Ok(out)
}

fn read_tree_into(store: &ObjectStore, oid: &Oid, prefix: &str, out: &mut BTreeMap<String, Oid>) -> UgitResult<()> {
    let payload = store.get(oid, Some(ObjectType::Tree))?;
    for entry in parse_tree(oid, &payload)? {
        let path = if prefix.is_empty() { entry.name.clone() } else { format!("{prefix}/{}", entry.name) };
        match entry.kind {
            EntryKind::Blob => {
                out.insert(path, entry.oid);
            }
            EntryKind::Tree => read_tree_into(store, &entry.oid, &path, out)?,
        }
    }
    Ok(())
}

/// Empties `dir` of everything except `repo_dir_name`, then writes out
/// every blob named in the flattened tree map, creating parent
/// directories as needed.
pub fn materialize(store: &ObjectStore, working_dir: &Path, repo_dir_name: &str, oid: &Oid) -> UgitResult<()> {
    empty_directory(working_dir, repo_dir_name)?;
    let files = read_tree_to_map(store, oid)?;
    for (rel_path, blob_oid) in files {
        let full_path = join_rel_path(working_dir, &rel_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let content = store.get(&blob_oid, Some(ObjectType::Blob))?;
        fs::write(&full_path, content).map_err(|e| io_err(&full_path, e))?;
    }
    debug!(oid = %oid, "materialized working copy");
    Ok(())
}

fn join_rel_path(base: &Path, rel_path: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in rel_path.split('/') {
        path.push(component);
    }
    path
}

fn empty_directory(dir: &Path, repo_dir_name: &str) -> UgitResult<()> {
    let read_dir = fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for item in read_dir {
        let item = item.map_err(|e| io_err(dir, e))?;
        let file_name = item.file_name().to_string_lossy().into_owned();
        if is_ignored(&file_name, repo_dir_name) {
            continue;
        }
        let path = item.path();
        if path.is_dir() {
            // Best-effort: a directory left non-empty by something outside
            // ugit's view (an in-use file, a permissions quirk) shouldn't
            // abort the whole checkout.
            if let Err(e) = fs::remove_dir_all(&path) {
                warn!(path = %path.display(), error = %e, "leaving directory in place during checkout cleanup");
            }
        } else {
            fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn round_trip_directory_through_tree() {
        let working_dir = TempDir::new().unwrap();
        let repo_dir = TempDir::new().unwrap();
        let store = ObjectStore::init(repo_dir.path()).unwrap();

        fs::create_dir(working_dir.path().join("sub")).unwrap();
        fs::write(working_dir.path().join("a.txt"), b"hello").unwrap();
        fs::write(working_dir.path().join("sub").join("b.txt"), b"world").unwrap();

        let root = write_tree_from_dir(&store, working_dir.path(), ".ugit").unwrap();

        let checkout_dir = TempDir::new().unwrap();
        materialize(&store, checkout_dir.path(), ".ugit", &root).unwrap();

        assert_eq!(fs::read(checkout_dir.path().join("a.txt")).unwrap(), b"hello");
        assert_eq!(fs::read(checkout_dir.path().join("sub").join("b.txt")).unwrap(), b"world");
    }

    #[test]
    fn materialize_clears_stale_files_first() {
        let repo_dir = TempDir::new().unwrap();
        let store = ObjectStore::init(repo_dir.path()).unwrap();
        let empty_oid = store.put(ObjectType::Tree, b"").unwrap();

        let checkout_dir = TempDir::new().unwrap();
        fs::write(checkout_dir.path().join("stale.txt"), b"leftover").unwrap();

        materialize(&store, checkout_dir.path(), ".ugit", &empty_oid).unwrap();
        assert!(!checkout_dir.path().join("stale.txt").exists());
    }

    #[test]
    fn ignores_repo_directory_when_walking() {
        let working_dir = TempDir::new().unwrap();
        let repo_dir_name = ".ugit";
        fs::create_dir(working_dir.path().join(repo_dir_name)).unwrap();
        fs::write(working_dir.path().join(repo_dir_name).join("objects"), b"nope").unwrap();
        fs::write(working_dir.path().join("keep.txt"), b"keep").unwrap();

        let store = ObjectStore::init(&TempDir::new().unwrap().path().to_path_buf()).unwrap();
        let root = write_tree_from_dir(&store, working_dir.path(), repo_dir_name).unwrap();
        let files = read_tree_to_map(&store, &root).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("keep.txt"));
    }
}
