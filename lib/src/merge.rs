//! Merge-base discovery and three-way tree merging.

use std::collections::BTreeSet;

use crate::error::UgitResult;
use crate::object_id::ObjectType;
use crate::object_id::Oid;
use crate::store::ObjectStore;
use crate::tool::MergeTool;
use crate::tree::EntryKind;
use crate::tree::TreeEntry;
use crate::tree::serialize_tree;
use crate::walk::CommitWalk;
use crate::walk::ancestors;
use crate::working_copy::read_tree_to_map;

/// The first commit reachable from both `a` and `b`: the ancestor set of
/// `a` is computed first, then `b`'s ancestry is walked in its usual
/// first-parent-biased order, returning the first OID already in that set.
/// `None` means unrelated histories; the merge then proceeds as if against
/// an empty base.
pub fn merge_base(store: &ObjectStore, a: Oid, b: Oid) -> UgitResult<Option<Oid>> {
    let ancestors_a = ancestors(store, a)?;
    for entry in CommitWalk::new(store, [b]) {
        let (oid, _) = entry?;
        if ancestors_a.contains(&oid) {
            return Ok(Some(oid));
        }
    }
    Ok(None)
}

/// Three-way merges the trees at `base`/`ours`/`theirs`, running `tool`
/// for every path in the union of all three, and returns the merged
/// tree's OID. A path absent from both `ours` and `theirs` still runs
/// through `tool` against an empty pair of inputs, rather than being
/// dropped outright.
pub fn merge_trees(
    store: &ObjectStore,
    tool: &dyn MergeTool,
    base: Option<&Oid>,
    ours: &Oid,
    theirs: &Oid,
) -> UgitResult<Oid> {
    let base_files = load_optional(store, base)?;
    let ours_files = read_tree_to_map(store, ours)?;
    let theirs_files = read_tree_to_map(store, theirs)?;

    let mut paths: BTreeSet<String> = BTreeSet::new();
    paths.extend(base_files.keys().cloned());
    paths.extend(ours_files.keys().cloned());
    paths.extend(theirs_files.keys().cloned());

    let mut entries = Vec::new();
    for path in paths {
        let base_blob = base_files.get(&path);
        let our_blob = ours_files.get(&path);
        let their_blob = theirs_files.get(&path);

        let base_content = read_blob(store, base_blob)?;
        let our_content = read_blob(store, our_blob)?;
        let their_content = read_blob(store, their_blob)?;
        let merged = tool.merge(&base_content, &our_content, &their_content)?;

        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let oid = store.put(ObjectType::Blob, &merged)?;
        entries.push((path, TreeEntry { kind: EntryKind::Blob, oid, name }));
    }

    build_nested_tree(store, entries)
}

fn read_blob(store: &ObjectStore, oid: Option<&Oid>) -> UgitResult<Vec<u8>> {
    match oid {
        Some(oid) => store.get(oid, Some(ObjectType::Blob)),
        None => Ok(Vec::new()),
    }
}

fn load_optional(store: &ObjectStore, oid: Option<&Oid>) -> UgitResult<std::collections::BTreeMap<String, Oid>> {
    match oid {
        Some(oid) => read_tree_to_map(store, oid),
        None => Ok(std::collections::BTreeMap::new()),
    }
}

/// Groups flat `(full_path, entry)` pairs back into a directory tree,
/// writing subtree objects bottom-up.
fn build_nested_tree(store: &ObjectStore, entries: Vec<(String, TreeEntry)>) -> UgitResult<Oid> {
    #[derive(Default)]
    struct Dir {
        files: Vec<TreeEntry>,
        dirs: std::collections::BTreeMap<String, Dir>,
    }

    let mut root = Dir::default();
    for (path, entry) in entries {
        let mut parts: Vec<&str> = path.split('/').collect();
        let leaf = parts.pop().expect("path always has at least one component");
        let mut cursor = &mut root;
        for part in parts {
            cursor = cursor.dirs.entry(part.to_string()).or_default();
        }
        cursor.files.push(TreeEntry { name: leaf.to_string(), ..entry });
    }

    fn write(store: &ObjectStore, dir: Dir) -> UgitResult<Oid> {
        let mut entries = dir.files;
        for (name, sub) in dir.dirs {
            let oid = write(store, sub)?;
            entries.push(TreeEntry { kind: EntryKind::Tree, oid, name });
        }
        let payload = serialize_tree(entries)?;
        store.put(ObjectType::Tree, &payload)
    }

    write(store, root)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::commit::Commit;
    use crate::commit::put_commit;
    use crate::working_copy::read_tree_to_map as flatten;

    struct IdentityTool;
    impl MergeTool for IdentityTool {
        fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> UgitResult<Vec<u8>> {
            if ours == base {
                Ok(theirs.to_vec())
            } else {
                Ok(ours.to_vec())
            }
        }
    }

    fn tree_with(store: &ObjectStore, files: &[(&str, &[u8])]) -> Oid {
        let entries: Vec<TreeEntry> = files
            .iter()
            .map(|(name, content)| TreeEntry {
                kind: EntryKind::Blob,
                oid: store.put(ObjectType::Blob, content).unwrap(),
                name: name.to_string(),
            })
            .collect();
        store.put(ObjectType::Tree, &serialize_tree(entries).unwrap()).unwrap()
    }

    #[test]
    fn merge_base_finds_common_ancestor() {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::init(dir.path()).unwrap();
        let tree = tree_with(&store, &[]);
        let root = put_commit(&store, &Commit { tree: tree.clone(), parents: vec![], message: "r".into() }).unwrap();
        let left = put_commit(&store, &Commit { tree: tree.clone(), parents: vec![root.clone()], message: "l".into() }).unwrap();
        let right = put_commit(&store, &Commit { tree, parents: vec![root.clone()], message: "ri".into() }).unwrap();
        assert_eq!(merge_base(&store, left, right).unwrap(), Some(root));
    }

    #[test]
    fn merge_trees_takes_unmodified_sides_content() {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::init(dir.path()).unwrap();
        let base = tree_with(&store, &[("a.txt", b"base")]);
        let ours = tree_with(&store, &[("a.txt", b"base")]);
        let theirs = tree_with(&store, &[("a.txt", b"changed")]);

        let merged = merge_trees(&store, &IdentityTool, Some(&base), &ours, &theirs).unwrap();
        let files = flatten(&store, &merged).unwrap();
        let content = store.get(&files["a.txt"], Some(ObjectType::Blob)).unwrap();
        assert_eq!(content, b"changed");
    }
}
