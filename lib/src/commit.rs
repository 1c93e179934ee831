//! The commit codec: serializing and parsing commit objects.

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::object_id::ObjectType;
use crate::object_id::Oid;
use crate::store::ObjectStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: Oid,
    /// First parent is the previous `HEAD` at commit time; a second, when
    /// present, is the merged-in commit.
    pub parents: Vec<Oid>,
    pub message: String,
}

pub fn serialize_commit(commit: &Commit) -> Vec<u8> {
    let mut out = format!("tree {}\n", commit.tree);
    for parent in &commit.parents {
        out.push_str(&format!("parent {parent}\n"));
    }
    out.push('\n');
    out.push_str(&commit.message);
    out.into_bytes()
}

pub fn parse_commit(oid: &Oid, payload: &[u8]) -> UgitResult<Commit> {
    let text = std::str::from_utf8(payload).map_err(|_| UgitError::BadCommit {
        oid: oid.to_string(),
        reason: "commit payload is not valid UTF-8".to_string(),
    })?;
    let (header, message) = text.split_once("\n\n").ok_or_else(|| UgitError::BadCommit {
        oid: oid.to_string(),
        reason: "missing blank line separating header from message".to_string(),
    })?;

    let mut tree = None;
    let mut parents = Vec::new();
    for line in header.lines() {
        let (key, value) = line.split_once(' ').ok_or_else(|| UgitError::BadCommit {
            oid: oid.to_string(),
            reason: format!("malformed header line {line:?}"),
        })?;
        match key {
            "tree" => {
                tree = Some(Oid::from_hex(value).ok_or_else(|| UgitError::BadCommit {
                    oid: oid.to_string(),
                    reason: format!("malformed tree oid {value:?}"),
                })?);
            }
            "parent" => {
                parents.push(Oid::from_hex(value).ok_or_else(|| UgitError::BadCommit {
                    oid: oid.to_string(),
                    reason: format!("malformed parent oid {value:?}"),
                })?);
            }
            other => {
                return Err(UgitError::BadCommit {
                    oid: oid.to_string(),
                    reason: format!("unknown header key {other:?}"),
                });
            }
        }
    }

    let tree = tree.ok_or_else(|| UgitError::BadCommit {
        oid: oid.to_string(),
        reason: "missing tree header".to_string(),
    })?;
    Ok(Commit { tree, parents, message: message.to_string() })
}

pub fn get_commit(store: &ObjectStore, oid: &Oid) -> UgitResult<Commit> {
    let payload = store.get(oid, Some(ObjectType::Commit))?;
    parse_commit(oid, &payload)
}

pub fn put_commit(store: &ObjectStore, commit: &Commit) -> UgitResult<Oid> {
    store.put(ObjectType::Commit, &serialize_commit(commit))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_hex(format!("{byte:02x}").repeat(20)).unwrap()
    }

    #[test]
    fn round_trip_through_store() {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::init(dir.path()).unwrap();
        let commit = Commit {
            tree: oid(1),
            parents: vec![oid(2), oid(3)],
            message: "merge\n".to_string(),
        };
        let commit_oid = put_commit(&store, &commit).unwrap();
        let read_back = get_commit(&store, &commit_oid).unwrap();
        assert_eq!(read_back, commit);
    }

    #[test]
    fn parse_rejects_unknown_header_key() {
        let root = oid(9);
        let payload = format!("tree {}\nfoo bar\n\nmsg\n", oid(1));
        assert_matches!(parse_commit(&root, payload.as_bytes()), Err(UgitError::BadCommit { .. }));
    }

    #[test]
    fn parse_rejects_missing_tree() {
        let root = oid(9);
        let payload = "parent ".to_string() + oid(1).as_str() + "\n\nmsg\n";
        assert_matches!(parse_commit(&root, payload.as_bytes()), Err(UgitError::BadCommit { .. }));
    }

    #[test]
    fn serialize_preserves_parent_order() {
        let commit = Commit { tree: oid(1), parents: vec![oid(5), oid(6)], message: "m\n".to_string() };
        let payload = String::from_utf8(serialize_commit(&commit)).unwrap();
        let first = payload.find(oid(5).as_str()).unwrap();
        let second = payload.find(oid(6).as_str()).unwrap();
        assert!(first < second);
    }
}
