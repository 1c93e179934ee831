//! The content-addressed object store.
//!
//! Writes go through a `NamedTempFile` in the target directory, `sync_data()`,
//! then a no-clobber persist: since every object's name already encodes its
//! content, losing a race to create the same file is not an error.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::error::io_err;
use crate::object_id::ObjectType;
use crate::object_id::Oid;
use crate::object_id::hash_framed;

#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Wraps an already-initialized `objects/` directory under `repo_dir`.
    pub fn new(repo_dir: &Path) -> Self {
        Self {
            objects_dir: repo_dir.join("objects"),
        }
    }

    /// Creates `objects/` under `repo_dir` and returns a store over it.
    pub fn init(repo_dir: &Path) -> UgitResult<Self> {
        let objects_dir = repo_dir.join("objects");
        fs::create_dir_all(&objects_dir).map_err(|e| io_err(&objects_dir, e))?;
        Ok(Self { objects_dir })
    }

    fn object_path(&self, oid: &Oid) -> PathBuf {
        self.objects_dir.join(oid.as_str())
    }

    /// Frames `payload` under `object_type`, hashes it, and writes it under
    /// its OID. Idempotent: storing the same `(type, payload)` pair twice
    /// is a no-op the second time.
    pub fn put(&self, object_type: ObjectType, payload: &[u8]) -> UgitResult<Oid> {
        let (oid, framed) = hash_framed(object_type, payload);
        let target = self.object_path(&oid);
        if target.exists() {
            debug!(oid = %oid, object_type = object_type.as_str(), "object already present");
            return Ok(oid);
        }

        let mut temp =
            tempfile::NamedTempFile::new_in(&self.objects_dir).map_err(|e| io_err(&self.objects_dir, e))?;
        use std::io::Write as _;
        temp.write_all(&framed).map_err(|e| io_err(&target, e))?;
        temp.as_file().sync_data().map_err(|e| io_err(&target, e))?;
        match temp.persist_noclobber(&target) {
            Ok(_) => {}
            Err(err) if target.exists() => {
                // Lost the race to another write of the identical object; fine.
                drop(err);
            }
            Err(err) => return Err(io_err(&target, err.error)),
        }

        debug!(oid = %oid, object_type = object_type.as_str(), bytes = payload.len(), "wrote object");
        Ok(oid)
    }

    /// Reads the payload stored under `oid`, optionally checking its framed
    /// type against `expected_type`.
    pub fn get(&self, oid: &Oid, expected_type: Option<ObjectType>) -> UgitResult<Vec<u8>> {
        let path = self.object_path(oid);
        let framed = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UgitError::NotFound { oid: oid.to_string() }
            } else {
                io_err(&path, e)
            }
        })?;

        let nul = framed.iter().position(|&b| b == 0).ok_or_else(|| UgitError::Corrupt {
            oid: oid.to_string(),
            reason: "missing NUL byte separating type from payload".to_string(),
        })?;
        let type_str = std::str::from_utf8(&framed[..nul]).map_err(|_| UgitError::Corrupt {
            oid: oid.to_string(),
            reason: "type prefix is not valid UTF-8".to_string(),
        })?;

        if let Some(expected) = expected_type {
            if type_str != expected.as_str() {
                return Err(UgitError::BadType {
                    oid: oid.to_string(),
                    expected: expected.as_str(),
                    actual: type_str.to_string(),
                });
            }
        }

        Ok(framed[nul + 1..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    fn new_store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::init(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn put_is_idempotent() {
        let (_dir, store) = new_store();
        let a = store.put(ObjectType::Blob, b"hello\n").unwrap();
        let b = store.put(ObjectType::Blob, b"hello\n").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.get(&a, Some(ObjectType::Blob)).unwrap(), b"hello\n");
    }

    #[test]
    fn get_checks_expected_type() {
        let (_dir, store) = new_store();
        let oid = store.put(ObjectType::Blob, b"x").unwrap();
        assert_matches!(
            store.get(&oid, Some(ObjectType::Tree)),
            Err(UgitError::BadType { .. })
        );
    }

    #[test]
    fn get_missing_is_not_found() {
        let (_dir, store) = new_store();
        let missing = Oid::from_hex("a".repeat(40)).unwrap();
        assert_matches!(store.get(&missing, None), Err(UgitError::NotFound { .. }));
    }

    #[test]
    fn corrupt_object_without_nul_is_detected() {
        let (dir, store) = new_store();
        let oid = store.put(ObjectType::Blob, b"x").unwrap();
        fs::write(dir.path().join("objects").join(oid.as_str()), b"no-nul-byte-here").unwrap();
        assert_matches!(store.get(&oid, None), Err(UgitError::Corrupt { .. }));
    }
}
