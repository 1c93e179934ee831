//! The reference namespace: `HEAD`, `MERGE_HEAD`, `refs/heads/*`, `refs/tags/*`.
//!
//! Ref names are always forward-slash-separated strings, converted to
//! host-native path separators only at the point a [`RefStore`] touches the
//! filesystem.

use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::error::io_err;
use crate::object_id::Oid;

pub const HEAD: &str = "HEAD";
pub const MERGE_HEAD: &str = "MERGE_HEAD";

/// Cycle guard for symbolic indirection.
const MAX_DEREF_DEPTH: usize = 8;

/// A ref's value: either a direct pointer at an OID (with `None` denoting
/// the null ref — an absent file, or an unborn branch) or an unresolved
/// symbolic pointer at another ref's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    Direct(Option<Oid>),
    Symbolic(String),
}

impl RefValue {
    pub fn oid(&self) -> Option<&Oid> {
        match self {
            Self::Direct(oid) => oid.as_ref(),
            Self::Symbolic(_) => None,
        }
    }
}

pub struct RefStore {
    root: PathBuf,
}

impl RefStore {
    /// `root` is the repository directory (e.g. `.ugit`) refs live under.
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    /// The only place a ref name's forward slashes are translated to
    /// host-native path separators.
    fn ref_file_path(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        for component in name.split('/') {
            path.push(component);
        }
        path
    }

    fn read_raw(&self, name: &str) -> UgitResult<Option<RefValue>> {
        let path = self.ref_file_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
        };
        let content = content.trim_end_matches('\n');
        if let Some(target) = content.strip_prefix("ref: ") {
            Ok(Some(RefValue::Symbolic(target.to_string())))
        } else {
            let oid = Oid::from_hex(content).ok_or_else(|| UgitError::BadRef {
                name: name.to_string(),
                reason: format!("malformed ref content {content:?}"),
            })?;
            Ok(Some(RefValue::Direct(Some(oid))))
        }
    }

    /// Chases `ref:` indirection starting at `name`, returning the terminal
    /// (non-symbolic) ref's own name and its direct value.
    fn deref_to_terminal(&self, name: &str) -> UgitResult<(String, RefValue)> {
        let mut current = name.to_string();
        for _ in 0..MAX_DEREF_DEPTH {
            match self.read_raw(&current)? {
                None => return Ok((current, RefValue::Direct(None))),
                Some(RefValue::Direct(oid)) => return Ok((current, RefValue::Direct(oid))),
                Some(RefValue::Symbolic(target)) => current = target,
            }
        }
        Err(UgitError::BadRef {
            name: name.to_string(),
            reason: "symbolic reference chain is too deep or cyclic".to_string(),
        })
    }

    /// Reads `name`. With `deref`, fully chases symbolic indirection and
    /// always returns `RefValue::Direct`; without, returns the file's own
    /// content verbatim (a symbolic pointer stays unresolved).
    pub fn get(&self, name: &str, deref: bool) -> UgitResult<RefValue> {
        if deref {
            let (_, value) = self.deref_to_terminal(name)?;
            Ok(value)
        } else {
            Ok(self.read_raw(name)?.unwrap_or(RefValue::Direct(None)))
        }
    }

    /// Writes `value` to `name`. With `deref`, the write lands on the
    /// terminal ref of `name`'s symbolic chain rather than on `name` itself.
    pub fn update(&self, name: &str, value: &RefValue, deref: bool) -> UgitResult<()> {
        let target = if deref { self.deref_to_terminal(name)?.0 } else { name.to_string() };
        let content = match value {
            RefValue::Direct(None) => return Err(UgitError::EmptyValue { name: target }),
            RefValue::Direct(Some(oid)) => format!("{oid}\n"),
            RefValue::Symbolic(path) => {
                if path.is_empty() {
                    return Err(UgitError::EmptyValue { name: target });
                }
                format!("ref: {path}\n")
            }
        };

        let path = self.ref_file_path(&target);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_err(dir, e))?;
        temp.write_all(content.as_bytes()).map_err(|e| io_err(&path, e))?;
        temp.as_file().sync_data().map_err(|e| io_err(&path, e))?;
        temp.persist(&path).map_err(|e| io_err(&path, e.error))?;

        debug!(ref_name = %target, "updated ref");
        Ok(())
    }

    /// Removes `name`'s file. With `deref`, chases to the terminal ref
    /// first, following `ref:` indirection before the delete.
    pub fn delete(&self, name: &str, deref: bool) -> UgitResult<()> {
        let target = if deref { self.deref_to_terminal(name)?.0 } else { name.to_string() };
        let path = self.ref_file_path(&target);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(ref_name = %target, "deleted ref");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(ref_name = %target, "delete of already-absent ref swallowed");
                Ok(())
            }
            Err(e) => Err(io_err(&path, e)),
        }
    }

    /// Enumerates `HEAD` followed by every ref under `refs/`, filtered by
    /// name prefix.
    pub fn iter(&self, prefix: &str, deref: bool) -> UgitResult<Vec<(String, RefValue)>> {
        let mut out = Vec::new();
        if HEAD.starts_with(prefix) {
            out.push((HEAD.to_string(), self.get(HEAD, deref)?));
        }
        let refs_dir = self.root.join("refs");
        if refs_dir.is_dir() {
            self.collect_refs(&refs_dir, "refs", prefix, deref, &mut out)?;
        }
        Ok(out)
    }

    fn collect_refs(
        &self,
        dir: &Path,
        name_prefix: &str,
        filter_prefix: &str,
        deref: bool,
        out: &mut Vec<(String, RefValue)>,
    ) -> UgitResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let full_name = format!("{name_prefix}/{file_name}");
            let path = entry.path();
            if path.is_dir() {
                self.collect_refs(&path, &full_name, filter_prefix, deref, out)?;
            } else if full_name.starts_with(filter_prefix) {
                out.push((full_name.clone(), self.get(&full_name, deref)?));
            }
        }
        Ok(())
    }
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
    fn unborn_head_is_null_without_error() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        refs.update(HEAD, &RefValue::Symbolic("refs/heads/main".to_string()), false)
            .unwrap();
        assert_eq!(refs.get(HEAD, true).unwrap(), RefValue::Direct(None));
    }

    #[test]
    fn symbolic_chain_resolves_to_terminal_value() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        let id = oid(1);
        refs.update("refs/heads/main", &RefValue::Direct(Some(id.clone())), false)
            .unwrap();
        refs.update("refs/foo", &RefValue::Symbolic("refs/heads/main".to_string()), false)
            .unwrap();

        assert_eq!(refs.get("refs/foo", true).unwrap(), RefValue::Direct(Some(id.clone())));

        let other = oid(2);
        refs.update("refs/foo", &RefValue::Direct(Some(other.clone())), true).unwrap();
        assert_eq!(refs.get("refs/heads/main", false).unwrap(), RefValue::Direct(Some(other)));
    }

    #[test]
    fn cyclic_symbolic_refs_fail_with_bad_ref() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        refs.update("refs/a", &RefValue::Symbolic("refs/b".to_string()), false).unwrap();
        refs.update("refs/b", &RefValue::Symbolic("refs/a".to_string()), false).unwrap();
        assert_matches!(refs.get("refs/a", true), Err(UgitError::BadRef { .. }));
    }

    #[test]
    fn empty_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        assert_matches!(
            refs.update("refs/heads/main", &RefValue::Direct(None), false),
            Err(UgitError::EmptyValue { .. })
        );
    }

    #[test]
    fn iter_yields_head_and_refs_under_prefix() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        refs.update(HEAD, &RefValue::Symbolic("refs/heads/main".to_string()), false)
            .unwrap();
        refs.update("refs/heads/main", &RefValue::Direct(Some(oid(1))), false).unwrap();
        refs.update("refs/tags/v1", &RefValue::Direct(Some(oid(2))), false).unwrap();

        let all = refs.iter("", true).unwrap();
        let names: Vec<_> = all.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"HEAD"));
        assert!(names.contains(&"refs/heads/main"));
        assert!(names.contains(&"refs/tags/v1"));

        let heads_only = refs.iter("refs/heads/", true).unwrap();
        assert_eq!(heads_only.len(), 1);
    }
}
