//! Resolving a user-given name to an object id.

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::object_id::Oid;
use crate::ref_store::HEAD;
use crate::ref_store::RefStore;

/// The ref paths tried, in order, before falling back to a literal OID.
fn ref_candidates(name: &str) -> Vec<String> {
    vec![
        name.to_string(),
        format!("refs/{name}"),
        format!("refs/tags/{name}"),
        format!("refs/heads/{name}"),
    ]
}

/// Resolves `name` against the ref namespace, then as a literal hex OID.
///
/// Precedence: `@` is an alias for `HEAD`; then the literal name, then
/// `refs/<name>`, `refs/tags/<name>`, `refs/heads/<name>`; finally a
/// 40-character hex string is accepted as-is.
pub fn get_oid(refs: &RefStore, name: &str) -> UgitResult<Oid> {
    let name = if name == "@" { HEAD } else { name };

    for candidate in ref_candidates(name) {
        if let Some(oid) = refs.get(&candidate, true)?.oid() {
            return Ok(oid.clone());
        }
    }

    Oid::from_hex(name).ok_or_else(|| UgitError::UnknownName { name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::ref_store::RefValue;

    fn oid(byte: u8) -> Oid {
        Oid::from_hex(format!("{byte:02x}").repeat(20)).unwrap()
    }

    #[test]
    fn resolves_head_alias() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        refs.update(HEAD, &RefValue::Direct(Some(oid(1))), false).unwrap();
        assert_eq!(get_oid(&refs, "@").unwrap(), oid(1));
    }

    #[test]
    fn prefers_tag_over_branch_when_both_present() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        refs.update("refs/tags/release", &RefValue::Direct(Some(oid(1))), false).unwrap();
        refs.update("refs/heads/release", &RefValue::Direct(Some(oid(2))), false).unwrap();
        assert_eq!(get_oid(&refs, "release").unwrap(), oid(1));
    }

    #[test]
    fn falls_back_to_literal_oid() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        let literal = oid(9);
        assert_eq!(get_oid(&refs, literal.as_str()).unwrap(), literal);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        let refs = RefStore::new(dir.path());
        assert!(get_oid(&refs, "nope").is_err());
    }
}
