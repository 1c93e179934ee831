//! The tree codec: serializing and parsing directory-listing objects.

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::object_id::Oid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub oid: Oid,
    pub name: String,
}

/// Rejects entry names containing a path separator or equal to `.`/`..`.
pub fn validate_entry_name(name: &str) -> UgitResult<()> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(UgitError::BadName {
            name: name.to_string(),
            reason: "entry names must be non-empty, contain no '/', and not be '.' or '..'".to_string(),
        });
    }
    Ok(())
}

/// Sorts `entries` by name (bytewise, not locale-sensitive) and formats
/// them into the `type SP oid SP name LF` tree payload grammar.
pub fn serialize_tree(mut entries: Vec<TreeEntry>) -> UgitResult<Vec<u8>> {
    for entry in &entries {
        validate_entry_name(&entry.name)?;
    }
    entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

    let mut out = String::new();
    for entry in &entries {
        out.push_str(entry.kind.as_str());
        out.push(' ');
        out.push_str(entry.oid.as_str());
        out.push(' ');
        out.push_str(&entry.name);
        out.push('\n');
    }
    Ok(out.into_bytes())
}

/// Parses a tree payload back into its entries. `oid` is only used to
/// label errors.
pub fn parse_tree(oid: &Oid, payload: &[u8]) -> UgitResult<Vec<TreeEntry>> {
    let text = std::str::from_utf8(payload).map_err(|_| UgitError::BadTree {
        oid: oid.to_string(),
        reason: "tree payload is not valid UTF-8".to_string(),
    })?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let mut parts = line.splitn(3, ' ');
        let (kind, entry_oid, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(entry_oid), Some(name)) => (kind, entry_oid, name),
            _ => {
                return Err(UgitError::BadTree {
                    oid: oid.to_string(),
                    reason: format!("malformed entry line {line:?}"),
                });
            }
        };
        let kind = EntryKind::parse(kind).ok_or_else(|| UgitError::BadTree {
            oid: oid.to_string(),
            reason: format!("unknown entry type {kind:?}"),
        })?;
        let entry_oid = Oid::from_hex(entry_oid).ok_or_else(|| UgitError::BadTree {
            oid: oid.to_string(),
            reason: format!("malformed entry oid {entry_oid:?}"),
        })?;
        validate_entry_name(name)?;
        entries.push(TreeEntry { kind, oid: entry_oid, name: name.to_string() });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_hex(format!("{byte:02x}").repeat(20)).unwrap()
    }

    #[test]
    fn serialize_sorts_entries_by_name() {
        let entries = vec![
            TreeEntry { kind: EntryKind::Blob, oid: oid(2), name: "b.txt".to_string() },
            TreeEntry { kind: EntryKind::Blob, oid: oid(1), name: "a.txt".to_string() },
        ];
        let payload = serialize_tree(entries).unwrap();
        let text = String::from_utf8(payload).unwrap();
        let first_line_pos = text.find("a.txt").unwrap();
        let second_line_pos = text.find("b.txt").unwrap();
        assert!(first_line_pos < second_line_pos);
    }

    #[test]
    fn round_trip_preserves_entries() {
        let entries = vec![
            TreeEntry { kind: EntryKind::Tree, oid: oid(3), name: "sub".to_string() },
            TreeEntry { kind: EntryKind::Blob, oid: oid(1), name: "a.txt".to_string() },
        ];
        let payload = serialize_tree(entries.clone()).unwrap();
        let root_oid = oid(9);
        let mut parsed = parse_tree(&root_oid, &payload).unwrap();
        parsed.sort_by(|a, b| a.name.cmp(&b.name));
        let mut expected = entries;
        expected.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn empty_directory_is_empty_payload() {
        let payload = serialize_tree(vec![]).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn rejects_name_with_path_separator() {
        let entries = vec![TreeEntry { kind: EntryKind::Blob, oid: oid(1), name: "a/b".to_string() }];
        assert_matches!(serialize_tree(entries), Err(UgitError::BadName { .. }));
    }

    #[test]
    fn parse_rejects_unknown_header_type() {
        let root_oid = oid(9);
        let payload = format!("bogus {} name\n", oid(1));
        assert_matches!(parse_tree(&root_oid, payload.as_bytes()), Err(UgitError::BadTree { .. }));
    }
}
