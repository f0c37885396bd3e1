//! Content hashing
//!
//! Every entity gets a SHA-256 digest over a normalized form of its own fields:
//!
//! - keyword, lower-cased and trimmed
//! - names, trimmed, in order
//! - attributes sorted by key; bare and quoted strings with the same text hash equal
//! - doc text and the implementation (language and code)
//!
//! Source positions, comments and stored hash ids never take part. A leaf's hash is its
//! own digest; an interior entity's hash also covers the ordered hashes of its children,
//! so any change below an entity changes it and every ancestor, and nothing else.
//!
//! [`MerkleTree`] caches both digests for a whole document; [`locate_change`] walks two
//! trees to the smallest changed subtree.

pub mod diff;
pub mod merkle;

pub use diff::{locate_change, ChangeKind, ChangePath, PathStep};
pub use merkle::MerkleTree;

use super::model::{AttributeValue, Document, Entity, EntityId};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Minimum number of hex digits for a stored hash id to be compared against a hash
pub const MIN_HASH_ID_LEN: usize = 6;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{:02x}", byte)).collect()
    }

    /// Abbreviated hex form, as used for hash ids
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }

    /// Does a stored hash id refer to this hash? Ids are case-insensitive hex prefixes of
    /// at least [`MIN_HASH_ID_LEN`] digits.
    pub fn matches_id(&self, id: &str) -> bool {
        let id = id.trim();
        id.len() >= MIN_HASH_ID_LEN
            && id.chars().all(|c| c.is_ascii_hexdigit())
            && self.to_hex().starts_with(&id.to_ascii_lowercase())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Hash of an entity including its whole subtree
pub fn hash(document: &Document, id: EntityId) -> ContentHash {
    let own = own_hash(document.entity(id));
    let children: Vec<ContentHash> = document
        .entity(id)
        .children
        .iter()
        .map(|child| hash(document, *child))
        .collect();
    combine(own, &children)
}

/// Digest of an entity's own fields, children excluded
pub fn own_hash(entity: &Entity) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(b"codestruct:entity:v1\0");
    field(&mut hasher, b"keyword", entity.keyword.normalized().as_bytes());
    for name in &entity.names {
        field(&mut hasher, b"name", name.text.trim().as_bytes());
    }

    let mut attributes: Vec<_> = entity.attributes.iter().collect();
    attributes.sort_by(|a, b| a.key.cmp(&b.key));
    for attribute in attributes {
        field(&mut hasher, b"attr", attribute.key.as_bytes());
        value(&mut hasher, &attribute.value);
    }

    if let Some(doc) = &entity.doc {
        field(&mut hasher, b"doc", doc.text.trim().as_bytes());
    }
    if let Some(implementation) = &entity.implementation {
        field(
            &mut hasher,
            b"impl-lang",
            implementation.language.as_deref().unwrap_or("").as_bytes(),
        );
        field(&mut hasher, b"impl-code", implementation.code.as_bytes());
    }
    finish(hasher)
}

/// Merkle step: a leaf is its own digest, an interior node covers its ordered children
pub(crate) fn combine(own: ContentHash, children: &[ContentHash]) -> ContentHash {
    if children.is_empty() {
        return own;
    }
    let mut hasher = Sha256::new();
    hasher.update(b"codestruct:node:v1\0");
    hasher.update(own.as_bytes());
    hasher.update((children.len() as u64).to_le_bytes());
    for child in children {
        hasher.update(child.as_bytes());
    }
    finish(hasher)
}

fn finish(hasher: Sha256) -> ContentHash {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    ContentHash(bytes)
}

/// Tagged, length-prefixed field so that adjacent fields can't run together
fn field(hasher: &mut Sha256, tag: &[u8], bytes: &[u8]) {
    hasher.update(tag);
    hasher.update([0u8]);
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn value(hasher: &mut Sha256, value: &AttributeValue) {
    match value {
        AttributeValue::Bare(text) | AttributeValue::Quoted(text) => {
            field(hasher, b"str", text.as_bytes())
        }
        AttributeValue::Number(text) => field(hasher, b"num", text.as_bytes()),
        AttributeValue::Array(items) => {
            field(hasher, b"array", &(items.len() as u64).to_le_bytes());
            for item in items {
                self::value(hasher, item);
            }
        }
    }
}

/// Entities whose authoritative hash id no longer matches their current content hash
pub fn stale_hash_ids(document: &Document, tree: &MerkleTree) -> Vec<EntityId> {
    document
        .walk()
        .into_iter()
        .filter(|id| {
            document
                .entity(*id)
                .hash_id()
                .is_some_and(|stored| !tree.hash_of(*id).matches_id(stored))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::parse_document;

    fn root_hash(source: &str) -> ContentHash {
        let document = parse_document(source).expect("source should parse");
        hash(&document, EntityId::ROOT)
    }

    #[test]
    fn test_deterministic() {
        let source = "module: m\n  func: f [type: int]\n";
        assert_eq!(root_hash(source), root_hash(source));
    }

    #[test]
    fn test_layout_does_not_matter() {
        assert_eq!(
            root_hash("module: m\n  func: f [type: int] # note\n"),
            root_hash("# header\nmodule:   m\n\n    func: f   [ type : int ]\n"),
        );
    }

    #[test]
    fn test_attribute_order_and_quoting_do_not_matter() {
        assert_eq!(
            root_hash("var: x [a: one, b: 2]\n"),
            root_hash("var: x [b: 2, a: \"one\"]\n"),
        );
    }

    #[test]
    fn test_keyword_case_does_not_matter() {
        assert_eq!(root_hash("Module: m\n"), root_hash("module: m\n"));
    }

    #[test]
    fn test_hash_ids_do_not_matter() {
        assert_eq!(root_hash("func: f ::: abcdef\n"), root_hash("func: f\n"));
    }

    #[test]
    fn test_child_order_matters() {
        assert_ne!(
            root_hash("module: m\n  var: a\n  var: b\n"),
            root_hash("module: m\n  var: b\n  var: a\n"),
        );
    }

    #[test]
    fn test_number_is_not_a_string() {
        assert_ne!(
            root_hash("var: x [size: 4]\n"),
            root_hash("var: x [size: \"4\"]\n"),
        );
    }

    #[test]
    fn test_doc_and_impl_matter() {
        assert_ne!(root_hash("func: f\n  doc: a\n"), root_hash("func: f\n  doc: b\n"));
        assert_ne!(
            root_hash("func: f\n  impl: ```\n  x\n  ```\n"),
            root_hash("func: f\n  impl: ```\n  y\n  ```\n"),
        );
    }

    #[test]
    fn test_leaf_hash_is_own_hash() {
        let document = parse_document("var: x\n").unwrap();
        let id = document.top_level()[0];
        assert_eq!(hash(&document, id), own_hash(document.entity(id)));
    }

    #[test]
    fn test_matches_id() {
        let document = parse_document("var: x\n").unwrap();
        let hash = hash(&document, document.top_level()[0]);
        let hex = hash.to_hex();
        assert!(hash.matches_id(&hex[..8]));
        assert!(hash.matches_id(&hex[..8].to_uppercase()));
        assert!(!hash.matches_id(&hex[..4]));
        assert!(!hash.matches_id("zzzzzzzz"));
    }

    #[test]
    fn test_stale_hash_ids() {
        let document = parse_document("var: x ::: 000000\nvar: y\n").unwrap();
        let tree = MerkleTree::build(&document);
        let stale = stale_hash_ids(&document, &tree);
        assert_eq!(stale, vec![document.top_level()[0]]);

        let fresh = format!("var: x ::: {}\n", tree.hash_of(document.top_level()[0]).short());
        let document = parse_document(&fresh).unwrap();
        assert!(stale_hash_ids(&document, &MerkleTree::build(&document)).is_empty());
    }
}
