//! Minimal change location
//!
//! Starting at the roots of two documents, descend while the subtree hashes differ:
//!
//! - if an entity's own fields differ, the change is there;
//! - if both entities have the same number of children, follow the first child index
//!   whose hashes differ;
//! - otherwise children were inserted or removed, and the change is the parent's child
//!   list.
//!
//! Cost is the length of the path times the fan-out along it.

use super::MerkleTree;
use crate::codestruct::model::{Document, EntityId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// The entity's own fields (keyword, names, attributes, doc, impl) changed
    Content,
    /// Children were added or removed
    Children,
}

/// One step down the tree: the child index and the entity on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub index: usize,
    pub old: EntityId,
    pub new: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePath {
    /// Steps from the root; empty when the change is at the root itself
    pub steps: Vec<PathStep>,
    pub kind: ChangeKind,
}

impl ChangePath {
    /// The changed entity in the old document
    pub fn old_target(&self) -> EntityId {
        self.steps.last().map(|step| step.old).unwrap_or(EntityId::ROOT)
    }

    /// The changed entity in the new document
    pub fn new_target(&self) -> EntityId {
        self.steps.last().map(|step| step.new).unwrap_or(EntityId::ROOT)
    }

    /// Labels along the path in the new document, e.g. `["module:main", "func:bar"]`
    pub fn labels(&self, new: &Document) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| new.entity(step.new).label())
            .collect()
    }
}

/// Locate the smallest changed subtree between two documents, or `None` when their root
/// hashes agree.
pub fn locate_change(
    old: &Document,
    old_tree: &MerkleTree,
    new: &Document,
    new_tree: &MerkleTree,
) -> Option<ChangePath> {
    if old_tree.same_as(new_tree) {
        return None;
    }

    let mut steps = Vec::new();
    let (mut old_id, mut new_id) = (EntityId::ROOT, EntityId::ROOT);
    loop {
        if old_tree.own_hash_of(old_id) != new_tree.own_hash_of(new_id) {
            return Some(ChangePath {
                steps,
                kind: ChangeKind::Content,
            });
        }

        let old_children = &old.entity(old_id).children;
        let new_children = &new.entity(new_id).children;
        if old_children.len() != new_children.len() {
            return Some(ChangePath {
                steps,
                kind: ChangeKind::Children,
            });
        }

        let differing = old_children
            .iter()
            .zip(new_children)
            .enumerate()
            .find(|(_, (a, b))| old_tree.hash_of(**a) != new_tree.hash_of(**b));
        match differing {
            Some((index, (a, b))) => {
                steps.push(PathStep {
                    index,
                    old: *a,
                    new: *b,
                });
                old_id = *a;
                new_id = *b;
            }
            // same own fields and same children: the subtree hashes can't differ
            None => {
                return Some(ChangePath {
                    steps,
                    kind: ChangeKind::Content,
                })
            }
        }
    }
}
