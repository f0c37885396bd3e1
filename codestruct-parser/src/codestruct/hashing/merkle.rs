//! Cached hashes for a whole document

use super::{combine, own_hash, ContentHash};
use crate::codestruct::model::{Document, EntityId};

/// Own-content and subtree hashes for every entity of one document, indexed by
/// [`EntityId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    own: Vec<ContentHash>,
    subtree: Vec<ContentHash>,
}

impl MerkleTree {
    pub fn build(document: &Document) -> Self {
        let count = document.len() + 1;
        let own: Vec<ContentHash> = (0..count)
            .map(|index| own_hash(document.entity(EntityId(index))))
            .collect();
        let mut subtree = own.clone();

        // children always come after their parent in the arena, so a reverse sweep sees
        // every child before its parent
        for index in (0..count).rev() {
            let entity = document.entity(EntityId(index));
            if entity.children.is_empty() {
                continue;
            }
            let children: Vec<ContentHash> = entity
                .children
                .iter()
                .map(|child| subtree[child.index()])
                .collect();
            subtree[index] = combine(own[index], &children);
        }

        log::debug!("hashed {} entities", count - 1);
        Self { own, subtree }
    }

    /// Hash of the whole document
    pub fn root(&self) -> ContentHash {
        self.subtree[EntityId::ROOT.index()]
    }

    /// Subtree hash of an entity
    pub fn hash_of(&self, id: EntityId) -> ContentHash {
        self.subtree[id.index()]
    }

    /// Hash of the entity's own fields only
    pub fn own_hash_of(&self, id: EntityId) -> ContentHash {
        self.own[id.index()]
    }

    /// O(1) "anything changed?" test
    pub fn same_as(&self, other: &MerkleTree) -> bool {
        self.root() == other.root()
    }
}
