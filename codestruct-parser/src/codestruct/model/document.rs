//! Document arena
//!
//! Entities live in one `Vec` and refer to each other by [`EntityId`]. Index 0 is a
//! synthetic root (`$document: $root`) that owns the top-level entities and any top-level
//! doc or impl fields. A built document is an immutable snapshot; only the builder and the
//! minified reader add entities.

use super::entity::{Entity, EntityId, Name};
use super::keyword::Keyword;
use super::value::AttributeValue;
use crate::codestruct::range::Range;
use serde::Serialize;

pub const ROOT_KEYWORD: &str = "$document";
pub const ROOT_NAME: &str = "$root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    entities: Vec<Entity>,
}

impl Document {
    /// An empty document holding only the root
    pub fn new() -> Self {
        let root = Entity::new(
            EntityId::ROOT,
            Keyword::new(ROOT_KEYWORD),
            vec![Name {
                text: ROOT_NAME.to_string(),
                range: Range::default(),
            }],
            Range::default(),
        );
        Self {
            entities: vec![root],
        }
    }

    pub fn root(&self) -> &Entity {
        &self.entities[0]
    }

    /// Entity by id. Ids are only valid for the document that issued them.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    /// Number of entities, not counting the root
    pub fn len(&self) -> usize {
        self.entities.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn top_level(&self) -> &[EntityId] {
        &self.root().children
    }

    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> + '_ {
        self.entity(id)
            .children
            .iter()
            .map(move |child| self.entity(*child))
    }

    /// Ancestors from the parent up to (but not including) the root
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut ancestors = Vec::new();
        let mut current = self.entity(id).parent;
        while let Some(parent) = current {
            if parent == EntityId::ROOT {
                break;
            }
            ancestors.push(parent);
            current = self.entity(parent).parent;
        }
        ancestors
    }

    /// Nesting depth; top-level entities are at 0
    pub fn depth(&self, id: EntityId) -> usize {
        self.ancestors(id).len()
    }

    /// All entities except the root, in document (pre-)order
    pub fn walk(&self) -> Vec<EntityId> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack: Vec<EntityId> = self.top_level().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.entity(id).children.iter().rev().copied());
        }
        order
    }

    /// First entity in document order declaring `name` (any member of a group)
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.walk()
            .into_iter()
            .map(|id| self.entity(id))
            .find(|entity| entity.names.iter().any(|n| n.text == name))
    }

    /// Follow `keyword:name` labels (or bare names) down from the root
    pub fn find_path(&self, path: &[&str]) -> Option<&Entity> {
        let mut current = self.root();
        for step in path {
            current = self.children(current.id).find(|child| {
                child.label() == *step || child.names.iter().any(|n| n.text == *step)
            })?;
        }
        Some(current)
    }

    /// The logical entities an entity stands for: one per name of a grouped declaration
    pub fn expanded(&self, id: EntityId) -> impl Iterator<Item = EntityView<'_>> + '_ {
        let entity = self.entity(id);
        (0..entity.names.len()).map(move |name_index| EntityView {
            document: self,
            entity,
            name_index,
        })
    }

    /// Top-level entities with grouped declarations expanded
    pub fn expanded_top_level(&self) -> Vec<EntityView<'_>> {
        self.expanded_children_of(EntityId::ROOT)
    }

    fn expanded_children_of(&self, id: EntityId) -> Vec<EntityView<'_>> {
        self.entity(id)
            .children
            .iter()
            .flat_map(|child| self.expanded(*child))
            .collect()
    }

    pub(crate) fn push(&mut self, parent: EntityId, mut entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.id = id;
        entity.parent = Some(parent);
        self.entities.push(entity);
        self.entities[parent.0].children.push(id);
        id
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// One logical entity of a (possibly grouped) declaration. Siblings expanded from the
/// same declaration share attributes, doc, implementation and children.
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    document: &'a Document,
    entity: &'a Entity,
    name_index: usize,
}

impl<'a> EntityView<'a> {
    pub fn name(&self) -> &'a str {
        &self.entity.names[self.name_index].text
    }

    pub fn keyword(&self) -> &'a Keyword {
        &self.entity.keyword
    }

    pub fn attribute(&self, key: &str) -> Option<&'a AttributeValue> {
        self.entity.attribute(key)
    }

    /// The declaration this view was expanded from
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    pub fn children(&self) -> Vec<EntityView<'a>> {
        self.document.expanded_children_of(self.entity.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(keyword: &str, names: &[&str]) -> Entity {
        Entity::new(
            EntityId::ROOT,
            Keyword::new(keyword),
            names
                .iter()
                .map(|text| Name {
                    text: text.to_string(),
                    range: Range::default(),
                })
                .collect(),
            Range::default(),
        )
    }

    fn sample() -> Document {
        let mut doc = Document::new();
        let module = doc.push(EntityId::ROOT, named("module", &["m"]));
        let class = doc.push(module, named("class", &["A", "B"]));
        doc.push(class, named("func", &["f"]));
        doc.push(module, named("var", &["v"]));
        doc
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.root().keyword.as_str(), ROOT_KEYWORD);
        assert!(doc.walk().is_empty());
    }

    #[test]
    fn test_walk_is_preorder() {
        let doc = sample();
        let labels: Vec<_> = doc
            .walk()
            .into_iter()
            .map(|id| doc.entity(id).label())
            .collect();
        assert_eq!(labels, vec!["module:m", "class:A", "func:f", "var:v"]);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let doc = sample();
        let func = doc.find("f").unwrap();
        assert_eq!(doc.depth(func.id), 2);
        let ancestors: Vec<_> = doc
            .ancestors(func.id)
            .into_iter()
            .map(|id| doc.entity(id).name().to_string())
            .collect();
        assert_eq!(ancestors, vec!["A", "m"]);
    }

    #[test]
    fn test_grouped_expansion_shares_children() {
        let doc = sample();
        let module = doc.find("m").unwrap();
        let views: Vec<_> = doc.expanded(module.id).collect();
        assert_eq!(views.len(), 1);

        let children = views[0].children();
        let names: Vec<_> = children.iter().map(|view| view.name()).collect();
        assert_eq!(names, vec!["A", "B", "v"]);
        assert_eq!(children[0].entity().id, children[1].entity().id);
        assert_eq!(children[1].children()[0].name(), "f");
    }

    #[test]
    fn test_find_path() {
        let doc = sample();
        assert_eq!(doc.find_path(&["module:m", "B", "func:f"]).unwrap().name(), "f");
        assert!(doc.find_path(&["module:m", "class:Z"]).is_none());
    }
}
