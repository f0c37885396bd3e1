//! Entity model
//!
//! The semantic tree every pass after building works on. See [`document`] for the arena
//! layout and [`entity`] for the per-entity fields.

pub mod document;
pub mod entity;
pub mod keyword;
pub mod value;

pub use document::{Document, EntityView};
pub use entity::{Attribute, Comment, Doc, Entity, EntityId, HashId, Implementation, Name};
pub use keyword::{Keyword, KeywordInfo, KNOWN_KEYWORDS};
pub use value::AttributeValue;
