//! Abbreviation tables
//!
//! The tables are fixed for a given [`TABLE_VERSION`]; minified text written with one
//! version must expand the same way forever. Add a new version rather than editing these.

use crate::codestruct::model::KNOWN_KEYWORDS;
use once_cell::sync::Lazy;

pub const TABLE_VERSION: u32 = 1;

/// Two-way map between full and short forms
#[derive(Debug)]
pub struct Abbreviations {
    pairs: Vec<(&'static str, &'static str)>,
}

impl Abbreviations {
    fn new(pairs: Vec<(&'static str, &'static str)>) -> Self {
        Self { pairs }
    }

    /// A table that expands nothing
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn shorten(&self, long: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(full, _)| *full == long)
            .map(|(_, short)| *short)
    }

    pub fn expand(&self, short: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(_, abbreviation)| *abbreviation == short)
            .map(|(full, _)| *full)
    }

    /// True if `text` would be read back as an abbreviation
    pub fn is_short(&self, text: &str) -> bool {
        self.expand(text).is_some()
    }

    /// `(full, short)` pairs in table order
    pub fn pairs(&self) -> &[(&'static str, &'static str)] {
        &self.pairs
    }
}

pub static KEYWORDS: Lazy<Abbreviations> = Lazy::new(|| {
    Abbreviations::new(
        KNOWN_KEYWORDS
            .iter()
            .map(|info| (info.name, info.abbreviation))
            .collect(),
    )
});

pub static ATTRIBUTE_KEYS: Lazy<Abbreviations> = Lazy::new(|| {
    Abbreviations::new(vec![
        ("type", "t"),
        ("default", "d"),
        ("source", "s"),
        ("ref", "rf"),
        ("visibility", "vis"),
        ("static", "st"),
        ("abstract", "abs"),
        ("final", "fin"),
        ("async", "as"),
    ])
});

/// Type names, applied to entity names and to values
pub static TYPES: Lazy<Abbreviations> = Lazy::new(|| {
    Abbreviations::new(vec![
        ("INTEGER", "INT"),
        ("STRING", "STR"),
        ("BOOLEAN", "BOOL"),
        ("FLOAT", "FLT"),
    ])
});

/// Common values, applied to attribute values only
pub static VALUES: Lazy<Abbreviations> = Lazy::new(|| {
    Abbreviations::new(vec![
        ("external", "ext"),
        ("internal", "int"),
        ("public", "pub"),
        ("private", "priv"),
        ("protected", "prot"),
        ("true", "T"),
        ("false", "F"),
    ])
});

/// Everything that may be abbreviated in value position
pub static VALUE_TOKENS: Lazy<Abbreviations> = Lazy::new(|| {
    Abbreviations::new(
        TYPES
            .pairs()
            .iter()
            .chain(VALUES.pairs())
            .copied()
            .collect(),
    )
});
