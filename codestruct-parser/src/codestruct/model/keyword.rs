//! Entity keywords
//!
//! The keyword set is open: any word followed by a colon at the start of a line declares
//! an entity. Keywords the toolchain knows about carry a [`KeywordInfo`] record with their
//! minified abbreviation, whether documentation is conventionally expected, and the noun
//! used in placeholder docs. Unknown keywords fall back to generic handling.

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordInfo {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub requires_doc: bool,
    pub noun: &'static str,
}

const fn info(
    name: &'static str,
    abbreviation: &'static str,
    requires_doc: bool,
    noun: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        name,
        abbreviation,
        requires_doc,
        noun,
    }
}

/// Known keywords, in legend order
pub const KNOWN_KEYWORDS: &[KeywordInfo] = &[
    info("dir", "d", false, "directory"),
    info("file", "f", false, "file"),
    info("module", "m", true, "module"),
    info("namespace", "ns", false, "namespace"),
    info("class", "cl", true, "class"),
    info("func", "fn", true, "function"),
    info("lambda", "lm", false, "lambda"),
    info("attr", "at", false, "attribute"),
    info("param", "p", false, "parameter"),
    info("returns", "r", false, "return value"),
    info("var", "v", false, "variable"),
    info("const", "c", false, "constant"),
    info("type_alias", "ta", false, "type alias"),
    info("union", "u", false, "union"),
    info("optional", "opt", false, "optional"),
    info("import", "i", false, "import"),
    info("doc", "dc", false, "doc"),
];

static INTERNED: Lazy<HashMap<&'static str, (Arc<str>, &'static KeywordInfo)>> = Lazy::new(|| {
    KNOWN_KEYWORDS
        .iter()
        .map(|info| (info.name, (Arc::from(info.name), info)))
        .collect()
});

/// An entity keyword as authored. Known keywords share one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Arc<str>);

impl Keyword {
    pub fn new(text: &str) -> Self {
        match INTERNED.get(text) {
            Some((interned, _)) => Keyword(Arc::clone(interned)),
            None => Keyword(Arc::from(text)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased, trimmed form used for hashing and rule matching
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }

    /// Capability record, if this is a known keyword (matched case-insensitively)
    pub fn info(&self) -> Option<&'static KeywordInfo> {
        INTERNED
            .get(self.normalized().as_str())
            .map(|(_, info)| *info)
    }

    /// Noun for placeholder docs: `func` → "function", unknown keywords use themselves
    pub fn noun(&self) -> &str {
        self.info().map(|info| info.noun).unwrap_or(self.as_str())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for Keyword {
    fn from(text: &str) -> Self {
        Keyword::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keywords_share_allocation() {
        let a = Keyword::new("class");
        let b = Keyword::new("class");
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a.info().unwrap().abbreviation, "cl");
    }

    #[test]
    fn test_unknown_keyword_is_generic() {
        let kw = Keyword::new("endpoint");
        assert!(kw.info().is_none());
        assert_eq!(kw.noun(), "endpoint");
    }

    #[test]
    fn test_case_insensitive_capabilities() {
        let kw = Keyword::new("Func");
        assert_eq!(kw.as_str(), "Func");
        assert_eq!(kw.normalized(), "func");
        assert_eq!(kw.noun(), "function");
        assert!(kw.info().unwrap().requires_doc);
    }
}
