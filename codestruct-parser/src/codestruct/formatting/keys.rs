//! Attribute key fixing
//!
//! Keys that already start lowercase are left alone. UPPER_CASE keys become camelCase
//! (`MAX_SIZE` → `maxSize`), PascalCase keys lose their leading capital (`MaxSize` →
//! `maxSize`). Anything else (leading digit, dashes, ...) is kept as written.

use crate::codestruct::model::{Attribute, AttributeValue};
use once_cell::sync::Lazy;
use regex::Regex;

static LOWER_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9_]*$").expect("valid regex"));
static UPPER_SNAKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid regex"));
static PASCAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("valid regex"));

pub fn camel_case_key(key: &str) -> String {
    if LOWER_START.is_match(key) {
        return key.to_string();
    }
    if UPPER_SNAKE.is_match(key) {
        let mut parts = key
            .split('_')
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase);
        let mut out = parts.next().unwrap_or_default();
        for part in parts {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
        return out;
    }
    if PASCAL.is_match(key) {
        let mut chars = key.chars();
        if let Some(first) = chars.next() {
            return first.to_lowercase().chain(chars).collect();
        }
    }
    key.to_string()
}

/// Attributes with fixed keys. When two keys collapse into one, the later value wins and
/// the first position is kept.
pub fn fix_keys(attributes: &[Attribute]) -> Vec<(String, &AttributeValue)> {
    let mut fixed: Vec<(String, &AttributeValue)> = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let key = camel_case_key(&attribute.key);
        match fixed.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = &attribute.value,
            None => fixed.push((key, &attribute.value)),
        }
    }
    fixed
}
