//! The legend block appended after minified output

use super::tables::{Abbreviations, ATTRIBUTE_KEYS, KEYWORDS, TABLE_VERSION, TYPES, VALUES};

/// `#` lines describing the format and the abbreviation tables
pub fn legend() -> String {
    let lines = [
        format!("# CodeStruct Minified Format Legend (tables v{})", TABLE_VERSION),
        "# Format: entity;entity|child|(child|grandchild) keyword:name&name[key:value,...]"
            .to_string(),
        table_line("Keywords", &KEYWORDS),
        table_line("Attributes", &ATTRIBUTE_KEYS),
        table_line("Types", &TYPES),
        table_line("Values", &VALUES),
        "# Delimiters: ; root siblings | children () nested block & group , attributes".to_string(),
        "# Docs: dc:\"text\" as the first child when kept".to_string(),
        "# Notes: impl blocks, hash IDs (:::) and comments are omitted".to_string(),
    ];
    lines.join("\n")
}

fn table_line(title: &str, table: &Abbreviations) -> String {
    let pairs: Vec<String> = table
        .pairs()
        .iter()
        .map(|(full, short)| format!("{}={}", short, full))
        .collect();
    format!("# {}: {}", title, pairs.join(", "))
}
