//! # codestruct-parser
//!
//! The CodeStruct notation engine: an indentation-structured notation for describing
//! software architecture (modules, classes, functions, attributes, docs and implementation
//! snippets).
//!
//! File Layout
//!
//! Everything lives under [`codestruct`], split by pipeline stage:
//!
//! src/codestruct
//!   ├── lexing       text → tokens (indentation stack, fences, quoted strings)
//!   ├── parsing      tokens → parse tree (IR)
//!   ├── building     parse tree → entity model
//!   ├── model        Document arena, entities, attribute values, keywords
//!   ├── hashing      content hashes, Merkle aggregation, change location
//!   ├── linting      diagnostic rules
//!   ├── formatting   canonical rendering
//!   ├── minifying    compact encoding and its reader
//!   └── loader       file and string sources run through the passes
//!
//! The passes after building are pure functions of a [`Document`](codestruct::model::Document)
//! plus their own configuration.

pub mod codestruct;

pub use codestruct::{
    build, format, format_source, hash, lint, lint_source, locate_change, minify, parse,
    parse_document, tokenize, unminify,
};
