//! # sisl-core
//!
//! Codec for **SISL (Simple Indented Structured Language)** — a textual
//! encoding of JSON-like documents in which every scalar carries an
//! explicit type tag:
//!
//! ```text
//! {name: !str "Alice", scores: !list {_0: !int "95", _1: !int "87"}}
//! ```
//!
//! Beyond the text codec, the crate provides size-bounded fragmentation
//! (split one document into several SISL strings under a length limit),
//! deep-merge joining of such fragments, and two XML bridges (a typed
//! one-to-one shape and a lossy-but-general representation of arbitrary
//! XML) with automatic mode detection.
//!
//! ## Quick start
//!
//! ```rust
//! use sisl_core::{from_json_str, join, parse, split, to_json_string, write};
//!
//! // JSON → SISL
//! let doc = from_json_str(r#"{"hello":"world"}"#).unwrap();
//! let sisl = write(&doc).unwrap();
//! assert_eq!(sisl, r#"{hello: !str "world"}"#);
//!
//! // SISL → JSON (roundtrip)
//! let back = parse(&sisl).unwrap();
//! assert_eq!(to_json_string(&back).unwrap(), r#"{"hello":"world"}"#);
//!
//! // Split into bounded fragments, then reassemble
//! let doc = from_json_str(r#"{"abc":2,"def":3}"#).unwrap();
//! let parts = split(&doc, 20).unwrap();
//! assert_eq!(parts.len(), 2);
//! assert_eq!(join(&parts).unwrap(), doc);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the document model (seven-variant tagged tree)
//! - [`lexer`] / [`parser`] — SISL text → token stream → AST
//! - [`decoder`] — AST → document, with tag/payload validation
//! - [`encoder`] — document → canonical SISL text
//! - [`split`] / [`merge`] — bounded fragmentation and deep-merge joining
//! - [`json`] — `serde_json` adapter (insertion-ordered)
//! - [`xml`] — typed and generic XML codecs plus mode routing
//! - [`error`] — error types with CLI diagnostic prefixes

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod json;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod split;
pub mod value;
pub mod xml;

pub use decoder::parse;
pub use encoder::write;
pub use error::{Result, SislError};
pub use json::{from_json_str, to_json_string};
pub use merge::join;
pub use split::split;
pub use value::{Map, Tag, Value};
pub use xml::{document_to_xml, is_typed_xml, parse_xml, xml_to_document, XmlDocument, XmlElement};
