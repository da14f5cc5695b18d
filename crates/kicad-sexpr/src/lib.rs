//! # kicad-sexpr
//!
//! Span-preserving s-expression parsing and surgical editing.
//!
//! This crate parses Lisp-style text (KiCad schematics in particular) into
//! a tree whose every node carries its `[start, end)` byte range in the
//! original buffer, and lets callers queue byte-range edits against that
//! buffer. Everything outside an edited span is preserved bit-exact, which
//! is what makes it safe to edit a format the tree does not fully model:
//! the parser knows just enough structure to *find* edit targets, never
//! enough to rebuild the file.
//!
//! # Overview
//!
//! The core types are:
//! - [`Node`] / [`Atom`] / [`List`]: the span-annotated tree
//! - [`EditQueue`]: buffered replacements/insertions/deletions with
//!   conflict rejection and back-to-front application
//! - [`Value`]: scalar rendering in KiCad's lexical conventions
//!
//! # Example
//!
//! ```rust
//! use kicad_sexpr::{parse, query, replace_atom, EditQueue, Value};
//!
//! let source = "(property \"Value\" \"10k\")";
//! let tree = parse(source).unwrap();
//! let property = tree.root().unwrap();
//!
//! let value = query::arg_atom(property, 1).unwrap();
//! let mut edits = EditQueue::new();
//! replace_atom(&mut edits, value, &Value::from("4k7")).unwrap();
//!
//! assert_eq!(edits.apply(source), "(property \"Value\" \"4k7\")");
//! ```

pub mod edit;
pub mod error;
pub mod format;
pub mod node;
pub mod parser;
pub mod query;
pub mod span;

// Re-export main types
pub use edit::{delete_node, insert_before_close, leading_indent, replace_atom, replace_list};
pub use edit::{Edit, EditKind, EditQueue};
pub use error::{OverlappingEdit, ParseError, ParseErrorKind, ParseResult};
pub use format::{decode_string, encode_string, format_number, Value};
pub use node::{Atom, AtomKind, List, Node, SourceTree};
pub use parser::parse;
pub use span::Span;
