//! # kicad-sch
//!
//! Surgical editing of KiCad schematic files (`.kicad_sch`).
//!
//! A [`Document`] parses a schematic into a span-annotated tree (via
//! `kicad-sexpr`), exposes schematic-level operations — component listing,
//! property reads and updates, net-label renames, title-block edits — and
//! guarantees that every byte outside the edited regions survives commit
//! bit-exact. Constructs the editor does not model (mirror flags, DNP
//! state, future KiCad fields) are opaque subtrees and are never rewritten.
//!
//! Both KiCad 6 (space-indented, bare `hide` atoms) and KiCad 9
//! (tab-indented, `(hide yes)` flags) conventions are accepted without
//! reformatting; synthesized forms follow the dialect detected from the
//! file's `(version N)` stamp.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use kicad_sch::{Document, PropertyEdit};
//!
//! let mut doc = Document::load("board.kicad_sch").unwrap();
//! let edits = BTreeMap::from([("Value".to_string(), PropertyEdit::set("4k7"))]);
//! doc.update_component("R1", &edits).unwrap();
//! doc.commit("board.kicad_sch").unwrap();
//! ```

pub mod document;
pub mod error;
pub mod labels;
pub mod query;
pub mod symbols;
pub mod title_block;
pub mod types;

// Re-export main types
pub use document::{Document, FormatDialect};
pub use error::{Error, Result};
pub use types::{
    Component, ComponentSummary, LabelInfo, LabelKind, PropertyEdit, PropertyInfo,
    TitleBlockField,
};
