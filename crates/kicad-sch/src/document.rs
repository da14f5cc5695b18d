//! Document lifecycle: load, query, queue edits, commit.
//!
//! The source buffer is immutable between load and commit; the tree and
//! its spans are built once and never adjusted. Edits accumulate in a
//! queue bound to the document and are spliced only at render/commit time.
//! Commit consumes the document: spans refer to the pre-commit buffer, so
//! further edits require reloading.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use kicad_sexpr::query::{arg_atom, field_of};
use kicad_sexpr::{EditQueue, List, ParseError, ParseErrorKind, SourceTree};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::types::{Component, ComponentSummary, LabelInfo, LabelKind, PropertyEdit};
use crate::{labels, symbols, title_block};

/// Which lexical conventions the file's KiCad generation uses when new
/// forms are synthesized. Reading accepts every encoding regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatDialect {
    /// KiCad 6-era files: visibility is a bare `hide` atom inside
    /// `effects`.
    Legacy,
    /// KiCad 7+ files: boolean flags are `(hide yes)` / `(hide no)` lists.
    Modern,
}

impl FormatDialect {
    /// Version stamps at or after this date write boolean flag lists.
    const MODERN_STAMP: i64 = 20230000;

    /// Dialect for a `(version N)` stamp. A missing or unreadable stamp is
    /// treated as modern.
    pub fn from_version(stamp: Option<i64>) -> Self {
        match stamp {
            Some(version) if version < Self::MODERN_STAMP => FormatDialect::Legacy,
            _ => FormatDialect::Modern,
        }
    }

    fn detect(root: &List) -> Self {
        let stamp = field_of(root, "version")
            .and_then(|version| arg_atom(version, 0))
            .and_then(|atom| atom.value.parse().ok());
        Self::from_version(stamp)
    }
}

/// A loaded schematic with its pending edits.
#[derive(Debug)]
pub struct Document {
    source: String,
    tree: SourceTree,
    queue: EditQueue,
    dialect: FormatDialect,
}

fn root_list(tree: &SourceTree) -> &List {
    tree.root().expect("document root validated at parse time")
}

impl Document {
    /// Load a schematic from disk.
    ///
    /// # Errors
    ///
    /// `Io` on filesystem failure; `Parse` (with byte offset) on invalid
    /// UTF-8 or malformed s-expression text. No document is created on
    /// failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        let source = String::from_utf8(bytes).map_err(|err| {
            ParseError::new(ParseErrorKind::InvalidUtf8, err.utf8_error().valid_up_to())
        })?;
        Self::parse(source)
    }

    /// Parse a schematic from text already in memory.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let tree = kicad_sexpr::parse(&source)?;
        if tree.root().is_none() {
            return Err(Error::MissingRoot);
        }
        let dialect = FormatDialect::detect(root_list(&tree));
        Ok(Self {
            source,
            tree,
            queue: EditQueue::new(),
            dialect,
        })
    }

    /// The original source text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The schematic's top-level list.
    pub fn root(&self) -> &List {
        root_list(&self.tree)
    }

    pub fn dialect(&self) -> FormatDialect {
        self.dialect
    }

    /// Number of edits waiting for commit.
    pub fn pending_edits(&self) -> usize {
        self.queue.len()
    }

    /// Direct access to the edit queue, for surgery the adapter methods do
    /// not cover (raw span replacement of structures). Spans come from
    /// [`Document::root`].
    pub fn queue_mut(&mut self) -> &mut EditQueue {
        &mut self.queue
    }

    /// Apply all pending edits and return the output bytes without
    /// touching the filesystem. With an empty queue this is the identity.
    pub fn render(&self) -> String {
        self.queue.apply(&self.source)
    }

    /// Apply all pending edits and write the result to `path` (which may
    /// equal the source path).
    ///
    /// The write is atomic: a temp file in the destination directory is
    /// written, synced, and renamed over the target. On any failure the
    /// target is untouched and the temp file is cleaned up. Commit
    /// consumes the document; spans are only valid against the pre-commit
    /// buffer.
    pub fn commit(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output = self.render();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(output.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| Error::Io(err.error))?;
        Ok(())
    }

    /// Enumerate symbols as `{reference, value, footprint}` rows.
    pub fn list_components(&self) -> Vec<ComponentSummary> {
        symbols::list_components(self.root())
    }

    /// All properties of the named symbol, with visibility.
    pub fn get_component(&self, reference: &str) -> Result<Component> {
        symbols::get_component(self.root(), reference)
    }

    /// Queue property edits for the named symbol; see
    /// [`PropertyEdit`](crate::types::PropertyEdit). Returns the number of
    /// properties affected.
    pub fn update_component(
        &mut self,
        reference: &str,
        edits: &BTreeMap<String, PropertyEdit>,
    ) -> Result<usize> {
        symbols::update_component(
            &self.source,
            root_list(&self.tree),
            self.dialect,
            &mut self.queue,
            reference,
            edits,
        )
    }

    /// Queue a rename of every net label whose text equals `old`. Returns
    /// the number of labels renamed.
    pub fn rename_net(&mut self, old: &str, new: &str) -> Result<usize> {
        labels::rename_net(root_list(&self.tree), &mut self.queue, old, new)
    }

    /// All labels of the given kinds, in source order.
    pub fn labels(&self, kinds: &[LabelKind]) -> Vec<LabelInfo> {
        labels::list_labels(self.root(), kinds)
    }

    /// The title block's fields as a name→value map; see
    /// [`schematic_info`](title_block::schematic_info). Errors with
    /// `TitleBlockNotFound` when the schematic has no title block.
    pub fn schematic_info(&self) -> Result<BTreeMap<String, String>> {
        title_block::schematic_info(self.root())
    }

    /// Queue title-block field updates; see
    /// [`update_schematic_info`](title_block::update_schematic_info).
    pub fn update_schematic_info(&mut self, fields: &BTreeMap<String, String>) -> Result<usize> {
        title_block::update_schematic_info(
            &self.source,
            root_list(&self.tree),
            &mut self.queue,
            fields,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_threshold() {
        assert_eq!(
            FormatDialect::from_version(Some(20211123)),
            FormatDialect::Legacy
        );
        assert_eq!(
            FormatDialect::from_version(Some(20250114)),
            FormatDialect::Modern
        );
        assert_eq!(FormatDialect::from_version(None), FormatDialect::Modern);
    }

    #[test]
    fn parse_detects_dialect_from_version_form() {
        let modern = Document::parse("(kicad_sch (version 20250114))").unwrap();
        assert_eq!(modern.dialect(), FormatDialect::Modern);
        let legacy = Document::parse("(kicad_sch (version 20211123))").unwrap();
        assert_eq!(legacy.dialect(), FormatDialect::Legacy);
        let unstamped = Document::parse("(kicad_sch)").unwrap();
        assert_eq!(unstamped.dialect(), FormatDialect::Modern);
    }

    #[test]
    fn top_level_atom_is_not_a_root() {
        assert!(matches!(
            Document::parse("stray"),
            Err(Error::MissingRoot)
        ));
    }

    #[test]
    fn render_with_no_edits_is_identity() {
        let source = "(kicad_sch\n\t(version 20250114)\n)\n";
        let doc = Document::parse(source).unwrap();
        assert_eq!(doc.render(), source);
        assert_eq!(doc.pending_edits(), 0);
    }
}
