//! Pending-edit queue and span-aware edit helpers.
//!
//! Edits are expressed in original-source byte coordinates and buffered
//! until commit. Application splices back-to-front (highest offset first),
//! so earlier spans keep their meaning no matter how the lengths change.
//! Conflicts are rejected at enqueue time; a rejected edit leaves the queue
//! untouched and usable.

use crate::error::OverlappingEdit;
use crate::format::Value;
use crate::node::{Atom, List, Node};
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Replace,
    Insert,
    Delete,
}

/// A single buffered edit: replace `span` with `text`.
///
/// Insertions have an empty span; deletions have empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub text: String,
    pub kind: EditKind,
}

/// Replacements, insertions, and deletions accumulated against one source
/// buffer.
#[derive(Debug, Clone, Default)]
pub struct EditQueue {
    edits: Vec<Edit>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Queue a replacement of `span` with `text`.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) -> Result<(), OverlappingEdit> {
        self.enqueue(Edit {
            span,
            text: text.into(),
            kind: EditKind::Replace,
        })
    }

    /// Queue a zero-width insertion at `offset`.
    ///
    /// Two insertions at the same offset are not a conflict; they apply in
    /// enqueue order.
    pub fn insert(&mut self, offset: usize, text: impl Into<String>) -> Result<(), OverlappingEdit> {
        self.enqueue(Edit {
            span: Span::new(offset, offset),
            text: text.into(),
            kind: EditKind::Insert,
        })
    }

    /// Queue a deletion of `span`.
    pub fn delete(&mut self, span: Span) -> Result<(), OverlappingEdit> {
        self.enqueue(Edit {
            span,
            text: String::new(),
            kind: EditKind::Delete,
        })
    }

    fn enqueue(&mut self, edit: Edit) -> Result<(), OverlappingEdit> {
        for existing in &self.edits {
            if existing.span.intersects(edit.span) {
                return Err(OverlappingEdit {
                    existing: existing.span,
                    attempted: edit.span,
                });
            }
        }
        self.edits.push(edit);
        Ok(())
    }

    /// Apply all pending edits to `source`, producing the output bytes.
    ///
    /// Edits are spliced from the highest offset downward; same-offset
    /// insertions keep their enqueue order. The queue itself is not
    /// consumed, so the same queue renders identically every time.
    pub fn apply(&self, source: &str) -> String {
        let mut order: Vec<usize> = (0..self.edits.len()).collect();
        order.sort_by_key(|&i| (self.edits[i].span.start, i));

        let mut out = source.to_string();
        for &i in order.iter().rev() {
            let edit = &self.edits[i];
            out.replace_range(edit.span.start..edit.span.end, &edit.text);
        }
        out
    }
}

/// Replace an atom's exact token span with an encoded scalar.
///
/// The surrounding list's whitespace, ordering, and unrelated children are
/// untouched; this is the preferred operation for value-only edits.
pub fn replace_atom(
    queue: &mut EditQueue,
    atom: &Atom,
    value: &Value,
) -> Result<(), OverlappingEdit> {
    queue.replace(atom.span, value.encode())
}

/// Replace a list's full `(` … `)` span with caller-formatted bytes.
///
/// The core does not reflow; `bytes` is spliced verbatim.
pub fn replace_list(
    queue: &mut EditQueue,
    list: &List,
    bytes: impl Into<String>,
) -> Result<(), OverlappingEdit> {
    queue.replace(list.span, bytes.into())
}

/// Insert `bytes` as the last content of `list`, before its closing paren.
///
/// The insertion point is the closing `)` backed up over the whitespace run
/// that precedes it, so the bytes land directly after the last child. For a
/// multiline list the caller starts `bytes` with a newline and the sibling
/// indent; for a single-line list a leading space matches sibling style.
pub fn insert_before_close(
    queue: &mut EditQueue,
    source: &str,
    list: &List,
    bytes: impl Into<String>,
) -> Result<(), OverlappingEdit> {
    let floor = list.span.start + 1;
    let mut offset = list.close_offset();
    let src = source.as_bytes();
    while offset > floor && matches!(src[offset - 1], b' ' | b'\t' | b'\r' | b'\n') {
        offset -= 1;
    }
    queue.insert(offset, bytes)
}

/// Delete a node together with the whitespace that introduced it.
///
/// The deleted range extends backwards over spaces and tabs, then over one
/// newline when the node started a line, so removing a whole-line child
/// does not strand a blank line.
pub fn delete_node(
    queue: &mut EditQueue,
    source: &str,
    node: &Node,
) -> Result<(), OverlappingEdit> {
    let span = node.span();
    let src = source.as_bytes();
    let mut start = span.start;
    while start > 0 && matches!(src[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > 0 && src[start - 1] == b'\n' {
        start -= 1;
        if start > 0 && src[start - 1] == b'\r' {
            start -= 1;
        }
    }
    queue.delete(Span::new(start, span.end))
}

/// Indentation of the first child of `list` that begins a line.
///
/// Returns the run of spaces/tabs between that child and the newline before
/// it; `None` when no child starts a line (single-line list or no children).
/// Callers use this to synthesize siblings that match the existing style.
pub fn leading_indent(source: &str, list: &List) -> Option<String> {
    let src = source.as_bytes();
    for child in list.args() {
        let mut start = child.span().start;
        while start > list.span.start && matches!(src[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        if start > 0 && src[start - 1] == b'\n' {
            return Some(source[start..child.span().start].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first_list(source: &str) -> List {
        parse(source).unwrap().root().unwrap().clone()
    }

    #[test]
    fn apply_splices_back_to_front() {
        let source = "aaa bbb ccc";
        let mut queue = EditQueue::new();
        queue.replace(Span::new(0, 3), "xxxx").unwrap();
        queue.replace(Span::new(8, 11), "y").unwrap();
        queue.replace(Span::new(4, 7), "zzzzzz").unwrap();
        assert_eq!(queue.apply(source), "xxxx zzzzzz y");
    }

    #[test]
    fn enqueue_order_does_not_matter_for_disjoint_edits() {
        let source = "aaa bbb ccc";
        let mut forward = EditQueue::new();
        forward.replace(Span::new(0, 3), "1").unwrap();
        forward.replace(Span::new(8, 11), "3").unwrap();
        let mut reverse = EditQueue::new();
        reverse.replace(Span::new(8, 11), "3").unwrap();
        reverse.replace(Span::new(0, 3), "1").unwrap();
        assert_eq!(forward.apply(source), reverse.apply(source));
    }

    #[test]
    fn overlapping_edit_is_rejected_and_queue_survives() {
        let mut queue = EditQueue::new();
        queue.replace(Span::new(4, 7), "x").unwrap();
        let err = queue.replace(Span::new(6, 9), "y").unwrap_err();
        assert_eq!(err.existing, Span::new(4, 7));
        assert_eq!(err.attempted, Span::new(6, 9));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.apply("aaa bbb ccc"), "aaa xbb ccc");
    }

    #[test]
    fn same_offset_insertions_apply_in_enqueue_order() {
        let mut queue = EditQueue::new();
        queue.insert(3, "1").unwrap();
        queue.insert(3, "2").unwrap();
        queue.insert(3, "3").unwrap();
        assert_eq!(queue.apply("abcdef"), "abc123def");
    }

    #[test]
    fn insertion_at_replacement_boundary_is_allowed() {
        let mut queue = EditQueue::new();
        queue.replace(Span::new(0, 3), "x").unwrap();
        queue.insert(3, "!").unwrap();
        assert_eq!(queue.apply("abcdef"), "x!def");
    }

    #[test]
    fn insertion_inside_replacement_is_rejected() {
        let mut queue = EditQueue::new();
        queue.replace(Span::new(0, 4), "x").unwrap();
        assert!(queue.insert(2, "!").is_err());
    }

    #[test]
    fn replace_atom_touches_only_the_token() {
        let source = "(property \"Value\" \"10k\" (at 0 0 0))";
        let list = first_list(source);
        let value = list.children[2].as_atom().unwrap();
        let mut queue = EditQueue::new();
        replace_atom(&mut queue, value, &Value::from("4k7")).unwrap();
        assert_eq!(queue.apply(source), "(property \"Value\" \"4k7\" (at 0 0 0))");
    }

    #[test]
    fn insert_before_close_single_line() {
        let source = "(effects (font (size 1.27 1.27)))";
        let tree = parse(source).unwrap();
        let effects = tree.root().unwrap().clone();
        let mut queue = EditQueue::new();
        insert_before_close(&mut queue, source, &effects, " (hide yes)").unwrap();
        assert_eq!(
            queue.apply(source),
            "(effects (font (size 1.27 1.27)) (hide yes))"
        );
    }

    #[test]
    fn insert_before_close_multiline_lands_after_last_child() {
        let source = "(symbol\n\t(lib_id \"Device:R\")\n)";
        let symbol = first_list(source);
        let mut queue = EditQueue::new();
        insert_before_close(&mut queue, source, &symbol, "\n\t(dnp no)").unwrap();
        assert_eq!(
            queue.apply(source),
            "(symbol\n\t(lib_id \"Device:R\")\n\t(dnp no)\n)"
        );
    }

    #[test]
    fn delete_node_takes_its_line() {
        let source = "(symbol\n\t(a 1)\n\t(b 2)\n)";
        let symbol = first_list(source);
        let target = &symbol.children[2];
        assert_eq!(target.head(), Some("b"));
        let mut queue = EditQueue::new();
        delete_node(&mut queue, source, target).unwrap();
        assert_eq!(queue.apply(source), "(symbol\n\t(a 1)\n)");
    }

    #[test]
    fn delete_inline_node_stops_at_sibling() {
        let source = "(a (b) (c))";
        let list = first_list(source);
        let target = &list.children[2];
        let mut queue = EditQueue::new();
        delete_node(&mut queue, source, target).unwrap();
        assert_eq!(queue.apply(source), "(a (b))");
    }

    #[test]
    fn leading_indent_reads_first_line_starting_child() {
        let source = "(symbol (pin 1)\n\t\t(property \"Reference\" \"R1\")\n)";
        let symbol = first_list(source);
        assert_eq!(leading_indent(source, &symbol), Some("\t\t".to_string()));

        let flat = first_list("(a (b) (c))");
        assert_eq!(leading_indent("(a (b) (c))", &flat), None);
    }
}
