//! Pure reads over the immutable tree.
//!
//! Queries return borrowed handles into the tree; the handles carry spans,
//! so callers can edit just a value token instead of the enclosing list.
//! Results are ordered and restartable, and they do not observe edits
//! queued after retrieval.

use crate::node::{Atom, List, Node};

/// Ordered iterator over the child lists of `parent` whose head equals
/// `head` (unquoted string comparison).
pub fn lists_with_head<'a>(
    parent: &'a List,
    head: &'a str,
) -> impl Iterator<Item = &'a List> + 'a {
    parent
        .children
        .iter()
        .filter_map(Node::as_list)
        .filter(move |list| list.head() == Some(head))
}

/// The first child list of `parent` with the given head.
///
/// This is the lookup for single-valued fields like `title`, `rev`, or
/// `date` inside a title block.
pub fn field_of<'a>(parent: &'a List, head: &'a str) -> Option<&'a List> {
    lists_with_head(parent, head).next()
}

/// The `n`-th positional argument of `parent` (children after the head
/// atom), when it is an atom.
pub fn arg_atom(parent: &List, n: usize) -> Option<&Atom> {
    parent.args().get(n).and_then(Node::as_atom)
}

/// The first positional quoted-string argument of `parent`.
///
/// Label text and property names sit in this position.
pub fn first_quoted(parent: &List) -> Option<&Atom> {
    parent
        .args()
        .iter()
        .filter_map(Node::as_atom)
        .find(|atom| atom.is_quoted())
}
