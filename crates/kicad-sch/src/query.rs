//! Schematic-aware lookups over the span-annotated tree.
//!
//! All functions are pure reads returning borrowed handles, so callers can
//! target edits at exactly the token they need.

use kicad_sexpr::query::{arg_atom, field_of, first_quoted, lists_with_head};
use kicad_sexpr::{Atom, List, Node};

use crate::types::{LabelKind, TitleBlockField};

/// The first `symbol` child of `root` whose `Reference` property equals
/// `reference`.
pub fn find_symbol<'a>(root: &'a List, reference: &str) -> Option<&'a List> {
    lists_with_head(root, "symbol").find(|symbol| property_text(symbol, "Reference") == Some(reference))
}

/// The `property` child of `symbol` named `name`, as a node handle.
///
/// The node form is what deletion wants; see [`property_of`] for the list
/// view.
pub fn property_node<'a>(symbol: &'a List, name: &str) -> Option<&'a Node> {
    symbol.children.iter().find(|child| {
        child
            .as_list()
            .is_some_and(|list| list.head() == Some("property") && property_name(list) == Some(name))
    })
}

/// The `property` child of `symbol` named `name`.
pub fn property_of<'a>(symbol: &'a List, name: &str) -> Option<&'a List> {
    property_node(symbol, name).and_then(Node::as_list)
}

/// The name of a `property` list (its first positional quoted string).
pub fn property_name(property: &List) -> Option<&str> {
    let atom = arg_atom(property, 0)?;
    atom.is_quoted().then_some(atom.value.as_str())
}

/// The value atom of a `property` list, for value-only edits.
pub fn property_value_atom<'a>(property: &'a List) -> Option<&'a Atom> {
    arg_atom(property, 1)
}

/// The decoded value of the named property of `symbol`.
pub fn property_text<'a>(symbol: &'a List, name: &str) -> Option<&'a str> {
    property_of(symbol, name)
        .and_then(property_value_atom)
        .map(|atom| atom.value.as_str())
}

/// The `(effects …)` sub-list of a property, when present.
pub fn effects_of<'a>(property: &'a List) -> Option<&'a List> {
    field_of(property, "effects")
}

/// The hide marker inside an `(effects …)` list, in any of its encodings:
/// a `(hide yes|no)` list, a bare `(hide)` list, or the KiCad-6 bare
/// `hide` atom.
pub fn hide_node<'a>(effects: &'a List) -> Option<&'a Node> {
    effects.children.iter().skip(1).find(|child| match child {
        Node::List(list) => list.head() == Some("hide"),
        Node::Atom(atom) => !atom.is_quoted() && atom.value == "hide",
    })
}

/// Whether a property is hidden, under any hide encoding. Absence of a
/// hide marker (or of the whole `effects` list) means visible.
pub fn property_hidden(property: &List) -> bool {
    let Some(effects) = effects_of(property) else {
        return false;
    };
    match hide_node(effects) {
        Some(Node::List(hide)) => match arg_atom(hide, 0) {
            Some(flag) => flag.value == "yes",
            // Bare `(hide)` means hidden.
            None => true,
        },
        Some(Node::Atom(_)) => true,
        None => false,
    }
}

/// All labels of the given kinds, in source order, optionally filtered to
/// those whose text equals `text`.
pub fn find_labels<'a>(
    root: &'a List,
    kinds: &[LabelKind],
    text: Option<&str>,
) -> Vec<(LabelKind, &'a List)> {
    root.children
        .iter()
        .filter_map(Node::as_list)
        .filter_map(|list| {
            let kind = kinds.iter().copied().find(|k| list.head() == Some(k.head()))?;
            match text {
                Some(wanted) => (label_text(list)? == wanted).then_some((kind, list)),
                None => Some((kind, list)),
            }
        })
        .collect()
}

/// The net name of a label: its first positional quoted string.
pub fn label_text(label: &List) -> Option<&str> {
    first_quoted(label).map(|atom| atom.value.as_str())
}

/// The first `title_block` child of `root`.
pub fn find_title_block<'a>(root: &'a List) -> Option<&'a List> {
    field_of(root, "title_block")
}

/// The field list for a title-block field; comments are matched on their
/// ordinal.
pub fn title_block_field<'a>(title_block: &'a List, field: TitleBlockField) -> Option<&'a List> {
    match field {
        TitleBlockField::Comment(ordinal) => lists_with_head(title_block, "comment").find(|list| {
            arg_atom(list, 0).and_then(|atom| atom.value.parse::<u32>().ok()) == Some(ordinal)
        }),
        _ => field_of(title_block, field.head()),
    }
}
