//! The span-annotated s-expression tree.
//!
//! Every node carries the half-open byte range it occupies in the original
//! source buffer. List spans run from `(` to one past the matching `)`;
//! atom spans cover the token's exact characters, including the surrounding
//! quotes of a quoted string.
//!
//! Uses the owned data approach: atoms store both their raw source text and
//! their decoded logical value, so the tree has no lifetime parameter and a
//! document can hand out node references without borrowing gymnastics.

use crate::span::Span;

/// Lexical class of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// Bare symbol or number token.
    Symbol,
    /// Double-quoted string.
    Quoted,
}

/// A leaf node: symbol, number, or quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub span: Span,
    pub kind: AtomKind,
    /// Exact source bytes of the token, quotes and escapes included.
    pub raw: String,
    /// Decoded logical text. For symbols this equals `raw`; for quoted
    /// strings it is the unescaped content without the quotes.
    pub value: String,
}

impl Atom {
    /// Whether this atom is a quoted string.
    pub fn is_quoted(&self) -> bool {
        self.kind == AtomKind::Quoted
    }

    /// Interpret the decoded text as a number, if it is one.
    ///
    /// Numeric interpretation is deferred to consumers; the lexer does not
    /// distinguish numbers from symbols.
    pub fn as_number(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

/// A parenthesized node: head atom followed by zero or more children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// Span from `(` to one past the matching `)`.
    pub span: Span,
    pub children: Vec<Node>,
}

impl List {
    /// The head symbol of this list, if the first child is an atom.
    pub fn head(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Atom(atom)) => Some(atom.value.as_str()),
            _ => None,
        }
    }

    /// Children after the head atom, in source order.
    pub fn args(&self) -> &[Node] {
        if matches!(self.children.first(), Some(Node::Atom(_))) {
            &self.children[1..]
        } else {
            &self.children
        }
    }

    /// Byte offset of the closing `)`.
    pub fn close_offset(&self) -> usize {
        self.span.end - 1
    }
}

/// An s-expression node: atom or list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Atom(Atom),
    List(List),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Atom(atom) => atom.span,
            Node::List(list) => list.span,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Node::Atom(atom) => Some(atom),
            Node::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::Atom(_) => None,
            Node::List(list) => Some(list),
        }
    }

    /// Head symbol when this node is a list, `None` otherwise.
    pub fn head(&self) -> Option<&str> {
        self.as_list().and_then(List::head)
    }
}

/// All top-level forms of a parsed source, in source order.
///
/// A KiCad schematic has exactly one top-level `kicad_sch` list, but the
/// parser itself stays format-agnostic and keeps whatever the file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    pub nodes: Vec<Node>,
}

impl SourceTree {
    /// The first top-level list, which for schematic files is the document
    /// root. The parser guarantees at least one top-level node.
    pub fn root(&self) -> Option<&List> {
        self.nodes.iter().find_map(Node::as_list)
    }
}
