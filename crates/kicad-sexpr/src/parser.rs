//! Single-pass tokenizer and tree builder.
//!
//! One linear scan over the bytes maintains a stack of open lists: `(`
//! pushes the current offset, `)` pops and emits a list node spanning from
//! the pushed offset to one past the paren. Atoms are emitted with their
//! exact token span. Whitespace and `;` line comments are never turned into
//! nodes; they remain inter-node bytes of the source buffer, which is what
//! makes untouched regions byte-stable under editing.

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::format::decode_string;
use crate::node::{Atom, AtomKind, List, Node, SourceTree};
use crate::span::Span;

/// Parse source text into the span-annotated tree of its top-level forms.
///
/// # Errors
///
/// Fails on unterminated strings, unbalanced parens, or input with no
/// s-expression content. No partial tree is returned.
pub fn parse(source: &str) -> ParseResult<SourceTree> {
    Parser::new(source).run()
}

struct Parser<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    /// Open lists: offset of their `(` and the children collected so far.
    stack: Vec<(usize, Vec<Node>)>,
    /// Completed top-level nodes.
    top: Vec<Node>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            stack: Vec::new(),
            top: Vec::new(),
        }
    }

    fn run(mut self) -> ParseResult<SourceTree> {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b';' => self.skip_comment(),
                b'(' => {
                    self.stack.push((self.pos, Vec::new()));
                    self.pos += 1;
                }
                b')' => {
                    let Some((start, children)) = self.stack.pop() else {
                        return Err(ParseError::new(ParseErrorKind::UnmatchedClose, self.pos));
                    };
                    let list = List {
                        span: Span::new(start, self.pos + 1),
                        children,
                    };
                    self.pos += 1;
                    self.emit(Node::List(list));
                }
                b'"' => {
                    let atom = self.scan_string()?;
                    self.emit(Node::Atom(atom));
                }
                _ => {
                    let atom = self.scan_symbol();
                    self.emit(Node::Atom(atom));
                }
            }
        }

        if let Some((start, _)) = self.stack.last() {
            return Err(ParseError::new(ParseErrorKind::UnmatchedOpen, *start));
        }
        if self.top.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyInput, 0));
        }
        Ok(SourceTree { nodes: self.top })
    }

    fn emit(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.top.push(node),
        }
    }

    fn skip_comment(&mut self) {
        match memchr::memchr(b'\n', &self.bytes[self.pos..]) {
            Some(nl) => self.pos += nl, // the newline itself is whitespace
            None => self.pos = self.bytes.len(),
        }
    }

    /// Scan a quoted string starting at the opening `"`.
    ///
    /// Escape handling happens here so that a `\"` inside the string does
    /// not close it. A backslash always consumes the byte after it; both
    /// `"` and `\` are ASCII, so byte-wise scanning never splits a
    /// multi-byte UTF-8 sequence.
    fn scan_string(&mut self) -> ParseResult<Atom> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'"' => {
                    self.pos += 1;
                    let raw = &self.source[start..self.pos];
                    return Ok(Atom {
                        span: Span::new(start, self.pos),
                        kind: AtomKind::Quoted,
                        raw: raw.to_string(),
                        value: decode_string(&raw[1..raw.len() - 1]),
                    });
                }
                b'\\' => self.pos += 2,
                _ => self.pos += 1,
            }
        }
        Err(ParseError::new(ParseErrorKind::UnterminatedString, start))
    }

    /// Scan a symbol or number token: the longest run of bytes from the
    /// symbol character class. Numbers are not distinguished lexically;
    /// their interpretation is deferred.
    ///
    /// An ASCII byte outside the class (a stray `,` or bracket) forms a
    /// one-byte opaque token of its own: the grammar gives it no other
    /// home, and dropping it would break the span tiling of the source.
    fn scan_symbol(&mut self) -> Atom {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_symbol_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
        }
        let raw = &self.source[start..self.pos];
        Atom {
            span: Span::new(start, self.pos),
            kind: AtomKind::Symbol,
            raw: raw.to_string(),
            value: raw.to_string(),
        }
    }
}

/// Whether a byte may appear in a symbol or number token: ASCII
/// alphanumerics, the punctuation `_ - + * / . : ! ? @ # $ % ^ & < > = |
/// ~`, or any non-ASCII byte (Unicode letters are accepted wholesale
/// rather than classified).
fn is_symbol_byte(byte: u8) -> bool {
    matches!(byte,
        b'A'..=b'Z'
        | b'a'..=b'z'
        | b'0'..=b'9'
        | b'_' | b'-' | b'+' | b'*' | b'/' | b'.' | b':' | b'!' | b'?'
        | b'@' | b'#' | b'$' | b'%' | b'^' | b'&' | b'<' | b'>' | b'='
        | b'|' | b'~'
    ) || byte >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_list(source: &str) -> List {
        parse(source).unwrap().root().unwrap().clone()
    }

    #[test]
    fn empty_input_is_an_error() {
        for source in ["", "   \n\t", "; only a comment\n"] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::EmptyInput);
            assert_eq!(err.offset, 0);
        }
    }

    #[test]
    fn list_span_covers_parens() {
        let list = root_list("(kicad_sch (version 20250114))");
        assert_eq!(list.span, Span::new(0, 30));
        assert_eq!(list.head(), Some("kicad_sch"));
        let version = list.children[1].as_list().unwrap();
        assert_eq!(version.span, Span::new(11, 29));
        assert_eq!(&"(kicad_sch (version 20250114))"[11..29], "(version 20250114)");
    }

    #[test]
    fn atom_spans_are_exact() {
        let source = "(a \"bc\" 12.5)";
        let list = root_list(source);
        let quoted = list.children[1].as_atom().unwrap();
        assert_eq!(quoted.span, Span::new(3, 7));
        assert_eq!(quoted.raw, "\"bc\"");
        assert_eq!(quoted.value, "bc");
        let number = list.children[2].as_atom().unwrap();
        assert_eq!(number.span, Span::new(8, 12));
        assert_eq!(number.kind, AtomKind::Symbol);
        assert_eq!(number.as_number(), Some(12.5));
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let list = root_list(r#"(p "a\"b")"#);
        let atom = list.children[1].as_atom().unwrap();
        assert_eq!(atom.raw, r#""a\"b""#);
        assert_eq!(atom.value, "a\"b");
    }

    #[test]
    fn comments_are_not_nodes() {
        let source = "; header\n(a ; inline\n b)";
        let list = root_list(source);
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[1].as_atom().unwrap().value, "b");
    }

    #[test]
    fn semicolon_inside_string_is_content() {
        let list = root_list("(a \"x;y\")");
        assert_eq!(list.children[1].as_atom().unwrap().value, "x;y");
    }

    #[test]
    fn multibyte_content_keeps_byte_offsets() {
        let source = "(p \"ωmega\" ümlaut)";
        let list = root_list(source);
        let quoted = list.children[1].as_atom().unwrap();
        assert_eq!(quoted.value, "ωmega");
        assert_eq!(&source[quoted.span.start..quoted.span.end], "\"ωmega\"");
        let symbol = list.children[2].as_atom().unwrap();
        assert_eq!(symbol.value, "ümlaut");
    }

    #[test]
    fn unterminated_string_reports_opening_quote() {
        let err = parse("(a \"oops").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn trailing_backslash_is_unterminated() {
        let err = parse("(a \"x\\").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn unmatched_close_reports_its_offset() {
        let err = parse("(a))").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedClose);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn unmatched_open_reports_the_open_paren() {
        let err = parse("(a (b c").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedOpen);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn out_of_class_punctuation_does_not_join_a_symbol() {
        let list = root_list("(a b,c)");
        assert_eq!(list.children.len(), 4);
        assert_eq!(list.children[1].as_atom().unwrap().value, "b");
        assert_eq!(list.children[2].as_atom().unwrap().value, ",");
        assert_eq!(list.children[2].as_atom().unwrap().span, Span::new(4, 5));
        assert_eq!(list.children[3].as_atom().unwrap().value, "c");
    }

    #[test]
    fn multiple_top_level_forms_are_kept() {
        let tree = parse("(a) atom (b)").unwrap();
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.root().unwrap().head(), Some("a"));
    }

    #[test]
    fn child_spans_nest_and_stay_ordered() {
        let source = "(outer (one) two (three \"3\"))";
        let list = root_list(source);
        let mut last_end = list.span.start;
        for child in &list.children {
            let span = child.span();
            assert!(span.start >= last_end, "children must not overlap");
            assert!(list.span.contains(span));
            last_end = span.end;
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let source = "(kicad_sch (symbol (property \"Reference\" \"R1\")))";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }
}
