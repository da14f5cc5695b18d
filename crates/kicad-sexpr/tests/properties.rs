//! Property tests for the parser, the string codec, and the edit queue.
//!
//! Generated s-expressions exercise parse determinism and the span
//! invariants; generated edit pairs exercise order independence of
//! non-overlapping edits.

use kicad_sexpr::{decode_string, encode_string, parse, EditQueue, Node, Span};
use proptest::prelude::*;

fn symbol() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_.:+-]{0,8}").unwrap()
}

fn separator() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" ".to_string()),
        Just("  ".to_string()),
        Just("\t".to_string()),
        Just("\n".to_string()),
        Just("\n\t".to_string()),
        Just("\r\n".to_string()),
    ]
}

/// An arbitrary well-formed s-expression document.
fn form() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        symbol(),
        any::<String>().prop_map(|text| encode_string(&text)),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        (
            symbol(),
            prop::collection::vec((separator(), inner), 0..5),
            separator(),
        )
            .prop_map(|(head, children, trailing)| {
                let mut out = format!("({head}");
                for (gap, child) in children {
                    out.push_str(&gap);
                    out.push_str(&child);
                }
                out.push_str(&trailing);
                out.push(')');
                out
            })
    })
}

fn assert_span_invariants(source: &str, node: &Node) {
    let span = node.span();
    assert!(span.end <= source.len());
    match node {
        Node::Atom(atom) => {
            assert_eq!(&source[span.start..span.end], atom.raw);
        }
        Node::List(list) => {
            assert!(source[span.start..].starts_with('('));
            assert!(source[..span.end].ends_with(')'));
            let interior = Span::new(span.start + 1, span.end - 1);
            let mut cursor = interior.start;
            for child in &list.children {
                let child_span = child.span();
                assert!(
                    interior.contains(child_span),
                    "child {child_span} escapes interior {interior}"
                );
                assert!(child_span.start >= cursor, "children out of order");
                // Inter-node bytes are whitespace only (the generator does
                // not emit comments).
                assert!(
                    source[cursor..child_span.start]
                        .bytes()
                        .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n')),
                    "unexpected bytes between children"
                );
                cursor = child_span.end;
                assert_span_invariants(source, child);
            }
            assert!(
                source[cursor..interior.end]
                    .bytes()
                    .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n')),
                "unexpected bytes before close paren"
            );
        }
    }
}

proptest! {
    #[test]
    fn parse_is_deterministic(doc in form()) {
        let first = parse(&doc).unwrap();
        let second = parse(&doc).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn spans_tile_the_source(doc in form()) {
        let tree = parse(&doc).unwrap();
        for node in &tree.nodes {
            assert_span_invariants(&doc, node);
        }
    }

    #[test]
    fn decode_is_the_inverse_of_encode(text in any::<String>()) {
        let encoded = encode_string(&text);
        prop_assert!(encoded.starts_with('"') && encoded.ends_with('"'));
        prop_assert_eq!(decode_string(&encoded[1..encoded.len() - 1]), text);
    }

    #[test]
    fn quoted_atoms_round_trip_through_the_parser(text in any::<String>()) {
        let doc = format!("(p {})", encode_string(&text));
        let tree = parse(&doc).unwrap();
        let atom = tree.root().unwrap().children[1].as_atom().unwrap();
        prop_assert_eq!(&atom.value, &text);
        prop_assert_eq!(encode_string(&atom.value), atom.raw.clone());
    }

    #[test]
    fn non_overlapping_edits_commute(
        base in proptest::string::string_regex("[a-z]{40}").unwrap(),
        first_start in 0usize..8,
        second_start in 20usize..28,
        first_text in proptest::string::string_regex("[A-Z]{0,6}").unwrap(),
        second_text in proptest::string::string_regex("[A-Z]{0,6}").unwrap(),
    ) {
        let first = Span::new(first_start, first_start + 4);
        let second = Span::new(second_start, second_start + 4);

        let mut forward = EditQueue::new();
        forward.replace(first, first_text.clone()).unwrap();
        forward.replace(second, second_text.clone()).unwrap();

        let mut reverse = EditQueue::new();
        reverse.replace(second, second_text).unwrap();
        reverse.replace(first, first_text).unwrap();

        prop_assert_eq!(forward.apply(&base), reverse.apply(&base));
    }
}
