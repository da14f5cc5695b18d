//! Title-block metadata operations.

use std::collections::BTreeMap;

use kicad_sexpr::query::arg_atom;
use kicad_sexpr::{
    encode_string, insert_before_close, leading_indent, replace_atom, replace_list, EditQueue,
    List, Node, Value,
};

use crate::error::{Error, Result};
use crate::query::{find_title_block, title_block_field};
use crate::types::TitleBlockField;

/// Root children that precede the title block in KiCad's file layout. A
/// synthesized title block is inserted after the last of these.
const PREAMBLE_HEADS: [&str; 6] = [
    "version",
    "generator",
    "generator_version",
    "uuid",
    "paper",
    "page",
];

/// Read the title block's fields as a name→value map using the same field
/// names `update_schematic_info` accepts (`title`, `date`, `rev`,
/// `company`, `comment1`..`commentN`).
///
/// Unlike the update path, which synthesizes a missing title block, the
/// read path reports its absence as `TitleBlockNotFound`.
pub fn schematic_info(root: &List) -> Result<BTreeMap<String, String>> {
    let title_block = find_title_block(root).ok_or(Error::TitleBlockNotFound)?;
    let mut fields = BTreeMap::new();
    for list in title_block.children.iter().filter_map(Node::as_list) {
        let (name, value_atom) = match list.head() {
            Some(head @ ("title" | "date" | "rev" | "company")) => {
                (head.to_string(), arg_atom(list, 0))
            }
            Some("comment") => {
                let Some(ordinal) =
                    arg_atom(list, 0).and_then(|atom| atom.value.parse::<u32>().ok())
                else {
                    continue;
                };
                (format!("comment{ordinal}"), arg_atom(list, 1))
            }
            _ => continue,
        };
        if let Some(atom) = value_atom {
            fields.insert(name, atom.value.clone());
        }
    }
    Ok(fields)
}

/// Update title-block fields by name (`title`, `date`, `rev`, `company`,
/// `comment1`..`commentN`).
///
/// Existing fields get their value atom replaced; missing fields are
/// inserted before the title block's closing paren; a missing title block
/// is synthesized after the file preamble. Unknown field names are
/// ignored. Returns the number of fields applied.
pub fn update_schematic_info(
    source: &str,
    root: &List,
    queue: &mut EditQueue,
    fields: &BTreeMap<String, String>,
) -> Result<usize> {
    let mut entries: Vec<(TitleBlockField, &str)> = fields
        .iter()
        .filter_map(|(name, value)| {
            TitleBlockField::parse(name).map(|field| (field, value.as_str()))
        })
        .collect();
    entries.sort_by_key(|(field, _)| field_rank(*field));
    if entries.is_empty() {
        return Ok(0);
    }

    match find_title_block(root) {
        Some(title_block) => {
            for (field, value) in &entries {
                apply_field(source, title_block, queue, *field, value)?;
            }
        }
        None => insert_title_block(source, root, queue, &entries)?,
    }
    Ok(entries.len())
}

/// KiCad writes title-block fields in a fixed order; synthesized blocks
/// follow it.
fn field_rank(field: TitleBlockField) -> u32 {
    match field {
        TitleBlockField::Title => 0,
        TitleBlockField::Date => 1,
        TitleBlockField::Rev => 2,
        TitleBlockField::Company => 3,
        TitleBlockField::Comment(ordinal) => 4 + ordinal,
    }
}

fn apply_field(
    source: &str,
    title_block: &List,
    queue: &mut EditQueue,
    field: TitleBlockField,
    value: &str,
) -> Result<()> {
    match title_block_field(title_block, field) {
        Some(list) => {
            let value_atom = match field {
                TitleBlockField::Comment(_) => arg_atom(list, 1),
                _ => arg_atom(list, 0),
            };
            match value_atom {
                Some(atom) => replace_atom(queue, atom, &Value::from(value))?,
                // A field list with no value yet; rewrite the whole form.
                None => replace_list(queue, list, render_field(field, value))?,
            }
        }
        None => {
            let indent = leading_indent(source, title_block).unwrap_or_else(|| "\t".to_string());
            insert_before_close(
                queue,
                source,
                title_block,
                format!("\n{indent}{}", render_field(field, value)),
            )?;
        }
    }
    Ok(())
}

fn render_field(field: TitleBlockField, value: &str) -> String {
    match field {
        TitleBlockField::Comment(ordinal) => {
            format!("(comment {ordinal} {})", encode_string(value))
        }
        _ => format!("({} {})", field.head(), encode_string(value)),
    }
}

/// Synthesize a whole `(title_block …)` holding `entries`, placed after
/// the file preamble (or before the root's closing paren when no preamble
/// form exists).
fn insert_title_block(
    source: &str,
    root: &List,
    queue: &mut EditQueue,
    entries: &[(TitleBlockField, &str)],
) -> Result<()> {
    let indent = leading_indent(source, root).unwrap_or_else(|| "\t".to_string());
    // One more level in whatever style the file already uses.
    let inner = indent.repeat(2);
    let mut block = format!("\n{indent}(title_block");
    for (field, value) in entries {
        block.push('\n');
        block.push_str(&inner);
        block.push_str(&render_field(*field, value));
    }
    block.push('\n');
    block.push_str(&indent);
    block.push(')');

    let anchor = root
        .children
        .iter()
        .filter_map(Node::as_list)
        .filter(|list| list.head().is_some_and(|head| PREAMBLE_HEADS.contains(&head)))
        .last();
    match anchor {
        Some(list) => queue.insert(list.span.end, block)?,
        None => insert_before_close(queue, source, root, block)?,
    }
    Ok(())
}
