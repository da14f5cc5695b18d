//! Component property operations: list, read, and surgical update.
//!
//! Updates patch only the token that changes. A value edit replaces the
//! value atom's span; a visibility edit toggles, inserts, or removes just
//! the hide marker inside the property's `effects`; everything else in the
//! symbol (mirror flags, DNP state, pin data, unfamiliar fields) is never
//! re-rendered.

use std::collections::BTreeMap;

use kicad_sexpr::query::{arg_atom, lists_with_head};
use kicad_sexpr::{
    delete_node, encode_string, insert_before_close, leading_indent, replace_atom, EditQueue,
    List, Node, Value,
};

use crate::document::FormatDialect;
use crate::error::{Error, Result};
use crate::query::{
    effects_of, find_symbol, hide_node, property_hidden, property_node, property_of,
    property_text, property_value_atom,
};
use crate::types::{Component, ComponentSummary, PropertyEdit, PropertyInfo};

/// Enumerate the schematic's symbols as `{reference, value, footprint}`
/// rows. A missing property reads as an empty string.
pub fn list_components(root: &List) -> Vec<ComponentSummary> {
    lists_with_head(root, "symbol")
        .map(|symbol| ComponentSummary {
            reference: property_text(symbol, "Reference").unwrap_or_default().to_string(),
            value: property_text(symbol, "Value").unwrap_or_default().to_string(),
            footprint: property_text(symbol, "Footprint").unwrap_or_default().to_string(),
        })
        .collect()
}

/// All properties of the named symbol, with visibility state.
pub fn get_component(root: &List, reference: &str) -> Result<Component> {
    let symbol = find_symbol(root, reference).ok_or_else(|| Error::SymbolNotFound {
        reference: reference.to_string(),
    })?;
    let properties = symbol
        .children
        .iter()
        .filter_map(Node::as_list)
        .filter(|list| list.head() == Some("property"))
        .filter_map(|property| {
            let name = arg_atom(property, 0)?;
            let value = property_value_atom(property)?;
            Some(PropertyInfo {
                name: name.value.clone(),
                value: value.value.clone(),
                visible: !property_hidden(property),
            })
        })
        .collect();
    Ok(Component {
        reference: reference.to_string(),
        properties,
    })
}

/// Apply a batch of property edits to the named symbol.
///
/// Returns the number of properties actually affected. Edits apply in
/// name order (the map's order), so synthesized properties land
/// deterministically.
pub fn update_component(
    source: &str,
    root: &List,
    dialect: FormatDialect,
    queue: &mut EditQueue,
    reference: &str,
    edits: &BTreeMap<String, PropertyEdit>,
) -> Result<usize> {
    let symbol = find_symbol(root, reference).ok_or_else(|| Error::SymbolNotFound {
        reference: reference.to_string(),
    })?;

    let mut affected = 0;
    for (name, edit) in edits {
        if edit.remove {
            if let Some(node) = property_node(symbol, name) {
                delete_node(queue, source, node)?;
                affected += 1;
            }
            continue;
        }
        match property_of(symbol, name) {
            Some(property) => {
                let mut touched = false;
                if let Some(value) = &edit.value {
                    let atom =
                        property_value_atom(property).ok_or_else(|| Error::PropertyNotFound {
                            reference: reference.to_string(),
                            name: name.clone(),
                        })?;
                    replace_atom(queue, atom, &Value::Str(value.clone()))?;
                    touched = true;
                }
                if let Some(visible) = edit.visible {
                    touched |= set_visibility(source, property, dialect, queue, visible)?;
                }
                if touched {
                    affected += 1;
                }
            }
            None => {
                if let Some(value) = &edit.value {
                    insert_property(source, symbol, dialect, queue, name, value, edit.visible)?;
                    affected += 1;
                } else if edit.visible.is_some() {
                    return Err(Error::PropertyNotFound {
                        reference: reference.to_string(),
                        name: name.clone(),
                    });
                }
            }
        }
    }
    Ok(affected)
}

/// Bring a property to the requested visibility by touching only the hide
/// marker. Returns whether an edit was queued (false when already in the
/// requested state).
fn set_visibility(
    source: &str,
    property: &List,
    dialect: FormatDialect,
    queue: &mut EditQueue,
    visible: bool,
) -> Result<bool> {
    let want_hidden = !visible;
    if property_hidden(property) == want_hidden {
        return Ok(false);
    }

    match effects_of(property) {
        Some(effects) => match hide_node(effects) {
            Some(node @ Node::List(hide)) => match arg_atom(hide, 0) {
                // `(hide yes)` / `(hide no)`: flip only the flag atom.
                Some(flag) => {
                    let word = if want_hidden { "yes" } else { "no" };
                    replace_atom(queue, flag, &Value::Symbol(word.to_string()))?;
                }
                // Bare `(hide)` is hidden; becoming visible removes it.
                None => delete_node(queue, source, node)?,
            },
            // KiCad-6 bare `hide` atom; becoming visible removes it.
            Some(node @ Node::Atom(_)) => delete_node(queue, source, node)?,
            // No marker yet; append one to the existing effects.
            None => {
                let marker = match dialect {
                    FormatDialect::Modern => "(hide yes)",
                    FormatDialect::Legacy => "hide",
                };
                insert_before_close(queue, source, effects, child_bytes(source, effects, marker))?;
            }
        },
        // No effects at all; synthesize one holding just the marker.
        None => {
            let marker = match dialect {
                FormatDialect::Modern => "(effects (hide yes))",
                FormatDialect::Legacy => "(effects hide)",
            };
            insert_before_close(queue, source, property, child_bytes(source, property, marker))?;
        }
    }
    Ok(true)
}

/// Synthesize a missing property as a minimal skeleton inserted before the
/// symbol's closing paren, indented like its siblings.
fn insert_property(
    source: &str,
    symbol: &List,
    dialect: FormatDialect,
    queue: &mut EditQueue,
    name: &str,
    value: &str,
    visible: Option<bool>,
) -> Result<()> {
    let indent = leading_indent(source, symbol).unwrap_or_else(|| "\t".to_string());
    let mut text = format!("(property {} {}", encode_string(name), encode_string(value));
    if visible == Some(false) {
        text.push_str(match dialect {
            FormatDialect::Modern => " (effects (hide yes))",
            FormatDialect::Legacy => " (effects hide)",
        });
    }
    text.push(')');
    insert_before_close(queue, source, symbol, format!("\n{indent}{text}"))?;
    Ok(())
}

/// Bytes for a new child of `list`: on its own line at the sibling indent
/// when the list is laid out multiline, otherwise appended after a space.
fn child_bytes(source: &str, list: &List, text: &str) -> String {
    match leading_indent(source, list) {
        Some(indent) => format!("\n{indent}{text}"),
        None => format!(" {text}"),
    }
}
