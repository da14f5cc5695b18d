//! Net-label operations.

use kicad_sexpr::query::first_quoted;
use kicad_sexpr::{replace_atom, EditQueue, List, Value};

use crate::error::Result;
use crate::query::find_labels;
use crate::types::{LabelInfo, LabelKind};

/// All labels of the given kinds, in source order.
pub fn list_labels(root: &List, kinds: &[LabelKind]) -> Vec<LabelInfo> {
    find_labels(root, kinds, None)
        .into_iter()
        .filter_map(|(kind, label)| {
            Some(LabelInfo {
                kind,
                text: first_quoted(label)?.value.clone(),
            })
        })
        .collect()
}

/// Rename every `label`, `global_label`, and `hierarchical_label` whose
/// text equals `old`. Only the text atom of each match is replaced.
///
/// Returns the number of labels renamed; zero matches is not an error.
pub fn rename_net(root: &List, queue: &mut EditQueue, old: &str, new: &str) -> Result<usize> {
    let matches = find_labels(root, &LabelKind::NET_KINDS, Some(old));
    let mut renamed = 0;
    for (_, label) in matches {
        if let Some(atom) = first_quoted(label) {
            replace_atom(queue, atom, &Value::from(new))?;
            renamed += 1;
        }
    }
    Ok(renamed)
}
