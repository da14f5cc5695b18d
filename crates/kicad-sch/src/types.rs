//! Public data types crossing the API boundary.
//!
//! Everything here derives serde so that collaborators (MCP façade, CLI)
//! can pass these structures straight through their transport.

use serde::{Deserialize, Serialize};

/// One row of a component listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub reference: String,
    /// Value property, empty string when the property is missing.
    pub value: String,
    /// Footprint property, empty string when the property is missing.
    pub footprint: String,
}

/// A single property of a symbol, with its visibility state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub value: String,
    pub visible: bool,
}

/// A symbol together with all of its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub reference: String,
    pub properties: Vec<PropertyInfo>,
}

/// One requested change to a named property.
///
/// `value` and `visible` may be combined; `remove` wins over both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEdit {
    /// New property value.
    #[serde(default)]
    pub value: Option<String>,
    /// New visibility state. Visibility of untouched properties is
    /// preserved.
    #[serde(default)]
    pub visible: Option<bool>,
    /// Delete the property node entirely.
    #[serde(default)]
    pub remove: bool,
}

impl PropertyEdit {
    /// Set the value, preserving visibility.
    pub fn set(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Change only the visibility.
    pub fn visibility(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    /// Delete the property.
    pub fn removal() -> Self {
        Self {
            remove: true,
            ..Self::default()
        }
    }
}

impl From<&str> for PropertyEdit {
    fn from(value: &str) -> Self {
        PropertyEdit::set(value)
    }
}

impl From<String> for PropertyEdit {
    fn from(value: String) -> Self {
        PropertyEdit::set(value)
    }
}

/// The net-naming list heads a schematic can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Label,
    GlobalLabel,
    HierarchicalLabel,
    NetclassFlag,
}

impl LabelKind {
    /// All label heads, for unfiltered listings.
    pub const ALL: [LabelKind; 4] = [
        LabelKind::Label,
        LabelKind::GlobalLabel,
        LabelKind::HierarchicalLabel,
        LabelKind::NetclassFlag,
    ];

    /// The kinds that name nets and participate in renames.
    pub const NET_KINDS: [LabelKind; 3] = [
        LabelKind::Label,
        LabelKind::GlobalLabel,
        LabelKind::HierarchicalLabel,
    ];

    /// The list head this kind appears under in the file.
    pub fn head(&self) -> &'static str {
        match self {
            LabelKind::Label => "label",
            LabelKind::GlobalLabel => "global_label",
            LabelKind::HierarchicalLabel => "hierarchical_label",
            LabelKind::NetclassFlag => "netclass_flag",
        }
    }
}

/// A label occurrence: its head kind and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub kind: LabelKind,
    pub text: String,
}

/// A title-block field addressed by name.
///
/// Comments are numbered; `comment3` addresses `(comment 3 "…")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBlockField {
    Title,
    Date,
    Rev,
    Company,
    Comment(u32),
}

impl TitleBlockField {
    /// Parse a field name as used in the `update_schematic_info` map.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(TitleBlockField::Title),
            "date" => Some(TitleBlockField::Date),
            "rev" => Some(TitleBlockField::Rev),
            "company" => Some(TitleBlockField::Company),
            _ => {
                let ordinal = name.strip_prefix("comment")?;
                ordinal.parse().ok().map(TitleBlockField::Comment)
            }
        }
    }

    /// The list head this field appears under in the title block.
    pub fn head(&self) -> &'static str {
        match self {
            TitleBlockField::Title => "title",
            TitleBlockField::Date => "date",
            TitleBlockField::Rev => "rev",
            TitleBlockField::Company => "company",
            TitleBlockField::Comment(_) => "comment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_block_field_names_parse() {
        assert_eq!(TitleBlockField::parse("title"), Some(TitleBlockField::Title));
        assert_eq!(TitleBlockField::parse("rev"), Some(TitleBlockField::Rev));
        assert_eq!(
            TitleBlockField::parse("comment1"),
            Some(TitleBlockField::Comment(1))
        );
        assert_eq!(
            TitleBlockField::parse("comment12"),
            Some(TitleBlockField::Comment(12))
        );
        assert_eq!(TitleBlockField::parse("comment"), None);
        assert_eq!(TitleBlockField::parse("subtitle"), None);
    }

    #[test]
    fn property_edit_builders() {
        assert_eq!(
            PropertyEdit::from("4k7"),
            PropertyEdit {
                value: Some("4k7".to_string()),
                visible: None,
                remove: false
            }
        );
        assert!(PropertyEdit::removal().remove);
        assert_eq!(PropertyEdit::visibility(true).visible, Some(true));
    }
}
