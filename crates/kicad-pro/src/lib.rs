//! # kicad-pro
//!
//! KiCad project file (`.kicad_pro`) adapter.
//!
//! Project files are JSON, not s-expressions, so they take a different
//! path than the schematic surgery core: the whole document is held as an
//! order-preserving [`serde_json::Value`], edited in place, and written
//! back with KiCad's own 2-space pretty-printing. Keys the adapter does
//! not model survive round-trips untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Result type alias for project-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a project file.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is not valid JSON.
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level JSON value is not an object.
    #[error("project root is not a JSON object")]
    NotAnObject,

    /// Filesystem failure on load or save. On save the target file is
    /// left unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded `.kicad_pro` document.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    root: Value,
}

impl ProjectFile {
    /// Load a project file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parse project JSON already in memory.
    pub fn parse(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        if !root.is_object() {
            return Err(Error::NotAnObject);
        }
        Ok(Self { root })
    }

    /// The raw JSON document, for keys the adapter does not model.
    pub fn root(&self) -> &Value {
        &self.root
    }

    fn object(&self) -> &Map<String, Value> {
        self.root.as_object().expect("root validated at parse time")
    }

    fn object_mut(&mut self) -> &mut Map<String, Value> {
        self.root
            .as_object_mut()
            .expect("root validated at parse time")
    }

    /// All `text_variables` entries, in file order.
    pub fn text_variables(&self) -> Vec<(String, String)> {
        let Some(variables) = self.object().get("text_variables").and_then(Value::as_object)
        else {
            return Vec::new();
        };
        variables
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), value.as_str()?.to_string())))
            .collect()
    }

    /// One text variable by name.
    pub fn text_variable(&self, name: &str) -> Option<&str> {
        self.object()
            .get("text_variables")?
            .get(name)?
            .as_str()
    }

    /// Set a text variable, creating the `text_variables` object on first
    /// write.
    pub fn set_text_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let variables = self
            .object_mut()
            .entry("text_variables")
            .or_insert_with(|| json!({}));
        if let Some(map) = variables.as_object_mut() {
            map.insert(name.into(), Value::String(value.into()));
        }
    }

    /// Remove a text variable. Returns whether it existed.
    pub fn remove_text_variable(&mut self, name: &str) -> bool {
        self.object_mut()
            .get_mut("text_variables")
            .and_then(Value::as_object_mut)
            .and_then(|map| map.remove(name))
            .is_some()
    }

    /// The `(uuid, name)` pairs of the `sheets` array.
    pub fn sheets(&self) -> Vec<(String, String)> {
        let Some(sheets) = self.object().get("sheets").and_then(Value::as_array) else {
            return Vec::new();
        };
        sheets
            .iter()
            .filter_map(|entry| {
                let pair = entry.as_array()?;
                Some((
                    pair.first()?.as_str()?.to_string(),
                    pair.get(1)?.as_str()?.to_string(),
                ))
            })
            .collect()
    }

    /// Serialize with KiCad's conventions: 2-space indent, trailing
    /// newline.
    pub fn to_json(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.root)
            .expect("JSON value serialization cannot fail");
        text.push('\n');
        text
    }

    /// Write the project file atomically: temp file in the destination
    /// directory, sync, rename. On failure the target is untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(self.to_json().as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| Error::Io(err.error))?;
        Ok(())
    }
}
