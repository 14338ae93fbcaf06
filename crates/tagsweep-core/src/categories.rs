//! The category constant table.
//!
//! A [`CategoryTable`] is the closed set of category tags the rewrite is
//! allowed to touch, together with the name of the constant object that
//! holds them (`CATEGORIES` by default). Each entry pairs the property key
//! used in the replacement (`CATEGORIES.protein`) with the string literal it
//! replaces (`"protein"`).
//!
//! The table can be built from the built-in defaults, from a list in the
//! configuration file, or by reading the TypeScript module that defines the
//! constant object, so the substitution rules never drift from it.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{SweepError, SweepResult};

/// Default name of the constant object.
pub const DEFAULT_IDENTIFIER: &str = "CATEGORIES";

/// Default category tags, in canonical order.
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "protein",
    "carbs",
    "vegetables",
    "fruits",
    "dairy",
    "fats",
    "grains",
    "legumes",
    "snacks",
    "supplements",
    "others",
];

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>[A-Za-z_$][A-Za-z0-9_$]*)\s*:\s*["'](?P<value>[^"'\\\r\n]*)["']"#)
        .unwrap()
});

/// Returns true if `name` is a plain JavaScript identifier.
pub fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// One entry of the constant table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Property key on the constant object.
    pub key: String,
    /// String literal the key stands for.
    pub literal: String,
}

impl Category {
    /// An entry whose key and literal are the same tag.
    pub fn tag(name: impl Into<String>) -> Self {
        let name = name.into();
        Category {
            key: name.clone(),
            literal: name,
        }
    }
}

/// The constant object name plus its ordered entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    identifier: String,
    entries: Vec<Category>,
}

impl CategoryTable {
    /// Create a table, rejecting names that could not appear in a rewrite.
    pub fn new(identifier: impl Into<String>, entries: Vec<Category>) -> SweepResult<Self> {
        let identifier = identifier.into();
        if !is_js_identifier(&identifier) {
            return Err(SweepError::invalid_args(format!(
                "constant identifier '{}' is not a valid identifier",
                identifier
            )));
        }
        if entries.is_empty() {
            return Err(SweepError::invalid_args("category table is empty"));
        }
        for entry in &entries {
            if !is_js_identifier(&entry.key) {
                return Err(SweepError::invalid_args(format!(
                    "category key '{}' is not a valid identifier",
                    entry.key
                )));
            }
            if entry.literal.is_empty() || entry.literal.contains(['"', '\\', '\r', '\n']) {
                return Err(SweepError::invalid_args(format!(
                    "category literal '{}' cannot be matched as a string literal",
                    entry.literal
                )));
            }
        }
        Ok(CategoryTable {
            identifier,
            entries,
        })
    }

    /// The eleven built-in tags under `CATEGORIES`.
    pub fn builtin() -> Self {
        CategoryTable {
            identifier: DEFAULT_IDENTIFIER.to_string(),
            entries: DEFAULT_CATEGORIES.iter().map(|c| Category::tag(*c)).collect(),
        }
    }

    /// Build a table from plain tag names (key == literal).
    pub fn from_names<S: AsRef<str>>(identifier: &str, names: &[S]) -> SweepResult<Self> {
        let entries = names.iter().map(|n| Category::tag(n.as_ref())).collect();
        Self::new(identifier, entries)
    }

    /// Extract the table from the source text of the module defining it.
    ///
    /// Looks for `const <identifier> = { ... }` (optionally exported and
    /// type-annotated) and collects every `key: "value"` pair inside the
    /// braces in order of appearance. Returns `Ok(None)` when the object
    /// cannot be found or holds no such pairs, and the validation error when
    /// the pairs it holds cannot form a table.
    pub fn parse_source(identifier: &str, source: &str) -> SweepResult<Option<Self>> {
        let Ok(header) = Regex::new(&format!(
            r"\bconst\s+{}\s*(?::[^=]*)?=\s*\{{",
            regex::escape(identifier)
        )) else {
            return Ok(None);
        };
        let Some(open) = header.find(source).map(|m| m.end()) else {
            return Ok(None);
        };
        let Some(len) = object_body_len(&source[open..]) else {
            return Ok(None);
        };
        let body = &source[open..open + len];

        let entries: Vec<Category> = ENTRY
            .captures_iter(body)
            .map(|caps| Category {
                key: caps["key"].to_string(),
                literal: caps["value"].to_string(),
            })
            .collect();
        if entries.is_empty() {
            return Ok(None);
        }

        Self::new(identifier, entries).map(Some)
    }

    /// Read and parse the module at `path`.
    pub fn load(identifier: &str, path: &Path) -> SweepResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| SweepError::CategorySource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        match Self::parse_source(identifier, &source) {
            Ok(Some(table)) => Ok(table),
            Ok(None) => Err(SweepError::CategorySource {
                path: path.to_path_buf(),
                reason: format!("no `const {} = {{ key: \"value\" }}` object found", identifier),
            }),
            Err(SweepError::InvalidArguments { message }) => Err(SweepError::CategorySource {
                path: path.to_path_buf(),
                reason: message,
            }),
            Err(err) => Err(err),
        }
    }

    /// Name of the constant object.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Entries in canonical order.
    pub fn entries(&self) -> &[Category] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The reference expression for an entry, e.g. `CATEGORIES.protein`.
    pub fn reference(&self, category: &Category) -> String {
        format!("{}.{}", self.identifier, category.key)
    }
}

/// Length of an object literal body up to (not including) its closing brace.
fn object_body_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}
