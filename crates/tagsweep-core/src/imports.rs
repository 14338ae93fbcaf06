//! Import resolution and insertion.
//!
//! After a file has been rewritten it refers to the constant object and
//! may need an import for it. Two steps:
//!
//! - [`ImportResolver::resolve_import_path`] picks one of three relative
//!   import forms from the directory segments of the file's path.
//! - [`ImportResolver::ensure_import`] inserts that statement after the
//!   first import declaration (or at the top of the file) unless the
//!   identifier is absent or already imported.
//!
//! Existing declarations are parsed into [`ImportDecl`] values first, so the
//! presence check sees named and aliased bindings, and a declaration that
//! spans several lines is never split by the insertion.

use std::fmt;
use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::categories::is_js_identifier;

static FROM_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^import\s+(?:type\s+)?(?P<clause>.*?)\s*\bfrom\s*["'](?P<source>[^"']*)["']"#)
        .unwrap()
});

static SIDE_EFFECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^import\s+["'](?P<source>[^"']*)["']"#).unwrap());

// ============================================================================
// Path Classification
// ============================================================================

/// How many directory levels separate a file from the module root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportDepth {
    /// `../`
    Parent,
    /// `../../`
    Nested,
    /// `../../../`
    Deep,
}

impl ImportDepth {
    /// Number of `../` steps.
    pub fn levels(&self) -> usize {
        match self {
            ImportDepth::Parent => 1,
            ImportDepth::Nested => 2,
            ImportDepth::Deep => 3,
        }
    }

    /// The relative prefix, e.g. `../../`.
    pub fn prefix(&self) -> String {
        "../".repeat(self.levels())
    }
}

/// Directory-segment families that select the import depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLayout {
    /// Segments selecting [`ImportDepth::Nested`]. Checked first.
    pub nested: Vec<String>,
    /// Segments selecting [`ImportDepth::Deep`].
    pub deep: Vec<String>,
}

impl Default for ImportLayout {
    fn default() -> Self {
        ImportLayout {
            nested: ["tests", "logic", "utils", "export", "premium", "storage"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            deep: ["components", "pages"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ImportLayout {
    /// Classify a path by exact, case-sensitive segment match.
    ///
    /// The nested family wins when segments of both families are present.
    pub fn classify(&self, path: &Path) -> ImportDepth {
        let segments: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();
        let has_any = |family: &[String]| segments.iter().any(|s| family.iter().any(|f| f == s));

        if has_any(&self.nested) {
            ImportDepth::Nested
        } else if has_any(&self.deep) {
            ImportDepth::Deep
        } else {
            ImportDepth::Parent
        }
    }
}

// ============================================================================
// Import Statement
// ============================================================================

/// The import line to insert: `import { IDENT } from "<prefix><module>";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub identifier: String,
    pub depth: ImportDepth,
    pub module: String,
}

impl ImportStatement {
    /// Render as source text, without a trailing newline.
    pub fn render(&self) -> String {
        format!(
            "import {{ {} }} from \"{}{}\";",
            self.identifier,
            self.depth.prefix(),
            self.module
        )
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ============================================================================
// Existing Declarations
// ============================================================================

/// An import declaration found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// 0-indexed line the declaration starts on.
    pub line_start: usize,
    /// 0-indexed line the declaration ends on.
    pub line_end: usize,
    /// Local names the declaration binds.
    pub bindings: Vec<String>,
    /// Module specifier, when it could be read.
    pub source: Option<String>,
}

impl ImportDecl {
    fn from_text(line_start: usize, line_end: usize, text: &str) -> Self {
        if let Some(caps) = FROM_CLAUSE.captures(text) {
            return ImportDecl {
                line_start,
                line_end,
                bindings: parse_bindings(&caps["clause"]),
                source: Some(caps["source"].to_string()),
            };
        }
        ImportDecl {
            line_start,
            line_end,
            bindings: Vec::new(),
            source: SIDE_EFFECT
                .captures(text)
                .map(|caps| caps["source"].to_string()),
        }
    }
}

/// Parse every declaration starting at a line beginning with `import `.
pub fn parse_import_decls(content: &str) -> Vec<ImportDecl> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut decls = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].starts_with("import ") {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        let mut depth = brace_delta(lines[i]);
        while depth > 0 && end + 1 < lines.len() {
            end += 1;
            depth += brace_delta(lines[end]);
        }
        if depth > 0 {
            // Never closed; treat the opening line on its own.
            end = start;
        }

        let text = lines[start..=end].join("\n");
        decls.push(ImportDecl::from_text(start, end, &text));
        i = end + 1;
    }

    decls
}

fn brace_delta(line: &str) -> isize {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Local bindings of an import clause such as `React, { useState as s }`.
fn parse_bindings(clause: &str) -> Vec<String> {
    let mut bindings = Vec::new();

    let (outside, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{} {}", &clause[..open], &clause[close + 1..]),
            Some(&clause[open + 1..close]),
        ),
        _ => (clause.to_string(), None),
    };

    for part in outside.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(rest) = part.strip_prefix('*') {
            if let Some(ns) = rest.trim().strip_prefix("as") {
                bindings.push(ns.trim().to_string());
            }
        } else if is_js_identifier(part) {
            bindings.push(part.to_string());
        }
    }

    if let Some(named) = named {
        for spec in named.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let spec = spec.strip_prefix("type ").unwrap_or(spec).trim();
            let local = match spec.split_once(" as ") {
                Some((_, alias)) => alias.trim(),
                None => spec,
            };
            if is_js_identifier(local) {
                bindings.push(local.to_string());
            }
        }
    }

    bindings
}

// ============================================================================
// Resolver
// ============================================================================

/// Decides and inserts the constant-table import.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    identifier: String,
    module: String,
    layout: ImportLayout,
    token: Regex,
}

impl ImportResolver {
    /// `identifier` is the constant object name, `module` the path of its
    /// defining module relative to the source root (no extension).
    pub fn new(identifier: impl Into<String>, module: impl Into<String>, layout: ImportLayout) -> Self {
        let identifier = identifier.into();
        // Escaped literal between character classes; always valid.
        let token = Regex::new(&format!(
            r"(?:^|[^A-Za-z0-9_$]){}(?:[^A-Za-z0-9_$]|$)",
            regex::escape(&identifier)
        ))
        .unwrap();
        ImportResolver {
            identifier,
            module: module.into(),
            layout,
            token,
        }
    }

    /// The exact text whose presence means the import already exists.
    pub fn canonical_spelling(&self) -> String {
        format!("import {{ {} }}", self.identifier)
    }

    /// Choose the import statement for a file at `path`.
    pub fn resolve_import_path(&self, path: &Path) -> ImportStatement {
        ImportStatement {
            identifier: self.identifier.clone(),
            depth: self.layout.classify(path),
            module: self.module.clone(),
        }
    }

    /// True if the identifier appears as a whole token.
    pub fn references_identifier(&self, content: &str) -> bool {
        self.token.is_match(content)
    }

    fn is_imported(&self, content: &str, decls: &[ImportDecl]) -> bool {
        content.contains(&self.canonical_spelling())
            || decls
                .iter()
                .any(|d| d.bindings.iter().any(|b| *b == self.identifier))
    }

    /// Insert the import if the identifier is used but not imported.
    ///
    /// The statement goes right after the first import declaration; without
    /// one it is prepended to the file. Calling this again on its own output
    /// returns it unchanged.
    pub fn ensure_import(&self, content: &str, path: &Path) -> String {
        if !self.references_identifier(content) {
            return content.to_string();
        }
        let decls = parse_import_decls(content);
        if self.is_imported(content, &decls) {
            return content.to_string();
        }

        let statement = self.resolve_import_path(path).render();
        let Some(anchor) = decls.first().map(|d| d.line_end) else {
            let eol = match content.split('\n').next() {
                Some(first) if first.ends_with('\r') => "\r\n",
                _ => "\n",
            };
            return format!("{}{}{}", statement, eol, content);
        };

        let mut lines: Vec<&str> = content.split('\n').collect();
        let inserted = if lines[anchor].ends_with('\r') {
            format!("{}\r", statement)
        } else {
            statement
        };
        lines.insert(anchor + 1, &inserted);
        lines.join("\n")
    }
}
