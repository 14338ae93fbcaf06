//! Configuration handling for tagsweep.
//!
//! Configuration is read from a TOML file (`tagsweep.toml` by default).
//! Every field is optional; the defaults reproduce the layout of a
//! TypeScript project whose constant table lives at
//! `src/core/constants/categories.ts`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::categories::{is_js_identifier, CategoryTable, DEFAULT_IDENTIFIER};
use crate::error::SweepResult;
use crate::files::FileSelection;
use crate::imports::{ImportLayout, ImportResolver};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "tagsweep.toml";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory to scan.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions to rewrite, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Files whose root-relative path contains any of these are skipped.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// The constant table.
    #[serde(default)]
    pub constants: ConstantsConfig,

    /// Directory families that select the import depth.
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Where the constant table lives and what it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantsConfig {
    /// Name of the constant object.
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Module path of the table relative to the source root, no extension.
    #[serde(default = "default_module")]
    pub module: String,

    /// Source file defining the table. When set, categories are read from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Explicit category tags, used when `source` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Directory-segment families.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_nested")]
    pub nested: Vec<String>,

    #[serde(default = "default_deep")]
    pub deep: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

fn default_exclude() -> Vec<String> {
    ["node_modules", ".git", "dist", "build", "categories.ts"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_identifier() -> String {
    DEFAULT_IDENTIFIER.to_string()
}

fn default_module() -> String {
    "core/constants/categories".to_string()
}

fn default_nested() -> Vec<String> {
    ImportLayout::default().nested
}

fn default_deep() -> Vec<String> {
    ImportLayout::default().deep
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            constants: ConstantsConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            module: default_module(),
            source: None,
            categories: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            nested: default_nested(),
            deep: default_deep(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `explicit` if given, else `tagsweep.toml` in `dir` if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(message: String) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { message })
        }

        if self.extensions.is_empty() {
            return invalid("extensions must not be empty".to_string());
        }
        if let Some(ext) = self.extensions.iter().find(|e| e.is_empty() || e.starts_with('.')) {
            return invalid(format!("extension '{}' must be non-empty and have no leading dot", ext));
        }
        if !is_js_identifier(&self.constants.identifier) {
            return invalid(format!(
                "constants.identifier '{}' is not a valid identifier",
                self.constants.identifier
            ));
        }
        if self.constants.module.trim().is_empty() {
            return invalid("constants.module must not be empty".to_string());
        }
        if let Some(categories) = &self.constants.categories {
            if categories.is_empty() {
                return invalid("constants.categories must not be empty".to_string());
            }
            if let Some(bad) = categories.iter().find(|c| !is_js_identifier(c)) {
                return invalid(format!("category '{}' is not a valid identifier", bad));
            }
        }
        Ok(())
    }

    /// Resolve `path` against `base` unless it is absolute.
    fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    /// Scan root, resolved against `base`.
    pub fn root_dir(&self, base: &Path) -> PathBuf {
        Self::resolve(base, &self.root)
    }

    /// Build the category table: source file, then explicit list, then
    /// the built-in tags.
    pub fn category_table(&self, base: &Path) -> SweepResult<CategoryTable> {
        let identifier = &self.constants.identifier;
        if let Some(source) = &self.constants.source {
            return CategoryTable::load(identifier, &Self::resolve(base, source));
        }
        if let Some(names) = &self.constants.categories {
            return CategoryTable::from_names(identifier, names);
        }
        if identifier == DEFAULT_IDENTIFIER {
            return Ok(CategoryTable::builtin());
        }
        CategoryTable::from_names(identifier, &crate::categories::DEFAULT_CATEGORIES)
    }

    /// Import resolver for this configuration.
    pub fn import_resolver(&self) -> ImportResolver {
        ImportResolver::new(
            self.constants.identifier.clone(),
            self.constants.module.clone(),
            ImportLayout {
                nested: self.layout.nested.clone(),
                deep: self.layout.deep.clone(),
            },
        )
    }

    /// Which files to visit.
    pub fn selection(&self) -> FileSelection {
        FileSelection {
            extensions: self.extensions.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_match_the_standard_layout() {
        let config = Config::default();
        assert_eq!(config.root, PathBuf::from("src"));
        assert_eq!(config.extensions, vec!["ts", "tsx"]);
        assert!(config.exclude.contains(&"categories.ts".to_string()));
        assert_eq!(config.constants.identifier, "CATEGORIES");
        assert_eq!(config.layout.deep, vec!["components", "pages"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::from_toml("", Path::new("tagsweep.toml")).unwrap();
        assert_eq!(config.extensions, Config::default().extensions);
        assert_eq!(config.constants.module, "core/constants/categories");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = r#"
root = "app"
exclude = ["generated"]

[constants]
categories = ["meat", "fish"]

[layout]
deep = ["views"]
"#;
        let config = Config::from_toml(text, Path::new("tagsweep.toml")).unwrap();
        assert_eq!(config.root, PathBuf::from("app"));
        assert_eq!(config.exclude, vec!["generated"]);
        assert_eq!(config.constants.identifier, "CATEGORIES");
        assert_eq!(config.layout.deep, vec!["views"]);
        assert_eq!(config.layout.nested, ImportLayout::default().nested);

        let table = config.category_table(Path::new(".")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_unparseable_toml() {
        let err = Config::from_toml("extensions = 3", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_invalid_values() {
        for text in [
            "extensions = []",
            "extensions = [\".ts\"]",
            "[constants]\nidentifier = \"my-cats\"",
            "[constants]\nmodule = \" \"",
            "[constants]\ncategories = []",
            "[constants]\ncategories = [\"a b\"]",
        ] {
            let err = Config::from_toml(text, Path::new("x.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{}", text);
        }
    }

    #[test]
    fn builtin_table_without_overrides() {
        let table = Config::default().category_table(Path::new(".")).unwrap();
        assert_eq!(table, CategoryTable::builtin());
    }

    #[test]
    fn custom_identifier_keeps_default_tags() {
        let mut config = Config::default();
        config.constants.identifier = "FOOD_GROUPS".to_string();
        let table = config.category_table(Path::new(".")).unwrap();
        assert_eq!(table.identifier(), "FOOD_GROUPS");
        assert_eq!(table.len(), 11);
    }

    #[test]
    fn root_resolves_against_base() {
        let config = Config::default();
        assert_eq!(config.root_dir(Path::new("/work")), PathBuf::from("/work/src"));
    }
}
