//! Compiler configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::diagnostic::CompilerError;

/// Configuration for the modelgen compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Directory containing the host's metadata documents.
    pub metadata_dir: PathBuf,

    /// Directory to write class descriptions to.
    pub out_dir: PathBuf,

    /// Metadata format (default: "json").
    pub language: String,

    /// Generation settings shared by every model.
    pub settings: GeneratorSettings,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            metadata_dir: PathBuf::from("build/modelgen/metadata"),
            out_dir: PathBuf::from("build/modelgen/generated"),
            language: "json".to_string(),
            settings: GeneratorSettings::default(),
        }
    }
}

/// Settings loaded from `modelgen.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Suffix stripped from model names when naming generated classes.
    pub template_suffix: String,

    /// Default-value expressions by qualified type name. Entries win over
    /// the built-in defaults.
    pub defaults: BTreeMap<String, String>,

    pub typescript: TsSettings,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            template_suffix: "Model".to_string(),
            defaults: BTreeMap::new(),
            typescript: TsSettings::default(),
        }
    }
}

impl GeneratorSettings {
    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))?;
        Self::from_toml(&content).map_err(|message| CompilerError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Loads settings from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, CompilerError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// TypeScript projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsSettings {
    pub enabled: bool,

    /// Output file, relative to the output directory.
    pub output: PathBuf,

    /// Types to start the walk from. Empty means every model.
    pub roots: Vec<String>,

    /// Explicit projections by qualified type name.
    pub mappings: BTreeMap<String, String>,

    /// Supertypes left out of `extends` clauses.
    pub ignored_supertypes: Vec<String>,

    /// Type joined to nullable projections.
    pub void_marker: String,

    /// Projection of the universal top type.
    pub top_type: String,

    /// Prefix in front of every definition. Blank suppresses exports.
    pub export_prefix: String,

    /// Project 64-bit integers as `bigint`.
    pub wide_integers: bool,
}

impl Default for TsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output: PathBuf::from("types.d.ts"),
            roots: Vec::new(),
            mappings: BTreeMap::new(),
            ignored_supertypes: [
                "kotlin.Any",
                "java.lang.Object",
                "kotlin.Comparable",
                "java.lang.Comparable",
                "kotlin.Cloneable",
                "java.lang.Cloneable",
                "java.io.Serializable",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            void_marker: "undefined".to_string(),
            top_type: "any".to_string(),
            export_prefix: "export ".to_string(),
            wide_integers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = GeneratorSettings::from_toml("").unwrap();
        assert_eq!(settings, GeneratorSettings::default());
    }

    #[test]
    fn test_partial_typescript_section() {
        let settings = GeneratorSettings::from_toml(
            r#"
            template_suffix = "Def"

            [defaults]
            "java.time.Instant" = "Instant.EPOCH"

            [typescript]
            void_marker = "null"
            export_prefix = ""

            [typescript.mappings]
            "java.time.Instant" = "string"
            "#,
        )
        .unwrap();
        assert_eq!(settings.template_suffix, "Def");
        assert_eq!(settings.defaults["java.time.Instant"], "Instant.EPOCH");
        assert_eq!(settings.typescript.void_marker, "null");
        assert_eq!(settings.typescript.export_prefix, "");
        assert_eq!(settings.typescript.top_type, "any");
        assert!(settings
            .typescript
            .ignored_supertypes
            .contains(&"kotlin.Any".to_string()));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(GeneratorSettings::from_toml("template_suffix = 3").is_err());
    }
}
