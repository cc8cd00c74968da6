//! JSON metadata frontend.
//!
//! Reads the documents the host reflection step writes (`{ "types": [...] }`)
//! and merges them into one [`ModelGraph`].

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::diagnostic::CompilerError;
use crate::ir::{MetadataDocument, ModelGraph};
use super::Frontend;

/// JSON metadata frontend implementation.
#[derive(Debug, Default)]
pub struct JsonFrontend;

impl JsonFrontend {
    /// Creates a new JSON frontend.
    pub fn new() -> Self {
        Self
    }

    /// Parses a single metadata document.
    pub fn parse_document(source: &str, path: &Path) -> Result<MetadataDocument, CompilerError> {
        serde_json::from_str(source).map_err(|e| CompilerError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Frontend for JsonFrontend {
    fn language(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse_directory(&mut self, dir: &Path) -> Result<ModelGraph, CompilerError> {
        if !dir.is_dir() {
            return Err(CompilerError::io(dir, "metadata directory does not exist"));
        }

        // Discover metadata files; sorted so declaration order is stable
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if self.extensions().contains(&ext.to_string_lossy().as_ref()) {
                        files.push(path.to_path_buf());
                    }
                }
            }
        }

        if files.is_empty() {
            return Err(CompilerError::NoMetadata {
                path: dir.to_path_buf(),
            });
        }

        let mut graph = ModelGraph::new();
        for path in &files {
            let source = std::fs::read_to_string(path)
                .map_err(|e| CompilerError::io(path, e.to_string()))?;
            let document = Self::parse_document(&source, path)?;
            debug!(file = %path.display(), types = document.types.len(), "loaded metadata document");
            for decl in document.types {
                graph.insert(decl)?;
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory_merges_documents() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"types":[{"name":"com.example.Base","properties":[
                {"name":"id","type":{"kind":"primitive","name":"long"}}]}]}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("b.json"),
            r#"{"types":[{"name":"com.example.Person",
                "supertypes":[{"kind":"named","name":"com.example.Base"}],
                "targets":[{"kind":"immutable"}]}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let graph = JsonFrontend::new().parse_directory(dir.path()).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.contains("com.example.Base"));
        assert_eq!(graph.models().count(), 1);
    }

    #[test]
    fn test_malformed_document_names_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{\"types\": [").unwrap();

        let err = JsonFrontend::new().parse_directory(dir.path()).unwrap_err();
        match err {
            CompilerError::ParseFailed { path, .. } => assert!(path.ends_with("broken.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = JsonFrontend::new().parse_directory(dir.path()).unwrap_err();
        assert!(matches!(err, CompilerError::NoMetadata { .. }));
    }
}
