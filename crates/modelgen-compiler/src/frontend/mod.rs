//! Metadata frontends.
//!
//! Each frontend turns the host's reflection output into a [`ModelGraph`].
//! Nothing downstream depends on the format the host wrote.

pub mod json;

use std::path::Path;
use crate::diagnostic::CompilerError;
use crate::ir::ModelGraph;

/// Trait for metadata frontends.
pub trait Frontend {
    /// Returns the format name (e.g., "json").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles.
    fn extensions(&self) -> &[&str];

    /// Reads every metadata document in the given directory.
    fn parse_directory(&mut self, dir: &Path) -> Result<ModelGraph, CompilerError>;
}

/// Creates a frontend for the given metadata format.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, CompilerError> {
    match language {
        "json" => Ok(Box::new(json::JsonFrontend::new())),
        _ => Err(CompilerError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
