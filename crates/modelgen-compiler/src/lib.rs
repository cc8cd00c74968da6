//! # Modelgen Compiler
//!
//! This crate turns annotated model declarations into implementation class
//! descriptions (immutable value classes, DTOs, JPA entities) and companion
//! TypeScript definitions. The host's reflection layer supplies the models
//! as metadata documents; a separate source writer turns the emitted class
//! descriptions into source text.
//!
//! ## Supported Metadata Formats
//!
//! - JSON (default)
//!
//! ## Architecture
//!
//! ```text
//! Metadata documents
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  Format-specific parsing
//! │ (JSON → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Nesting & inheritance checks
//! │   (IR)       │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Resolve    │  Properties, settings, registry
//! │   (IR)       │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Class descriptions + TypeScript
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelgen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     metadata_dir: "build/metadata".into(),
//!     out_dir: "build/generated".into(),
//!     ..CompilerConfig::default()
//! };
//!
//! let compiler = Compiler::new(config);
//! let result = compiler.compile()?;
//! ```

pub mod config;
pub mod frontend;
pub mod ir;
pub mod validate;
pub mod resolve;
pub mod codegen;
pub mod diagnostic;

use std::path::{Path, PathBuf};
use tracing::info;

pub use config::{CompilerConfig, GeneratorSettings, TsSettings};
pub use diagnostic::CompilerError;
pub use codegen::{GeneratedOutput, TsDeclarations};

/// The main compiler struct that orchestrates the generation pass.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Runs the full pass and writes its output.
    ///
    /// 1. Create frontend for the configured format
    /// 2. Parse metadata documents into a model graph
    /// 3. Validate nesting and inheritance
    /// 4. Resolve every model and target (collection phase)
    /// 5. Emit class descriptions and TypeScript definitions
    /// 6. Write output files
    pub fn compile(&self) -> Result<CompileResult, CompilerError> {
        let generated = self.generate()?;
        self.write_output(&generated)?;
        Ok(CompileResult::of(&generated))
    }

    /// Runs the pass without writing anything.
    pub fn check(&self) -> Result<CompileResult, CompilerError> {
        self.generate().map(|generated| CompileResult::of(&generated))
    }

    /// Runs the pass and returns its output in memory.
    pub fn generate(&self) -> Result<GeneratedOutput, CompilerError> {
        let graph = self.load()?;
        let resolution = resolve::resolve(&graph, &self.config.settings)?;
        codegen::generate(&graph, &resolution, &self.config.settings)
    }

    /// Projects TypeScript definitions only, regardless of `enabled`.
    pub fn project_types(&self) -> Result<TsDeclarations, CompilerError> {
        let graph = self.load()?;
        let capabilities = resolve::CapabilityIndex::build(&graph);
        codegen::project_types(&graph, &capabilities, &self.config.settings.typescript)
    }

    fn load(&self) -> Result<ir::ModelGraph, CompilerError> {
        let mut frontend = frontend::create_frontend(&self.config.language)?;
        let graph = frontend.parse_directory(&self.config.metadata_dir)?;
        info!(
            types = graph.len(),
            models = graph.models().count(),
            format = frontend.language(),
            "loaded metadata"
        );
        validate::validate_graph(&graph)?;
        Ok(graph)
    }

    /// Writes one JSON document per class plus the TypeScript file.
    pub fn write_output(&self, generated: &GeneratedOutput) -> Result<(), CompilerError> {
        for class in &generated.classes {
            let path = class_path(&self.config.out_dir, &class.package, &class.name);
            let json = serde_json::to_string_pretty(class).map_err(|e| CompilerError::io(&path, e.to_string()))?;
            write_file(&path, &json)?;
        }

        if let Some(typescript) = &generated.typescript {
            let path = self.config.out_dir.join(&self.config.settings.typescript.output);
            write_file(&path, &typescript.render())?;
        }

        let result = CompileResult::of(generated);
        info!(
            models = result.models,
            classes = result.classes,
            type_definitions = result.type_definitions,
            out_dir = %self.config.out_dir.display(),
            "generation pass complete"
        );
        Ok(())
    }
}

/// `<out_dir>/<package path>/<Class>.json`.
pub fn class_path(out_dir: &Path, package: &str, class: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{}.json", class));
    path
}

fn write_file(path: &Path, content: &str) -> Result<(), CompilerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CompilerError::io(parent, e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| CompilerError::io(path, e.to_string()))
}

/// Result of a successful generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileResult {
    /// Number of annotated models.
    pub models: usize,
    /// Number of class descriptions emitted.
    pub classes: usize,
    /// Number of TypeScript definitions emitted.
    pub type_definitions: usize,
}

impl CompileResult {
    pub fn of(generated: &GeneratedOutput) -> Self {
        Self {
            models: generated.models,
            classes: generated.classes.len(),
            type_definitions: generated.typescript.as_ref().map(|ts| ts.len()).unwrap_or(0),
        }
    }
}
