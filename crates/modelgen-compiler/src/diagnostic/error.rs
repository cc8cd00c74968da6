//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during generation.
///
/// Every variant aborts the whole pass. There is no partial-success mode.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(modelgen::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Failed to parse metadata file '{}': {message}", path.display())]
    #[diagnostic(
        code(modelgen::input::parse_failed),
        help("Metadata files must be JSON documents of the shape {{ \"types\": [...] }}")
    )]
    ParseFailed {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid configuration file '{}': {message}", path.display())]
    #[diagnostic(code(modelgen::input::invalid_config))]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    #[error("Type '{name}' is declared more than once")]
    #[diagnostic(code(modelgen::input::duplicate_type))]
    DuplicateType {
        name: String,
    },

    #[error("No metadata found in '{}'", path.display())]
    #[diagnostic(
        code(modelgen::input::no_metadata),
        help("Point the metadata directory at the JSON files written by the host reflection step")
    )]
    NoMetadata {
        path: PathBuf,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Model '{model}' has an unsupported nesting shape: {shape}")]
    #[diagnostic(
        code(modelgen::config::unsupported_nesting),
        help("Generation targets can only be declared on top-level or member models")
    )]
    UnsupportedNesting {
        model: String,
        shape: String,
    },

    #[error("Model '{model}' is nested in '{enclosing}', which is not part of the metadata")]
    #[diagnostic(code(modelgen::config::unknown_enclosing))]
    UnknownEnclosing {
        model: String,
        enclosing: String,
    },

    #[error("Model '{model}' inherits from itself")]
    #[diagnostic(code(modelgen::config::cyclic_inheritance))]
    CyclicInheritance {
        model: String,
    },

    #[error("Targets '{first}' and '{second}' both generate class '{class}'")]
    #[diagnostic(
        code(modelgen::config::duplicate_class),
        help("Give one of the targets a distinct name, prefix or suffix")
    )]
    DuplicateClass {
        class: String,
        first: String,
        second: String,
    },

    #[error("Property '{property}' referenced by {context} does not exist on '{model}'")]
    #[diagnostic(code(modelgen::config::missing_property))]
    MissingProperty {
        model: String,
        property: String,
        context: String,
    },

    #[error("Cannot determine a default value for '{model}.{property}' ({type_desc}) in target '{target}'")]
    #[diagnostic(
        code(modelgen::config::no_default_value),
        help("Add an init directive for this target, or a no_init directive to make it a required constructor parameter")
    )]
    NoDefaultValue {
        model: String,
        target: String,
        property: String,
        type_desc: String,
    },

    #[error("Target '{target}' of '{model}' hashes arrays by {hash_mode} but compares them by {equals_mode}")]
    #[diagnostic(
        code(modelgen::config::inconsistent_array_comparison),
        help("Arrays that compare equal must hash equal: use the same array comparison for equals and hashCode")
    )]
    InconsistentArrayComparison {
        model: String,
        target: String,
        equals_mode: String,
        hash_mode: String,
    },

    #[error("Unknown model: {name}")]
    #[diagnostic(code(modelgen::config::unknown_model))]
    UnknownModel {
        name: String,
    },

    // =========================================================================
    // Projection Errors
    // =========================================================================
    #[error("Cannot project type '{type_desc}' referenced from {context}")]
    #[diagnostic(
        code(modelgen::types::unresolvable),
        help("Add a mapping for this type to the TypeScript settings, or include its declaration in the metadata")
    )]
    UnresolvableType {
        type_desc: String,
        context: String,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported metadata format: {language}")]
    #[diagnostic(code(modelgen::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a missing-property error.
    pub fn missing_property(
        model: impl Into<String>,
        property: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::MissingProperty {
            model: model.into(),
            property: property.into(),
            context: context.into(),
        }
    }
}
