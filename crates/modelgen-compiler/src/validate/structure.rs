//! Structure validation for the model graph.
//!
//! Checks nesting shapes and that inheritance is acyclic before any
//! resolution runs.

use std::collections::HashSet;

use crate::diagnostic::CompilerError;
use crate::ir::{ModelGraph, Nesting, TypeDecl};

/// Validates the structure of the model graph.
pub fn validate_structure(graph: &ModelGraph) -> Result<(), CompilerError> {
    for decl in graph.types() {
        validate_enclosing_chain(graph, decl)?;
    }
    for model in graph.models() {
        validate_nesting(model)?;
    }
    validate_acyclic(graph)?;
    Ok(())
}

/// Only top-level and member models can carry generation targets.
fn validate_nesting(model: &TypeDecl) -> Result<(), CompilerError> {
    match &model.nesting {
        Nesting::TopLevel | Nesting::Member { .. } => Ok(()),
        other => Err(CompilerError::UnsupportedNesting {
            model: model.name.clone(),
            shape: other.describe().to_string(),
        }),
    }
}

/// Enclosing types must exist and must not enclose each other.
fn validate_enclosing_chain(graph: &ModelGraph, decl: &TypeDecl) -> Result<(), CompilerError> {
    let mut seen = HashSet::new();
    let mut current = decl;
    while let Nesting::Member { enclosing } = &current.nesting {
        if !seen.insert(current.name.as_str()) {
            return Err(CompilerError::UnsupportedNesting {
                model: decl.name.clone(),
                shape: "circular member nesting".to_string(),
            });
        }
        current = graph.get(enclosing).ok_or_else(|| CompilerError::UnknownEnclosing {
            model: current.name.clone(),
            enclosing: enclosing.clone(),
        })?;
    }
    Ok(())
}

/// Depth-first over the supertype graph. Each declaration is expanded
/// once; `done` is shared across every starting point.
fn validate_acyclic(graph: &ModelGraph) -> Result<(), CompilerError> {
    let mut done = HashSet::new();
    for decl in graph.types() {
        let mut stack = Vec::new();
        visit(graph, decl, &mut stack, &mut done)?;
    }
    Ok(())
}

fn visit<'a>(
    graph: &'a ModelGraph,
    decl: &'a TypeDecl,
    stack: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<(), CompilerError> {
    if done.contains(decl.name.as_str()) {
        return Ok(());
    }
    if stack.contains(&decl.name.as_str()) {
        return Err(CompilerError::CyclicInheritance {
            model: decl.name.clone(),
        });
    }
    stack.push(&decl.name);
    for supertype in &decl.supertypes {
        if let Some(parent) = supertype.type_name().and_then(|name| graph.get(name)) {
            visit(graph, parent, stack, done)?;
        }
    }
    stack.pop();
    done.insert(&decl.name);
    Ok(())
}
