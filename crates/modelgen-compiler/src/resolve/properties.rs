//! Property resolution across a model's supertype graph.
//!
//! The graph is walked depth-first, post-order: every direct supertype is
//! resolved before the declaring type, so base properties take their slots
//! first and redeclarations merge into the slot they already own. A shared
//! ancestor is visited once, which keeps diamond inheritance free of
//! duplicates and stops a less-derived declaration from being layered on top
//! of a more-derived one.

use std::collections::{HashMap, HashSet};

use crate::diagnostic::CompilerError;
use crate::ir::{DirectiveSet, ModelGraph, PropertyDecl, TypeDecl, TypeExpr};

/// The effective descriptor of one property name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    pub name: String,

    /// Type of the most-derived declaration.
    pub ty: TypeExpr,

    pub mutable: bool,

    /// Type that first declared the property.
    pub declared_in: String,

    /// Most-derived type that (re)declared the property.
    pub origin: String,

    /// Directives merged down the supertype chain.
    pub directives: DirectiveSet,
}

/// Ordered mapping from property name to its effective descriptor.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProperties {
    model: String,
    slots: Vec<ResolvedProperty>,
    index: HashMap<String, usize>,
}

impl ResolvedProperties {
    fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Self::default()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn merge(&mut self, owner: &str, decl: &PropertyDecl) {
        match self.index.get(&decl.name) {
            Some(&slot) => {
                let existing = &mut self.slots[slot];
                existing.ty = decl.ty.clone();
                existing.mutable = decl.mutable;
                existing.origin = owner.to_string();
                existing.directives.layer(&decl.directives);
            }
            None => {
                let mut directives = DirectiveSet::new();
                directives.layer(&decl.directives);
                self.index.insert(decl.name.clone(), self.slots.len());
                self.slots.push(ResolvedProperty {
                    name: decl.name.clone(),
                    ty: decl.ty.clone(),
                    mutable: decl.mutable,
                    declared_in: owner.to_string(),
                    origin: owner.to_string(),
                    directives,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedProperty> {
        self.index.get(name).map(|&i| &self.slots[i])
    }

    /// Looks a property up by name, failing the pass when it is missing.
    pub fn require(&self, name: &str, context: &str) -> Result<&ResolvedProperty, CompilerError> {
        self.get(name)
            .ok_or_else(|| CompilerError::missing_property(&self.model, name, context))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.slots.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Resolves the full property set of a declared type.
pub fn resolve_properties(graph: &ModelGraph, model: &str) -> Result<ResolvedProperties, CompilerError> {
    let decl = graph.get(model).ok_or_else(|| CompilerError::UnknownModel {
        name: model.to_string(),
    })?;

    let mut resolved = ResolvedProperties::new(model);
    let mut visited = HashSet::new();
    walk(graph, decl, &mut resolved, &mut visited);
    Ok(resolved)
}

fn walk<'a>(
    graph: &'a ModelGraph,
    decl: &'a TypeDecl,
    resolved: &mut ResolvedProperties,
    visited: &mut HashSet<&'a str>,
) {
    if !visited.insert(decl.name.as_str()) {
        return;
    }

    // External supertypes (capability markers, library types) carry no
    // declared properties.
    for supertype in &decl.supertypes {
        if let Some(parent) = supertype.type_name().and_then(|name| graph.get(name)) {
            walk(graph, parent, resolved, visited);
        }
    }

    for property in &decl.properties {
        resolved.merge(&decl.name, property);
    }
}
