//! Default-value expressions for constructor parameters.

use std::collections::BTreeMap;

use crate::ir::{Expr, ModelGraph, Primitive, TypeExpr};

const COLLECTION_DEFAULTS: &[(&str, &str)] = &[
    ("kotlin.collections.Iterable", "listOf()"),
    ("kotlin.collections.Collection", "listOf()"),
    ("kotlin.collections.List", "listOf()"),
    ("kotlin.collections.MutableCollection", "mutableListOf()"),
    ("kotlin.collections.MutableList", "mutableListOf()"),
    ("kotlin.collections.Set", "setOf()"),
    ("kotlin.collections.MutableSet", "mutableSetOf()"),
    ("kotlin.collections.Map", "mapOf()"),
    ("kotlin.collections.MutableMap", "mutableMapOf()"),
    ("java.util.List", "mutableListOf()"),
    ("java.util.Set", "mutableSetOf()"),
    ("java.util.Map", "mutableMapOf()"),
];

/// Built-in defaults plus user overrides keyed by qualified type name.
#[derive(Debug, Clone, Default)]
pub struct DefaultValues {
    overrides: BTreeMap<String, String>,
}

impl DefaultValues {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Default expression for a type, if one can be determined.
    pub fn default_for(&self, ty: &TypeExpr, graph: &ModelGraph) -> Option<Expr> {
        if ty.is_nullable() {
            return Some(Expr::Null);
        }
        if let Some(source) = ty.type_name().and_then(|name| self.overrides.get(name)) {
            return Some(Expr::literal(source.clone()));
        }

        match ty {
            TypeExpr::Primitive { name } => Some(Expr::literal(primitive_default(*name))),
            TypeExpr::Array { .. } => Some(Expr::literal("emptyArray()")),
            TypeExpr::Named { name, .. } => {
                if let Some((_, source)) = COLLECTION_DEFAULTS.iter().find(|(n, _)| *n == name.as_str()) {
                    return Some(Expr::literal(*source));
                }
                graph
                    .get(name)
                    .filter(|decl| decl.has_no_arg_constructor)
                    .map(|decl| Expr::Construct {
                        class: decl.name.clone(),
                        args: Vec::new(),
                    })
            }
            TypeExpr::Param { .. } | TypeExpr::Nullable { .. } => None,
        }
    }
}

fn primitive_default(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => "false",
        Primitive::Char => "'\\u0000'",
        Primitive::Byte | Primitive::Short | Primitive::Int => "0",
        Primitive::Long => "0L",
        Primitive::Float => "0f",
        Primitive::Double => "0.0",
        Primitive::String => "\"\"",
    }
}
