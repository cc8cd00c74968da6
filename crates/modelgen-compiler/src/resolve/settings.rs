//! Per-target settings resolution.
//!
//! Turns one generation annotation on a model into a fully defaulted
//! [`ImplementationConfig`]. Comparable and cloneable support are derived
//! from the model's capabilities; the annotation toggles can only switch
//! them off.

use crate::config::GeneratorSettings;
use crate::diagnostic::CompilerError;
use crate::ir::{
    annotations_for, qualify, Annotation, ArrayComparison, ModelGraph, Nesting, TargetKind,
    TargetSpec, TypeDecl, TypeExpr,
};
use super::capability::{Capability, CapabilityIndex};

/// Which structural methods a generated class receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityFlags {
    pub equals: bool,
    pub hash_code: bool,
    pub to_string: bool,
    pub comparable: bool,
    pub cloneable: bool,
    pub copy: bool,
}

/// One entry of an explicit compareTo order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub property: String,
    pub descending: bool,
}

impl OrderKey {
    /// Parses `name` or `-name` (descending).
    pub fn parse(entry: &str) -> Self {
        match entry.strip_prefix('-') {
            Some(property) => Self {
                property: property.trim().to_string(),
                descending: true,
            },
            None => Self {
                property: entry.trim().to_string(),
                descending: false,
            },
        }
    }
}

/// Resolved settings of one (model, target) pair. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplementationConfig {
    /// Fully qualified name of the model.
    pub model: String,
    pub kind: TargetKind,
    pub label: String,
    pub package: String,
    pub class_name: String,
    pub type_params: Vec<String>,
    pub superclass: Option<String>,
    pub flags: CapabilityFlags,
    pub mutable: bool,
    pub force_nullable: bool,
    pub default_omit: bool,
    pub equals_arrays: ArrayComparison,
    pub hash_arrays: ArrayComparison,
    pub compare_order: Vec<OrderKey>,
    pub compare_all_properties: bool,
    pub vararg_guard: Option<usize>,
    pub annotations: Vec<Annotation>,
}

impl ImplementationConfig {
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.class_name)
    }

    /// The generated class as a type, parameterized by its type variables.
    pub fn type_expr(&self) -> TypeExpr {
        TypeExpr::generic(
            self.qualified_name(),
            self.type_params
                .iter()
                .map(|name| TypeExpr::Param { name: name.clone() })
                .collect(),
        )
    }

    pub fn implements_model(&self) -> bool {
        self.kind.implements_model()
    }
}

/// Resolves one target annotation of a model.
pub fn resolve_config(
    graph: &ModelGraph,
    capabilities: &CapabilityIndex,
    settings: &GeneratorSettings,
    model: &TypeDecl,
    spec: &TargetSpec,
) -> Result<ImplementationConfig, CompilerError> {
    let label = spec.label().to_string();

    let enclosing = enclosing_prefix(graph, model)?;
    let prefix = spec
        .prefix
        .clone()
        .unwrap_or_else(|| spec.kind.default_prefix().to_string());
    let suffix = spec.suffix.clone().unwrap_or_else(|| match spec.kind {
        TargetKind::Dto => spec.name.clone().unwrap_or_default(),
        TargetKind::Immutable | TargetKind::JpaEntity => String::new(),
    });
    let class_name = format!(
        "{}{}{}{}{}",
        prefix,
        enclosing,
        base_name(model.simple_name(), &settings.template_suffix),
        suffix,
        spec.kind.kind_suffix()
    );
    let package = spec
        .package
        .clone()
        .unwrap_or_else(|| graph.package_of(model));

    let flags = CapabilityFlags {
        equals: spec.equals,
        hash_code: spec.hash_code,
        to_string: spec.to_string,
        comparable: spec.comparable && capabilities.has(&model.name, Capability::Ordering),
        cloneable: spec.cloneable && capabilities.has(&model.name, Capability::Cloning),
        copy: spec.copy,
    };

    if flags.equals && flags.hash_code && spec.hash_arrays < spec.equals_arrays {
        return Err(CompilerError::InconsistentArrayComparison {
            model: model.name.clone(),
            target: label,
            equals_mode: spec.equals_arrays.to_string(),
            hash_mode: spec.hash_arrays.to_string(),
        });
    }

    let mut annotations: Vec<Annotation> = spec
        .kind
        .class_annotations()
        .iter()
        .map(|name| Annotation::new(*name))
        .collect();
    annotations.extend(annotations_for(&model.annotations, &label));

    Ok(ImplementationConfig {
        model: model.name.clone(),
        kind: spec.kind,
        label,
        package,
        class_name,
        type_params: model.type_params.clone(),
        superclass: spec.superclass.clone(),
        flags,
        mutable: match spec.kind {
            TargetKind::Immutable => false,
            _ => spec.mutable.unwrap_or_else(|| spec.kind.default_mutable()),
        },
        force_nullable: spec.force_nullable,
        default_omit: spec.default_omit,
        equals_arrays: spec.equals_arrays,
        hash_arrays: spec.hash_arrays,
        compare_order: spec.compare_order.iter().map(|e| OrderKey::parse(e)).collect(),
        compare_all_properties: spec.compare_all_properties,
        vararg_guard: spec.vararg_guard,
        annotations,
    })
}

/// Model name without the template suffix.
fn base_name<'a>(simple: &'a str, template_suffix: &str) -> &'a str {
    match simple.strip_suffix(template_suffix) {
        Some(stripped) if !stripped.is_empty() && !template_suffix.is_empty() => stripped,
        _ => simple,
    }
}

/// Simple names of every enclosing type, outermost first.
fn enclosing_prefix(graph: &ModelGraph, model: &TypeDecl) -> Result<String, CompilerError> {
    let mut names = Vec::new();
    let mut current = model;
    loop {
        match &current.nesting {
            Nesting::TopLevel => break,
            Nesting::Member { enclosing } => {
                let outer = graph.get(enclosing).ok_or_else(|| CompilerError::UnknownEnclosing {
                    model: current.name.clone(),
                    enclosing: enclosing.clone(),
                })?;
                if names.len() > graph.len() {
                    return Err(CompilerError::UnsupportedNesting {
                        model: model.name.clone(),
                        shape: "circular member nesting".to_string(),
                    });
                }
                names.push(outer.simple_name().to_string());
                current = outer;
            }
            other => {
                return Err(CompilerError::UnsupportedNesting {
                    model: model.name.clone(),
                    shape: other.describe().to_string(),
                })
            }
        }
    }
    names.reverse();
    Ok(names.concat())
}
