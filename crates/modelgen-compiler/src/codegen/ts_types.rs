//! TypeScript type projection.
//!
//! Walks the declared type graph from a set of roots and emits one
//! definition per distinct declaration, in first-visited (pre-order) order.
//! A declaration takes its slot before its properties are projected, so
//! self-referential and mutually-referential graphs terminate.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::TsSettings;
use crate::diagnostic::CompilerError;
use crate::ir::{simple_name, DeclKind, ModelGraph, Primitive, TypeDecl, TypeExpr};
use crate::resolve::{Capability, CapabilityIndex};

/// One emitted TypeScript definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Qualified name of the projected declaration.
    pub name: String,
    pub source: String,
}

/// Projected definitions, in emission order.
#[derive(Debug, Clone, Default)]
pub struct TsDeclarations {
    pub definitions: Vec<TypeDefinition>,
}

impl TsDeclarations {
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The whole file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for definition in &self.definitions {
            out.push_str(&definition.source);
            out.push_str("\n\n");
        }
        out
    }
}

/// A projected type: the members of a flattened union.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Union(Vec<String>);

impl Union {
    fn single(text: impl Into<String>) -> Self {
        Union(vec![text.into()])
    }

    fn add(&mut self, member: String) {
        if !self.0.contains(&member) {
            self.0.push(member);
        }
    }

    fn is_union(&self) -> bool {
        self.0.len() > 1
    }

    fn render(&self) -> String {
        self.0.join(" | ")
    }

    /// Rendering inside another composite type.
    fn grouped(&self) -> String {
        if self.is_union() {
            format!("({})", self.render())
        } else {
            self.render()
        }
    }
}

/// Projects declarations of one graph.
pub struct TypeProjector<'a> {
    graph: &'a ModelGraph,
    capabilities: &'a CapabilityIndex,
    settings: &'a TsSettings,
    visited: HashMap<String, usize>,
    slots: Vec<Option<TypeDefinition>>,
}

impl<'a> TypeProjector<'a> {
    pub fn new(graph: &'a ModelGraph, capabilities: &'a CapabilityIndex, settings: &'a TsSettings) -> Self {
        Self {
            graph,
            capabilities,
            settings,
            visited: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Projects a root declaration and everything it references.
    pub fn visit(&mut self, name: &str) -> Result<(), CompilerError> {
        if self.visited.contains_key(name) {
            return Ok(());
        }
        let graph = self.graph;
        let decl = graph.get(name).ok_or_else(|| CompilerError::UnresolvableType {
            type_desc: name.to_string(),
            context: "TypeScript root".to_string(),
        })?;

        let slot = self.slots.len();
        self.visited.insert(name.to_string(), slot);
        self.slots.push(None);

        let body = match decl.kind {
            DeclKind::Enum => self.enum_definition(decl),
            _ => self.interface_definition(decl)?,
        };
        debug!(name = %decl.name, "projected type");
        self.slots[slot] = Some(TypeDefinition {
            name: decl.name.clone(),
            source: format!("{}{}", self.settings.export_prefix, body),
        });
        Ok(())
    }

    pub fn finish(self) -> TsDeclarations {
        TsDeclarations {
            definitions: self.slots.into_iter().flatten().collect(),
        }
    }

    fn enum_definition(&self, decl: &TypeDecl) -> String {
        let literals = if decl.enum_entries.is_empty() {
            "never".to_string()
        } else {
            decl.enum_entries
                .iter()
                .map(|entry| format!("\"{}\"", entry))
                .collect::<Vec<_>>()
                .join(" | ")
        };
        format!("type {} = {};", decl.simple_name(), literals)
    }

    fn interface_definition(&mut self, decl: &TypeDecl) -> Result<String, CompilerError> {
        let mut header = format!("interface {}", decl.simple_name());
        if !decl.type_params.is_empty() {
            header.push_str(&format!("<{}>", decl.type_params.join(", ")));
        }

        let context = format!("supertypes of {}", decl.name);
        let mut extends = Vec::new();
        for supertype in &decl.supertypes {
            // containers project to array or index types, which an interface cannot extend
            let ignored = supertype
                .type_name()
                .map(|name| {
                    self.settings.ignored_supertypes.iter().any(|i| i == name)
                        || self.capabilities.has(name, Capability::Collection)
                        || self.capabilities.has(name, Capability::Mapping)
                })
                .unwrap_or(false);
            if !ignored {
                extends.push(self.project(supertype, &context)?.render());
            }
        }
        if !extends.is_empty() {
            header.push_str(" extends ");
            header.push_str(&extends.join(", "));
        }

        if decl.properties.is_empty() {
            return Ok(format!("{} {{}}", header));
        }

        let mut lines = vec![format!("{} {{", header)];
        for property in &decl.properties {
            let context = format!("property {} of {}", property.name, decl.name);
            let projected = self.project(&property.ty, &context)?;
            lines.push(format!("    {}: {};", property.name, projected.render()));
        }
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }

    fn project(&mut self, ty: &TypeExpr, context: &str) -> Result<Union, CompilerError> {
        let mapped = match ty {
            TypeExpr::Nullable { .. } => None,
            _ => ty.type_name().and_then(|name| self.settings.mappings.get(name)),
        };
        if let Some(mapped) = mapped {
            return Ok(Union::single(mapped.clone()));
        }

        match ty {
            TypeExpr::Nullable { inner } => {
                let mut union = self.project(inner.non_null(), context)?;
                union.add(self.settings.void_marker.clone());
                Ok(union)
            }
            TypeExpr::Primitive { name } => Ok(Union::single(self.primitive(*name))),
            TypeExpr::Param { name } => Ok(Union::single(name.clone())),
            TypeExpr::Array { element } => {
                let element = self.project(element, context)?;
                Ok(Union::single(format!("{}[]", element.grouped())))
            }
            TypeExpr::Named { name, args } => self.project_named(ty, name, args, context),
        }
    }

    fn project_named(&mut self, ty: &TypeExpr, name: &str, args: &[TypeExpr], context: &str) -> Result<Union, CompilerError> {
        if self.capabilities.has(name, Capability::Top) {
            return Ok(Union::single(self.settings.top_type.clone()));
        }

        if self.capabilities.has(name, Capability::Collection) {
            let args = self.container_args(name, args, Capability::Collection);
            let element = match args.first() {
                Some(element) => self.project(element, context)?.grouped(),
                None => self.settings.top_type.clone(),
            };
            return Ok(Union::single(format!("{}[]", element)));
        }

        if self.capabilities.has(name, Capability::Mapping) {
            let args = self.container_args(name, args, Capability::Mapping);
            let key = match args.first() {
                Some(key) => self.project(key, context)?.render(),
                None => "string".to_string(),
            };
            let value = match args.get(1) {
                Some(value) => self.project(value, context)?.grouped(),
                None => self.settings.top_type.clone(),
            };
            return Ok(Union::single(format!("{{ [key: {}]: {} }}", key, value)));
        }

        if !self.graph.contains(name) {
            return Err(CompilerError::UnresolvableType {
                type_desc: ty.to_string(),
                context: context.to_string(),
            });
        }
        self.visit(name)?;

        let mut rendered = simple_name(name).to_string();
        if !args.is_empty() {
            let args = args
                .iter()
                .map(|arg| self.project(arg, context).map(|u| u.render()))
                .collect::<Result<Vec<_>, _>>()?;
            rendered.push_str(&format!("<{}>", args.join(", ")));
        }
        Ok(Union::single(rendered))
    }

    /// Type arguments of the library container a type is or extends. A
    /// declared type is followed up the supertype carrying the capability,
    /// binding its type parameters along the way.
    fn container_args(&self, name: &str, args: &[TypeExpr], capability: Capability) -> Vec<TypeExpr> {
        let mut name = name.to_string();
        let mut args = args.to_vec();
        let mut seen = HashSet::new();

        while let Some(decl) = self.graph.get(&name) {
            if !seen.insert(name.clone()) {
                break;
            }
            let carrier = decl.supertypes.iter().find(|supertype| {
                supertype
                    .type_name()
                    .map(|parent| self.capabilities.has(parent, capability))
                    .unwrap_or(false)
            });
            let Some(carrier) = carrier else {
                break;
            };
            let bindings: HashMap<&str, &TypeExpr> = decl
                .type_params
                .iter()
                .map(String::as_str)
                .zip(args.iter())
                .collect();
            match substitute(carrier, &bindings) {
                TypeExpr::Named { name: parent, args: parent_args } => {
                    name = parent;
                    args = parent_args;
                }
                _ => break,
            }
        }
        args
    }

    fn primitive(&self, primitive: Primitive) -> &'static str {
        match primitive {
            Primitive::Boolean => "boolean",
            Primitive::Char | Primitive::String => "string",
            Primitive::Long if self.settings.wide_integers => "bigint",
            Primitive::Byte | Primitive::Short | Primitive::Int | Primitive::Long => "number",
            Primitive::Float | Primitive::Double => "number",
        }
    }
}

/// Replaces bound type variables.
fn substitute(ty: &TypeExpr, bindings: &HashMap<&str, &TypeExpr>) -> TypeExpr {
    match ty {
        TypeExpr::Param { name } => bindings
            .get(name.as_str())
            .map(|bound| (*bound).clone())
            .unwrap_or_else(|| ty.clone()),
        TypeExpr::Named { name, args } => TypeExpr::generic(
            name.clone(),
            args.iter().map(|arg| substitute(arg, bindings)).collect(),
        ),
        TypeExpr::Array { element } => TypeExpr::array(substitute(element, bindings)),
        TypeExpr::Nullable { inner } => TypeExpr::Nullable {
            inner: Box::new(substitute(inner, bindings)),
        },
        TypeExpr::Primitive { .. } => ty.clone(),
    }
}

/// Projects the configured roots, or every model when none are configured.
pub fn project_types(
    graph: &ModelGraph,
    capabilities: &CapabilityIndex,
    settings: &TsSettings,
) -> Result<TsDeclarations, CompilerError> {
    let mut projector = TypeProjector::new(graph, capabilities, settings);
    if settings.roots.is_empty() {
        for model in graph.models() {
            projector.visit(&model.name)?;
        }
    } else {
        for root in &settings.roots {
            projector.visit(root)?;
        }
    }
    Ok(projector.finish())
}
