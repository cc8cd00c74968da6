//! Language-agnostic intermediate representation.
//!
//! The input side ([`ModelGraph`], [`TypeDecl`], [`PropertyDecl`]) is produced
//! by a frontend from host reflection metadata. The output side
//! ([`ResolvedClassDescription`]) is produced by the class emitter and handed
//! to the source writer.

mod class;
mod directive;
mod target;
mod types;

pub use class::{
    qualify, BinaryOp, ConstructorParam, Expr, MethodKind, MethodSpec, NamedArg, Param,
    PropertySpec, ResolvedClassDescription, Stmt, ValueComparison,
};
pub use directive::{annotations_for, Annotation, Directive, DirectiveSet, InitChoice};
pub use target::{ArrayComparison, TargetKind, TargetSpec};
pub use types::{simple_name, Primitive, TypeExpr};

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::diagnostic::CompilerError;

/// What kind of declaration a type is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Interface,
    Class,
    Enum,
    Object,
}

/// Where a declaration lives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Nesting {
    #[default]
    TopLevel,
    Member {
        enclosing: String,
    },
    Local,
    Anonymous,
}

impl Nesting {
    pub fn describe(&self) -> &'static str {
        match self {
            Nesting::TopLevel => "top-level declaration",
            Nesting::Member { .. } => "member declaration",
            Nesting::Local => "local declaration",
            Nesting::Anonymous => "anonymous declaration",
        }
    }
}

/// A property as declared on one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeExpr,

    #[serde(default)]
    pub mutable: bool,

    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: false,
            directives: Vec::new(),
        }
    }

    pub fn with(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A type known to the host, whether or not it is a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully qualified name; the identity of the declaration.
    pub name: String,

    #[serde(default)]
    pub kind: DeclKind,

    #[serde(default)]
    pub nesting: Nesting,

    #[serde(default)]
    pub type_params: Vec<String>,

    #[serde(default)]
    pub supertypes: Vec<TypeExpr>,

    #[serde(default)]
    pub properties: Vec<PropertyDecl>,

    /// Generation annotations. A type with at least one is a model.
    #[serde(default)]
    pub targets: Vec<TargetSpec>,

    /// Class-level directives (annotate).
    #[serde(default)]
    pub annotations: Vec<Directive>,

    #[serde(default)]
    pub enum_entries: Vec<String>,

    #[serde(default)]
    pub has_no_arg_constructor: bool,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nesting: Nesting::TopLevel,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            properties: Vec::new(),
            targets: Vec::new(),
            annotations: Vec::new(),
            enum_entries: Vec::new(),
            has_no_arg_constructor: false,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Interface)
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_model(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One metadata document as written by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// Every type declaration of one generation pass, keyed by identity.
#[derive(Debug, Default)]
pub struct ModelGraph {
    types: Vec<TypeDecl>,
    index: HashMap<String, usize>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph, rejecting duplicate declarations.
    pub fn from_types(types: impl IntoIterator<Item = TypeDecl>) -> Result<Self, CompilerError> {
        let mut graph = Self::new();
        for decl in types {
            graph.insert(decl)?;
        }
        Ok(graph)
    }

    pub fn insert(&mut self, decl: TypeDecl) -> Result<(), CompilerError> {
        if self.index.contains_key(&decl.name) {
            return Err(CompilerError::DuplicateType { name: decl.name });
        }
        self.index.insert(decl.name.clone(), self.types.len());
        self.types.push(decl);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declarations in insertion order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter()
    }

    /// Declarations carrying at least one generation target.
    pub fn models(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter().filter(|t| t.is_model())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Package a declaration lives in. Member types live in their outermost
    /// enclosing type's package.
    pub fn package_of(&self, decl: &TypeDecl) -> String {
        if let Nesting::Member { enclosing } = &decl.nesting {
            if let Some(outer) = self.get(enclosing) {
                if outer.name != decl.name {
                    return self.package_of(outer);
                }
            }
        }
        match decl.name.rfind('.') {
            Some(i) => decl.name[..i].to_string(),
            None => String::new(),
        }
    }
}
