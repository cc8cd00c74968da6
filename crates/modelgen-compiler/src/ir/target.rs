//! Generation target annotations declared on a model.

use std::fmt;
use serde::{Deserialize, Serialize};

/// The kind of implementation to derive from a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Immutable value class implementing the model.
    Immutable,
    /// Standalone data-transfer object.
    Dto,
    /// Mutable persistence entity implementing the model.
    JpaEntity,
}

impl TargetKind {
    /// Label used when the annotation does not name the target.
    pub fn default_label(&self) -> &'static str {
        match self {
            TargetKind::Immutable => "Immutable",
            TargetKind::Dto => "Dto",
            TargetKind::JpaEntity => "JpaEntity",
        }
    }

    pub fn default_prefix(&self) -> &'static str {
        match self {
            TargetKind::Immutable => "Immutable",
            TargetKind::Dto | TargetKind::JpaEntity => "",
        }
    }

    pub fn kind_suffix(&self) -> &'static str {
        match self {
            TargetKind::Immutable => "",
            TargetKind::Dto => "DTO",
            TargetKind::JpaEntity => "Entity",
        }
    }

    /// Whether generated classes implement the model interface.
    pub fn implements_model(&self) -> bool {
        !matches!(self, TargetKind::Dto)
    }

    pub fn default_mutable(&self) -> bool {
        !matches!(self, TargetKind::Immutable)
    }

    /// Annotations every class of this kind carries.
    pub fn class_annotations(&self) -> &'static [&'static str] {
        match self {
            TargetKind::JpaEntity => &["jakarta.persistence.Entity"],
            TargetKind::Immutable | TargetKind::Dto => &[],
        }
    }
}

/// How array-typed properties take part in equals and hashCode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayComparison {
    /// Reference identity.
    Identity,
    /// Element-wise, one level deep.
    #[default]
    Shallow,
    /// Element-wise, recursing into nested arrays.
    Deep,
}

impl fmt::Display for ArrayComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayComparison::Identity => "identity",
            ArrayComparison::Shallow => "shallow content",
            ArrayComparison::Deep => "deep content",
        };
        f.write_str(name)
    }
}

fn enabled() -> bool {
    true
}

/// One generation annotation instance on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub kind: TargetKind,

    /// Target label; directives address the target by it.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub suffix: Option<String>,

    /// Package override for the generated class.
    #[serde(default)]
    pub package: Option<String>,

    /// Base class the generated class extends.
    #[serde(default)]
    pub superclass: Option<String>,

    #[serde(default = "enabled")]
    pub equals: bool,

    #[serde(default = "enabled")]
    pub hash_code: bool,

    #[serde(default = "enabled")]
    pub to_string: bool,

    /// Only takes effect when the model has the ordering capability.
    #[serde(default = "enabled")]
    pub comparable: bool,

    /// Only takes effect when the model has the cloning capability.
    #[serde(default = "enabled")]
    pub cloneable: bool,

    #[serde(default = "enabled")]
    pub copy: bool,

    #[serde(default)]
    pub mutable: Option<bool>,

    /// Every property becomes nullable in the generated class.
    #[serde(default)]
    pub force_nullable: bool,

    /// Properties are omitted unless an include directive keeps them.
    #[serde(default)]
    pub default_omit: bool,

    #[serde(default)]
    pub equals_arrays: ArrayComparison,

    #[serde(default)]
    pub hash_arrays: ArrayComparison,

    /// Explicit compareTo order; a leading `-` sorts descending.
    #[serde(default)]
    pub compare_order: Vec<String>,

    #[serde(default = "enabled")]
    pub compare_all_properties: bool,

    /// Constructor position of the named-arguments guard parameter.
    #[serde(default)]
    pub vararg_guard: Option<usize>,
}

impl TargetSpec {
    /// A target of the given kind with every option defaulted.
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            name: None,
            prefix: None,
            suffix: None,
            package: None,
            superclass: None,
            equals: true,
            hash_code: true,
            to_string: true,
            comparable: true,
            cloneable: true,
            copy: true,
            mutable: None,
            force_nullable: false,
            default_omit: false,
            equals_arrays: ArrayComparison::default(),
            hash_arrays: ArrayComparison::default(),
            compare_order: Vec::new(),
            compare_all_properties: true,
            vararg_guard: None,
        }
    }

    /// Named DTO target.
    pub fn dto(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(TargetKind::Dto)
        }
    }

    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.kind.default_label())
    }
}
