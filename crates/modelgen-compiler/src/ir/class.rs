//! Abstract description of a generated class.
//!
//! This is the hand-off artifact for the source writer: no text is produced
//! here, only structure.

use serde::Serialize;

use super::{Annotation, ArrayComparison, TargetKind, TypeExpr};

/// A fully resolved implementation class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedClassDescription {
    pub package: String,
    pub name: String,

    /// Fully qualified name of the model this class implements.
    pub model: String,

    /// Label of the target that produced the class.
    pub target: String,

    pub kind: TargetKind,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    pub superinterfaces: Vec<TypeExpr>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,

    pub constructor: Vec<ConstructorParam>,

    pub properties: Vec<PropertySpec>,

    pub methods: Vec<MethodSpec>,

    /// Generation notes, such as properties skipped by compareTo.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ResolvedClassDescription {
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, kind: MethodKind) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.kind == kind)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Joins a package and a simple name.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// A primary-constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorParam {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeExpr,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,

    /// Vararg marker that forces named arguments past its position.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub guard: bool,
}

/// A property declared by the generated class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeExpr,

    pub mutable: bool,

    /// Redeclares a property of the implemented model.
    #[serde(rename = "override")]
    pub is_override: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Which structural capability a method implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Equals,
    HashCode,
    ToString,
    CompareTo,
    Clone,
    Copy,
    UpdateBy,
}

/// A generated method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSpec {
    pub name: String,
    pub kind: MethodKind,
    #[serde(rename = "override")]
    pub is_override: bool,
    pub params: Vec<Param>,
    pub returns: TypeExpr,
    pub body: Vec<Stmt>,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
}

/// Statement in a generated method body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    /// val/var name = value
    Let {
        name: String,
        mutable: bool,
        value: Expr,
    },

    /// target = value
    Assign {
        target: Expr,
        value: Expr,
    },

    /// if (condition) { then_branch } else { else_branch }
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        #[serde(skip_serializing_if = "Option::is_none")]
        else_branch: Option<Vec<Stmt>>,
    },

    Return {
        value: Expr,
    },

    Expr {
        expr: Expr,
    },

    /// Left in the output in place of skipped code.
    Comment {
        text: String,
    },
}

/// Expression in a generated method body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    This,

    Null,

    Bool {
        value: bool,
    },

    Int {
        value: i64,
    },

    Str {
        value: String,
    },

    /// Source text copied verbatim from an init directive or default table.
    Literal {
        source: String,
    },

    Ident {
        name: String,
    },

    /// receiver.name
    Field {
        receiver: Box<Expr>,
        name: String,
    },

    /// receiver.method(args) or method(args)
    Call {
        #[serde(skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },

    /// Class(name = value, ...)
    Construct {
        class: String,
        args: Vec<NamedArg>,
    },

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    Not {
        operand: Box<Expr>,
    },

    /// value as Type
    Cast {
        value: Box<Expr>,
        #[serde(rename = "type")]
        ty: TypeExpr,
    },

    /// Both operands have exactly the same runtime class.
    SameClass {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Value equality under the given comparison.
    Equal {
        left: Box<Expr>,
        right: Box<Expr>,
        comparison: ValueComparison,
    },

    /// Hash of a value under the given comparison; null hashes to 0.
    HashOf {
        value: Box<Expr>,
        comparison: ValueComparison,
        nullable: bool,
    },

    /// Null-safe three-way comparison.
    Compare {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// String concatenation.
    Concat {
        parts: Vec<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn bool(value: bool) -> Self {
        Expr::Bool { value }
    }

    pub fn int(value: i64) -> Self {
        Expr::Int { value }
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str {
            value: value.into(),
        }
    }

    pub fn literal(source: impl Into<String>) -> Self {
        Expr::Literal {
            source: source.into(),
        }
    }

    /// this.name
    pub fn this_field(name: impl Into<String>) -> Self {
        Expr::This.field(name)
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field {
            receiver: Box::new(self),
            name: name.into(),
        }
    }

    pub fn call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(self)),
            method: method.into(),
            args,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not {
            operand: Box::new(operand),
        }
    }
}

/// A named constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedArg {
    pub name: String,
    pub value: Expr,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Eq,      // ==
    NotEq,   // !=
    RefEq,   // ===
    Or,      // ||
    Add,     // +
    Mul,     // *
}

/// How two values are compared or hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueComparison {
    /// equals()/hashCode() of the value itself.
    Structural,
    /// Reference identity.
    Identity,
    /// Array contents, one level deep.
    ShallowContent,
    /// Array contents, recursing into nested arrays.
    DeepContent,
}

impl ValueComparison {
    /// Comparison used for a property of the given type.
    pub fn for_type(ty: &TypeExpr, arrays: ArrayComparison) -> Self {
        if !ty.is_array() {
            return ValueComparison::Structural;
        }
        match arrays {
            ArrayComparison::Identity => ValueComparison::Identity,
            ArrayComparison::Shallow => ValueComparison::ShallowContent,
            ArrayComparison::Deep => ValueComparison::DeepContent,
        }
    }
}
