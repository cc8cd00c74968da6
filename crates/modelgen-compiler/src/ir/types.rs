//! Semantic type expressions shared by the resolver, the class emitter and
//! the TypeScript projection.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl Primitive {
    /// Fully qualified name used for table lookups.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "kotlin.Boolean",
            Primitive::Char => "kotlin.Char",
            Primitive::Byte => "kotlin.Byte",
            Primitive::Short => "kotlin.Short",
            Primitive::Int => "kotlin.Int",
            Primitive::Long => "kotlin.Long",
            Primitive::Float => "kotlin.Float",
            Primitive::Double => "kotlin.Double",
            Primitive::String => "kotlin.String",
        }
    }

    /// Simple name as written in generated code.
    pub fn simple_name(&self) -> &'static str {
        let qualified = self.qualified_name();
        &qualified["kotlin.".len()..]
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Primitive::Byte | Primitive::Short | Primitive::Int | Primitive::Long
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Primitive {
        name: Primitive,
    },
    /// A class, interface or enum reference, optionally parameterized.
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeExpr>,
    },
    Array {
        element: Box<TypeExpr>,
    },
    Nullable {
        inner: Box<TypeExpr>,
    },
    /// A type variable of the enclosing declaration.
    Param {
        name: String,
    },
}

impl TypeExpr {
    pub fn primitive(name: Primitive) -> Self {
        TypeExpr::Primitive { name }
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args,
        }
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array {
            element: Box::new(element),
        }
    }

    /// Wraps the type in a nullable layer unless it already is nullable.
    pub fn nullable(self) -> Self {
        if self.is_nullable() {
            self
        } else {
            TypeExpr::Nullable {
                inner: Box::new(self),
            }
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeExpr::Nullable { .. })
    }

    /// Strips every nullable layer.
    pub fn non_null(&self) -> &TypeExpr {
        match self {
            TypeExpr::Nullable { inner } => inner.non_null(),
            other => other,
        }
    }

    /// Whether the value (ignoring nullability) is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.non_null(), TypeExpr::Array { .. })
    }

    /// Qualified name of the outermost non-null type, if it has one.
    pub fn type_name(&self) -> Option<&str> {
        match self.non_null() {
            TypeExpr::Primitive { name } => Some(name.qualified_name()),
            TypeExpr::Named { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive { name } => write!(f, "{}", name.simple_name()),
            TypeExpr::Named { name, args } => {
                write!(f, "{}", simple_name(name))?;
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            TypeExpr::Array { element } => write!(f, "Array<{}>", element),
            TypeExpr::Nullable { inner } => write!(f, "{}?", inner.non_null()),
            TypeExpr::Param { name } => write!(f, "{}", name),
        }
    }
}

/// Last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_does_not_stack() {
        let once = TypeExpr::primitive(Primitive::Int).nullable();
        let twice = once.clone().nullable();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_non_null_strips_nested_layers() {
        let nested = TypeExpr::Nullable {
            inner: Box::new(TypeExpr::Nullable {
                inner: Box::new(TypeExpr::named("com.example.Address")),
            }),
        };
        assert_eq!(nested.non_null(), &TypeExpr::named("com.example.Address"));
        assert_eq!(nested.to_string(), "Address?");
    }

    #[test]
    fn test_display_generics_and_arrays() {
        let list = TypeExpr::generic(
            "kotlin.collections.List",
            vec![TypeExpr::primitive(Primitive::String)],
        );
        assert_eq!(list.to_string(), "List<String>");
        let arr = TypeExpr::array(TypeExpr::primitive(Primitive::Int));
        assert_eq!(arr.to_string(), "Array<Int>");
        assert!(arr.clone().nullable().is_array());
    }

    #[test]
    fn test_deserialize_shape() {
        let json = r#"{"kind":"named","name":"kotlin.collections.Map","args":[
            {"kind":"primitive","name":"string"},
            {"kind":"nullable","inner":{"kind":"param","name":"T"}}]}"#;
        let ty: TypeExpr = serde_json::from_str(json).unwrap();
        assert_eq!(ty.to_string(), "Map<String, T?>");
    }
}
