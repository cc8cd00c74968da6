//! Bodies of the structural methods: equals, hashCode, toString, compareTo,
//! clone and copy.
//!
//! Every generator walks the class members in resolved order. equals and
//! hashCode pick the array comparison of each member from the target's
//! settings; settings resolution already guarantees hashCode is never
//! stricter than equals.

use std::collections::HashSet;

use tracing::warn;

use crate::diagnostic::CompilerError;
use crate::ir::{
    BinaryOp, Expr, MethodKind, MethodSpec, NamedArg, Param, Primitive, Stmt, TypeExpr,
    ValueComparison,
};
use crate::resolve::{Capability, CapabilityIndex, ImplementationConfig, ResolvedProperties};
use super::class::{model_type, Member};

const OTHER: &str = "other";
const THAT: &str = "that";
const RESULT: &str = "result";

fn returns_bool(value: bool) -> Stmt {
    Stmt::Return {
        value: Expr::bool(value),
    }
}

fn method(name: &str, kind: MethodKind, is_override: bool, params: Vec<Param>, returns: TypeExpr, body: Vec<Stmt>) -> MethodSpec {
    MethodSpec {
        name: name.to_string(),
        kind,
        is_override,
        params,
        returns,
        body,
    }
}

/// Structural equality against the exact runtime class.
pub fn equals(config: &ImplementationConfig, members: &[Member<'_>]) -> MethodSpec {
    let other = Expr::ident(OTHER);
    let mut body = vec![
        Stmt::If {
            condition: Expr::binary(Expr::This, BinaryOp::RefEq, other.clone()),
            then_branch: vec![returns_bool(true)],
            else_branch: None,
        },
        Stmt::If {
            condition: Expr::binary(
                Expr::binary(other.clone(), BinaryOp::Eq, Expr::Null),
                BinaryOp::Or,
                Expr::not(Expr::SameClass {
                    left: Box::new(Expr::This),
                    right: Box::new(other.clone()),
                }),
            ),
            then_branch: vec![returns_bool(false)],
            else_branch: None,
        },
        Stmt::Let {
            name: THAT.to_string(),
            mutable: false,
            value: Expr::Cast {
                value: Box::new(other),
                ty: config.type_expr(),
            },
        },
    ];

    for member in members {
        body.push(Stmt::If {
            condition: Expr::not(Expr::Equal {
                left: Box::new(Expr::this_field(member.name())),
                right: Box::new(Expr::ident(THAT).field(member.name())),
                comparison: ValueComparison::for_type(&member.ty, config.equals_arrays),
            }),
            then_branch: vec![returns_bool(false)],
            else_branch: None,
        });
    }
    body.push(returns_bool(true));

    method(
        "equals",
        MethodKind::Equals,
        true,
        vec![Param {
            name: OTHER.to_string(),
            ty: TypeExpr::named("kotlin.Any").nullable(),
            default: None,
        }],
        TypeExpr::primitive(Primitive::Boolean),
        body,
    )
}

/// Polynomial hash: `result = 31 * result + hash(member)`.
pub fn hash_code(config: &ImplementationConfig, members: &[Member<'_>]) -> MethodSpec {
    let body = if members.is_empty() {
        vec![Stmt::Return { value: Expr::int(0) }]
    } else {
        let mut body = vec![Stmt::Let {
            name: RESULT.to_string(),
            mutable: true,
            value: Expr::int(0),
        }];
        for member in members {
            let hash = Expr::HashOf {
                value: Box::new(Expr::this_field(member.name())),
                comparison: ValueComparison::for_type(&member.ty, config.hash_arrays),
                nullable: member.ty.is_nullable(),
            };
            body.push(Stmt::Assign {
                target: Expr::ident(RESULT),
                value: Expr::binary(
                    Expr::binary(Expr::int(31), BinaryOp::Mul, Expr::ident(RESULT)),
                    BinaryOp::Add,
                    hash,
                ),
            });
        }
        body.push(Stmt::Return {
            value: Expr::ident(RESULT),
        });
        body
    };

    method(
        "hashCode",
        MethodKind::HashCode,
        true,
        Vec::new(),
        TypeExpr::primitive(Primitive::Int),
        body,
    )
}

/// `Name(a=..., b=...)`.
pub fn to_string(config: &ImplementationConfig, members: &[Member<'_>]) -> MethodSpec {
    let mut parts = vec![Expr::str(format!("{}(", config.class_name))];
    for (i, member) in members.iter().enumerate() {
        let separator = if i == 0 { "" } else { ", " };
        parts.push(Expr::str(format!("{}{}=", separator, member.name())));
        parts.push(Expr::this_field(member.name()));
    }
    parts.push(Expr::str(")"));

    method(
        "toString",
        MethodKind::ToString,
        true,
        Vec::new(),
        TypeExpr::primitive(Primitive::String),
        vec![Stmt::Return {
            value: Expr::Concat { parts },
        }],
    )
}

/// Members compared by compareTo, in comparison order, with their direction.
fn comparison_order<'m, 'a>(
    config: &ImplementationConfig,
    properties: &ResolvedProperties,
    members: &'m [Member<'a>],
) -> Result<Vec<(&'m Member<'a>, bool)>, CompilerError> {
    let context = format!("compare order of {}", config.label);
    let mut order = Vec::new();
    let mut seen = HashSet::new();

    for key in &config.compare_order {
        properties.require(&key.property, &context)?;
        let member = members
            .iter()
            .find(|m| m.name() == key.property)
            .ok_or_else(|| CompilerError::missing_property(&config.model, &key.property, &context))?;
        if seen.insert(member.name()) {
            order.push((member, key.descending));
        }
    }

    if config.compare_all_properties {
        for member in members {
            if seen.insert(member.name()) {
                order.push((member, false));
            }
        }
    }

    Ok(order)
}

/// Cascading three-way comparison. Members whose type has no natural
/// ordering are skipped and reported in `notes`.
pub fn compare_to(
    config: &ImplementationConfig,
    properties: &ResolvedProperties,
    members: &[Member<'_>],
    capabilities: &CapabilityIndex,
    notes: &mut Vec<String>,
) -> Result<MethodSpec, CompilerError> {
    let order = comparison_order(config, properties, members)?;

    let mut compared = Vec::new();
    for (member, descending) in order {
        if !capabilities.type_has(&member.ty, Capability::Ordering) {
            let note = format!("compareTo skips {}: {} has no natural ordering", member.name(), member.ty);
            warn!(class = %config.qualified_name(), property = %member.name(), "{}", note);
            compared.push(Stmt::Comment { text: note.clone() });
            notes.push(note);
            continue;
        }

        let mine = Expr::this_field(member.name());
        let theirs = Expr::ident(OTHER).field(member.name());
        let (left, right) = if descending { (theirs, mine) } else { (mine, theirs) };
        compared.push(Stmt::Assign {
            target: Expr::ident(RESULT),
            value: Expr::Compare {
                left: Box::new(left),
                right: Box::new(right),
            },
        });
        compared.push(Stmt::If {
            condition: Expr::binary(Expr::ident(RESULT), BinaryOp::NotEq, Expr::int(0)),
            then_branch: vec![Stmt::Return {
                value: Expr::ident(RESULT),
            }],
            else_branch: None,
        });
    }

    let mut body = Vec::new();
    if compared.iter().any(|s| matches!(s, Stmt::Assign { .. })) {
        body.push(Stmt::Let {
            name: RESULT.to_string(),
            mutable: true,
            value: Expr::int(0),
        });
    }
    body.extend(compared);
    body.push(Stmt::Return { value: Expr::int(0) });

    let other_type = if config.implements_model() {
        model_type(config)
    } else {
        config.type_expr()
    };

    Ok(method(
        "compareTo",
        MethodKind::CompareTo,
        true,
        vec![Param {
            name: OTHER.to_string(),
            ty: other_type,
            default: None,
        }],
        TypeExpr::primitive(Primitive::Int),
        body,
    ))
}

fn construct_from(config: &ImplementationConfig, members: &[Member<'_>], value: impl Fn(&str) -> Expr) -> Expr {
    Expr::Construct {
        class: config.qualified_name(),
        args: members
            .iter()
            .filter(|m| m.declared)
            .map(|m| NamedArg {
                name: m.name().to_string(),
                value: value(m.name()),
            })
            .collect(),
    }
}

/// Shallow clone through the primary constructor.
pub fn clone(config: &ImplementationConfig, members: &[Member<'_>]) -> MethodSpec {
    method(
        "clone",
        MethodKind::Clone,
        true,
        Vec::new(),
        config.type_expr(),
        vec![Stmt::Return {
            value: construct_from(config, members, |name| Expr::this_field(name)),
        }],
    )
}

/// `copy(a = this.a, ...)`: a new instance with any subset of values replaced.
pub fn copy(config: &ImplementationConfig, members: &[Member<'_>]) -> MethodSpec {
    let params = members
        .iter()
        .filter(|m| m.declared)
        .map(|m| Param {
            name: m.name().to_string(),
            ty: m.ty.clone(),
            default: Some(Expr::this_field(m.name())),
        })
        .collect();

    method(
        "copy",
        MethodKind::Copy,
        false,
        params,
        config.type_expr(),
        vec![Stmt::Return {
            value: construct_from(config, members, |name| Expr::ident(name)),
        }],
    )
}
