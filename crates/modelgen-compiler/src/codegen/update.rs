//! `updateBy(dto)`: partial update of a mutable class from one of its
//! model's DTOs.

use crate::ir::{BinaryOp, Expr, MethodKind, MethodSpec, Param, Stmt};
use crate::resolve::ImplementationConfig;
use super::class::Member;

const OTHER: &str = "other";
const UPDATE_BY: &str = "updateBy";

/// Builds `updateBy` for one DTO. Only properties present on both sides
/// take part; a nullable DTO value is applied only when it is set.
pub fn update_by(
    config: &ImplementationConfig,
    members: &[Member<'_>],
    dto: &ImplementationConfig,
    dto_members: &[Member<'_>],
) -> MethodSpec {
    let mut body = Vec::new();

    for member in members.iter().filter(|m| m.declared) {
        let Some(source) = dto_members.iter().find(|d| d.declared && d.name() == member.name()) else {
            continue;
        };

        let target = Expr::this_field(member.name());
        let value = Expr::ident(OTHER).field(member.name());
        let delegates = member.ty.non_null() != source.ty.non_null();

        let stmt = if delegates {
            // the property type updates itself from its own counterpart
            Stmt::Expr {
                expr: target.call(UPDATE_BY, vec![value.clone()]),
            }
        } else {
            Stmt::Assign {
                target,
                value: value.clone(),
            }
        };

        let guarded = source.ty.is_nullable() && (delegates || !member.ty.is_nullable());
        if guarded {
            body.push(Stmt::If {
                condition: Expr::binary(value, BinaryOp::NotEq, Expr::Null),
                then_branch: vec![stmt],
                else_branch: None,
            });
        } else {
            body.push(stmt);
        }
    }

    body.push(Stmt::Return { value: Expr::This });

    MethodSpec {
        name: UPDATE_BY.to_string(),
        kind: MethodKind::UpdateBy,
        is_override: false,
        params: vec![Param {
            name: OTHER.to_string(),
            ty: dto.type_expr(),
            default: None,
        }],
        returns: config.type_expr(),
        body,
    }
}
