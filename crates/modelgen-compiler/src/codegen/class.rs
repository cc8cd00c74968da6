//! Class emission: resolved properties + settings → class description.

use tracing::debug;

use crate::diagnostic::CompilerError;
use crate::ir::{
    ConstructorParam, Expr, InitChoice, ModelGraph, PropertySpec, ResolvedClassDescription,
    TypeExpr,
};
use crate::resolve::{ImplementationConfig, ResolvedProperties, ResolvedProperty, Resolution};
use super::capabilities;
use super::defaults::DefaultValues;
use super::update;

/// Name of the constructor's named-arguments guard parameter.
pub const GUARD_PARAM: &str = "namedArgumentsOnly";

/// Sentinel element type of the guard; no value of it exists.
pub const GUARD_TYPE: &str = "kotlin.Nothing";

/// Read-only inputs of the emission phase.
pub struct EmitContext<'a> {
    pub graph: &'a ModelGraph,
    pub resolution: &'a Resolution,
    pub defaults: DefaultValues,
}

/// A property as it appears in one generated class.
#[derive(Debug, Clone)]
pub struct Member<'a> {
    pub property: &'a ResolvedProperty,

    /// Effective type after narrowing and forced nullability.
    pub ty: TypeExpr,

    /// Declared by the generated class. Terminal properties are only
    /// inherited from the model.
    pub declared: bool,
}

impl Member<'_> {
    pub fn name(&self) -> &str {
        &self.property.name
    }
}

/// Properties of the model that exist on the generated class, in resolved
/// order. Omitted properties are gone; terminal properties stay only where
/// the class inherits them from the model.
pub fn collect_members<'a>(config: &ImplementationConfig, properties: &'a ResolvedProperties) -> Vec<Member<'a>> {
    let label = config.label.as_str();
    let mut members = Vec::new();

    for property in properties.iter() {
        if property.directives.is_omitted(label, config.default_omit) {
            continue;
        }
        let declared = !property.directives.prevents_override(label);
        if !declared && !config.implements_model() {
            continue;
        }

        let mut ty = property
            .directives
            .narrowed(label)
            .cloned()
            .unwrap_or_else(|| property.ty.clone());
        if config.force_nullable {
            ty = ty.nullable();
        }

        members.push(Member {
            property,
            ty,
            declared,
        });
    }

    members
}

/// Emits the class description of one implementation.
pub fn emit_class(ctx: &EmitContext<'_>, config: &ImplementationConfig) -> Result<ResolvedClassDescription, CompilerError> {
    let properties = ctx.resolution.properties_of(&config.model)?;
    let members = collect_members(config, properties);
    let label = config.label.as_str();

    let mut constructor = Vec::new();
    let mut declared = Vec::new();
    for member in members.iter().filter(|m| m.declared) {
        constructor.push(ConstructorParam {
            name: member.name().to_string(),
            ty: member.ty.clone(),
            default: default_value(ctx, config, member)?,
            guard: false,
        });
        declared.push(PropertySpec {
            name: member.name().to_string(),
            ty: member.ty.clone(),
            mutable: config.mutable,
            is_override: config.implements_model(),
            annotations: member.property.directives.annotations(label),
        });
    }

    if let Some(position) = config.vararg_guard {
        let position = position.min(constructor.len());
        constructor.insert(
            position,
            ConstructorParam {
                name: GUARD_PARAM.to_string(),
                ty: TypeExpr::named(GUARD_TYPE),
                default: None,
                guard: true,
            },
        );
    }

    let mut superinterfaces = Vec::new();
    if config.implements_model() {
        superinterfaces.push(model_type(config));
    } else {
        if config.flags.comparable {
            superinterfaces.push(TypeExpr::generic("kotlin.Comparable", vec![config.type_expr()]));
        }
        if config.flags.cloneable {
            superinterfaces.push(TypeExpr::named("kotlin.Cloneable"));
        }
    }

    let mut notes = Vec::new();
    let mut methods = Vec::new();
    if config.flags.equals {
        methods.push(capabilities::equals(config, &members));
    }
    if config.flags.hash_code {
        methods.push(capabilities::hash_code(config, &members));
    }
    if config.flags.to_string {
        methods.push(capabilities::to_string(config, &members));
    }
    if config.flags.comparable {
        methods.push(capabilities::compare_to(
            config,
            properties,
            &members,
            &ctx.resolution.capabilities,
            &mut notes,
        )?);
    }
    if config.flags.cloneable {
        methods.push(capabilities::clone(config, &members));
    }
    if config.flags.copy {
        methods.push(capabilities::copy(config, &members));
    }

    if config.mutable {
        for dto in ctx.resolution.registry.dtos_for(&config.model) {
            if dto.qualified_name() == config.qualified_name() {
                continue;
            }
            let dto_members = collect_members(dto, properties);
            methods.push(update::update_by(config, &members, dto, &dto_members));
        }
    }

    debug!(
        class = %config.qualified_name(),
        properties = declared.len(),
        methods = methods.len(),
        "emitted class"
    );

    Ok(ResolvedClassDescription {
        package: config.package.clone(),
        name: config.class_name.clone(),
        model: config.model.clone(),
        target: config.label.clone(),
        kind: config.kind,
        type_params: config.type_params.clone(),
        superclass: config.superclass.clone(),
        superinterfaces,
        annotations: config.annotations.clone(),
        constructor,
        properties: declared,
        methods,
        notes,
    })
}

/// The model interface as implemented by the class.
pub fn model_type(config: &ImplementationConfig) -> TypeExpr {
    TypeExpr::generic(
        config.model.clone(),
        config
            .type_params
            .iter()
            .map(|name| TypeExpr::Param { name: name.clone() })
            .collect(),
    )
}

/// Default expression of a constructor parameter.
///
/// Precedence: init directive for this target, init directive for every
/// target, built-in or configured default for the type. A no_init
/// directive makes the parameter required instead.
fn default_value(
    ctx: &EmitContext<'_>,
    config: &ImplementationConfig,
    member: &Member<'_>,
) -> Result<Option<Expr>, CompilerError> {
    match member.property.directives.initializer(&config.label) {
        Some(InitChoice::Required) => Ok(None),
        Some(InitChoice::Expr(source)) => Ok(Some(Expr::literal(source))),
        None => ctx
            .defaults
            .default_for(&member.ty, ctx.graph)
            .map(Some)
            .ok_or_else(|| CompilerError::NoDefaultValue {
                model: config.model.clone(),
                target: config.label.clone(),
                property: member.name().to_string(),
                type_desc: member.ty.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorSettings;
    use crate::ir::{
        Annotation, DeclKind, Directive, MethodKind, Primitive, PropertyDecl, TargetKind,
        TargetSpec, TypeDecl,
    };
    use crate::resolve::resolve;

    fn int() -> TypeExpr {
        TypeExpr::primitive(Primitive::Int)
    }

    fn string() -> TypeExpr {
        TypeExpr::primitive(Primitive::String)
    }

    fn emit_all(types: Vec<TypeDecl>) -> Result<Vec<ResolvedClassDescription>, CompilerError> {
        let graph = ModelGraph::from_types(types).unwrap();
        let resolution = resolve(&graph, &GeneratorSettings::default())?;
        let ctx = EmitContext {
            graph: &graph,
            resolution: &resolution,
            defaults: DefaultValues::default(),
        };
        resolution
            .registry
            .iter()
            .map(|config| emit_class(&ctx, config))
            .collect()
    }

    fn person(targets: Vec<TargetSpec>) -> TypeDecl {
        let mut person = TypeDecl::interface("com.example.Person");
        person.properties = vec![
            PropertyDecl::new("id", int()),
            PropertyDecl::new("name", string()).with(Directive::Omit {
                target: Some("Update".to_string()),
            }),
            PropertyDecl::new("secondName", string()),
        ];
        person.targets = targets;
        person
    }

    #[test]
    fn test_omitted_property_only_leaves_its_target() {
        let classes = emit_all(vec![person(vec![
            TargetSpec::new(TargetKind::Immutable),
            TargetSpec::dto("Update"),
        ])])
        .unwrap();

        let immutable = &classes[0];
        assert_eq!(immutable.name, "ImmutablePerson");
        assert_eq!(immutable.property_names(), vec!["id", "name", "secondName"]);
        assert!(immutable.properties.iter().all(|p| p.is_override && !p.mutable));
        assert_eq!(
            immutable.superinterfaces,
            vec![TypeExpr::named("com.example.Person")]
        );

        let dto = &classes[1];
        assert_eq!(dto.name, "PersonUpdateDTO");
        assert_eq!(dto.property_names(), vec!["id", "secondName"]);
        assert!(dto.properties.iter().all(|p| !p.is_override && p.mutable));
    }

    #[test]
    fn test_default_precedence() {
        let mut model = TypeDecl::interface("com.example.Counter");
        model.properties = vec![
            PropertyDecl::new("count", int())
                .with(Directive::Init {
                    expr: "1".to_string(),
                    target: None,
                })
                .with(Directive::Init {
                    expr: "2".to_string(),
                    target: Some("Immutable".to_string()),
                }),
            PropertyDecl::new("step", int()).with(Directive::Init {
                expr: "5".to_string(),
                target: None,
            }),
            PropertyDecl::new("label", string()),
            PropertyDecl::new("owner", string()).with(Directive::NoInit { target: None }),
        ];
        model.targets = vec![TargetSpec::new(TargetKind::Immutable)];

        let classes = emit_all(vec![model]).unwrap();
        let defaults: Vec<Option<Expr>> = classes[0].constructor.iter().map(|p| p.default.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                Some(Expr::literal("2")),
                Some(Expr::literal("5")),
                Some(Expr::literal("\"\"")),
                None,
            ]
        );
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let money = TypeDecl::new("com.example.Money", DeclKind::Class);
        let mut model = TypeDecl::interface("com.example.Invoice");
        model.properties = vec![PropertyDecl::new("total", TypeExpr::named("com.example.Money"))];
        model.targets = vec![TargetSpec::new(TargetKind::Immutable)];

        match emit_all(vec![money, model]) {
            Err(CompilerError::NoDefaultValue { model, property, target, .. }) => {
                assert_eq!(model, "com.example.Invoice");
                assert_eq!(property, "total");
                assert_eq!(target, "Immutable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_prevent_override_keeps_property_inherited() {
        let mut model = TypeDecl::interface("com.example.Shape");
        model.properties = vec![
            PropertyDecl::new("sides", int()),
            PropertyDecl::new("kind", TypeExpr::named("com.example.Unknown"))
                .with(Directive::PreventOverride { target: None }),
        ];
        model.targets = vec![TargetSpec::new(TargetKind::Immutable), TargetSpec::dto("Patch")];

        let classes = emit_all(vec![model]).unwrap();
        let immutable = &classes[0];
        assert_eq!(immutable.property_names(), vec!["sides"]);
        assert_eq!(immutable.constructor.len(), 1);
        // still compared, since the class inherits it
        let equals = format!("{:?}", immutable.method(MethodKind::Equals).unwrap().body);
        assert!(equals.contains("\"kind\""));

        let dto = &classes[1];
        let equals = format!("{:?}", dto.method(MethodKind::Equals).unwrap().body);
        assert!(!equals.contains("\"kind\""));
    }

    #[test]
    fn test_narrow_and_annotate_apply_to_one_target() {
        let mut model = TypeDecl::interface("com.example.Order");
        model.properties = vec![PropertyDecl::new("lines", TypeExpr::named("kotlin.collections.List"))
            .with(Directive::Narrow {
                target: "JpaEntity".to_string(),
                ty: TypeExpr::named("kotlin.collections.MutableList"),
            })
            .with(Directive::Annotate {
                target: "JpaEntity".to_string(),
                annotation: "jakarta.persistence.OneToMany".to_string(),
                args: vec![],
            })];
        model.targets = vec![
            TargetSpec::new(TargetKind::Immutable),
            TargetSpec::new(TargetKind::JpaEntity),
        ];

        let classes = emit_all(vec![model]).unwrap();
        let immutable = classes[0].property("lines").unwrap();
        assert_eq!(immutable.ty, TypeExpr::named("kotlin.collections.List"));
        assert!(immutable.annotations.is_empty());

        let entity = &classes[1];
        let lines = entity.property("lines").unwrap();
        assert_eq!(lines.ty, TypeExpr::named("kotlin.collections.MutableList"));
        assert_eq!(lines.annotations, vec![Annotation::new("jakarta.persistence.OneToMany")]);
        assert_eq!(entity.constructor[0].default, Some(Expr::literal("mutableListOf()")));
        assert_eq!(entity.annotations, vec![Annotation::new("jakarta.persistence.Entity")]);
    }

    #[test]
    fn test_force_nullable_dto_defaults_to_null() {
        let spec = TargetSpec {
            force_nullable: true,
            ..TargetSpec::dto("Update")
        };
        let classes = emit_all(vec![person(vec![spec])]).unwrap();
        let dto = &classes[0];
        assert!(dto.properties.iter().all(|p| p.ty.is_nullable()));
        assert!(dto.constructor.iter().all(|p| p.default == Some(Expr::Null)));
    }

    #[test]
    fn test_vararg_guard_position() {
        let spec = TargetSpec {
            vararg_guard: Some(1),
            ..TargetSpec::new(TargetKind::Immutable)
        };
        let classes = emit_all(vec![person(vec![spec])]).unwrap();
        let names: Vec<&str> = classes[0].constructor.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", GUARD_PARAM, "name", "secondName"]);
        assert!(classes[0].constructor[1].guard);
        assert_eq!(classes[0].constructor[1].ty, TypeExpr::named(GUARD_TYPE));

        let past_end = TargetSpec {
            vararg_guard: Some(10),
            ..TargetSpec::new(TargetKind::Immutable)
        };
        let classes = emit_all(vec![person(vec![past_end])]).unwrap();
        assert!(classes[0].constructor.last().unwrap().guard);
    }

    #[test]
    fn test_default_omit_with_include() {
        let mut model = person(vec![]);
        model.properties[0] = PropertyDecl::new("id", int()).with(Directive::Include {
            target: Some("Ref".to_string()),
        });
        model.targets = vec![TargetSpec {
            default_omit: true,
            ..TargetSpec::dto("Ref")
        }];
        let classes = emit_all(vec![model]).unwrap();
        assert_eq!(classes[0].property_names(), vec!["id"]);
    }

    #[test]
    fn test_update_by_only_on_mutable_targets() {
        let classes = emit_all(vec![person(vec![
            TargetSpec::new(TargetKind::Immutable),
            TargetSpec::new(TargetKind::JpaEntity),
            TargetSpec::dto("Update"),
        ])])
        .unwrap();
        assert!(classes[0].method(MethodKind::UpdateBy).is_none());
        let update = classes[1].method(MethodKind::UpdateBy).unwrap();
        assert_eq!(update.params[0].ty, TypeExpr::named("com.example.PersonUpdateDTO"));
        // a DTO does not update from itself
        assert!(classes[2].method(MethodKind::UpdateBy).is_none());
    }

    #[test]
    fn test_generic_model_type_params() {
        let mut page = TypeDecl::interface("com.example.PageModel");
        page.type_params = vec!["T".to_string()];
        page.properties = vec![PropertyDecl::new(
            "items",
            TypeExpr::generic("kotlin.collections.List", vec![TypeExpr::Param { name: "T".to_string() }]),
        )];
        page.targets = vec![TargetSpec::new(TargetKind::Immutable)];

        let classes = emit_all(vec![page]).unwrap();
        let class = &classes[0];
        assert_eq!(class.name, "ImmutablePage");
        assert_eq!(class.type_params, vec!["T".to_string()]);
        assert_eq!(
            class.superinterfaces,
            vec![TypeExpr::generic(
                "com.example.PageModel",
                vec![TypeExpr::Param { name: "T".to_string() }]
            )]
        );
    }
}
