//! Capability lookup over the resolved type graph.
//!
//! Whether a type can be ordered, cloned, iterated or indexed is computed
//! once per pass from well-known external names plus the declared
//! supertype graph, and then only queried.

use std::collections::{BTreeSet, HashMap};

use crate::ir::{DeclKind, ModelGraph, TypeExpr};

/// A structural trait a type may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Has a natural ordering (compareTo).
    Ordering,
    /// Supports clone().
    Cloning,
    /// A sequence-like collection.
    Collection,
    /// A key-value mapping.
    Mapping,
    /// The universal top type.
    Top,
    /// An enumeration.
    Enum,
}

impl Capability {
    /// Whether subtypes share the capability. Top and Enum identify the
    /// type itself.
    pub fn is_inherited(&self) -> bool {
        !matches!(self, Capability::Top | Capability::Enum)
    }
}

const ORDERING: &[&str] = &[
    "kotlin.Comparable",
    "java.lang.Comparable",
    "kotlin.Boolean",
    "kotlin.Char",
    "kotlin.Byte",
    "kotlin.Short",
    "kotlin.Int",
    "kotlin.Long",
    "kotlin.Float",
    "kotlin.Double",
    "kotlin.String",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.time.Instant",
    "java.time.LocalDate",
    "java.time.LocalDateTime",
    "java.time.Duration",
    "java.util.UUID",
];

const CLONING: &[&str] = &["kotlin.Cloneable", "java.lang.Cloneable"];

const COLLECTION: &[&str] = &[
    "kotlin.collections.Iterable",
    "kotlin.collections.Collection",
    "kotlin.collections.List",
    "kotlin.collections.MutableList",
    "kotlin.collections.Set",
    "kotlin.collections.MutableSet",
    "kotlin.collections.MutableCollection",
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
];

const MAPPING: &[&str] = &[
    "kotlin.collections.Map",
    "kotlin.collections.MutableMap",
    "java.util.Map",
];

const TOP: &[&str] = &["kotlin.Any", "java.lang.Object"];

/// Capability tags by type identity.
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    tags: HashMap<String, BTreeSet<Capability>>,
}

impl CapabilityIndex {
    /// Seeds the well-known names and derives every declared type's tags.
    pub fn build(graph: &ModelGraph) -> Self {
        let mut seeds: HashMap<String, BTreeSet<Capability>> = HashMap::new();
        for (names, capability) in [
            (ORDERING, Capability::Ordering),
            (CLONING, Capability::Cloning),
            (COLLECTION, Capability::Collection),
            (MAPPING, Capability::Mapping),
            (TOP, Capability::Top),
        ] {
            for name in names {
                seeds.entry(name.to_string()).or_default().insert(capability);
            }
        }

        let mut derived = HashMap::new();
        for decl in graph.types() {
            derive(graph, &seeds, &decl.name, &mut derived, &mut Vec::new());
        }

        let mut tags = seeds;
        tags.extend(derived);
        Self { tags }
    }

    pub fn has(&self, name: &str, capability: Capability) -> bool {
        self.tags
            .get(name)
            .map(|tags| tags.contains(&capability))
            .unwrap_or(false)
    }

    /// Whether a value of this type supports the capability. Nullability is
    /// transparent; arrays and type variables support nothing.
    pub fn type_has(&self, ty: &TypeExpr, capability: Capability) -> bool {
        match ty.non_null() {
            TypeExpr::Primitive { .. } => capability == Capability::Ordering,
            TypeExpr::Named { name, .. } => self.has(name, capability),
            TypeExpr::Array { .. } | TypeExpr::Param { .. } | TypeExpr::Nullable { .. } => false,
        }
    }
}

fn derive(
    graph: &ModelGraph,
    seeds: &HashMap<String, BTreeSet<Capability>>,
    name: &str,
    derived: &mut HashMap<String, BTreeSet<Capability>>,
    stack: &mut Vec<String>,
) -> BTreeSet<Capability> {
    if let Some(tags) = derived.get(name) {
        return tags.clone();
    }
    let seeded = seeds.get(name).cloned().unwrap_or_default();
    let Some(decl) = graph.get(name) else {
        return seeded;
    };
    if stack.iter().any(|s| s == name) {
        return seeded;
    }

    stack.push(name.to_string());
    let mut tags = seeded;
    if decl.kind == DeclKind::Enum {
        tags.insert(Capability::Enum);
        tags.insert(Capability::Ordering);
    }
    for supertype in &decl.supertypes {
        if let Some(parent) = supertype.type_name() {
            tags.extend(
                derive(graph, seeds, parent, derived, stack)
                    .into_iter()
                    .filter(Capability::is_inherited),
            );
        }
    }
    stack.pop();

    derived.insert(name.to_string(), tags.clone());
    tags
}
