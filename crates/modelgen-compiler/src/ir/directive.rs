//! Per-property and per-class generation directives.
//!
//! A directive either names a target (by label) or applies to every target
//! when `target` is absent. Directives declared for the same property at
//! several levels of a supertype chain are layered with [`DirectiveSet`]:
//! a more-derived declaration replaces the entry occupying the same slot,
//! everything else is inherited.

use serde::{Deserialize, Serialize};

use super::TypeExpr;

/// A single generation directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Exclude the property from the target (or from all targets).
    Omit {
        #[serde(default)]
        target: Option<String>,
    },
    /// Keep the property in a target that omits properties by default.
    Include {
        #[serde(default)]
        target: Option<String>,
    },
    /// Literal default-value source.
    Init {
        expr: String,
        #[serde(default)]
        target: Option<String>,
    },
    /// Make the property a required constructor parameter.
    NoInit {
        #[serde(default)]
        target: Option<String>,
    },
    /// The property is terminal and must not be redeclared.
    PreventOverride {
        #[serde(default)]
        target: Option<String>,
    },
    /// Attach an annotation to the target's emitted property or class.
    Annotate {
        target: String,
        annotation: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Replace the declared type for one target.
    Narrow {
        target: String,
        #[serde(rename = "type")]
        ty: TypeExpr,
    },
}

/// Slot a directive occupies when layering.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<'a> {
    Visibility(Option<&'a str>),
    Initializer(Option<&'a str>),
    PreventOverride(Option<&'a str>),
    Annotation(&'a str, &'a str),
    Narrow(&'a str),
}

impl Directive {
    fn slot(&self) -> Slot<'_> {
        match self {
            Directive::Omit { target } | Directive::Include { target } => {
                Slot::Visibility(target.as_deref())
            }
            Directive::Init { target, .. } | Directive::NoInit { target } => {
                Slot::Initializer(target.as_deref())
            }
            Directive::PreventOverride { target } => Slot::PreventOverride(target.as_deref()),
            Directive::Annotate {
                target, annotation, ..
            } => Slot::Annotation(target, annotation),
            Directive::Narrow { target, .. } => Slot::Narrow(target),
        }
    }
}

/// How a property's constructor parameter is initialized for a target.
#[derive(Debug, Clone, PartialEq)]
pub enum InitChoice<'a> {
    Expr(&'a str),
    Required,
}

/// An annotation attached to generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// Ordered, merged directives of one property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveSet {
    entries: Vec<Directive>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers more-derived directives on top of the current ones.
    pub fn layer(&mut self, directives: &[Directive]) {
        for directive in directives {
            let position = self
                .entries
                .iter()
                .position(|existing| existing.slot() == directive.slot());
            match position {
                Some(index) => self.entries[index] = directive.clone(),
                None => self.entries.push(directive.clone()),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target-specific entry first, then the one that applies to all targets.
    fn lookup<'a, T>(
        &'a self,
        label: &str,
        pick: impl Fn(&'a Directive) -> Option<(Option<&'a str>, T)>,
    ) -> Option<T> {
        let mut wildcard = None;
        for directive in &self.entries {
            if let Some((target, value)) = pick(directive) {
                match target {
                    Some(t) if t == label => return Some(value),
                    None if wildcard.is_none() => wildcard = Some(value),
                    _ => {}
                }
            }
        }
        wildcard
    }

    /// Whether the property is excluded from the target.
    pub fn is_omitted(&self, label: &str, omit_by_default: bool) -> bool {
        self.lookup(label, |d| match d {
            Directive::Omit { target } => Some((target.as_deref(), true)),
            Directive::Include { target } => Some((target.as_deref(), false)),
            _ => None,
        })
        .unwrap_or(omit_by_default)
    }

    pub fn initializer(&self, label: &str) -> Option<InitChoice<'_>> {
        self.lookup(label, |d| match d {
            Directive::Init { expr, target } => Some((target.as_deref(), InitChoice::Expr(expr))),
            Directive::NoInit { target } => Some((target.as_deref(), InitChoice::Required)),
            _ => None,
        })
    }

    pub fn prevents_override(&self, label: &str) -> bool {
        self.lookup(label, |d| match d {
            Directive::PreventOverride { target } => Some((target.as_deref(), ())),
            _ => None,
        })
        .is_some()
    }

    pub fn narrowed(&self, label: &str) -> Option<&TypeExpr> {
        self.entries.iter().find_map(|d| match d {
            Directive::Narrow { target, ty } if target == label => Some(ty),
            _ => None,
        })
    }

    pub fn annotations(&self, label: &str) -> Vec<Annotation> {
        annotations_for(&self.entries, label)
    }
}

/// Annotations an annotate-directive list attaches to one target.
pub fn annotations_for(directives: &[Directive], label: &str) -> Vec<Annotation> {
    directives
        .iter()
        .filter_map(|d| match d {
            Directive::Annotate {
                target,
                annotation,
                args,
            } if target == label => Some(Annotation {
                name: annotation.clone(),
                args: args.clone(),
            }),
            _ => None,
        })
        .collect()
}
