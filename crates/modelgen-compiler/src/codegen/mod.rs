//! Emission phase: class descriptions and TypeScript projections.
//!
//! Both backends read the same frozen [`Resolution`]; nothing here
//! registers new configs.
//! - Class descriptions (one per registered implementation)
//! - TypeScript definitions (one file for the whole pass)

pub mod capabilities;
pub mod class;
pub mod defaults;
pub mod ts_types;
pub mod update;

#[cfg(test)]
mod interp;

use tracing::debug;

use crate::config::GeneratorSettings;
use crate::diagnostic::CompilerError;
use crate::ir::{ModelGraph, ResolvedClassDescription};
use crate::resolve::Resolution;
use class::{emit_class, EmitContext};
use defaults::DefaultValues;
pub use ts_types::{project_types, TsDeclarations, TypeDefinition, TypeProjector};

/// Output of one generation pass.
#[derive(Debug)]
pub struct GeneratedOutput {
    /// Number of annotated models in the pass.
    pub models: usize,

    /// Class descriptions in registration order.
    pub classes: Vec<ResolvedClassDescription>,

    /// TypeScript definitions, when enabled.
    pub typescript: Option<TsDeclarations>,
}

/// Emits every registered implementation, failing on the first error.
pub fn generate(
    graph: &ModelGraph,
    resolution: &Resolution,
    settings: &GeneratorSettings,
) -> Result<GeneratedOutput, CompilerError> {
    let ctx = EmitContext {
        graph,
        resolution,
        defaults: DefaultValues::new(settings.defaults.clone()),
    };

    let classes = resolution
        .registry
        .iter()
        .map(|config| emit_class(&ctx, config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(classes = classes.len(), "emitted classes");

    let typescript = if settings.typescript.enabled {
        Some(project_types(graph, &resolution.capabilities, &settings.typescript)?)
    } else {
        None
    };

    Ok(GeneratedOutput {
        models: graph.models().count(),
        classes,
        typescript,
    })
}
