//! Resolution: the collection phase of a generation pass.
//!
//! Every model's property set and every requested target's settings are
//! resolved here, up front, before any class is emitted.

pub mod capability;
pub mod properties;
pub mod registry;
pub mod settings;

pub use capability::{Capability, CapabilityIndex};
pub use properties::{resolve_properties, ResolvedProperties, ResolvedProperty};
pub use registry::{Registry, RegistryBuilder};
pub use settings::{resolve_config, CapabilityFlags, ImplementationConfig, OrderKey};

use std::collections::HashMap;
use tracing::debug;

use crate::config::GeneratorSettings;
use crate::diagnostic::CompilerError;
use crate::ir::ModelGraph;

/// Everything the emission phase reads.
#[derive(Debug)]
pub struct Resolution {
    pub capabilities: CapabilityIndex,
    pub registry: Registry,
    properties: HashMap<String, ResolvedProperties>,
}

impl Resolution {
    pub fn properties_of(&self, model: &str) -> Result<&ResolvedProperties, CompilerError> {
        self.properties
            .get(model)
            .ok_or_else(|| CompilerError::UnknownModel {
                name: model.to_string(),
            })
    }
}

/// Runs the collection phase over every model of the graph.
pub fn resolve(graph: &ModelGraph, settings: &GeneratorSettings) -> Result<Resolution, CompilerError> {
    let capabilities = CapabilityIndex::build(graph);
    let mut builder = RegistryBuilder::new();
    let mut properties = HashMap::new();

    for model in graph.models() {
        let resolved = resolve_properties(graph, &model.name)?;
        debug!(model = %model.name, properties = resolved.len(), "resolved properties");
        properties.insert(model.name.clone(), resolved);

        for spec in &model.targets {
            let config = resolve_config(graph, &capabilities, settings, model, spec)?;
            debug!(
                model = %model.name,
                target = %config.label,
                class = %config.qualified_name(),
                "resolved target"
            );
            builder.register(config)?;
        }
    }

    Ok(Resolution {
        capabilities,
        registry: builder.finish(),
        properties,
    })
}
