//! Two-phase registry of implementation configs.
//!
//! [`RegistryBuilder`] collects every (model, target) config during the
//! collection phase. [`RegistryBuilder::finish`] freezes it; the emission
//! phase only ever sees the read-only [`Registry`], so lookups such as
//! "every DTO of this model" always observe the complete pass.

use std::collections::HashMap;

use crate::diagnostic::CompilerError;
use crate::ir::TargetKind;
use super::settings::ImplementationConfig;

/// Collection-phase registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    configs: Vec<ImplementationConfig>,
    by_class: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a config. Two targets may not produce the same class.
    pub fn register(&mut self, config: ImplementationConfig) -> Result<(), CompilerError> {
        let class = config.qualified_name();
        if let Some(&existing) = self.by_class.get(&class) {
            let first = &self.configs[existing];
            return Err(CompilerError::DuplicateClass {
                class,
                first: format!("{}:{}", first.model, first.label),
                second: format!("{}:{}", config.model, config.label),
            });
        }
        self.by_class.insert(class, self.configs.len());
        self.configs.push(config);
        Ok(())
    }

    /// Freezes the registry for the emission phase.
    pub fn finish(self) -> Registry {
        let mut by_model: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, config) in self.configs.iter().enumerate() {
            by_model.entry(config.model.clone()).or_default().push(i);
        }
        Registry {
            configs: self.configs,
            by_model,
        }
    }
}

/// Frozen, read-only registry.
#[derive(Debug, Default)]
pub struct Registry {
    configs: Vec<ImplementationConfig>,
    by_model: HashMap<String, Vec<usize>>,
}

impl Registry {
    /// Every config, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ImplementationConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Every implementation registered against a model.
    pub fn implementations_for<'a>(&'a self, model: &str) -> impl Iterator<Item = &'a ImplementationConfig> + 'a {
        self.by_model
            .get(model)
            .into_iter()
            .flatten()
            .map(move |&i| &self.configs[i])
    }

    /// Every DTO registered against a model.
    pub fn dtos_for<'a>(&'a self, model: &str) -> impl Iterator<Item = &'a ImplementationConfig> + 'a {
        self.implementations_for(model)
            .filter(|config| config.kind == TargetKind::Dto)
    }
}
