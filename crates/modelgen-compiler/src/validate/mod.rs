//! Validation of the model graph.

mod structure;

use crate::diagnostic::CompilerError;
use crate::ir::ModelGraph;

/// Validates the whole graph before resolution.
pub fn validate_graph(graph: &ModelGraph) -> Result<(), CompilerError> {
    structure::validate_structure(graph)
}
