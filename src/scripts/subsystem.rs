//! Handling of the operation that creates the subsystem itself.
//!
//! A subsystem-add is an `add` whose address is exactly `/subsystem=<name>`.
//! Depending on the configured strategy it is written as a plain invocation,
//! dropped, or wrapped in a `read-resource` guard so re-running the script
//! against a server that already has the subsystem does not fail.

use tracing::debug;

use crate::engine::assembler::Statement;
use crate::model::{ADD, Operation, SUBSYSTEM};
use crate::scripts::address::serialize_address;
use crate::scripts::operation::format_operation;
use crate::types::SubsystemAddStrategy;

/// Whether `operation` is the top-level subsystem-add.
///
/// Anything else, including an empty address, is a regular operation.
pub fn is_subsystem_add(operation: &Operation) -> bool {
    match operation.address.segments() {
        [only] => only.key == SUBSYSTEM && operation.action == ADD,
        _ => false,
    }
}

/// Render a subsystem-add under `strategy`. Returns `None` when the operation
/// is dropped from the script.
pub fn render_subsystem_add(
    operation: &Operation,
    strategy: SubsystemAddStrategy,
) -> Option<Statement> {
    match strategy {
        SubsystemAddStrategy::Skip => {
            debug!(
                address = %serialize_address(&operation.address),
                "Skipping subsystem add"
            );
            None
        }
        SubsystemAddStrategy::Add => Some(Statement::Invocation(format_operation(operation))),
        SubsystemAddStrategy::AddIfNotThere => Some(Statement::Guarded {
            probe: serialize_address(&operation.address),
            invocation: format_operation(operation),
        }),
    }
}
