//! Script Assembly Engine
//!
//! Translates an ordered sequence of `Operation`s into a `ScriptPlan`: the
//! statements of a console script, including batch control, ready to render.
//!
//! # Batch Handling
//!
//! | `batch` | Strategy        | `batch` marker placed before            |
//! |---------|-----------------|-----------------------------------------|
//! | false   | any             | (never)                                 |
//! | true    | Add, Skip       | the first rendered statement            |
//! | true    | AddIfNotThere   | the first rendered non-subsystem-add    |
//!
//! An `if`/`end-if` guard may not appear inside a batch, which is why the
//! guarded strategy opens the batch late. `run-batch` closes whatever was
//! opened. When nothing is rendered, no markers are emitted.
//!
//! # Design
//!
//! - **Pure logic**: no I/O, same input always yields the same bytes
//! - **Order preserving**: operations are never reordered, merged or deduplicated
//! - **Single pass**: O(n) in the total parameter count

use std::fmt;

use tracing::{debug, info};

use crate::model::Operation;
use crate::script_traits::CliSyntax;
use crate::scripts::operation::format_operation;
use crate::scripts::subsystem::{is_subsystem_add, render_subsystem_add};
use crate::types::SubsystemAddStrategy;

// ============================================================================
// Statement Types
// ============================================================================

/// A single statement in the generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Opens a transactional batch
    Batch,
    /// A plain invocation line, e.g. `/subsystem=foo:add()`
    Invocation(String),
    /// An invocation that only runs when `probe:read-resource()` fails
    Guarded {
        /// Rendered address of the resource to probe
        probe: String,
        /// Rendered invocation to run when the probe fails
        invocation: String,
    },
    /// Commits the open batch
    RunBatch,
}

impl Statement {
    fn is_marker(&self) -> bool {
        matches!(self, Self::Batch | Self::RunBatch)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch => write!(f, "batch"),
            Self::Invocation(line) => write!(f, "{}", line),
            Self::Guarded { probe, invocation } => write!(
                f,
                "if (outcome != success) of {}:read-resource()\n  {}\nend-if",
                probe, invocation
            ),
            Self::RunBatch => write!(f, "run-batch"),
        }
    }
}

// ============================================================================
// Script Plan
// ============================================================================

/// A complete script: ordered statements plus the settings that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPlan {
    /// Ordered statements, markers included
    pub statements: Vec<Statement>,
    /// The subsystem-add strategy used
    pub strategy: SubsystemAddStrategy,
    /// Whether batching was requested
    pub batch: bool,
}

impl ScriptPlan {
    /// True if a `batch`/`run-batch` pair was emitted.
    pub fn is_batched(&self) -> bool {
        self.statements.contains(&Statement::Batch)
    }

    /// Number of statements that are not batch markers.
    pub fn operation_count(&self) -> usize {
        self.statements.iter().filter(|s| !s.is_marker()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Render the plan as script text.
    ///
    /// Operation statements are separated by a blank line. A `batch` marker
    /// sits directly above the statement it opens and `run-batch` directly
    /// below the last statement. No leading or trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut previous: Option<&Statement> = None;
        for statement in &self.statements {
            if let Some(prev) = previous {
                if matches!(prev, Statement::Batch) || matches!(statement, Statement::RunBatch) {
                    out.push('\n');
                } else {
                    out.push_str("\n\n");
                }
            }
            out.push_str(&statement.to_string());
            previous = Some(statement);
        }
        out
    }
}

impl CliSyntax for ScriptPlan {
    fn to_cli(&self) -> String {
        self.render()
    }
}

// ============================================================================
// Plan Calculation
// ============================================================================

/// Calculate the script plan for `operations`.
///
/// Subsystem-adds go through the subsystem policy, everything else is
/// formatted as a plain invocation. A single flag tracks whether the batch
/// has been opened.
pub fn plan(
    operations: &[Operation],
    strategy: SubsystemAddStrategy,
    batch: bool,
) -> ScriptPlan {
    let mut statements = Vec::with_capacity(operations.len() + 2);
    let mut batch_open = false;

    for operation in operations {
        let subsystem_add = is_subsystem_add(operation);
        let statement = if subsystem_add {
            match render_subsystem_add(operation, strategy) {
                Some(statement) => statement,
                None => continue,
            }
        } else {
            Statement::Invocation(format_operation(operation))
        };

        if batch && !batch_open && !(strategy.defers_batch() && subsystem_add) {
            if !statements.is_empty() {
                debug!("Opening deferred batch after {} guarded statement(s)", statements.len());
            }
            statements.push(Statement::Batch);
            batch_open = true;
        }
        statements.push(statement);
    }

    if batch_open {
        statements.push(Statement::RunBatch);
    }

    ScriptPlan {
        statements,
        strategy,
        batch,
    }
}

/// Assemble the full script text for `operations`.
///
/// # Example
///
/// ```
/// use xml2cli::engine::assembler::assemble;
/// use xml2cli::model::{Address, Operation};
/// use xml2cli::types::SubsystemAddStrategy;
///
/// let ops = vec![
///     Operation::add(Address::subsystem("foo")),
///     Operation::add(Address::subsystem("foo").child("child", "bar")).with_scalar("name", "x"),
/// ];
/// let script = assemble(&ops, SubsystemAddStrategy::Add, true);
/// assert_eq!(
///     script,
///     "batch\n/subsystem=foo:add()\n\n/subsystem=foo/child=bar:add(name=\"x\")\nrun-batch"
/// );
/// ```
pub fn assemble(operations: &[Operation], strategy: SubsystemAddStrategy, batch: bool) -> String {
    let plan = plan(operations, strategy, batch);
    info!(
        operations = operations.len(),
        statements = plan.operation_count(),
        batched = plan.is_batched(),
        %strategy,
        "Script assembled"
    );
    plan.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn subsystem_add() -> Operation {
        Operation::add(Address::subsystem("foo"))
    }

    fn child_add() -> Operation {
        Operation::add(Address::subsystem("foo").child("child", "bar")).with_scalar("name", "x")
    }

    #[test]
    fn test_empty_sequence_renders_nothing() {
        for strategy in [
            SubsystemAddStrategy::Add,
            SubsystemAddStrategy::Skip,
            SubsystemAddStrategy::AddIfNotThere,
        ] {
            assert_eq!(assemble(&[], strategy, true), "");
            assert_eq!(assemble(&[], strategy, false), "");
        }
    }

    #[test]
    fn test_skip_only_subsystem_add_is_empty() {
        assert_eq!(assemble(&[subsystem_add()], SubsystemAddStrategy::Skip, true), "");
        assert_eq!(assemble(&[subsystem_add()], SubsystemAddStrategy::Skip, false), "");
    }

    #[test]
    fn test_guard_alone_has_no_batch() {
        let script = assemble(&[subsystem_add()], SubsystemAddStrategy::AddIfNotThere, true);
        assert_eq!(
            script,
            "if (outcome != success) of /subsystem=foo:read-resource()\n  /subsystem=foo:add()\nend-if"
        );
    }

    #[test]
    fn test_guard_then_deferred_batch() {
        let script = assemble(
            &[subsystem_add(), child_add()],
            SubsystemAddStrategy::AddIfNotThere,
            true,
        );
        assert_eq!(
            script,
            "if (outcome != success) of /subsystem=foo:read-resource()\n  /subsystem=foo:add()\nend-if\n\nbatch\n/subsystem=foo/child=bar:add(name=\"x\")\nrun-batch"
        );
    }

    #[test]
    fn test_eager_batch_wraps_subsystem_add() {
        let plan = plan(&[subsystem_add(), child_add()], SubsystemAddStrategy::Add, true);
        assert_eq!(plan.statements.first(), Some(&Statement::Batch));
        assert_eq!(plan.statements.last(), Some(&Statement::RunBatch));
        assert_eq!(plan.operation_count(), 2);
    }

    #[test]
    fn test_skip_batches_remaining_operations() {
        let script = assemble(&[subsystem_add(), child_add()], SubsystemAddStrategy::Skip, true);
        assert_eq!(
            script,
            "batch\n/subsystem=foo/child=bar:add(name=\"x\")\nrun-batch"
        );
    }

    #[test]
    fn test_no_batch_no_markers() {
        let plan = plan(
            &[subsystem_add(), child_add()],
            SubsystemAddStrategy::AddIfNotThere,
            false,
        );
        assert!(!plan.is_batched());
        assert!(!plan.render().contains("batch"));
        assert_eq!(plan.statements.len(), 2);
    }

    #[test]
    fn test_order_preserved_without_dedup() {
        let ops = vec![child_add(), subsystem_add(), child_add()];
        let script = assemble(&ops, SubsystemAddStrategy::Add, false);
        assert_eq!(
            script,
            "/subsystem=foo/child=bar:add(name=\"x\")\n\n/subsystem=foo:add()\n\n/subsystem=foo/child=bar:add(name=\"x\")"
        );
    }

    #[test]
    fn test_plain_first_opens_batch_immediately_when_guarded() {
        let plan = plan(
            &[child_add(), subsystem_add()],
            SubsystemAddStrategy::AddIfNotThere,
            true,
        );
        assert_eq!(plan.statements[0], Statement::Batch);
        assert!(matches!(plan.statements[2], Statement::Guarded { .. }));
        assert_eq!(plan.statements[3], Statement::RunBatch);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let ops = vec![subsystem_add(), child_add(), child_add()];
        let first = assemble(&ops, SubsystemAddStrategy::AddIfNotThere, true);
        for _ in 0..5 {
            assert_eq!(assemble(&ops, SubsystemAddStrategy::AddIfNotThere, true), first);
        }
    }
}
