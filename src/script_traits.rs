//! Typed console syntax contracts.
//!
//! This module provides the `CliSyntax` trait: the single seam between the
//! operation model and script text. Anything that ends up in a script
//! implements it, so the quoting rules live in exactly one place per type.
//!
//! # Contract
//!
//! - `to_cli()` is pure: the same value always renders to the same text.
//! - Rendering never fails; malformed input simply renders as written.
//!
//! # Example
//!
//! ```
//! use xml2cli::model::{Address, Operation};
//! use xml2cli::script_traits::CliSyntax;
//!
//! let op = Operation::add(Address::subsystem("foo")).with_scalar("name", "x");
//! assert_eq!(op.to_cli(), r#"/subsystem=foo:add(name="x")"#);
//! ```

/// Trait for values that render as management console syntax.
pub trait CliSyntax {
    /// Render this value exactly as it should appear in the script.
    fn to_cli(&self) -> String;
}
