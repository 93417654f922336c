//! Console syntax renderers.
//!
//! Each module turns one part of the operation model into script text and
//! implements `CliSyntax` for the type it renders.

pub mod address;
pub mod operation;
pub mod parameters;
pub mod subsystem;
