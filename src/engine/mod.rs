//! Engine modules: the part that turns an operation sequence into a script.
//!
//! The engine sits between the operation model (what the configuration says)
//! and script text (what the console runs). It generates ordered statement
//! plans and renders them.

pub mod assembler;
