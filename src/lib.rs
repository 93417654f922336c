//! xml2cli Library
//!
//! Converts subsystem XML configuration into a management console script.
//! The core is the operation serializer in `scripts` and `engine`; `markup`,
//! `converter` and `config_file` feed it.

pub mod cli;
pub mod config_file;
pub mod converter;
pub mod engine;
pub mod error;
pub mod markup;
pub mod model;
pub mod script_traits;
pub mod scripts;
pub mod types;

// Re-export main types for convenience
pub use config_file::{ConversionConfig, SubsystemSource};
pub use converter::{
    XmlToCli, XmlToCliBuilder, convert_subsystems_to_cli, convert_subsystems_to_operations,
    plan_subsystems,
};
pub use engine::assembler::{ScriptPlan, Statement, assemble, plan};
pub use error::{Result, XmlToCliError};
pub use model::{Address, AddressSegment, Operation, Parameters, Value};
pub use script_traits::CliSyntax;
pub use scripts::address::serialize_address;
pub use scripts::operation::format_operation;
pub use scripts::parameters::{render_value, serialize_parameters};
pub use scripts::subsystem::{is_subsystem_add, render_subsystem_add};
pub use types::SubsystemAddStrategy;
