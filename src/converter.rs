//! Markup to script conversion.
//!
//! `XmlToCli` ties the markup reader to the script assembler. It is built
//! with `XmlToCliBuilder`, which refuses to produce a converter until the
//! subsystem name, the markup and its namespace are all known. Several
//! converters can be combined into a single script with
//! `convert_subsystems_to_cli`.
//!
//! # Example
//!
//! ```
//! use xml2cli::converter::XmlToCli;
//! use xml2cli::types::SubsystemAddStrategy;
//!
//! let converter = XmlToCli::builder()
//!     .subsystem_name("foo")
//!     .namespace("urn:example:foo:1.0")
//!     .xml(r#"<subsystem xmlns="urn:example:foo:1.0"><child name="bar"/></subsystem>"#)
//!     .strategy(SubsystemAddStrategy::Skip)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     converter.convert_xml_to_cli().unwrap(),
//!     "batch\n/subsystem=foo/child=bar:add()\nrun-batch"
//! );
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::engine::assembler::{self, ScriptPlan};
use crate::error::{Result, XmlToCliError};
use crate::markup;
use crate::model::Operation;
use crate::types::SubsystemAddStrategy;

/// A configured conversion of one subsystem document.
#[derive(Debug, Clone)]
pub struct XmlToCli {
    subsystem_name: String,
    namespace: String,
    xml: String,
    strategy: SubsystemAddStrategy,
    batch: bool,
}

impl XmlToCli {
    pub fn builder() -> XmlToCliBuilder {
        XmlToCliBuilder::default()
    }

    pub fn subsystem_name(&self) -> &str {
        &self.subsystem_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn strategy(&self) -> SubsystemAddStrategy {
        self.strategy
    }

    pub fn batch(&self) -> bool {
        self.batch
    }

    /// Read the document into operations.
    pub fn convert_xml_to_operations(&self) -> Result<Vec<Operation>> {
        markup::read_operations(&self.xml, &self.subsystem_name, &self.namespace)
    }

    /// Read the document and plan the script without rendering it.
    pub fn convert_xml_to_plan(&self) -> Result<ScriptPlan> {
        let operations = self.convert_xml_to_operations()?;
        Ok(assembler::plan(&operations, self.strategy, self.batch))
    }

    /// Read the document and render the complete script.
    pub fn convert_xml_to_cli(&self) -> Result<String> {
        let operations = self.convert_xml_to_operations()?;
        Ok(assembler::assemble(&operations, self.strategy, self.batch))
    }
}

/// Read every converter's document, concatenating the operations in order.
///
/// # Errors
///
/// Returns `XmlToCliError::MissingSetting` for an empty list, or the first
/// reader failure.
pub fn convert_subsystems_to_operations(converters: &[XmlToCli]) -> Result<Vec<Operation>> {
    if converters.is_empty() {
        return Err(XmlToCliError::MissingSetting("subsystem"));
    }
    let mut operations = Vec::new();
    for converter in converters {
        operations.extend(converter.convert_xml_to_operations()?);
    }
    Ok(operations)
}

/// Plan one script for several subsystems.
///
/// The operations are assembled together, so the deferred batch rule spans
/// every subsystem and there is at most one `batch` / `run-batch` pair.
/// `strategy` and `batch` apply to the whole script; the converters' own
/// settings are not consulted.
pub fn plan_subsystems(
    converters: &[XmlToCli],
    strategy: SubsystemAddStrategy,
    batch: bool,
) -> Result<ScriptPlan> {
    let operations = convert_subsystems_to_operations(converters)?;
    Ok(assembler::plan(&operations, strategy, batch))
}

/// Render one script for several subsystems. See `plan_subsystems`.
pub fn convert_subsystems_to_cli(
    converters: &[XmlToCli],
    strategy: SubsystemAddStrategy,
    batch: bool,
) -> Result<String> {
    let operations = convert_subsystems_to_operations(converters)?;
    debug!(
        subsystems = converters.len(),
        operations = operations.len(),
        "Combining subsystem conversions"
    );
    Ok(assembler::assemble(&operations, strategy, batch))
}

/// Builder for `XmlToCli`.
///
/// Defaults: strategy `AddIfNotThere`, batching on, markup taken as a full
/// document.
#[derive(Debug, Clone)]
pub struct XmlToCliBuilder {
    subsystem_name: Option<String>,
    namespace: Option<String>,
    xml: Option<String>,
    fragment: bool,
    strategy: SubsystemAddStrategy,
    batch: bool,
}

impl Default for XmlToCliBuilder {
    fn default() -> Self {
        Self {
            subsystem_name: None,
            namespace: None,
            xml: None,
            fragment: false,
            strategy: SubsystemAddStrategy::default(),
            batch: true,
        }
    }
}

impl XmlToCliBuilder {
    pub fn subsystem_name(mut self, name: impl Into<String>) -> Self {
        self.subsystem_name = Some(name.into());
        self
    }

    /// Namespace the subsystem root element is declared in.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn xml(mut self, xml: impl Into<String>) -> Self {
        self.xml = Some(xml.into());
        self
    }

    /// Load the markup from a file.
    ///
    /// # Errors
    ///
    /// Returns `XmlToCliError::Io` if the file does not exist or cannot be read.
    pub fn xml_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading subsystem markup from {}", path.display());
        let xml = fs::read_to_string(path).map_err(|e| {
            XmlToCliError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        self.xml = Some(xml);
        Ok(self)
    }

    /// Treat the markup as the body of the subsystem element rather than a
    /// whole document; it is wrapped in `<subsystem xmlns="…">` on build.
    pub fn fragment(mut self, fragment: bool) -> Self {
        self.fragment = fragment;
        self
    }

    pub fn strategy(mut self, strategy: SubsystemAddStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// Returns `XmlToCliError::MissingSetting` if the subsystem name, the
    /// markup or the namespace was never set.
    pub fn build(self) -> Result<XmlToCli> {
        let subsystem_name = self
            .subsystem_name
            .ok_or(XmlToCliError::MissingSetting("subsystem name"))?;
        let xml = self.xml.ok_or(XmlToCliError::MissingSetting("xml"))?;
        let namespace = self
            .namespace
            .ok_or(XmlToCliError::MissingSetting("namespace"))?;

        let xml = if self.fragment {
            markup::wrap_fragment(&xml, &namespace)
        } else {
            xml
        };

        Ok(XmlToCli {
            subsystem_name,
            namespace,
            xml,
            strategy: self.strategy,
            batch: self.batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripts::address::serialize_address;

    const NS: &str = "urn:example:foo:1.0";

    fn complete() -> XmlToCliBuilder {
        XmlToCli::builder()
            .subsystem_name("foo")
            .namespace(NS)
            .xml(format!(r#"<subsystem xmlns="{}"/>"#, NS))
    }

    #[test]
    fn test_missing_subsystem_name() {
        let err = XmlToCli::builder()
            .namespace(NS)
            .xml("<subsystem/>")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "No subsystem name set");
    }

    #[test]
    fn test_missing_xml() {
        let err = XmlToCli::builder()
            .subsystem_name("foo")
            .namespace(NS)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "No xml set");
    }

    #[test]
    fn test_missing_namespace() {
        let err = XmlToCli::builder()
            .subsystem_name("foo")
            .xml("<subsystem/>")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "No namespace set");
    }

    #[test]
    fn test_defaults() {
        let converter = complete().build().unwrap();
        assert_eq!(converter.strategy(), SubsystemAddStrategy::AddIfNotThere);
        assert!(converter.batch());
    }

    #[test]
    fn test_single_subsystem_operation() {
        let ops = complete().build().unwrap().convert_xml_to_operations().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].action, "add");
        assert_eq!(ops[0].address.segments()[0].key, "subsystem");
        assert_eq!(ops[0].address.segments()[0].value, "foo");
        assert!(ops[0].parameters.is_empty());
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let script = XmlToCli::builder()
            .subsystem_name("foo")
            .namespace(NS)
            .xml(r#"<child name="bar"><name>x</name></child>"#)
            .fragment(true)
            .build()
            .unwrap()
            .convert_xml_to_cli()
            .unwrap();
        assert_eq!(
            script,
            "if (outcome != success) of /subsystem=foo:read-resource()\n  /subsystem=foo:add()\nend-if\n\nbatch\n/subsystem=foo/child=bar:add(name=\"x\")\nrun-batch"
        );
    }

    #[test]
    fn test_invalid_markup_yields_no_output() {
        let converter = complete().xml("<subsystem").build().unwrap();
        assert!(matches!(
            converter.convert_xml_to_cli(),
            Err(XmlToCliError::InvalidConfiguration(_))
        ));
    }

    fn fragment(name: &str, ns: &str, body: &str) -> XmlToCli {
        XmlToCli::builder()
            .subsystem_name(name)
            .namespace(ns)
            .xml(body)
            .fragment(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_subsystems_share_one_batch() {
        let converters = [
            fragment("keycloak", "urn:example:keycloak:1.1", r#"<realm name="demo"/>"#),
            fragment("keycloak-saml", "urn:example:keycloak-saml:1.1", r#"<deployment name="app.war"/>"#),
        ];
        let script =
            convert_subsystems_to_cli(&converters, SubsystemAddStrategy::AddIfNotThere, true).unwrap();
        assert_eq!(
            script,
            [
                "if (outcome != success) of /subsystem=keycloak:read-resource()",
                "  /subsystem=keycloak:add()",
                "end-if",
                "",
                "batch",
                "/subsystem=keycloak/realm=demo:add()",
                "",
                "if (outcome != success) of /subsystem=keycloak-saml:read-resource()",
                "  /subsystem=keycloak-saml:add()",
                "end-if",
                "",
                "/subsystem=keycloak-saml/deployment=app.war:add()",
                "run-batch",
            ]
            .join("\n")
        );
        assert_eq!(script.matches("batch\n").count(), 1);
        assert_eq!(script.matches("run-batch").count(), 1);
    }

    #[test]
    fn test_subsystem_operations_concatenate_in_order() {
        let converters = [
            fragment("b", "urn:b", r#"<x name="1"/>"#),
            fragment("a", "urn:a", ""),
        ];
        let ops = convert_subsystems_to_operations(&converters).unwrap();
        let addresses: Vec<String> = ops.iter().map(|o| serialize_address(&o.address)).collect();
        assert_eq!(addresses, vec!["/subsystem=b", "/subsystem=b/x=1", "/subsystem=a"]);

        let plan = plan_subsystems(&converters, SubsystemAddStrategy::Add, false).unwrap();
        assert_eq!(plan.operation_count(), 3);
        assert!(!plan.is_batched());
    }

    #[test]
    fn test_subsystems_fail_as_a_whole() {
        let converters = [
            fragment("a", "urn:a", r#"<x name="1"/>"#),
            complete().xml("<subsystem").build().unwrap(),
        ];
        assert!(matches!(
            convert_subsystems_to_cli(&converters, SubsystemAddStrategy::Add, true),
            Err(XmlToCliError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_no_subsystems() {
        let err = convert_subsystems_to_operations(&[]).unwrap_err();
        assert_eq!(err.to_string(), "No subsystem set");
    }

    #[test]
    fn test_missing_file() {
        let err = XmlToCli::builder()
            .xml_file("/definitely/not/here.xml")
            .unwrap_err();
        assert!(matches!(err, XmlToCliError::Io(_)));
    }
}
