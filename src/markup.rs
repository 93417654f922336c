//! Subsystem markup reader.
//!
//! Maps a subsystem XML document onto the operation model with a fixed rule
//! set. No management model is booted; the document shape alone decides the
//! operations.
//!
//! # Mapping
//!
//! | Markup                                         | Result                                      |
//! |------------------------------------------------|---------------------------------------------|
//! | `<subsystem xmlns="ns" a="1">`                 | `add` at `/subsystem=<name>`, `a="1"`       |
//! | `<realm name="master" x="y">` (has `name`)     | child resource `add` at `…/realm=master`    |
//! | `<timeout>30</timeout>` (no `name`)            | parameter `timeout`, scalar `"30"`          |
//! | `<truststore/>`                                | parameter `truststore`, undefined           |
//! | `<creds secret="s"/>`                          | parameter `creds`, `{"secret" => "s"}`      |
//! | `<props><property name="k" value="v"/></props>`| parameter `props`, `{"k" => "v"}`           |
//! | `<hosts><value>a</value><value>b</value></hosts>` | parameter `hosts`, `["a", "b"]`          |
//!
//! A resource's operation is emitted before the operations of its children,
//! all in document order. Anything that does not fit these rules makes the
//! whole document invalid.

use roxmltree::{Document, Node};
use tracing::{debug, info};

use crate::error::{Result, XmlToCliError};
use crate::model::{Address, Operation, SUBSYSTEM, Value};
use crate::scripts::address::serialize_address;

/// Attribute that turns an element into a child resource.
const NAME_ATTRIBUTE: &str = "name";

const PROPERTY_ELEMENT: &str = "property";
const VALUE_ELEMENT: &str = "value";
const VALUE_ATTRIBUTE: &str = "value";

/// Wrap a bare subsystem fragment in a `<subsystem>` root element.
pub fn wrap_fragment(fragment: &str, namespace: &str) -> String {
    format!(
        "<subsystem xmlns=\"{}\">\n{}\n</subsystem>",
        namespace, fragment
    )
}

/// Read the operations described by a subsystem document.
///
/// `subsystem` is the name used in the `/subsystem=<name>` address and
/// `namespace` the namespace the root element must be declared in.
///
/// # Errors
///
/// Returns `XmlToCliError::InvalidConfiguration` if the document is not
/// well-formed, the root element or its namespace is wrong, or an element
/// does not fit the mapping rules.
pub fn read_operations(xml: &str, subsystem: &str, namespace: &str) -> Result<Vec<Operation>> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if root.tag_name().name() != SUBSYSTEM {
        return Err(XmlToCliError::invalid(format!(
            "expected root element <{}>, found <{}>",
            SUBSYSTEM,
            root.tag_name().name()
        )));
    }
    match root.tag_name().namespace() {
        Some(ns) if ns == namespace => {}
        Some(ns) => {
            return Err(XmlToCliError::invalid(format!(
                "unexpected namespace '{}', expected '{}'",
                ns, namespace
            )));
        }
        None => {
            return Err(XmlToCliError::invalid(format!(
                "root element has no namespace, expected '{}'",
                namespace
            )));
        }
    }

    let mut operations = Vec::new();
    read_resource(root, Address::subsystem(subsystem), &mut operations)?;
    info!(subsystem, operations = operations.len(), "Read subsystem markup");
    Ok(operations)
}

fn read_resource(node: Node<'_, '_>, address: Address, out: &mut Vec<Operation>) -> Result<()> {
    let mut operation = Operation::add(address.clone());

    for attr in node.attributes() {
        // xsi:schemaLocation and friends
        if attr.namespace().is_some() || attr.name() == NAME_ATTRIBUTE {
            continue;
        }
        insert_parameter(&mut operation, attr.name(), Some(Value::scalar(attr.value())))?;
    }

    if let Some(text) = direct_text(node) {
        return Err(XmlToCliError::invalid(format!(
            "unexpected text '{}' in resource {}",
            text,
            serialize_address(&address)
        )));
    }

    let mut children = Vec::new();
    for child in node.children().filter(Node::is_element) {
        match child.attribute(NAME_ATTRIBUTE) {
            Some(name) => children.push((child, name)),
            None => {
                let value = read_parameter(child)?;
                insert_parameter(&mut operation, child.tag_name().name(), value)?;
            }
        }
    }

    debug!(
        address = %serialize_address(&address),
        parameters = operation.parameters.len(),
        "Read resource"
    );
    out.push(operation);

    for (child, name) in children {
        read_resource(child, address.child(child.tag_name().name(), name), out)?;
    }
    Ok(())
}

fn insert_parameter(operation: &mut Operation, name: &str, value: Option<Value>) -> Result<()> {
    if operation.parameters.contains_key(name) {
        return Err(XmlToCliError::invalid(format!(
            "parameter '{}' is defined more than once for {}",
            name,
            serialize_address(&operation.address)
        )));
    }
    operation.parameters.insert(name.to_string(), value);
    Ok(())
}

fn read_parameter(node: Node<'_, '_>) -> Result<Option<Value>> {
    let name = node.tag_name().name();
    let elements: Vec<Node<'_, '_>> = node.children().filter(Node::is_element).collect();
    let text = direct_text(node);
    let has_attributes = node.attributes().any(|a| a.namespace().is_none());

    match (elements.is_empty(), text, has_attributes) {
        (true, None, false) => Ok(None),
        (true, Some(text), false) => Ok(Some(Value::scalar(text))),
        (true, None, true) => {
            let entries = node
                .attributes()
                .filter(|a| a.namespace().is_none())
                .map(|a| (a.name().to_string(), a.value().to_string()));
            Ok(Some(Value::structured(object_literal(entries))))
        }
        (false, None, false) => read_structured(name, &elements).map(Some),
        _ => Err(XmlToCliError::invalid(format!(
            "parameter '{}' mixes text, attributes and child elements",
            name
        ))),
    }
}

fn read_structured(name: &str, elements: &[Node<'_, '_>]) -> Result<Value> {
    let all_named = |tag: &str| elements.iter().all(|e| e.tag_name().name() == tag);

    if all_named(PROPERTY_ELEMENT) {
        let mut entries = Vec::with_capacity(elements.len());
        for property in elements {
            entries.push(read_property(name, *property)?);
        }
        Ok(Value::structured(object_literal(entries)))
    } else if all_named(VALUE_ELEMENT) {
        let mut items = Vec::with_capacity(elements.len());
        for value in elements {
            if has_element_children(*value) || value.attributes().any(|a| a.namespace().is_none()) {
                return Err(XmlToCliError::invalid(format!(
                    "a <{}> of '{}' may only contain text",
                    VALUE_ELEMENT, name
                )));
            }
            items.push(quote_literal(&direct_text(*value).unwrap_or_default()));
        }
        Ok(Value::structured(format!("[{}]", items.join(", "))))
    } else {
        Err(XmlToCliError::invalid(format!(
            "parameter '{}' must contain only <{}> or only <{}> elements",
            name, PROPERTY_ELEMENT, VALUE_ELEMENT
        )))
    }
}

/// One `<property name="k" value="v"/>` or `<property name="k">v</property>`.
fn read_property(parameter: &str, property: Node<'_, '_>) -> Result<(String, String)> {
    let key = property.attribute(NAME_ATTRIBUTE).ok_or_else(|| {
        XmlToCliError::invalid(format!("a property of '{}' has no name", parameter))
    })?;

    if has_element_children(property) {
        return Err(XmlToCliError::invalid(format!(
            "property '{}' of '{}' contains child elements",
            key, parameter
        )));
    }
    if let Some(extra) = property
        .attributes()
        .filter(|a| a.namespace().is_none())
        .find(|a| a.name() != NAME_ATTRIBUTE && a.name() != VALUE_ATTRIBUTE)
    {
        return Err(XmlToCliError::invalid(format!(
            "property '{}' of '{}' has unexpected attribute '{}'",
            key,
            parameter,
            extra.name()
        )));
    }

    let value = match (property.attribute(VALUE_ATTRIBUTE), direct_text(property)) {
        (Some(attr), None) => attr.to_string(),
        (None, Some(text)) => text,
        (Some(_), Some(_)) => {
            return Err(XmlToCliError::invalid(format!(
                "property '{}' of '{}' has both a value attribute and text",
                key, parameter
            )));
        }
        (None, None) => {
            return Err(XmlToCliError::invalid(format!(
                "property '{}' of '{}' has no value",
                key, parameter
            )));
        }
    };
    Ok((key.to_string(), value))
}

fn has_element_children(node: Node<'_, '_>) -> bool {
    node.children().any(|n| n.is_element())
}

/// `{"k" => "v", ...}` in the management model's literal syntax.
fn object_literal(entries: impl IntoIterator<Item = (String, String)>) -> String {
    let body: Vec<String> = entries
        .into_iter()
        .map(|(k, v)| format!("{} => {}", quote_literal(&k), quote_literal(&v)))
        .collect();
    format!("{{{}}}", body.join(", "))
}

fn quote_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Trimmed text directly inside `node`, ignoring child elements.
fn direct_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
