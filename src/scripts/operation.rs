//! One operation as one console invocation:
//! `<address>:<action>(<parameters>)`.

use crate::model::{Operation, RESERVED_PARAMETERS};
use crate::script_traits::CliSyntax;
use crate::scripts::address::serialize_address;
use crate::scripts::parameters::serialize_parameters;

/// Format an operation as a single invocation line.
///
/// # Example
///
/// ```
/// use xml2cli::model::{Address, Operation};
/// use xml2cli::scripts::operation::format_operation;
///
/// let op = Operation::add(Address::from_pairs([("subsystem", "foo"), ("child", "bar")]))
///     .with_scalar("name", "x");
/// assert_eq!(format_operation(&op), r#"/subsystem=foo/child=bar:add(name="x")"#);
/// ```
pub fn format_operation(operation: &Operation) -> String {
    let mut out = serialize_address(&operation.address);
    out.push(':');
    out.push_str(&operation.action);
    out.push('(');
    out.push_str(&serialize_parameters(
        &operation.parameters,
        RESERVED_PARAMETERS,
    ));
    out.push(')');
    out
}

impl CliSyntax for Operation {
    fn to_cli(&self) -> String {
        format_operation(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, Value};

    #[test]
    fn test_root_operation_without_parameters() {
        let op = Operation::new(Address::root(), "read-resource");
        assert_eq!(format_operation(&op), ":read-resource()");
    }

    #[test]
    fn test_mixed_parameters() {
        let op = Operation::add(Address::subsystem("keycloak").child("realm", "master"))
            .with_scalar("auth-server-url", "http://localhost:8080/auth")
            .with_parameter("credentials", Some(Value::structured(r#"{"secret" => "s"}"#)))
            .with_parameter("truststore", None)
            .with_scalar("realm-public-key", "$KEY");
        assert_eq!(
            format_operation(&op),
            r#"/subsystem=keycloak/realm=master:add(auth-server-url="http://localhost:8080/auth", credentials={"secret" => "s"}, realm-public-key="\$KEY")"#
        );
    }

    #[test]
    fn test_reserved_keys_in_parameters_are_dropped() {
        let op = Operation::add(Address::subsystem("foo"))
            .with_scalar("operation", "remove")
            .with_scalar("address", "/elsewhere");
        assert_eq!(format_operation(&op), "/subsystem=foo:add()");
    }

    #[test]
    fn test_display_matches_format() {
        let op = Operation::add(Address::subsystem("foo")).with_scalar("a", "b");
        assert_eq!(op.to_string(), format_operation(&op));
        assert_eq!(op.to_cli(), format_operation(&op));
    }
}
