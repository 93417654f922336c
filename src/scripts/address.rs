//! Console-style rendering of resource addresses.
//!
//! `/key=value/key=value`, with a value wrapped in double quotes when it
//! contains one of the address grammar's own separators (`/` or `=`).
//! Keys are written as-is. A `"` inside a value is not escaped.

use crate::model::{Address, AddressSegment};
use crate::script_traits::CliSyntax;

/// Characters that force a segment value to be quoted.
const SEPARATORS: [char; 2] = ['/', '='];

/// Render an address. The root address renders as the empty string.
///
/// # Example
///
/// ```
/// use xml2cli::model::Address;
/// use xml2cli::scripts::address::serialize_address;
///
/// let addr = Address::from_pairs([("subsystem", "foo"), ("realm", "a/b")]);
/// assert_eq!(serialize_address(&addr), r#"/subsystem=foo/realm="a/b""#);
/// ```
pub fn serialize_address(address: &Address) -> String {
    let mut out = String::new();
    for segment in address {
        write_segment(&mut out, segment);
    }
    out
}

fn write_segment(out: &mut String, segment: &AddressSegment) {
    out.push('/');
    out.push_str(&segment.key);
    out.push('=');
    if needs_quotes(&segment.value) {
        out.push('"');
        out.push_str(&segment.value);
        out.push('"');
    } else {
        out.push_str(&segment.value);
    }
}

/// Whether a segment value would be ambiguous without quotes.
fn needs_quotes(value: &str) -> bool {
    value.contains(SEPARATORS)
}

impl CliSyntax for Address {
    fn to_cli(&self) -> String {
        serialize_address(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        assert_eq!(serialize_address(&Address::root()), "");
    }

    #[test]
    fn test_plain_values_unquoted() {
        let addr = Address::from_pairs([("subsystem", "keycloak"), ("secure-deployment", "app.war")]);
        assert_eq!(
            serialize_address(&addr),
            "/subsystem=keycloak/secure-deployment=app.war"
        );
    }

    #[test]
    fn test_slash_and_equals_are_quoted() {
        let addr = Address::from_pairs([("realm", "http://host/auth"), ("attr", "a=b")]);
        assert_eq!(
            serialize_address(&addr),
            r#"/realm="http://host/auth"/attr="a=b""#
        );
    }

    #[test]
    fn test_keys_never_quoted() {
        let addr = Address::from_pairs([("odd/key", "v")]);
        assert_eq!(serialize_address(&addr), "/odd/key=v");
    }

    #[test]
    fn test_embedded_quote_is_not_escaped() {
        let addr = Address::from_pairs([("name", r#"say "hi"/now"#)]);
        assert_eq!(serialize_address(&addr), r#"/name="say "hi"/now""#);
    }

    #[test]
    fn test_segment_order_preserved() {
        let addr = Address::from_pairs([("b", "2"), ("a", "1"), ("b", "2")]);
        assert_eq!(serialize_address(&addr), "/b=2/a=1/b=2");
    }
}
