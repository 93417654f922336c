//! Console-style rendering of operation parameters.
//!
//! Parameters render as `name=value` pairs joined by `", "`, in declaration
//! order. Undefined (`None`) parameters and reserved names are left out.
//!
//! # Value Rules
//!
//! | Value        | Output                                    |
//! |--------------|-------------------------------------------|
//! | `Structured` | literal text, unquoted                    |
//! | `Scalar`     | `"text"`                                  |
//! | `Scalar("$…")` | `"\$…"` so the console does not expand it |
//!
//! No other characters are escaped.

use crate::model::{Parameters, Value};
use crate::script_traits::CliSyntax;

/// Render `parameters`, skipping any name listed in `excluding`.
pub fn serialize_parameters(parameters: &Parameters, excluding: &[&str]) -> String {
    let mut out = String::new();
    let defined = parameters
        .iter()
        .filter(|(name, _)| !excluding.contains(&name.as_str()))
        .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)));

    for (i, (name, value)) in defined.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push('=');
        out.push_str(&render_value(value));
    }
    out
}

/// Render a single parameter value.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Structured(literal) => literal.clone(),
        Value::Scalar(text) => {
            let mut out = String::with_capacity(text.len() + 3);
            out.push('"');
            // a leading '$' would be read as a variable reference
            if text.starts_with('$') {
                out.push('\\');
            }
            out.push_str(text);
            out.push('"');
            out
        }
    }
}

impl CliSyntax for Value {
    fn to_cli(&self) -> String {
        render_value(self)
    }
}
