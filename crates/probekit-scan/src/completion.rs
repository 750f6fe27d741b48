//! Completion signalling
//!
//! A program clears `COMPLETE` before it does anything else and sets it only
//! after the accumulator is closed and the metadata is written. Hosts treat a
//! flag that is absent or false as "not ready" and never read the
//! accumulator before then.

use crate::dialect::ControllerDialect;
use serde_json::Value;

/// Name of the shared completion flag
pub const COMPLETE_VARIABLE: &str = "COMPLETE";

/// Statement clearing the flag at program start
pub fn reset_statement(dialect: &dyn ControllerDialect) -> String {
    dialect.assign(COMPLETE_VARIABLE, "0")
}

/// Statement raising the flag at program end
pub fn set_statement(dialect: &dyn ControllerDialect) -> String {
    dialect.assign(COMPLETE_VARIABLE, "1")
}

/// Interpret a host-reported flag value
///
/// Hosts report variables as numbers or as their textual form, so `1`,
/// `1.0`, `"1"` and `true` all count as set.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|v| v == 1.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.parse::<f64>().map(|v| v == 1.0).unwrap_or(false)
        }
        _ => false,
    }
}
