//! Inline JSON accumulation
//!
//! OpenSBP string literals cannot contain a double quote, so a generated
//! program cannot write JSON directly. Instead every structural quote is
//! written as the placeholder `&quot;` and the program grows one text
//! variable fragment by fragment:
//!
//! ```text
//! &SCANDATA = "["
//! &SCANDATA = &SCANDATA + "{"
//! &SCANDATA = &SCANDATA + "&quot;x&quot;:" + %(1)
//! &SCANDATA = &SCANDATA + ",&quot;y&quot;:" + %(2)
//! &SCANDATA = &SCANDATA + "}"
//! &SCANDATA = &SCANDATA + ","
//! ...
//! &SCANDATA = &SCANDATA + "]"
//! ```
//!
//! Numeric values are appended unquoted and rely on the controller's
//! number-to-text coercion producing a JSON number. The text only becomes
//! JSON after [`unescape`] restores the quotes.

use crate::dialect::ControllerDialect;
use crate::error::EncodingError;

/// Token written in place of every structural double quote
pub const QUOTE_PLACEHOLDER: &str = "&quot;";

/// Numeric character reference some hosts substitute for the placeholder
pub const QUOTE_NUMERIC_REFERENCE: &str = "&#34;";

const ARRAY_OPEN: &str = "[";
const ARRAY_CLOSE: &str = "]";
const OBJECT_OPEN: &str = "{";
const OBJECT_CLOSE: &str = "}";
const SEPARATOR: &str = ",";

/// One `"key": value` member of an encoded object
///
/// `value` is a dialect expression evaluating to a number on the controller
/// (a position register, a formatted literal).
#[derive(Debug, Clone, PartialEq)]
pub struct JsonField {
    /// JSON key, restricted to ASCII letters, digits and underscores
    pub key: String,
    /// Controller expression producing the value
    pub value: String,
}

impl JsonField {
    /// Create a field
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn validate_key(key: &str) -> Result<(), EncodingError> {
    let legal = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if legal {
        Ok(())
    } else {
        Err(EncodingError::IllegalKey(key.to_string()))
    }
}

/// Literal text that precedes a field's value: `,"key":` with escaped quotes
pub fn field_prefix(key: &str, first: bool) -> Result<String, EncodingError> {
    validate_key(key)?;
    let separator = if first { "" } else { SEPARATOR };
    Ok(format!(
        "{}{}{}{}:",
        separator, QUOTE_PLACEHOLDER, key, QUOTE_PLACEHOLDER
    ))
}

/// Escaped object text for already-coerced values
///
/// Produces exactly the text the controller accumulates for one object, so
/// callers can reason about the wire format without running a program.
pub fn render_object(fields: &[(&str, String)]) -> Result<String, EncodingError> {
    if fields.is_empty() {
        return Err(EncodingError::EmptyObject);
    }
    let mut text = String::from(OBJECT_OPEN);
    for (position, (key, value)) in fields.iter().enumerate() {
        text.push_str(&field_prefix(key, position == 0)?);
        text.push_str(value);
    }
    text.push_str(OBJECT_CLOSE);
    Ok(text)
}

/// Escaped array text for a list of rendered objects
pub fn render_array(objects: &[String]) -> String {
    format!("{}{}{}", ARRAY_OPEN, objects.join(SEPARATOR), ARRAY_CLOSE)
}

/// Replace every placeholder (and its numeric synonym) with a literal quote
pub fn unescape(raw: &str) -> String {
    raw.replace(QUOTE_PLACEHOLDER, "\"")
        .replace(QUOTE_NUMERIC_REFERENCE, "\"")
}

/// Statement builder for one accumulator variable
///
/// The emitter only ever calls the methods here; it never spells a
/// placeholder itself.
pub struct InlineJsonEncoder<'d> {
    dialect: &'d dyn ControllerDialect,
    variable: String,
}

impl<'d> InlineJsonEncoder<'d> {
    /// Encoder writing into `variable` (canonicalised to upper case)
    pub fn new(dialect: &'d dyn ControllerDialect, variable: &str) -> Self {
        Self {
            dialect,
            variable: variable.to_ascii_uppercase(),
        }
    }

    /// Canonical accumulator variable name
    pub fn variable(&self) -> &str {
        &self.variable
    }

    fn append(&self, parts: Vec<String>) -> String {
        let mut all = vec![self.dialect.variable(&self.variable)];
        all.extend(parts);
        self.dialect
            .assign(&self.variable, &self.dialect.concat(&all))
    }

    fn append_literal(&self, text: &str) -> Result<String, EncodingError> {
        Ok(self.append(vec![self.dialect.string_literal(text)?]))
    }

    /// Initialise the accumulator to an empty array opener
    pub fn array_start(&self) -> Result<String, EncodingError> {
        Ok(self
            .dialect
            .assign(&self.variable, &self.dialect.string_literal(ARRAY_OPEN)?))
    }

    /// Close the array
    pub fn array_end(&self) -> Result<String, EncodingError> {
        self.append_literal(ARRAY_CLOSE)
    }

    /// Initialise the accumulator to an object opener
    pub fn object_start(&self) -> Result<String, EncodingError> {
        Ok(self
            .dialect
            .assign(&self.variable, &self.dialect.string_literal(OBJECT_OPEN)?))
    }

    /// Append one member to an object opened with [`object_start`](Self::object_start)
    pub fn object_field(&self, field: &JsonField, first: bool) -> Result<String, EncodingError> {
        let prefix = self.dialect.string_literal(&field_prefix(&field.key, first)?)?;
        Ok(self.append(vec![prefix, field.value.clone()]))
    }

    /// Close an object opened with [`object_start`](Self::object_start)
    pub fn object_end(&self) -> Result<String, EncodingError> {
        self.append_literal(OBJECT_CLOSE)
    }

    /// Statements appending one complete object to the array
    ///
    /// Every object after the first is preceded by a separator.
    pub fn array_object(
        &self,
        fields: &[JsonField],
        first_in_array: bool,
    ) -> Result<Vec<String>, EncodingError> {
        if fields.is_empty() {
            return Err(EncodingError::EmptyObject);
        }

        let mut statements = Vec::with_capacity(fields.len() + 3);
        if !first_in_array {
            statements.push(self.append_literal(SEPARATOR)?);
        }
        statements.push(self.append_literal(OBJECT_OPEN)?);
        for (position, field) in fields.iter().enumerate() {
            statements.push(self.object_field(field, position == 0)?);
        }
        statements.push(self.append_literal(OBJECT_CLOSE)?);
        Ok(statements)
    }
}
