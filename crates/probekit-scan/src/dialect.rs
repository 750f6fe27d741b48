//! Controller dialects
//!
//! The emitter fixes the order of statements and which values flow between
//! them; a [`ControllerDialect`] decides how each statement is spelled. The
//! only dialect shipped is [`OpenSbp`], the ShopBot scripting language run by
//! FabMo controllers.
//!
//! Arguments that are already expressions (`&SAFEZ`, `%(1)`, formatted
//! numbers) are passed through verbatim. Variable names are upper-cased on
//! the way in because the host upper-cases them anyway.

use crate::error::EncodingError;
use probekit_core::{MachineAxis, RotaryAxis};

/// Statement vocabulary of a controller scripting language
pub trait ControllerDialect: Send + Sync {
    /// Human readable dialect name
    fn name(&self) -> &'static str;

    /// A full-line comment
    fn comment(&self, text: &str) -> String;

    /// Quote `text` as a string literal
    fn string_literal(&self, text: &str) -> Result<String, EncodingError>;

    /// Reference to a user variable
    fn variable(&self, name: &str) -> String;

    /// Join expressions with the concatenation / addition operator
    fn concat(&self, parts: &[String]) -> String;

    /// Assign an expression to a user variable
    fn assign(&self, name: &str, expr: &str) -> String;

    /// Expression reading the live position of an axis
    fn position_register(&self, axis: MachineAxis) -> String;

    /// Rapid XY positioning move
    fn move_xy(&self, x: &str, y: &str) -> String;

    /// Z positioning move
    fn move_z(&self, z: &str) -> String;

    /// Rotary axis positioning move
    fn rotate(&self, axis: RotaryAxis, degrees: &str) -> String;

    /// Set XY and Z move speeds
    fn set_speeds(&self, xy: &str, z: &str) -> String;

    /// Probe down along Z until the input trips or `depth` is reached
    fn probe_z(&self, depth: &str, speed: &str, input: u32) -> String;

    /// Zero the Z axis at the current position
    fn zero_z(&self) -> String;

    /// Declare the current Z position to be `value`
    fn set_z_position(&self, value: &str) -> String;

    /// Block until the operator presses a key
    fn wait_for_key(&self, prompt: &str) -> Result<String, EncodingError>;

    /// Ask the operator for a number and store it in a variable
    fn ask_number(&self, prompt: &str, variable: &str, ok_text: &str)
        -> Result<String, EncodingError>;

    /// Blocking message box showing an expression
    fn pause(&self, message_expr: &str) -> String;

    /// Expression coercing a variable to a number
    fn to_number(&self, variable: &str) -> String;
}

/// OpenSBP, the ShopBot part-file language
///
/// String literals have no escape mechanism, so a literal may never contain
/// a double quote.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSbp;

impl OpenSbp {
    /// Create the dialect
    pub fn new() -> Self {
        Self
    }
}

impl ControllerDialect for OpenSbp {
    fn name(&self) -> &'static str {
        "OpenSBP"
    }

    fn comment(&self, text: &str) -> String {
        format!("'{}", text)
    }

    fn string_literal(&self, text: &str) -> Result<String, EncodingError> {
        if text.contains('"') {
            return Err(EncodingError::UnquotableLiteral(text.to_string()));
        }
        Ok(format!("\"{}\"", text))
    }

    fn variable(&self, name: &str) -> String {
        format!("&{}", name.to_ascii_uppercase())
    }

    fn concat(&self, parts: &[String]) -> String {
        parts.join(" + ")
    }

    fn assign(&self, name: &str, expr: &str) -> String {
        format!("{} = {}", self.variable(name), expr)
    }

    fn position_register(&self, axis: MachineAxis) -> String {
        let register = match axis {
            MachineAxis::X => 1,
            MachineAxis::Y => 2,
            MachineAxis::Z => 3,
            MachineAxis::A => 4,
            MachineAxis::B => 5,
        };
        format!("%({})", register)
    }

    fn move_xy(&self, x: &str, y: &str) -> String {
        format!("M2,{},{}", x, y)
    }

    fn move_z(&self, z: &str) -> String {
        format!("MZ,{}", z)
    }

    fn rotate(&self, axis: RotaryAxis, degrees: &str) -> String {
        match axis {
            RotaryAxis::A => format!("MA,{}", degrees),
            RotaryAxis::B => format!("MB,{}", degrees),
        }
    }

    fn set_speeds(&self, xy: &str, z: &str) -> String {
        format!("VS,{},{}", xy, z)
    }

    fn probe_z(&self, depth: &str, speed: &str, input: u32) -> String {
        format!("PZ,{},{},{}", depth, speed, input)
    }

    fn zero_z(&self) -> String {
        "ZZ".to_string()
    }

    fn set_z_position(&self, value: &str) -> String {
        format!("VA,,,{}", value)
    }

    fn wait_for_key(&self, prompt: &str) -> Result<String, EncodingError> {
        Ok(format!("SK {}", self.string_literal(prompt)?))
    }

    fn ask_number(
        &self,
        prompt: &str,
        variable: &str,
        ok_text: &str,
    ) -> Result<String, EncodingError> {
        Ok(format!(
            "DIALOG {}, INPUT=\"{}\", OKTEXT={}",
            self.string_literal(prompt)?,
            self.variable(variable),
            self.string_literal(ok_text)?
        ))
    }

    fn pause(&self, message_expr: &str) -> String {
        format!("PAUSE {}", message_expr)
    }

    fn to_number(&self, variable: &str) -> String {
        format!("{}/1", self.variable(variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_are_upper_cased() {
        let d = OpenSbp::new();
        assert_eq!(d.variable("scanData"), "&SCANDATA");
        assert_eq!(d.assign("complete", "0"), "&COMPLETE = 0");
    }

    #[test]
    fn test_literals_reject_quotes() {
        let d = OpenSbp::new();
        assert_eq!(d.string_literal("[").unwrap(), "\"[\"");
        assert!(matches!(
            d.string_literal("say \"hi\""),
            Err(EncodingError::UnquotableLiteral(_))
        ));
    }

    #[test]
    fn test_motion_vocabulary() {
        let d = OpenSbp::new();
        assert_eq!(d.move_xy("1.0000", "2.0000"), "M2,1.0000,2.0000");
        assert_eq!(d.move_z("&SAFEZ"), "MZ,&SAFEZ");
        assert_eq!(d.rotate(RotaryAxis::B, "90"), "MB,90");
        assert_eq!(d.probe_z("-2.0000", "1.0000", 7), "PZ,-2.0000,1.0000,7");
        assert_eq!(d.position_register(MachineAxis::B), "%(5)");
    }

    #[test]
    fn test_prompts() {
        let d = OpenSbp::new();
        assert_eq!(
            d.ask_number("Enter radius: ", "cylinderRadius", "Continue")
                .unwrap(),
            "DIALOG \"Enter radius: \", INPUT=\"&CYLINDERRADIUS\", OKTEXT=\"Continue\""
        );
        assert_eq!(d.wait_for_key("Press X").unwrap(), "SK \"Press X\"");
        assert_eq!(d.to_number("knownHeight"), "&KNOWNHEIGHT/1");
    }
}
