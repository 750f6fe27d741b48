//! Z reference routines
//!
//! Before a scan starts the operator touches the probe off a reference
//! feature and types in its known dimension: the height of a flat area for
//! surface scans, the radius of the cylinder for rotary scans. Z is then
//! declared to be that value and the machine lifts to the safe height above
//! it.
//!
//! The entered value lives in a controller variable that every later
//! clearance computation refers to, so this block must precede the sample
//! loop.

use crate::dialect::ControllerDialect;
use crate::error::EncodingError;
use crate::program::format_number;
use probekit_core::ProbeConfig;

/// Variable holding the travel height above the reference
pub const SAFE_Z_VARIABLE: &str = "SAFEZ";

/// Variable holding the between-sample retract height above the reference
pub const RETRACT_VARIABLE: &str = "RETRACTBACK";

/// Kind of reference the operator establishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroingRoutine {
    /// Known flat height on the workpiece
    Surface,
    /// Top of a cylinder of known radius
    Rotary,
}

impl ZeroingRoutine {
    /// Controller variable receiving the operator-entered reference
    pub fn reference_variable(self) -> &'static str {
        match self {
            ZeroingRoutine::Surface => "KNOWNHEIGHT",
            ZeroingRoutine::Rotary => "CYLINDERRADIUS",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ZeroingRoutine::Surface => "=== Z-Axis Zeroing Routine (Surface Scan) ===",
            ZeroingRoutine::Rotary => "=== Z-Axis Zeroing Routine (Rotary Scan) ===",
        }
    }

    fn position_prompt(self) -> &'static str {
        match self {
            ZeroingRoutine::Surface => {
                "Position the probe over a known flat area on your workpiece, then press X"
            }
            ZeroingRoutine::Rotary => "Position the probe at the TOP of the cylinder, then press OK",
        }
    }

    fn dimension_prompt(self, units: &str) -> String {
        match self {
            ZeroingRoutine::Surface => format!(
                "Enter the Z height of this reference surface (in {}): ",
                units
            ),
            ZeroingRoutine::Rotary => format!("Enter the radius of the cylinder (in {}): ", units),
        }
    }

    fn confirmation(self) -> &'static str {
        match self {
            ZeroingRoutine::Surface => "Z-axis zeroed! Reference height set to ",
            ZeroingRoutine::Rotary => "Z-axis zeroed! Cylinder radius set to ",
        }
    }

    /// Assignment of `margin + reference` to `target`
    pub fn clearance(self, dialect: &dyn ControllerDialect, target: &str, margin: f64) -> String {
        let expr = dialect.concat(&[
            format_number(margin),
            dialect.variable(self.reference_variable()),
        ]);
        dialect.assign(target, &expr)
    }

    /// Statements of the zeroing block
    pub fn emit(
        self,
        dialect: &dyn ControllerDialect,
        config: &ProbeConfig,
    ) -> Result<Vec<String>, EncodingError> {
        let reference = self.reference_variable();
        let speed = format_number(config.probe_speed);
        let units = config.units.plural_name();

        let mut lines = vec![
            dialect.comment(self.title()),
            dialect.comment(" Pause for user to position probe"),
            dialect.wait_for_key(self.position_prompt())?,
            String::new(),
            dialect.comment(" Set probe speed"),
            dialect.set_speeds(&speed, &speed),
            String::new(),
            dialect.comment(" Probe down to find the reference"),
            dialect.probe_z(
                &format_number(config.max_probe_depth),
                &speed,
                config.input_number,
            ),
            String::new(),
        ];

        if self == ZeroingRoutine::Surface {
            lines.push(dialect.comment(" Zero at probe contact"));
            lines.push(dialect.zero_z());
            lines.push(String::new());
        }

        lines.push(dialect.comment(" Ask the operator for the reference dimension"));
        lines.push(dialect.assign(reference, "0"));
        lines.push(dialect.ask_number(&self.dimension_prompt(units), reference, "Continue")?);
        lines.push(dialect.assign(reference, &dialect.to_number(reference)));
        lines.push(dialect.set_z_position(&dialect.variable(reference)));
        lines.push(String::new());

        lines.push(dialect.comment(" Move to safe height"));
        lines.push(self.clearance(dialect, SAFE_Z_VARIABLE, config.safe_z));
        lines.push(dialect.move_z(&dialect.variable(SAFE_Z_VARIABLE)));
        lines.push(String::new());

        let message = dialect.concat(&[
            dialect.string_literal(self.confirmation())?,
            dialect.variable(reference),
            dialect.string_literal(&format!(" {}. Press OK to continue.", units))?,
        ]);
        lines.push(dialect.pause(&message));

        Ok(lines)
    }
}
