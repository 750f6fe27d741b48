//! Probe program generation
//!
//! Turns a validated scan plan and the probe configuration into controller
//! program text. Every program follows the same skeleton:
//!
//! 1. header comments and variable initialisation, completion flag cleared
//! 2. zeroing block establishing the Z reference
//! 3. accumulator opened
//! 4. one move / probe / append / retract block per planned sample
//! 5. accumulator closed, return to origin at safe height
//! 6. metadata, completion flag set, final blocking pause
//!
//! Statements are emitted strictly in plan order.

use crate::completion;
use crate::dialect::{ControllerDialect, OpenSbp};
use crate::encoder::{InlineJsonEncoder, JsonField};
use crate::error::{EncodingError, ScanResult};
use crate::params::{RotaryScanParameters, ScanParameters};
use crate::planner::{PlannedRotaryPoint, ScanPlanner};
use crate::zeroing::{ZeroingRoutine, RETRACT_VARIABLE, SAFE_Z_VARIABLE};
use probekit_core::{MachineAxis, ProbeConfig};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Decimal places used for every numeric literal in a program
pub const COORDINATE_PRECISION: usize = 4;

/// Variable recording the number of samples a program visits
pub const TOTAL_POINTS_VARIABLE: &str = "TOTALPOINTS";

/// Format a numeric literal at the controller's fixed precision
pub fn format_number(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}

/// Program kinds and the controller variables they write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    /// Serpentine surface raster
    Surface,
    /// Angle-major cylinder sweep
    Rotary,
    /// Single Z probe without a reference
    ZProbe,
}

impl ScanKind {
    /// Accumulator variable holding the encoded results
    pub fn accumulator_variable(self) -> &'static str {
        match self {
            ScanKind::Surface => "SCANDATA",
            ScanKind::Rotary => "ROTARYDATA",
            ScanKind::ZProbe => "PROBEDATA",
        }
    }

    /// Per-kind marker set alongside the point count
    pub fn completion_marker(self) -> Option<&'static str> {
        match self {
            ScanKind::Surface => Some("SCANCOMPLETE"),
            ScanKind::Rotary => Some("ROTARYCOMPLETE"),
            ScanKind::ZProbe => None,
        }
    }

    /// Name used for file names and logs
    pub fn name(self) -> &'static str {
        match self {
            ScanKind::Surface => "surface",
            ScanKind::Rotary => "rotary",
            ScanKind::ZProbe => "zprobe",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(ScanKind::Surface),
            "rotary" => Ok(ScanKind::Rotary),
            "zprobe" | "z-probe" | "z" => Ok(ScanKind::ZProbe),
            _ => Err(format!("Unknown scan kind: {}", s)),
        }
    }
}

/// A generated program
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgram {
    /// What the program does
    pub kind: ScanKind,
    /// Samples the program visits
    pub total_points: u64,
    /// Program statements, blank lines and comments included
    pub lines: Vec<String>,
}

impl ScanProgram {
    /// Newline separated program text
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Lines that are neither blank nor comments
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !l.starts_with('\''))
    }
}

impl fmt::Display for ScanProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Program generator for one dialect and probe configuration
pub struct ProgramEmitter<D: ControllerDialect = OpenSbp> {
    dialect: D,
    config: ProbeConfig,
    planner: ScanPlanner,
}

impl ProgramEmitter<OpenSbp> {
    /// Emitter producing OpenSBP programs
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_dialect(OpenSbp::new(), config)
    }
}

impl<D: ControllerDialect> ProgramEmitter<D> {
    /// Emitter for an arbitrary dialect
    pub fn with_dialect(dialect: D, config: ProbeConfig) -> Self {
        Self {
            dialect,
            config,
            planner: ScanPlanner::new(),
        }
    }

    /// Replace the planner (and with it the point cap)
    pub fn with_planner(mut self, planner: ScanPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// The probe configuration in use
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// The dialect in use
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    fn probe_statement(&self) -> String {
        self.dialect.probe_z(
            &format_number(self.config.max_probe_depth),
            &format_number(self.config.probe_speed),
            self.config.input_number,
        )
    }

    fn speed_statement(&self) -> String {
        let speed = format_number(self.config.probe_speed);
        self.dialect.set_speeds(&speed, &speed)
    }

    fn preamble(&self, header: Vec<String>) -> Vec<String> {
        let d = &self.dialect;
        let mut lines = header;
        lines.push(String::new());
        lines.push(d.assign(SAFE_Z_VARIABLE, "0"));
        lines.push(d.assign(RETRACT_VARIABLE, "0"));
        lines.push(String::new());
        lines.push(d.comment(" Clear completion flag at start"));
        lines.push(completion::reset_statement(d));
        lines.push(String::new());
        lines
    }

    fn trailer(
        &self,
        lines: &mut Vec<String>,
        kind: ScanKind,
        total_points: u64,
    ) -> Result<(), EncodingError> {
        let d = &self.dialect;
        lines.push(String::new());
        lines.push(d.comment(" Store metadata"));
        lines.push(d.assign(TOTAL_POINTS_VARIABLE, &total_points.to_string()));
        if let Some(marker) = kind.completion_marker() {
            lines.push(d.assign(marker, "1"));
        }
        lines.push(String::new());
        lines.push(d.comment(" Set completion flag"));
        lines.push(completion::set_statement(d));
        lines.push(d.pause(&d.string_literal("Complete")?));
        Ok(())
    }

    /// Probe, append and retract for one sample
    fn sample_block(
        &self,
        lines: &mut Vec<String>,
        encoder: &InlineJsonEncoder<'_>,
        routine: ZeroingRoutine,
        fields: &[JsonField],
        first: bool,
    ) -> Result<(), EncodingError> {
        let d: &dyn ControllerDialect = &self.dialect;
        lines.push(self.probe_statement());
        lines.extend(encoder.array_object(fields, first)?);
        lines.push(routine.clearance(d, RETRACT_VARIABLE, self.config.retract_distance));
        lines.push(d.move_z(&d.variable(RETRACT_VARIABLE)));
        Ok(())
    }

    fn register_field(&self, key: &str, axis: MachineAxis) -> JsonField {
        JsonField::new(key, self.dialect.position_register(axis))
    }

    /// Generate a serpentine surface scan program
    pub fn surface_scan(&self, params: &ScanParameters) -> ScanResult<ScanProgram> {
        self.config.validate()?;
        let plan = self.planner.surface(params)?;
        let total = plan.points.len() as u64;
        let d: &dyn ControllerDialect = &self.dialect;
        let routine = ZeroingRoutine::Surface;
        let encoder = InlineJsonEncoder::new(d, ScanKind::Surface.accumulator_variable());

        let mut lines = self.preamble(vec![
            d.comment("=== Surface Scan with JSON Storage ==="),
            d.comment(&format!(
                " Grid: {}x{} = {} points",
                plan.x_count, plan.y_count, total
            )),
            d.comment(&format!(" Spacing: {}", format_number(params.spacing))),
            d.comment(" Using &quot; for quotes and &COMPLETE for job completion"),
        ]);

        lines.push(d.comment(" === STEP 1: Z-AXIS ZEROING ==="));
        lines.extend(routine.emit(d, &self.config)?);
        lines.push(String::new());

        lines.push(d.comment(" === STEP 2: SURFACE SCANNING ==="));
        lines.push(d.comment(" Initialize JSON array"));
        lines.push(encoder.array_start()?);
        lines.push(String::new());
        lines.push(d.comment(" Setup"));
        lines.push(routine.clearance(d, SAFE_Z_VARIABLE, self.config.safe_z));
        lines.push(d.move_z(&d.variable(SAFE_Z_VARIABLE)));
        lines.push(self.speed_statement());
        lines.push(String::new());

        for point in &plan.points {
            lines.push(d.comment(&format!(" Point {} of {}", point.index, total)));
            lines.push(d.move_xy(&format_number(point.x), &format_number(point.y)));
            let fields = [
                self.register_field("x", MachineAxis::X),
                self.register_field("y", MachineAxis::Y),
                self.register_field("z", MachineAxis::Z),
                JsonField::new("i", point.index.to_string()),
            ];
            self.sample_block(&mut lines, &encoder, routine, &fields, point.index == 1)?;
            lines.push(String::new());
        }

        lines.push(d.comment(" Finalize JSON"));
        lines.push(encoder.array_end()?);
        lines.push(String::new());
        lines.push(d.comment(" Return to start"));
        lines.push(routine.clearance(d, SAFE_Z_VARIABLE, self.config.safe_z));
        lines.push(d.move_z(&d.variable(SAFE_Z_VARIABLE)));
        lines.push(d.move_xy(
            &format_number(params.start_x),
            &format_number(params.start_y),
        ));

        self.trailer(&mut lines, ScanKind::Surface, total)?;

        info!(
            "Generated surface scan program: {} points, {} lines",
            total,
            lines.len()
        );

        Ok(ScanProgram {
            kind: ScanKind::Surface,
            total_points: total,
            lines,
        })
    }

    fn rotation_block(
        &self,
        lines: &mut Vec<String>,
        params: &RotaryScanParameters,
        angle: f64,
    ) -> Result<(), EncodingError> {
        let d = &self.dialect;
        lines.push(d.comment(&format!(" === Angle: {} degrees ===", angle)));
        if params.manual_rotation {
            let prompt = format!(
                "Rotate the {}-axis to {} degrees, then press OK",
                params.rotary_axis, angle
            );
            lines.push(d.pause(&d.string_literal(&prompt)?));
        }
        // In manual mode the axis is still commanded so the reported position
        // matches the angle the operator set.
        lines.push(d.rotate(params.rotary_axis, &format_number(angle)));
        lines.push(String::new());
        Ok(())
    }

    fn rotary_point_comment(
        &self,
        params: &RotaryScanParameters,
        point: &PlannedRotaryPoint,
    ) -> String {
        self.dialect.comment(&format!(
            " Point {}: {}={}, {}={}",
            point.index,
            params.linear_axis,
            format_number(point.position),
            params.rotary_axis,
            point.angle
        ))
    }

    /// Generate an angle-major rotary scan program
    pub fn rotary_scan(&self, params: &RotaryScanParameters) -> ScanResult<ScanProgram> {
        self.config.validate()?;
        let plan = self.planner.rotary(params)?;
        let total = plan.points.len() as u64;
        let d: &dyn ControllerDialect = &self.dialect;
        let routine = ZeroingRoutine::Rotary;
        let encoder = InlineJsonEncoder::new(d, ScanKind::Rotary.accumulator_variable());

        let mut lines = self.preamble(vec![
            d.comment("=== 4D Rotary Scan with JSON Storage ==="),
            d.comment(&format!(" Rotary Axis: {}", params.rotary_axis)),
            d.comment(&format!(" Linear Axis: {}", params.linear_axis)),
            d.comment(&format!(
                " Angles: {}, Linear points: {}",
                plan.num_angles, plan.linear_count
            )),
            d.comment(&format!(" Total points: {}", total)),
            d.comment(&format!(
                " Manual rotation: {}",
                if params.manual_rotation { "YES" } else { "NO" }
            )),
            d.comment(" Using &quot; for quotes and &COMPLETE for job completion"),
        ]);

        lines.push(d.comment(" === STEP 1: Z-AXIS ZEROING ==="));
        lines.extend(routine.emit(d, &self.config)?);
        lines.push(String::new());

        lines.push(d.comment(" === STEP 2: ROTARY SCANNING ==="));
        lines.push(d.comment(" Initialize JSON array"));
        lines.push(encoder.array_start()?);
        lines.push(String::new());
        lines.push(d.comment(" Setup"));
        lines.push(routine.clearance(d, SAFE_Z_VARIABLE, self.config.safe_z));
        lines.push(d.move_z(&d.variable(SAFE_Z_VARIABLE)));
        lines.push(self.speed_statement());
        lines.push(String::new());

        for chunk in plan.points.chunks(plan.linear_count.max(1)) {
            let Some(first_of_angle) = chunk.first() else {
                continue;
            };
            self.rotation_block(&mut lines, params, first_of_angle.angle)?;

            for point in chunk {
                lines.push(self.rotary_point_comment(params, point));
                lines.push(d.move_xy(&format_number(point.x), &format_number(point.y)));
                let fields = [
                    self.register_field("x", MachineAxis::X),
                    self.register_field("y", MachineAxis::Y),
                    self.register_field("z", MachineAxis::Z),
                    self.register_field("a", MachineAxis::A),
                    self.register_field("b", MachineAxis::B),
                    JsonField::new("i", point.index.to_string()),
                ];
                self.sample_block(&mut lines, &encoder, routine, &fields, point.index == 1)?;
                lines.push(String::new());
            }
        }

        lines.push(d.comment(" Finalize JSON"));
        lines.push(encoder.array_end()?);
        lines.push(String::new());
        lines.push(d.comment(" Return to origin"));
        lines.push(routine.clearance(d, SAFE_Z_VARIABLE, self.config.safe_z));
        lines.push(d.move_z(&d.variable(SAFE_Z_VARIABLE)));
        if !params.manual_rotation {
            lines.push(d.rotate(params.rotary_axis, &format_number(0.0)));
        }
        let zero = format_number(0.0);
        lines.push(d.move_xy(&zero, &zero));

        self.trailer(&mut lines, ScanKind::Rotary, total)?;

        debug!(
            "Rotary scan along {} with {} axis rotation",
            params.linear_axis, params.rotary_axis
        );
        info!(
            "Generated rotary scan program: {} points, {} lines",
            total,
            lines.len()
        );

        Ok(ScanProgram {
            kind: ScanKind::Rotary,
            total_points: total,
            lines,
        })
    }

    /// Generate a single Z probe program
    ///
    /// Records the contact height, zeroes Z there and lifts to the safe
    /// height. No reference dimension is asked for.
    pub fn z_probe(&self) -> ScanResult<ScanProgram> {
        self.config.validate()?;
        let d: &dyn ControllerDialect = &self.dialect;
        let encoder = InlineJsonEncoder::new(d, ScanKind::ZProbe.accumulator_variable());

        let mut lines = self.preamble(vec![d.comment("=== Z-Axis Probing with JSON Storage ===")]);

        lines.push(d.comment(" Initialize JSON data - using &quot; for quotes"));
        lines.push(encoder.object_start()?);
        lines.push(String::new());
        lines.push(d.comment(" Pause for user to position probe"));
        lines.push(
            d.wait_for_key("Position the probe over the flat area to zero to, then press X")?,
        );
        lines.push(String::new());
        lines.push(d.comment(" Set probe speed"));
        lines.push(self.speed_statement());
        lines.push(String::new());
        lines.push(d.comment(" Probe down"));
        lines.push(self.probe_statement());
        lines.push(encoder.object_field(&self.register_field("probeZ", MachineAxis::Z), true)?);
        lines.push(String::new());
        lines.push(d.comment(" Zero at contact point"));
        lines.push(d.zero_z());
        lines.push(String::new());
        lines.push(d.comment(" Move to safe height"));
        lines.push(d.move_z(&format_number(self.config.safe_z)));
        lines.push(String::new());
        lines.push(d.comment(" Close JSON"));
        lines.push(encoder.object_field(&JsonField::new("complete", "1"), false)?);
        lines.push(encoder.object_end()?);

        self.trailer(&mut lines, ScanKind::ZProbe, 1)?;

        info!("Generated Z probe program, {} lines", lines.len());

        Ok(ScanProgram {
            kind: ScanKind::ZProbe,
            total_points: 1,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParameterError, ScanError};
    use probekit_core::{LinearAxis, RotaryAxis};

    fn small_surface() -> ScanParameters {
        ScanParameters {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 1.0,
            end_y: 1.0,
            spacing: 0.5,
        }
    }

    fn position_of(program: &ScanProgram, needle: &str) -> usize {
        program
            .lines
            .iter()
            .position(|l| l == needle)
            .unwrap_or_else(|| panic!("missing line {:?}", needle))
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.5), "0.5000");
        assert_eq!(format_number(-2.0), "-2.0000");
        assert_eq!(format_number(1.23456), "1.2346");
    }

    #[test]
    fn test_surface_program_blocks() {
        let program = ProgramEmitter::new(ProbeConfig::default())
            .surface_scan(&small_surface())
            .unwrap();
        assert_eq!(program.kind, ScanKind::Surface);
        assert_eq!(program.total_points, 9);

        // one probe in the zeroing block plus one per sample
        let probes = program.statements().filter(|s| s.starts_with("PZ,")).count();
        assert_eq!(probes, 10);
        let objects = program
            .statements()
            .filter(|s| *s == "&SCANDATA = &SCANDATA + \"{\"")
            .count();
        assert_eq!(objects, 9);
        let separators = program
            .statements()
            .filter(|s| *s == "&SCANDATA = &SCANDATA + \",\"")
            .count();
        assert_eq!(separators, 8);
    }

    #[test]
    fn test_surface_program_visits_serpentine_targets() {
        let program = ProgramEmitter::new(ProbeConfig::default())
            .surface_scan(&small_surface())
            .unwrap();
        let moves: Vec<&str> = program
            .statements()
            .filter(|s| s.starts_with("M2,"))
            .collect();
        assert_eq!(
            moves,
            vec![
                "M2,0.0000,0.0000",
                "M2,0.5000,0.0000",
                "M2,1.0000,0.0000",
                "M2,1.0000,0.5000",
                "M2,0.5000,0.5000",
                "M2,0.0000,0.5000",
                "M2,0.0000,1.0000",
                "M2,0.5000,1.0000",
                "M2,1.0000,1.0000",
                "M2,0.0000,0.0000",
            ]
        );
    }

    #[test]
    fn test_surface_program_ordering() {
        let program = ProgramEmitter::new(ProbeConfig::default())
            .surface_scan(&small_surface())
            .unwrap();

        let reset = position_of(&program, "&COMPLETE = 0");
        let dialog = program
            .lines
            .iter()
            .position(|l| l.starts_with("DIALOG"))
            .unwrap();
        let open = position_of(&program, "&SCANDATA = \"[\"");
        let close = position_of(&program, "&SCANDATA = &SCANDATA + \"]\"");
        let total = position_of(&program, "&TOTALPOINTS = 9");
        let marker = position_of(&program, "&SCANCOMPLETE = 1");
        let set = position_of(&program, "&COMPLETE = 1");
        let done = position_of(&program, "PAUSE \"Complete\"");

        assert!(reset < dialog);
        assert!(dialog < open);
        assert!(open < close);
        assert!(close < total);
        assert!(total < marker);
        assert!(marker < set);
        assert_eq!(done, set + 1);
        assert_eq!(done, program.lines.len() - 1);
    }

    #[test]
    fn test_sample_block_reads_registers_after_probe() {
        let program = ProgramEmitter::new(ProbeConfig::default())
            .surface_scan(&small_surface())
            .unwrap();
        let statements: Vec<&str> = program.statements().collect();
        let first_move = statements
            .iter()
            .position(|s| *s == "M2,0.0000,0.0000")
            .unwrap();
        assert_eq!(
            &statements[first_move..first_move + 9],
            &[
                "M2,0.0000,0.0000",
                "PZ,-2.0000,1.0000,7",
                "&SCANDATA = &SCANDATA + \"{\"",
                "&SCANDATA = &SCANDATA + \"&quot;x&quot;:\" + %(1)",
                "&SCANDATA = &SCANDATA + \",&quot;y&quot;:\" + %(2)",
                "&SCANDATA = &SCANDATA + \",&quot;z&quot;:\" + %(3)",
                "&SCANDATA = &SCANDATA + \",&quot;i&quot;:\" + 1",
                "&SCANDATA = &SCANDATA + \"}\"",
                "&RETRACTBACK = 0.1250 + &KNOWNHEIGHT",
            ]
        );
    }

    #[test]
    fn test_invalid_parameters_produce_no_program() {
        let emitter = ProgramEmitter::new(ProbeConfig::default());
        let params = ScanParameters {
            spacing: 0.0,
            ..small_surface()
        };
        assert!(matches!(
            emitter.surface_scan(&params),
            Err(ScanError::Parameter(ParameterError::NonPositiveSpacing(_)))
        ));

        let config = ProbeConfig {
            probe_speed: 0.0,
            ..ProbeConfig::default()
        };
        assert!(matches!(
            ProgramEmitter::new(config).surface_scan(&small_surface()),
            Err(ScanError::ProbeConfig(_))
        ));
    }

    #[test]
    fn test_rotary_program_automatic() {
        let params = RotaryScanParameters {
            start: 0.0,
            end: 1.0,
            spacing: 1.0,
            angle_step: 90.0,
            linear_axis: LinearAxis::X,
            rotary_axis: RotaryAxis::B,
            manual_rotation: false,
        };
        let program = ProgramEmitter::new(ProbeConfig::default())
            .rotary_scan(&params)
            .unwrap();
        assert_eq!(program.total_points, 8);

        let rotations: Vec<&str> = program
            .statements()
            .filter(|s| s.starts_with("MB,"))
            .collect();
        assert_eq!(
            rotations,
            vec!["MB,0.0000", "MB,90.0000", "MB,180.0000", "MB,270.0000", "MB,0.0000"]
        );
        assert!(program
            .statements()
            .any(|s| s == "&ROTARYDATA = &ROTARYDATA + \",&quot;b&quot;:\" + %(5)"));
        assert!(program.statements().any(|s| s == "&ROTARYCOMPLETE = 1"));
        assert!(program
            .statements()
            .any(|s| s == "&RETRACTBACK = 0.1250 + &CYLINDERRADIUS"));
        assert!(!program.statements().any(|s| s.starts_with("PAUSE \"Rotate")));
    }

    #[test]
    fn test_rotary_program_manual_prompts() {
        let params = RotaryScanParameters {
            start: 0.0,
            end: 2.0,
            spacing: 1.0,
            angle_step: 180.0,
            linear_axis: LinearAxis::Y,
            rotary_axis: RotaryAxis::A,
            manual_rotation: true,
        };
        let program = ProgramEmitter::new(ProbeConfig::default())
            .rotary_scan(&params)
            .unwrap();

        let prompts: Vec<&str> = program
            .statements()
            .filter(|s| s.starts_with("PAUSE \"Rotate"))
            .collect();
        assert_eq!(
            prompts,
            vec![
                "PAUSE \"Rotate the A-axis to 0 degrees, then press OK\"",
                "PAUSE \"Rotate the A-axis to 180 degrees, then press OK\"",
            ]
        );
        assert!(program.statements().any(|s| s == "M2,0.0000,2.0000"));
        // no automatic return rotation in manual mode
        let last_rotation = program
            .lines
            .iter()
            .rposition(|l| l.starts_with("MA,"))
            .unwrap();
        let close = position_of(&program, "&ROTARYDATA = &ROTARYDATA + \"]\"");
        assert!(last_rotation < close);
    }

    #[test]
    fn test_z_probe_program() {
        let program = ProgramEmitter::new(ProbeConfig::default())
            .z_probe()
            .unwrap();
        let statements: Vec<&str> = program.statements().collect();
        assert_eq!(
            statements,
            vec![
                "&SAFEZ = 0",
                "&RETRACTBACK = 0",
                "&COMPLETE = 0",
                "&PROBEDATA = \"{\"",
                "SK \"Position the probe over the flat area to zero to, then press X\"",
                "VS,1.0000,1.0000",
                "PZ,-2.0000,1.0000,7",
                "&PROBEDATA = &PROBEDATA + \"&quot;probeZ&quot;:\" + %(3)",
                "ZZ",
                "MZ,0.5000",
                "&PROBEDATA = &PROBEDATA + \",&quot;complete&quot;:\" + 1",
                "&PROBEDATA = &PROBEDATA + \"}\"",
                "&TOTALPOINTS = 1",
                "&COMPLETE = 1",
                "PAUSE \"Complete\"",
            ]
        );
    }

    #[test]
    fn test_scan_kind_parsing() {
        assert_eq!("Surface".parse::<ScanKind>().unwrap(), ScanKind::Surface);
        assert_eq!("zprobe".parse::<ScanKind>().unwrap(), ScanKind::ZProbe);
        assert!("corner".parse::<ScanKind>().is_err());
        assert_eq!(ScanKind::Rotary.accumulator_variable(), "ROTARYDATA");
    }
}
