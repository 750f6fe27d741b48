//! Simulated OpenSBP controller
//!
//! Executes the statement subset generated probe programs use against a
//! [`SurfaceModel`], answering operator prompts from a script. Variables are
//! kept upper-cased and exposed the way a FabMo host exposes them, under
//! `opensbp.tempVariables` of a configuration snapshot.
//!
//! Z is tracked in machine coordinates with a work offset so that `ZZ` and
//! `VA` behave like the real commands. X, Y, A and B have no offsets.

pub mod expression;
pub mod surface;

pub use expression::{evaluate, split_arguments, Environment, ExpressionError, SbpValue};
pub use surface::{CylinderSurface, FlatSurface, SurfaceModel, TiltedSurface};

use parking_lot::RwLock;
use probekit_core::HostError;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared upper-cased variable table
pub type VariableTable = Arc<RwLock<HashMap<String, SbpValue>>>;

/// Live axis positions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MachinePosition {
    /// X
    pub x: f64,
    /// Y
    pub y: f64,
    /// Z in machine coordinates
    pub z: f64,
    /// A in degrees
    pub a: f64,
    /// B in degrees
    pub b: f64,
}

/// Scripted operator answering prompts
#[derive(Debug, Clone, Default)]
pub struct OperatorScript {
    answers: VecDeque<String>,
}

impl OperatorScript {
    /// Operator giving these dialog answers in order
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    fn answer(&mut self) -> Option<String> {
        self.answers.pop_front()
    }
}

/// Summary of one program run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Statements executed
    pub statements: usize,
    /// Probe moves that made contact
    pub probes: usize,
    /// Operator-facing messages in order of appearance
    pub prompts: Vec<String>,
}

struct Registers<'a> {
    position: &'a MachinePosition,
    z_offset: f64,
    variables: &'a HashMap<String, SbpValue>,
}

impl Environment for Registers<'_> {
    fn variable(&self, name: &str) -> Option<SbpValue> {
        self.variables.get(name).cloned()
    }

    fn register(&self, index: usize) -> Option<f64> {
        match index {
            1 => Some(self.position.x),
            2 => Some(self.position.y),
            3 => Some(self.position.z - self.z_offset),
            4 => Some(self.position.a),
            5 => Some(self.position.b),
            _ => None,
        }
    }
}

/// Interpreter for generated probe programs
pub struct SimulatedController {
    surface: Box<dyn SurfaceModel>,
    operator: OperatorScript,
    position: MachinePosition,
    z_offset: f64,
    variables: VariableTable,
}

impl SimulatedController {
    /// Controller with the probe parked at `start` above `surface`
    pub fn new(surface: impl SurfaceModel + 'static, start: MachinePosition) -> Self {
        Self {
            surface: Box::new(surface),
            operator: OperatorScript::default(),
            position: start,
            z_offset: 0.0,
            variables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Set the operator script
    pub fn with_operator(mut self, operator: OperatorScript) -> Self {
        self.operator = operator;
        self
    }

    /// Replace the operator script
    pub fn set_operator(&mut self, operator: OperatorScript) {
        self.operator = operator;
    }

    /// Handle to the variable table, readable while a program runs
    pub fn variables(&self) -> VariableTable {
        Arc::clone(&self.variables)
    }

    /// Current axis positions in machine coordinates
    pub fn position(&self) -> MachinePosition {
        self.position
    }

    /// Current work Z
    pub fn work_z(&self) -> f64 {
        self.position.z - self.z_offset
    }

    /// Value of a variable
    pub fn variable(&self, name: &str) -> Option<SbpValue> {
        self.variables.read().get(&name.to_ascii_uppercase()).cloned()
    }

    /// Host configuration snapshot of the current variables
    pub fn snapshot(&self) -> Value {
        snapshot_of(&self.variables)
    }

    /// Forget all per-job variables
    pub fn clear_variables(&self) {
        self.variables.write().clear();
    }

    /// Execute a program
    ///
    /// Per-job variables are cleared first. Execution stops at the first
    /// failing statement with [`HostError::ProgramAborted`]; whatever was
    /// assigned before stays visible in the snapshot.
    pub fn run(&mut self, program: &str) -> Result<RunReport, HostError> {
        self.clear_variables();
        let mut report = RunReport::default();

        for (number, line) in program.lines().enumerate() {
            let statement = line.trim();
            if statement.is_empty() || statement.starts_with('\'') {
                continue;
            }
            self.execute(statement, &mut report)
                .map_err(|reason| {
                    warn!("Simulation aborted at line {}: {}", number + 1, reason);
                    HostError::ProgramAborted {
                        line_number: number + 1,
                        reason,
                    }
                })?;
            report.statements += 1;
        }

        info!(
            "Simulated program finished: {} statements, {} probes",
            report.statements, report.probes
        );
        Ok(report)
    }

    fn eval(&self, expr: &str) -> Result<SbpValue, String> {
        let variables = self.variables.read();
        let env = Registers {
            position: &self.position,
            z_offset: self.z_offset,
            variables: &variables,
        };
        evaluate(expr, &env).map_err(|e| format!("{} in '{}'", e, expr))
    }

    fn number(&self, expr: &str) -> Result<f64, String> {
        self.eval(expr)?
            .as_number()
            .map_err(|e| format!("{} in '{}'", e, expr))
    }

    fn optional_number(&self, args: &[String], index: usize) -> Result<Option<f64>, String> {
        match args.get(index).map(|s| s.as_str()) {
            None | Some("") => Ok(None),
            Some(expr) => self.number(expr).map(Some),
        }
    }

    fn execute(&mut self, statement: &str, report: &mut RunReport) -> Result<(), String> {
        if let Some(assignment) = statement.strip_prefix('&') {
            return self.assign(assignment);
        }

        let split = statement
            .find(|c: char| c == ',' || c.is_whitespace())
            .unwrap_or(statement.len());
        let command = statement[..split].to_ascii_uppercase();
        let rest = statement[split..]
            .strip_prefix(',')
            .unwrap_or(&statement[split..])
            .trim();
        let args = split_arguments(rest);
        debug!("Executing {} {:?}", command, args);

        match command.as_str() {
            "M2" => {
                if let Some(x) = self.optional_number(&args, 0)? {
                    self.position.x = x;
                }
                if let Some(y) = self.optional_number(&args, 1)? {
                    self.position.y = y;
                }
            }
            "MZ" => {
                let z = self.number(rest)?;
                self.position.z = z + self.z_offset;
            }
            "MA" => self.position.a = self.number(rest)?,
            "MB" => self.position.b = self.number(rest)?,
            "VS" => {}
            "PZ" => self.probe(&args, report)?,
            "ZZ" => self.z_offset = self.position.z,
            "VA" => {
                if let Some(x) = self.optional_number(&args, 0)? {
                    self.position.x = x;
                }
                if let Some(y) = self.optional_number(&args, 1)? {
                    self.position.y = y;
                }
                if let Some(z) = self.optional_number(&args, 2)? {
                    self.z_offset = self.position.z - z;
                }
            }
            "SK" | "PAUSE" => {
                if !rest.is_empty() {
                    report.prompts.push(self.eval(rest)?.to_string());
                }
            }
            "DIALOG" => self.dialog(&args, report)?,
            other => return Err(format!("Unsupported command {}", other)),
        }
        Ok(())
    }

    fn assign(&mut self, assignment: &str) -> Result<(), String> {
        let (name, expr) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Missing '=' in assignment &{}", assignment))?;
        let name = name.trim().to_ascii_uppercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("Invalid variable name '{}'", name));
        }
        let value = self.eval(expr.trim())?;
        self.variables.write().insert(name, value);
        Ok(())
    }

    fn probe(&mut self, args: &[String], report: &mut RunReport) -> Result<(), String> {
        let depth = self
            .optional_number(args, 0)?
            .ok_or_else(|| "PZ needs a depth".to_string())?;
        let target = depth + self.z_offset;
        let p = self.position;

        match self.surface.height_at(p.x, p.y, p.a, p.b) {
            Some(surface) if surface >= target => {
                // already touching when starting below the surface
                self.position.z = surface.min(p.z);
                report.probes += 1;
                Ok(())
            }
            _ => {
                self.position.z = target;
                Err(format!(
                    "Probe found no contact before Z {:.4} at X {:.4} Y {:.4}",
                    depth, p.x, p.y
                ))
            }
        }
    }

    fn dialog(&mut self, args: &[String], report: &mut RunReport) -> Result<(), String> {
        let prompt = args
            .first()
            .ok_or_else(|| "DIALOG needs a prompt".to_string())?;
        report.prompts.push(self.eval(prompt)?.to_string());

        let target = args
            .iter()
            .skip(1)
            .filter_map(|arg| arg.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("INPUT"))
            .map(|(_, value)| value.trim().trim_matches('"').trim_start_matches('&'))
            .ok_or_else(|| "DIALOG without INPUT".to_string())?
            .to_ascii_uppercase();

        let answer = self
            .operator
            .answer()
            .ok_or_else(|| format!("No operator answer scripted for &{}", target))?;
        debug!("Operator answered &{} = {}", target, answer);
        self.variables.write().insert(target, SbpValue::Text(answer));
        Ok(())
    }
}

/// Snapshot of a variable table in FabMo configuration shape
pub fn snapshot_of(variables: &VariableTable) -> Value {
    let vars: Map<String, Value> = variables
        .read()
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    json!({ "opensbp": { "tempVariables": vars } })
}
