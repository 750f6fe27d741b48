//! Command implementations
//!
//! Each command writes its report to the given writer; `main` passes stdout.
//! Logging goes to stderr so programs can be piped.

use crate::cli::{Commands, ConfigCommand, RotaryArgs, SimulateCommand, SurfaceArgs};
use anyhow::{bail, Context, Result};
use chrono::Local;
use probekit_core::{MeasurementSystem, RotarySamplePoint, SamplePoint};
use probekit_host::{
    ControllerHost, CylinderSurface, MachinePosition, OperatorScript, ScanController,
    SimulatedController, SimulatedHost, SnapshotFileHost, SurfaceModel, TiltedSurface,
};
use probekit_scan::{
    decode_rotary, decode_surface, decode_z_probe, default_file_name, save_csv, save_dxf,
    ExportRecord, ProgramEmitter, Retrieval, RotaryScanParameters, ScanKind, ScanParameters,
    ScanPlanner, ScanProgram, ScanSession, ScanStatistics,
};
use probekit_settings::{Config, SettingsFormat, SettingsPersistence};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const SIMULATION_POLL: Duration = Duration::from_millis(20);
const SIMULATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Load settings from `path`, or from the platform default location
pub fn load_settings(path: Option<&Path>) -> Result<SettingsPersistence> {
    let settings = match path {
        Some(path) => SettingsPersistence::load_or_default(path),
        None => SettingsPersistence::load_default(),
    }
    .context("Failed to load settings")?;
    Ok(settings)
}

/// Run one parsed command
pub async fn run<W: Write>(
    command: Commands,
    settings: &SettingsPersistence,
    out: &mut W,
) -> Result<()> {
    let config = settings.config();
    match command {
        Commands::Surface { area, output } => {
            let program = emitter(config).surface_scan(&surface_params(config, &area))?;
            write_program(&program, output.as_deref(), out)
        }
        Commands::Rotary { sweep, output } => {
            let program = emitter(config).rotary_scan(&rotary_params(config, &sweep))?;
            write_program(&program, output.as_deref(), out)
        }
        Commands::Zprobe { output } => {
            let program = emitter(config).z_probe()?;
            write_program(&program, output.as_deref(), out)
        }
        Commands::Decode {
            kind,
            snapshot,
            csv,
            dxf,
        } => {
            let exports = Exports {
                csv: csv.map(|path| path.unwrap_or_else(|| default_export(kind, "csv"))),
                dxf: dxf.map(|path| path.unwrap_or_else(|| default_export(kind, "dxf"))),
                units: config.probe.units,
            };
            decode(kind, &snapshot, &exports, out).await
        }
        Commands::Simulate { scan } => simulate(config, scan, out).await,
        Commands::Config { action } => config_command(settings, action, out),
    }
}

fn emitter(config: &Config) -> ProgramEmitter {
    ProgramEmitter::new(config.probe.clone())
        .with_planner(ScanPlanner::with_max_points(config.max_points))
}

/// Surface area from settings with command-line overrides applied
pub fn surface_params(config: &Config, args: &SurfaceArgs) -> ScanParameters {
    let defaults = &config.surface;
    ScanParameters {
        start_x: args.start_x.unwrap_or(defaults.start_x),
        start_y: args.start_y.unwrap_or(defaults.start_y),
        end_x: args.end_x.unwrap_or(defaults.end_x),
        end_y: args.end_y.unwrap_or(defaults.end_y),
        spacing: args.spacing.unwrap_or(defaults.spacing),
    }
}

/// Rotary sweep from settings with command-line overrides applied
pub fn rotary_params(config: &Config, args: &RotaryArgs) -> RotaryScanParameters {
    let defaults = &config.rotary;
    RotaryScanParameters {
        start: args.start.unwrap_or(defaults.start),
        end: args.end.unwrap_or(defaults.end),
        spacing: args.spacing.unwrap_or(defaults.spacing),
        angle_step: args.angle_step.unwrap_or(defaults.angle_step),
        linear_axis: args.linear_axis.unwrap_or(defaults.linear_axis),
        rotary_axis: args.rotary_axis.unwrap_or(defaults.rotary_axis),
        manual_rotation: args.manual || defaults.manual_rotation,
    }
}

fn write_program<W: Write>(
    program: &ScanProgram,
    output: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, program.text())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Wrote {} program ({} points) to {}",
                program.kind,
                program.total_points,
                path.display()
            );
        }
        None => out.write_all(program.text().as_bytes())?,
    }
    Ok(())
}

fn default_export(kind: ScanKind, extension: &str) -> PathBuf {
    PathBuf::from(default_file_name(kind, Local::now().date_naive(), extension))
}

struct Exports {
    csv: Option<PathBuf>,
    dxf: Option<PathBuf>,
    units: MeasurementSystem,
}

impl Exports {
    fn write<P: ExportRecord>(&self, points: &[P], out: &mut impl Write) -> Result<()> {
        if let Some(path) = &self.csv {
            save_csv(path, points, self.units)?;
            writeln!(out, "CSV written to {}", path.display())?;
        }
        if let Some(path) = &self.dxf {
            save_dxf(path, points)?;
            writeln!(out, "DXF written to {}", path.display())?;
        }
        Ok(())
    }
}

async fn decode<W: Write>(
    kind: ScanKind,
    snapshot: &Path,
    exports: &Exports,
    out: &mut W,
) -> Result<()> {
    let host = SnapshotFileHost::new(snapshot.with_extension("sbp"), snapshot);
    let snapshot = host.config_snapshot().await?;

    match kind {
        ScanKind::Surface => {
            let points = ready(decode_surface(&snapshot)?)?;
            report_points(kind, &points, out)?;
            exports.write(&points, out)
        }
        ScanKind::Rotary => {
            let points = ready(decode_rotary(&snapshot)?)?;
            report_points(kind, &points, out)?;
            exports.write(&points, out)
        }
        ScanKind::ZProbe => {
            let reading = ready(decode_z_probe(&snapshot)?)?;
            writeln!(out, "Probe Z: {:.4}", reading.probe_z)?;
            writeln!(out, "Complete: {}", if reading.complete { "yes" } else { "no" })?;
            Ok(())
        }
    }
}

fn ready<T>(retrieval: Retrieval<T>) -> Result<T> {
    match retrieval {
        Retrieval::Ready(value) => Ok(value),
        Retrieval::NotReady => bail!("Scan has not completed yet; no data to decode"),
        Retrieval::Malformed { reason, .. } => bail!("Scan data is malformed: {}", reason),
    }
}

fn report_points<P: ExportRecord + Clone, W: Write>(
    kind: ScanKind,
    points: &[P],
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Retrieved {} {} points", points.len(), kind)?;
    let mut session = ScanSession::new();
    session.complete(points.to_vec());
    if let Some(stats) = session.statistics() {
        write_statistics(&stats, out)?;
    }
    Ok(())
}

fn write_statistics<W: Write>(stats: &ScanStatistics, out: &mut W) -> Result<()> {
    writeln!(out, "Points: {}", stats.count)?;
    writeln!(out, "Z min: {:.4}", stats.min_z)?;
    writeln!(out, "Z max: {:.4}", stats.max_z)?;
    writeln!(out, "Z mean: {:.4}", stats.mean_z)?;
    writeln!(out, "Z range: {:.4}", stats.range_z)?;
    if let Some(duration) = stats.duration {
        writeln!(out, "Duration: {} ms", duration.num_milliseconds())?;
    }
    Ok(())
}

fn simulated_host(surface: impl SurfaceModel + 'static, answer: f64) -> SimulatedHost {
    let controller = SimulatedController::new(
        surface,
        MachinePosition {
            z: 1.0,
            ..Default::default()
        },
    )
    .with_operator(OperatorScript::with_answers([answer.to_string()]));
    SimulatedHost::new(controller)
}

async fn simulate<W: Write>(config: &Config, scan: SimulateCommand, out: &mut W) -> Result<()> {
    match scan {
        SimulateCommand::Surface {
            area,
            height,
            slope_x,
            slope_y,
            reference,
        } => {
            let program = emitter(config).surface_scan(&surface_params(config, &area))?;
            let surface = TiltedSurface {
                height,
                slope_x,
                slope_y,
            };
            let controller = ScanController::new(simulated_host(surface, reference));
            let mut session: ScanSession<SamplePoint> = ScanSession::new();
            run_simulation(&controller, &program, &mut session).await?;
            let retrieval = controller.retrieve_surface(&mut session).await?;
            finish_simulation(program.kind, retrieval, &session, out)
        }
        SimulateCommand::Rotary {
            sweep,
            radius,
            runout,
        } => {
            let program = emitter(config).rotary_scan(&rotary_params(config, &sweep))?;
            // axis placed so the top of the stock sits at machine Z 0
            let surface = CylinderSurface {
                axis_height: -radius,
                radius,
                runout,
            };
            let controller = ScanController::new(simulated_host(surface, radius));
            let mut session: ScanSession<RotarySamplePoint> = ScanSession::new();
            run_simulation(&controller, &program, &mut session).await?;
            let retrieval = controller.retrieve_rotary(&mut session).await?;
            finish_simulation(program.kind, retrieval, &session, out)
        }
    }
}

async fn run_simulation<P>(
    controller: &ScanController<SimulatedHost>,
    program: &ScanProgram,
    session: &mut ScanSession<P>,
) -> Result<()> {
    controller.submit(program, session).await?;
    controller.host().join().await?;

    // a failed run never sets the flag, so report why it stopped
    if let Some(Err(e)) = controller.host().last_run() {
        controller.abandon();
        return Err(e).context("Simulated program did not complete");
    }
    controller
        .wait_for_completion(SIMULATION_POLL, SIMULATION_TIMEOUT)
        .await?;
    Ok(())
}

fn finish_simulation<P: ExportRecord, W: Write>(
    kind: ScanKind,
    retrieval: Retrieval<usize>,
    session: &ScanSession<P>,
    out: &mut W,
) -> Result<()> {
    ready(retrieval)?;
    writeln!(out, "Simulated {} scan", kind)?;
    if let Some(stats) = session.statistics() {
        write_statistics(&stats, out)?;
    }
    Ok(())
}

fn config_command<W: Write>(
    settings: &SettingsPersistence,
    action: ConfigCommand,
    out: &mut W,
) -> Result<()> {
    match action {
        ConfigCommand::Show => {
            let format = SettingsFormat::from_path(settings.path()).unwrap_or(SettingsFormat::Json);
            writeln!(out, "# {}", settings.path().display())?;
            out.write_all(settings.config().to_string_as(format)?.as_bytes())?;
            writeln!(out)?;
        }
        ConfigCommand::Init { force } => {
            if SettingsPersistence::init(settings.path(), force)? {
                writeln!(out, "Wrote default settings to {}", settings.path().display())?;
            } else {
                writeln!(
                    out,
                    "Settings already exist at {} (use --force to replace)",
                    settings.path().display()
                )?;
            }
        }
    }
    Ok(())
}
