//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use probekit_core::{LinearAxis, RotaryAxis};
use probekit_scan::ScanKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "probekit")]
#[command(version = crate::LONG_VERSION)]
#[command(about = "Surface and rotary probing programs for OpenSBP controllers", long_about = None)]
pub struct Cli {
    /// Settings file (.json or .toml); defaults to the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a serpentine surface scan program
    Surface {
        #[command(flatten)]
        area: SurfaceArgs,

        /// Write the program here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate a rotary (cylinder) scan program
    Rotary {
        #[command(flatten)]
        sweep: RotaryArgs,

        /// Write the program here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate a single Z probe program
    Zprobe {
        /// Write the program here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Decode scan results from an exported controller configuration
    Decode {
        /// Which program produced the snapshot
        kind: ScanKind,

        /// JSON configuration snapshot
        #[arg(long)]
        snapshot: PathBuf,

        /// Export points as CSV (default name when no path is given)
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,

        /// Export points as DXF (default name when no path is given)
        #[arg(long, num_args = 0..=1)]
        dxf: Option<Option<PathBuf>>,
    },

    /// Run a scan against the simulated controller
    Simulate {
        #[command(subcommand)]
        scan: SimulateCommand,
    },

    /// Show or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Surface area overrides; missing values come from the settings
#[derive(Args, Debug, Clone, Default)]
pub struct SurfaceArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub start_x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub start_y: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub end_x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub end_y: Option<f64>,
    #[arg(long)]
    pub spacing: Option<f64>,
}

/// Rotary sweep overrides; missing values come from the settings
#[derive(Args, Debug, Clone, Default)]
pub struct RotaryArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub end: Option<f64>,
    #[arg(long)]
    pub spacing: Option<f64>,
    #[arg(long)]
    pub angle_step: Option<f64>,
    /// x or y
    #[arg(long)]
    pub linear_axis: Option<LinearAxis>,
    /// a or b
    #[arg(long)]
    pub rotary_axis: Option<RotaryAxis>,
    /// Prompt the operator to rotate by hand
    #[arg(long)]
    pub manual: bool,
}

#[derive(Subcommand, Debug)]
pub enum SimulateCommand {
    /// Scan a flat or tilted plane
    Surface {
        #[command(flatten)]
        area: SurfaceArgs,

        /// Machine Z of the plane at the origin
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        height: f64,

        /// Rise per unit of X
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        slope_x: f64,

        /// Rise per unit of Y
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        slope_y: f64,

        /// Height the operator enters for the reference surface
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        reference: f64,
    },

    /// Scan a cylinder on the rotary axis
    Rotary {
        #[command(flatten)]
        sweep: RotaryArgs,

        /// Cylinder radius, also entered by the operator
        #[arg(long, default_value_t = 1.0)]
        radius: f64,

        /// Eccentricity of the stock about the axis
        #[arg(long, default_value_t = 0.0)]
        runout: f64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Write default settings
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rotary() {
        let cli = Cli::try_parse_from([
            "probekit",
            "rotary",
            "--start",
            "-1",
            "--end",
            "4",
            "--linear-axis",
            "y",
            "--rotary-axis",
            "b",
            "--manual",
        ])
        .unwrap();
        match cli.command {
            Commands::Rotary { sweep, output } => {
                assert_eq!(sweep.start, Some(-1.0));
                assert_eq!(sweep.linear_axis, Some(LinearAxis::Y));
                assert_eq!(sweep.rotary_axis, Some(RotaryAxis::B));
                assert!(sweep.manual);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_decode_with_default_export_names() {
        let cli = Cli::try_parse_from([
            "probekit",
            "--config",
            "s.toml",
            "decode",
            "rotary",
            "--snapshot",
            "config.json",
            "--csv",
            "--dxf",
            "out.dxf",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("s.toml")));
        match cli.command {
            Commands::Decode { kind, csv, dxf, .. } => {
                assert_eq!(kind, ScanKind::Rotary);
                assert_eq!(csv, Some(None));
                assert_eq!(dxf, Some(Some(PathBuf::from("out.dxf"))));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_axis() {
        assert!(Cli::try_parse_from(["probekit", "rotary", "--rotary-axis", "c"]).is_err());
    }
}
