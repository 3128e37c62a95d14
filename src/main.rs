//! droid-utils - CLI entry point.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use std::process::ExitCode;

use droid_utils::adb::DeviceStatusReader;
use droid_utils::config::{Config, example_config};
use droid_utils::exec::{ElevatedRunner, SystemRunner};
use droid_utils::hub::{PortPowerCycler, TopologyReader};
use droid_utils::logging::{init_logging, level_for};
use droid_utils::recover::RecoveryController;

#[derive(Parser)]
#[command(name = "droid-utils")]
#[command(about = "Android device fleet helper")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: auto-detect)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Power-cycle the hub ports of unauthorized devices
    Recover {
        /// Show which ports would be cycled without touching them
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List attached devices and their authorization state
    Devices,

    /// Show which hub port each attached device is on
    Ports,

    /// Print example config file
    InitConfig,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Handled before config loading so they work on a broken config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "droid-utils", &mut std::io::stdout());
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::InitConfig) => {
            print!("{}", example_config());
            return Ok(ExitCode::SUCCESS);
        }
        None => {
            Cli::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_logging(level_for(cli.verbose, &config.logging.level));

    let system = SystemRunner;
    let elevated = ElevatedRunner::new(&system, config.uhubctl.elevate.clone());

    match cli.command {
        Some(Commands::Recover { dry_run, json }) => {
            let controller = RecoveryController::new(
                DeviceStatusReader::new(&system, config.adb.path.as_str()),
                TopologyReader::new(&elevated, config.uhubctl.path.as_str()),
                PortPowerCycler::new(&elevated, config.uhubctl.path.as_str()),
            )
            .dry_run(dry_run);

            let report = controller
                .run()
                .map_err(|e| anyhow::anyhow!("recovery aborted ({}): {}", e.class(), e))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }

            if report.needs_attention() {
                return Ok(ExitCode::from(2));
            }
        }
        Some(Commands::Devices) => {
            let reader = DeviceStatusReader::new(&system, config.adb.path.as_str());
            let devices = reader.list_devices().context("reading device list")?;
            if devices.is_empty() {
                println!("No devices attached.");
            }
            for device in devices {
                println!("{:<24} {}", device.serial.as_str(), device.state);
            }
        }
        Some(Commands::Ports) => {
            let reader = TopologyReader::new(&elevated, config.uhubctl.path.as_str());
            let topology = reader.read().context("reading hub report")?;
            println!(
                "{} hub(s), {} device(s)",
                topology.hubs().len(),
                topology.serial_count()
            );
            for (serial, ports) in topology.iter() {
                for port in ports {
                    println!("  {} -> {}", serial, port);
                }
            }
        }
        Some(Commands::InitConfig) | Some(Commands::Completions { .. }) | None => {
            // Handled above before loading config
            unreachable!()
        }
    }

    Ok(ExitCode::SUCCESS)
}
