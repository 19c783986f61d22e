//! host-control - host inventory and administrative commands
//!
//! - Reports machine vendor/model and installed video controllers
//! - Reports NVIDIA GPU display/process state via nvidia-smi
//! - Restarts the machine or a single device, and switches power plans

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use host_control::config::{self, Config};
use host_control::{
    machine_information, video_controllers, HostControl, MachineInformation, NvidiaInformation,
    VideoCardInformation,
};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::EnvFilter;

/// host-control - Query host hardware and issue administrative commands
#[derive(Parser)]
#[command(name = "host-control")]
#[command(version)]
#[command(about = "Query machine/GPU information and restart devices or switch power plans")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show machine vendor/model and installed video controllers
    Detect {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show NVIDIA GPU display and process state (requires nvidia-smi)
    Nvidia {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Restart the machine immediately
    Restart {
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },

    /// Restart a single device by its device instance id
    RestartDevice {
        /// Device instance id (e.g., "PCI\VEN_10DE&DEV_2520&...")
        device_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },

    /// Restart the first NVIDIA video controller
    RestartGpu {
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },

    /// Switch the active power plan
    PowerPlan {
        /// Power plan GUID or powercfg alias (e.g., SCHEME_MIN)
        guid: String,
    },

    /// Show configuration path and effective settings
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct InventoryReport {
    machine: MachineInformation,
    video_controllers: Vec<VideoCardInformation>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    init_tracing(&config.logging.level);

    let control = HostControl::new(config.tools.clone());

    match cli.command {
        Some(Commands::Detect { format }) => run_detect(format)?,
        None => run_detect(OutputFormat::Text)?,
        Some(Commands::Nvidia { format }) => {
            let info = control
                .nvidia_information()
                .context("Failed to query NVIDIA GPU state")?;
            match format {
                OutputFormat::Text => println!("{}", display_nvidia(&info)),
                OutputFormat::Json => print_json(&info)?,
            }
        }
        Some(Commands::Restart { yes }) => {
            if !confirm("Restart this machine now? [y/N]:", yes) {
                println!("{}", "Cancelled.".bright_yellow());
                return Ok(());
            }
            control.restart_machine()?;
            println!("{}", "Restart requested.".bright_green());
        }
        Some(Commands::RestartDevice { device_id, yes }) => {
            let prompt = format!("Restart device {device_id}? [y/N]:");
            if !confirm(&prompt, yes) {
                println!("{}", "Cancelled.".bright_yellow());
                return Ok(());
            }
            control.restart_device(&device_id)?;
            println!(
                "{} {}",
                "Device restart requested:".bright_green(),
                device_id.bright_white()
            );
        }
        Some(Commands::RestartGpu { yes }) => {
            if !confirm("Restart the NVIDIA GPU now? [y/N]:", yes) {
                println!("{}", "Cancelled.".bright_yellow());
                return Ok(());
            }
            match control.restart_nvidia_gpu()? {
                Some(card) => println!(
                    "{} {}",
                    "GPU restart requested:".bright_green(),
                    card.device_id.bright_white()
                ),
                None => println!("{}", "No NVIDIA video controller found.".bright_yellow()),
            }
        }
        Some(Commands::PowerPlan { guid }) => {
            control.set_active_power_plan(&guid)?;
            println!(
                "{} {}",
                "Power plan activated:".bright_green(),
                guid.bright_white()
            );
        }
        Some(Commands::Config) => {
            show_config_info(&config);
        }
    }

    Ok(())
}

fn run_detect(format: OutputFormat) -> Result<()> {
    let report = InventoryReport {
        machine: machine_information().context("Failed to query machine information")?,
        video_controllers: video_controllers().context("Failed to query video controllers")?,
    };

    match format {
        OutputFormat::Text => println!("{}", display_inventory(&report)),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level; logs go to stderr so JSON on stdout stays clean.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn read_line() -> String {
    let _ = io::stdout().flush();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap_or_default();
    input.trim().to_string()
}

/// Destructive commands default to "no", including when stdin is not a terminal.
fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }

    if !io::stdin().is_terminal() {
        println!(
            "{}",
            "Not an interactive terminal; pass --yes to confirm.".bright_yellow()
        );
        return false;
    }

    print!("{} ", prompt.bright_yellow());
    parse_confirmation(&read_line())
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

const WIDTH: usize = 62;

fn format_line(label: &str, content: &str) -> String {
    let content_width = WIDTH - 1;
    let label_len = label.chars().count();
    let available = content_width.saturating_sub(label_len);
    let content: String = content.chars().take(available).collect();
    format!("║ {label}{content:<available$}║\n")
}

fn display_inventory(report: &InventoryReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("╔{}╗\n", "═".repeat(WIDTH)));
    output.push_str(&format!("║{:^WIDTH$}║\n", "HOST INFORMATION"));
    output.push_str(&format!("╠{}╣\n", "═".repeat(WIDTH)));

    let machine = &report.machine;
    if machine.is_empty() {
        output.push_str(&format_line("Machine: ", "Unknown"));
    } else {
        output.push_str(&format_line("Vendor:  ", &machine.vendor));
        output.push_str(&format_line("Model:   ", &machine.model));
    }

    output.push_str(&format!("╠{}╣\n", "═".repeat(WIDTH)));

    if report.video_controllers.is_empty() {
        output.push_str(&format_line("GPU:     ", "None detected"));
    }
    for card in &report.video_controllers {
        let manufacturer = if card.is_nvidia() {
            format!("{} (NVIDIA)", card.manufacturer)
        } else {
            card.manufacturer.clone()
        };
        output.push_str(&format_line("GPU:     ", &manufacturer));
        output.push_str(&format_line("         ", &card.device_id));
    }

    output.push_str(&format!("╚{}╝", "═".repeat(WIDTH)));

    output
}

fn display_nvidia(info: &NvidiaInformation) -> String {
    let mut output = String::new();

    let display = if info.display_active {
        "Active".bright_green()
    } else {
        "Inactive".bright_black()
    };
    output.push_str(&format!("{} {}\n", "Display:".bright_cyan(), display));
    output.push_str(&format!(
        "{} {}",
        "Processes:".bright_cyan(),
        info.process_count
    ));
    for name in &info.process_names {
        output.push_str(&format!("\n  - {name}"));
    }

    output
}

fn show_config_info(cfg: &Config) {
    println!("{}", "host-control Configuration\n".bright_cyan().bold());

    match Config::config_path() {
        Ok(path) => {
            println!(
                "{} {}",
                "Config file:".bright_yellow(),
                path.display().to_string().bright_white()
            );
            if path.exists() {
                println!("  {} {}", "Status:".bright_cyan(), "Exists".bright_green());
            } else {
                println!(
                    "  {} {}",
                    "Status:".bright_cyan(),
                    "Not created yet (using defaults)".bright_yellow()
                );
            }
            println!(
                "  {} {}",
                "Override:".bright_cyan(),
                format!("set {} to use another file", config::CONFIG_PATH_ENV).bright_black()
            );
        }
        Err(e) => {
            println!(
                "{} Could not determine config path: {}",
                "Error:".bright_red(),
                e
            );
        }
    }

    println!("\n{}", "Tools:".bright_white().bold());
    for (label, value) in [
        ("shutdown:", &cfg.tools.shutdown),
        ("pnputil:", &cfg.tools.pnputil),
        ("powercfg:", &cfg.tools.powercfg),
        ("nvidia-smi:", &cfg.tools.nvidia_smi),
    ] {
        println!("  {} {}", label.bright_cyan(), value);
    }

    println!("\n{}", "Logging:".bright_white().bold());
    println!("  {} {}", "Level:".bright_cyan(), cfg.logging.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> InventoryReport {
        InventoryReport {
            machine: MachineInformation {
                vendor: "LENOVO".to_string(),
                model: "Legion 5 15ACH6H".to_string(),
            },
            video_controllers: vec![
                VideoCardInformation {
                    manufacturer: "Advanced Micro Devices, Inc.".to_string(),
                    device_id: "PCI\\VEN_1002&DEV_1638".to_string(),
                },
                VideoCardInformation {
                    manufacturer: "NVIDIA".to_string(),
                    device_id: "PCI\\VEN_10DE&DEV_2520".to_string(),
                },
            ],
        }
    }

    #[test]
    fn restart_device_requires_device_id() {
        assert!(Cli::try_parse_from(["host-control", "restart-device"]).is_err());
        assert!(Cli::try_parse_from(["host-control", "restart-device", "ACPI\\VEN_123"]).is_ok());
    }

    #[test]
    fn restart_accepts_yes_flag() {
        let cli = Cli::try_parse_from(["host-control", "restart", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Restart { yes: true })));
    }

    #[test]
    fn detect_parses_json_format() {
        let cli = Cli::try_parse_from(["host-control", "detect", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Detect {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn power_plan_requires_guid() {
        assert!(Cli::try_parse_from(["host-control", "power-plan"]).is_err());
        assert!(Cli::try_parse_from(["host-control", "power-plan", "SCHEME_MAX"]).is_ok());
    }

    #[test]
    fn confirmation_only_accepts_yes() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation("YES"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("n"));
        assert!(!parse_confirmation("sure"));
    }

    #[test]
    fn inventory_display_flags_nvidia_cards() {
        let text = display_inventory(&report());
        assert!(text.contains("LENOVO"));
        assert!(text.contains("Legion 5 15ACH6H"));
        assert!(text.contains("NVIDIA (NVIDIA)"));
        assert!(!text.contains("Advanced Micro Devices, Inc. (NVIDIA)"));
    }

    #[test]
    fn inventory_display_lines_have_equal_width() {
        let text = display_inventory(&report());
        let widths: Vec<usize> = text.lines().map(|line| line.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == WIDTH + 2), "{widths:?}");
    }

    #[test]
    fn empty_inventory_displays_placeholders() {
        let text = display_inventory(&InventoryReport {
            machine: MachineInformation::default(),
            video_controllers: Vec::new(),
        });
        assert!(text.contains("Unknown"));
        assert!(text.contains("None detected"));
    }

    #[test]
    fn inventory_report_serializes_to_json() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["machine"]["vendor"], "LENOVO");
        assert_eq!(json["video_controllers"][1]["device_id"], "PCI\\VEN_10DE&DEV_2520");
    }
}
