//! Build script for calor-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates thermostat.toml at compile time
//! - Generates the `ControllerConfig` constant the firmware boots with

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThermostatToml {
    sampling: Sampling,
    persistence: Persistence,
    overheat: Overheat,
    set_temp: Range<f64>,
    hyster_dia: Range<f64>,
    brightness: Range<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Sampling {
    temp_period_ms: i64,
    overheat_period_ms: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Persistence {
    save_delay_ms: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Overheat {
    enabled: bool,
    threshold_c: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Range<T> {
    min: T,
    max: T,
    default: T,
}

/// Validate thermostat.toml configuration at compile time
fn validate_config() -> ThermostatToml {
    // Re-run if thermostat.toml changes
    println!("cargo:rerun-if-changed=thermostat.toml");

    let config_path = Path::new("thermostat.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: thermostat.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a thermostat.toml configuration file.     ║\n\
            ║  Please create one in the calor-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read thermostat.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse TOML syntax and shape in one go
    let config: ThermostatToml = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid thermostat.toml                                  ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sampling(&config, &mut errors);
    validate_float_range("set_temp", &config.set_temp, -40.0, 125.0, &mut errors);
    validate_float_range("hyster_dia", &config.hyster_dia, 0.0, 20.0, &mut errors);
    validate_brightness(&config.brightness, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid thermostat configuration                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=thermostat.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate sample periods and the save delay
fn validate_sampling(config: &ThermostatToml, errors: &mut Vec<String>) {
    let sampling = &config.sampling;

    if sampling.temp_period_ms <= 0 || sampling.temp_period_ms > 60_000 {
        errors.push("[sampling] temp_period_ms must be 1-60000".to_string());
    }
    if sampling.overheat_period_ms <= 0 || sampling.overheat_period_ms > 60_000 {
        errors.push("[sampling] overheat_period_ms must be 1-60000".to_string());
    }
    if config.persistence.save_delay_ms < 0 || config.persistence.save_delay_ms > 600_000 {
        errors.push("[persistence] save_delay_ms must be 0-600000".to_string());
    }

    let threshold = config.overheat.threshold_c;
    if !(20.0..=150.0).contains(&threshold) {
        errors.push("[overheat] threshold_c must be 20-150".to_string());
    }
}

/// Validate a min/max/default triple against absolute limits
fn validate_float_range(
    name: &str,
    range: &Range<f64>,
    lowest: f64,
    highest: f64,
    errors: &mut Vec<String>,
) {
    if range.min < lowest || range.max > highest {
        errors.push(format!("[{}] limits must lie within {}-{}", name, lowest, highest));
    }
    if range.min > range.max {
        errors.push(format!("[{}] min must not exceed max", name));
    }
    if range.default < range.min || range.default > range.max {
        errors.push(format!("[{}] default must lie within min-max", name));
    }
}

/// Brightness maps directly onto the display's 0-7 levels
fn validate_brightness(range: &Range<i64>, errors: &mut Vec<String>) {
    if range.min < 0 || range.max > 7 {
        errors.push("[brightness] limits must lie within 0-7".to_string());
    }
    if range.min > range.max {
        errors.push("[brightness] min must not exceed max".to_string());
    }
    if range.default < range.min || range.default > range.max {
        errors.push("[brightness] default must lie within min-max".to_string());
    }
}

/// Write the validated configuration as Rust source into OUT_DIR
fn generate_config(config: &ThermostatToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let source = format!(
        "/// Controller configuration generated from thermostat.toml\n\
         pub const CONFIG: ControllerConfig = ControllerConfig {{\n\
        \x20   temp_sample_period_ms: {temp_period},\n\
        \x20   overheat_sample_period_ms: {overheat_period},\n\
        \x20   save_delay_ms: {save_delay},\n\
        \x20   overheat: OverheatConfig {{\n\
        \x20       enabled: {overheat_enabled},\n\
        \x20       threshold_c: {threshold:?},\n\
        \x20   }},\n\
        \x20   limits: Limits {{\n\
        \x20       set_temp: Bounds::new({set_min:?}, {set_max:?}),\n\
        \x20       hyster_dia: Bounds::new({hyst_min:?}, {hyst_max:?}),\n\
        \x20       brightness: Bounds::new({bright_min}, {bright_max}),\n\
        \x20   }},\n\
        \x20   defaults: DeviceState {{\n\
        \x20       screen: Screen::RoomTemp,\n\
        \x20       display_brightness: {bright_default},\n\
        \x20       hyster_dia: {hyst_default:?},\n\
        \x20       set_temp: {set_default:?},\n\
        \x20   }},\n\
         }};\n",
        temp_period = config.sampling.temp_period_ms,
        overheat_period = config.sampling.overheat_period_ms,
        save_delay = config.persistence.save_delay_ms,
        overheat_enabled = config.overheat.enabled,
        threshold = config.overheat.threshold_c as f32,
        set_min = config.set_temp.min as f32,
        set_max = config.set_temp.max as f32,
        hyst_min = config.hyster_dia.min as f32,
        hyst_max = config.hyster_dia.max as f32,
        bright_min = config.brightness.min,
        bright_max = config.brightness.max,
        bright_default = config.brightness.default,
        hyst_default = config.hyster_dia.default as f32,
        set_default = config.set_temp.default as f32,
    );

    fs::write(out_dir.join("thermostat_config.rs"), source).unwrap();
}
