//! DeepaIO - Hardware abstraction daemon for addressable LED strips
//!
//! Startup sequence:
//!
//! 1. Parse the pattern name and its arguments from the command line
//! 2. Load configuration (TOML) and initialize logging
//! 3. Supervise the controller process: probe port 7890, launch the
//!    platform fcserver binary only if nothing is listening
//! 4. Build the requested animation through the validating factory
//! 5. Stream frames over TCP until the pattern finishes (static) or a
//!    shutdown signal arrives (dynamic)

use deepa_io::animation::{self, PatternArgs};
use deepa_io::config::Config;
use deepa_io::error::{Error, Result};
use deepa_io::opc::OpcClient;
use deepa_io::presets::{JsonPresetStore, PresetStore};
use deepa_io::supervisor::ControllerSupervisor;
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "/etc/deepaio.toml";

struct CliArgs {
    config_path: String,
    pattern: String,
    color: Option<String>,
    colors: Option<Vec<String>>,
    color_preset: Option<String>,
    list_preset: Option<String>,
    speed: Option<f64>,
}

fn usage() -> String {
    let names = animation::pattern_names().join(", ");
    format!(
        "Usage: deepa-io <pattern> [options]\n\
         \n\
         Patterns: {}\n\
         \n\
         Options:\n\
         \x20 -c, --config <path>        config file (default {})\n\
         \x20     --color <#RRGGBB>      single color (solid_color)\n\
         \x20     --colors <a,b,c>       comma-separated color list\n\
         \x20     --color-preset <name>  named color from the preset assets\n\
         \x20     --list-preset <name>   named color list from the preset assets\n\
         \x20     --speed <fps>          tick rate override for moving patterns",
        names, DEFAULT_CONFIG_PATH
    )
}

/// Parse command line arguments.
///
/// Supports `deepa-io <pattern> [--flag value]...`; the pattern name is the
/// only positional argument.
fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = env::args().collect();

    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut pattern: Option<String> = None;
    let mut color = None;
    let mut colors = None;
    let mut color_preset = None;
    let mut list_preset = None;
    let mut speed = None;

    fn flag_value(args: &[String], i: usize) -> Result<String> {
        if i + 1 >= args.len() {
            return Err(Error::Validation(format!("{} requires a value", args[i])));
        }
        Ok(args[i + 1].clone())
    }

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--config" | "-c" => {
                config_path = flag_value(&args, i)?;
                i += 2;
            }
            "--color" => {
                color = Some(flag_value(&args, i)?);
                i += 2;
            }
            "--colors" => {
                let value = flag_value(&args, i)?;
                colors = Some(value.split(',').map(|s| s.trim().to_string()).collect());
                i += 2;
            }
            "--color-preset" => {
                color_preset = Some(flag_value(&args, i)?);
                i += 2;
            }
            "--list-preset" => {
                list_preset = Some(flag_value(&args, i)?);
                i += 2;
            }
            "--speed" => {
                let value = flag_value(&args, i)?;
                let parsed = value.parse::<f64>().map_err(|_| {
                    Error::Validation(format!(
                        "expected a numeric tick rate, received '{}'",
                        value
                    ))
                })?;
                speed = Some(parsed);
                i += 2;
            }
            _ if !arg.starts_with('-') && pattern.is_none() => {
                pattern = Some(arg.to_string());
                i += 1;
            }
            _ => {
                return Err(Error::Validation(format!("unrecognized argument '{}'", arg)));
            }
        }
    }

    let pattern = pattern.ok_or_else(|| Error::Validation(usage()))?;

    Ok(CliArgs {
        config_path,
        pattern,
        color,
        colors,
        color_preset,
        list_preset,
        speed,
    })
}

/// Load the preset assets named in the config. Missing files just mean an
/// empty store; a present-but-broken file is surfaced.
fn load_presets(config: &Config) -> Result<JsonPresetStore> {
    let colors_path = Path::new(&config.assets.colors);
    let lists_path = Path::new(&config.assets.color_lists);

    if !colors_path.exists() && !lists_path.exists() {
        log::debug!("No preset assets found; named presets unavailable");
        return Ok(JsonPresetStore::empty());
    }

    let colors_json = if colors_path.exists() {
        fs::read_to_string(colors_path)?
    } else {
        "{}".to_string()
    };
    let lists_json = if lists_path.exists() {
        fs::read_to_string(lists_path)?
    } else {
        "{}".to_string()
    };
    JsonPresetStore::from_json(&colors_json, &lists_json)
}

fn run() -> Result<()> {
    let cli = parse_args()?;

    // Load configuration, falling back to built-in defaults when the file
    // is absent.
    let config = if Path::new(&cli.config_path).exists() {
        Config::load(&cli.config_path)?
    } else {
        Config::defaults()
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("DeepaIO v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Controller: {}:{}, strip: {} LEDs",
        config.controller.host,
        config.controller.port,
        config.strip.led_count
    );

    // Resolve named presets into plain hex strings before the factory
    // sees them.
    let store = load_presets(&config)?;
    let mut args = PatternArgs {
        color: cli.color,
        colors: cli.colors,
        speed: cli.speed,
    };
    if let Some(name) = &cli.color_preset {
        let hex = store
            .get_color(name)
            .ok_or_else(|| Error::Validation(format!("unknown color preset '{}'", name)))?;
        args.color = Some(hex.to_string());
    }
    if let Some(name) = &cli.list_preset {
        let list = store
            .get_color_list(name)
            .ok_or_else(|| Error::Validation(format!("unknown color list preset '{}'", name)))?;
        args.colors = Some(list.to_vec());
    }

    // Validate everything up front; nothing past this point fails on
    // malformed input.
    let mut anim = animation::build(&cli.pattern, config.strip.led_count, &args)?;

    // Make sure a controller is listening before any frame is sent.
    let mut supervisor =
        ControllerSupervisor::new(&config.controller.bin_dir, config.controller.port);
    supervisor.start()?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let mut client = OpcClient::new(&config.controller.host, config.controller.port);
    log::info!("Running pattern '{}'", cli.pattern);

    let result = anim.run(&mut client, &running);

    // Explicit stop on the normal path; Drop covers the rest.
    supervisor.stop();
    log::info!("DeepaIO stopped");
    result
}

fn main() {
    if let Err(e) = run() {
        // Logging may not be initialized yet when argument or config
        // parsing fails.
        eprintln!("{}", e);
        process::exit(1);
    }
}
