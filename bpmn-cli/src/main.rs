// Command-line interface for bpmn
//
// This binary converts loose BPMN files into the canonical Camunda dialect and lets you look at
// how an input was understood.
//
// The core capabilities use the bpmn-babel crate. This crate is only the shell around it: argument
// parsing, configuration, logging setup and reporting.
//
// Converting:
//
// Every argument is a file or a directory. Directories are expanded to the .bpmn files directly
// inside them, skipping earlier outputs. Each converted file is written next to its input as
// <stem>_camunda.bpmn. A failing input is reported and the remaining ones are still converted.
// Usage:
//  bpmn <paths>...                       - Convert files and directories (default)
//  bpmn convert <paths>... [--suffix S]  - Same as above (explicit)
//  bpmn inspect <path>                   - Dump the extracted model and layout as JSON
//  bpmn --list-formats                   - List available formats
//
// Extra Parameters:
//
// Serializer parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format.
// Example:
//  bpmn diagrams/ --extra-margin 50 --extra-exporter-version 5.43.0

use bpmn_babel::formats::bpmn::SerializeOptions;
use bpmn_babel::publish::{collect_inputs, publish_file, PublishError};
use bpmn_babel::FormatRegistry;
use bpmn_config::{BpmnConfig, ConfigError, Loader};
use clap::{Arg, ArgAction, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PROJECT_CONFIG: &str = "bpmn.toml";

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports:
/// - `--extra-<key> <value>` (explicit value; negative numbers count as values)
/// - `--extra-<key>=<value>` (inline value, may start with `-`)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            if let Some((key, value)) = key.split_once('=') {
                extra_params.insert(key.to_string(), value.to_string());
                i += 1;
                continue;
            }

            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-') || next.parse::<f64>().is_ok());

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("bpmn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert loose BPMN XML into Camunda-ready BPMN")
        .long_about(
            "bpmn reads BPMN files written by arbitrary tools and rewrites them in the\n\
            canonical dialect Camunda Modeler and Camunda 8 expect.\n\n\
            Commands:\n  \
            - convert: Convert files and directories (default command)\n  \
            - inspect: Show how a file was understood, as JSON\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> <value> to pass serializer options\n  \
            (margin, exporter, exporter-version, platform, platform-version).\n\n\
            Examples:\n  \
            bpmn order.bpmn                         # Writes order_camunda.bpmn\n  \
            bpmn diagrams/                          # Every .bpmn file in diagrams/\n  \
            bpmn order.bpmn --extra-margin 40       # Tighter margin\n  \
            bpmn inspect order.bpmn                 # Extracted model as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a bpmn.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert BPMN files to the Camunda dialect (default command)")
                .long_about(
                    "Convert BPMN files to the canonical Camunda dialect.\n\n\
                    Each argument is a file or a directory. Directories are expanded to\n\
                    the .bpmn files directly inside them, leaving out earlier outputs.\n\
                    Outputs are written next to their input, inputs are never modified.\n\n\
                    Examples:\n  \
                    bpmn convert a.bpmn b.bpmn           # Writes a_camunda.bpmn, b_camunda.bpmn\n  \
                    bpmn convert diagrams/ --suffix _c8  # Writes <name>_c8.bpmn files\n  \
                    bpmn a.bpmn                          # 'convert' is optional",
                )
                .arg(
                    Arg::new("paths")
                        .help("Files or directories to convert")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("suffix")
                        .long("suffix")
                        .value_name("SUFFIX")
                        .help("Suffix appended to the input name (defaults to _camunda)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the extracted model and reconciled layout as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the BPMN file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if should_inject_convert(&cleaned_args) {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let suffix = match matches.subcommand() {
        Some(("convert", sub_matches)) => sub_matches.get_one::<String>("suffix"),
        _ => None,
    };
    let explicit_config = matches.get_one::<String>("config").map(|s| s.as_str());
    let config = load_cli_config(explicit_config, suffix.map(|s| s.as_str()));
    init_logging(&config.logging.level);
    debug!(
        project = Path::new(PROJECT_CONFIG).is_file(),
        explicit = ?explicit_config,
        suffix = %config.output.suffix,
        "configuration loaded"
    );
    debug!(?extra_params, "extra parameters");

    let options = SerializeOptions::from(&config.convert)
        .with_params(&extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let paths: Vec<PathBuf> = sub_matches
                .get_many::<String>("paths")
                .into_iter()
                .flatten()
                .map(PathBuf::from)
                .collect();
            if !handle_convert_command(&paths, options, &config) {
                std::process::exit(1);
            }
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                eprintln!("Error: inspect needs a path");
                std::process::exit(1);
            };
            handle_inspect_command(path, &options);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Whether a failed parse looks like paths given without the `convert` subcommand.
fn should_inject_convert(args: &[String]) -> bool {
    args.len() > 1
        && !args[1].starts_with('-')
        && !matches!(args[1].as_str(), "convert" | "inspect" | "help")
}

/// Converts every input, reporting each outcome. Returns false if any input failed.
fn handle_convert_command(
    paths: &[PathBuf],
    options: SerializeOptions,
    config: &BpmnConfig,
) -> bool {
    let mut spec = config.publish_spec();
    spec.options = options;

    let inputs = collect_inputs(
        paths,
        &config.discover.extension,
        &config.discover.converted_marker,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    debug!(count = inputs.len(), "resolved inputs");
    if inputs.is_empty() {
        eprintln!("No .{} files found", config.discover.extension);
        return true;
    }

    let mut failed = 0;
    for input in &inputs {
        match publish_file(input, &spec) {
            Ok(output) => println!("✓ {} -> {}", input.display(), output.display()),
            Err(err) => {
                failed += 1;
                eprintln!("Error converting {}: {}", input.display(), failure_detail(&err));
            }
        }
    }

    if inputs.len() > 1 {
        println!("{} of {} files converted", inputs.len() - failed, inputs.len());
    }
    failed == 0
}

fn failure_detail(err: &PublishError) -> String {
    match err {
        PublishError::Conversion(failure) => format!("{} ({})", failure.reason, failure.kind),
        other => other.to_string(),
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, options: &SerializeOptions) {
    let registry = FormatRegistry::default();
    let from = registry
        .detect_format_from_filename(path)
        .unwrap_or_else(|| "bpmn".to_string());

    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let doc = registry.parse(&source, &from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let mut params = HashMap::new();
    params.insert("margin".to_string(), options.margin.to_string());
    match registry.serialize_with_options(&doc, "json", &params) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let mut capabilities = Vec::new();
        if format.supports_parsing() {
            capabilities.push("read");
        }
        if format.supports_serialization() {
            capabilities.push("write");
        }
        println!(
            "  {name:<6} [{}] {}",
            capabilities.join(", "),
            format.description()
        );
    }
}

/// Defaults, then `bpmn.toml` if present, then `--config`, then `--suffix`.
fn load_cli_config(explicit_path: Option<&str>, suffix: Option<&str>) -> BpmnConfig {
    config_loader(explicit_path, suffix)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

fn config_loader(
    explicit_path: Option<&str>,
    suffix: Option<&str>,
) -> Result<Loader, ConfigError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    if let Some(path) = explicit_path {
        loader = loader.with_file(path);
    }
    match suffix {
        Some(suffix) => loader.set_override("output.suffix", suffix),
        None => Ok(loader),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
