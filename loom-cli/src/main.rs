// Command-line interface for loom trees
//
// This binary converts loom trees between the formats known to loom-babel and prints
// outlines of them for inspection.
//
// Converting:
//
// A conversion needs a from and a to format. The from format is detected from the file
// name (`story.graph`, `story.flatmap.json`) and, failing that, from the shape of the JSON
// itself. An explicit --from always wins.
// Usage:
//  loom <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  loom convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  loom inspect <input> [--from <format>]                                  - Outline and summary
//  loom formats                                                            - List formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// Known keys (pretty, name, show-ids) override the configuration; anything else is
// handed to the target format, which rejects keys it does not understand.
// Example:
//  loom story.nested --to graph --extra-name "lighthouse" --extra-pretty false

mod inspect;

use clap::{Arg, ArgAction, Command, ValueHint};
use loom_babel::{transforms, FormatRegistry, LoomTree};
use loom_config::{LoomConfig, Loader};
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "formats", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key {
            let value = args.get(i + 1).filter(|next| !next.starts_with('-'));
            match value {
                Some(value) => {
                    extra_params.insert(key.to_string(), value.clone());
                    i += 2;
                }
                None => {
                    extra_params.insert(key.to_string(), "true".to_string());
                    i += 1;
                }
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("loom")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and inspect loom trees")
        .long_about(
            "loom converts trees of generated text between the JSON formats used by\n\
            different loom tools, and prints outlines of them.\n\n\
            Formats:\n  \
            - nested:  {root: {id, text, children}} (.nested)\n  \
            - flatmap: {nodes: {id: {text, parentId, ...}}} (.flatmap)\n  \
            - graph:   {nodes: [...], edges: [...]} (.graph)\n  \
            - treeviz: text outline, output only (.tree)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            loom story.nested --to graph               # Convert (outputs to stdout)\n  \
            loom story.json --to flatmap -o out.json   # Format sniffed from content\n  \
            loom inspect story.graph --extra-show-ids  # Outline with node ids",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a loom.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Increase log verbosity (-d info, -dd debug, -ddd trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between loom tree formats (default command)")
                .long_about(
                    "Convert a loom tree between formats.\n\n\
                    The source format is detected from the file name, then from the\n\
                    content. Output goes to stdout by default, or use -o to write a file.\n\n\
                    Examples:\n  \
                    loom convert story.nested --to graph            # Nested to graph (stdout)\n  \
                    loom convert a.json --from graph --to nested    # Explicit source format\n  \
                    loom story.flatmap --to treeviz                 # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an outline and summary of a loom tree")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(Command::new("formats").about("List the available formats"))
}

/// Re-parse with `convert` injected when the first argument looks like a file.
fn parse_matches(cli: Command, args: &[String]) -> clap::ArgMatches {
    match cli.clone().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            let looks_like_file = args
                .get(1)
                .is_some_and(|first| !first.starts_with('-') && !SUBCOMMANDS.contains(&first.as_str()));
            if !looks_like_file {
                e.exit();
            }

            let mut new_args = vec![args[0].clone(), "convert".to_string()];
            new_args.extend_from_slice(&args[1..]);
            cli.try_get_matches_from(&new_args)
                .unwrap_or_else(|e2| e2.exit())
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);
    let matches = parse_matches(build_cli(), &cleaned_args);

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    setup_logging(matches.get_count("debug"), &config.log.level);
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required_arg(sub_matches, "input");
            let to = required_arg(sub_matches, "to");
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, from, to, output, &extra_params, &config);
        }
        Some(("inspect", sub_matches)) => {
            let input = required_arg(sub_matches, "input");
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            handle_inspect_command(input, from, &extra_params, &config);
        }
        Some(("formats", _)) => handle_formats_command(),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(1);
        })
}

/// Install a stderr subscriber.
///
/// `-d` flags win, then `RUST_LOG`, then `log.level` from the configuration.
fn setup_logging(verbosity: u8, configured_level: &str) {
    let filter = match verbosity {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    };

    let env_filter = match filter {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = LevelFilter::from_str(configured_level).unwrap_or_else(|_| {
                eprintln!("Invalid log level '{configured_level}' in configuration, using warn");
                LevelFilter::WARN
            });
            EnvFilter::default().add_directive(level.into())
        }),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();

    if verbosity > 0 {
        info!(verbosity, "debug logging enabled");
    }
}

/// Read and parse the input, detecting its format when `from` is not given.
fn read_tree(registry: &FormatRegistry, input: &str, from: Option<&str>) -> (String, LoomTree) {
    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let (format, tree) =
        transforms::parse_any(registry, &source, from, Some(input)).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            if from.is_none() {
                eprintln!("Please specify --from explicitly");
            }
            std::process::exit(1);
        });
    debug!(input, format = %format, nodes = tree.node_count(), "read input");
    (format, tree)
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: Option<&str>,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &LoomConfig,
) {
    let registry = FormatRegistry::default();

    // Fail on an unknown target before reading anything.
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let (_, tree) = read_tree(&registry, input, from);

    let mut format_options = config.format_options(to);
    for (key, value) in extra_params {
        format_options.insert(key.clone(), value.clone());
    }

    let text = registry
        .serialize_with_options(&tree, to, &format_options)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            info!(path, format = to, "wrote output");
        }
        None if text.ends_with('\n') => print!("{text}"),
        None => println!("{text}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    input: &str,
    from: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &LoomConfig,
) {
    let registry = FormatRegistry::default();
    let (format, tree) = read_tree(&registry, input, from);

    let mut params = config.format_options("treeviz");
    for (key, value) in extra_params {
        params.insert(key.clone(), value.clone());
    }

    let report = inspect::render_report(&tree, &format, &params).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    print!("{report}");
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
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
        let extensions: Vec<String> = format
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!(
            "  {name:<10} {:<12} {:<18} {}",
            capabilities.join(", "),
            extensions.join(" "),
            format.description()
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> LoomConfig {
    let loader = Loader::new().with_optional_file("loom.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move the extras that name configuration keys into the configuration.
fn apply_config_overrides(config: &mut LoomConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("pretty") {
        config.convert.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(name) = take_override(extra_params, &["name", "graph-name"]) {
        config.convert.graph.name = name;
    }
    if let Some(raw) = take_override(extra_params, &["show-ids", "ids"]) {
        config.inspect.show_ids = parse_bool_arg("show-ids", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
