//! Command-line interface for proof-flow documents
//! This binary converts and inspects Coq, CoqMD and Lean proof documents.
//!
//! Usage:
//!   proofflow convert `<path>` [--to `<format>`] [--from `<format>`]  - Convert between dialects
//!   proofflow inspect `<path>` [--format `<format>`] [--show-ranges] - Print the area tree
//!   proofflow ranges `<path>` [--json]                             - Print every area's range
//!   proofflow extract `<snapshot>` --dialect `<format>`            - Serialize an editor snapshot
//!   proofflow formats                                            - List available formats
//!
//! Every command accepts `--config <file>` (layered over the built-in defaults) and `-v`.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use commands::CliError;
use proofflow_config::{Loader, ProofFlowConfig};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("proofflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting proof-flow documents")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v debug, -vv trace); RUST_LOG takes precedence"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a document to another dialect")
                .arg(Arg::new("path").help("Path to the document").required(true))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Target format (default: output.default_format)"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .help("Source format (default: chosen by file extension)"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the area tree of a document")
                .arg(Arg::new("path").help("Path to the document").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Output format")
                        .default_value("treeviz"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .help("Source format (default: chosen by file extension)"),
                )
                .arg(
                    Arg::new("show-ranges")
                        .long("show-ranges")
                        .action(ArgAction::SetTrue)
                        .help("Prefix every area with its range (treeviz only)"),
                ),
        )
        .subcommand(
            Command::new("ranges")
                .about("Print the range of every area in the serialized document")
                .arg(Arg::new("path").help("Path to the document").required(true))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .help("Source format (default: chosen by file extension)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the table as JSON"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Rebuild a document from an editor snapshot (JSON) and serialize it")
                .arg(
                    Arg::new("snapshot")
                        .help("Path to the snapshot")
                        .required(true),
                )
                .arg(
                    Arg::new("dialect")
                        .long("dialect")
                        .short('d')
                        .help("Dialect to serialize in (default: output.default_format)"),
                ),
        )
        .subcommand(Command::new("formats").about("List available formats"))
}

fn load_config(matches: &ArgMatches) -> Result<ProofFlowConfig, CliError> {
    let loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    Ok(loader.build()?)
}

fn init_logging(config: &ProofFlowConfig, verbosity: u8) {
    let level = match verbosity {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn opt<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}

fn path<'a>(matches: &'a ArgMatches, name: &str) -> &'a Path {
    Path::new(opt(matches, name).unwrap_or_default())
}

fn run(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    init_logging(&config, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("convert", sub)) => commands::convert(
            &config,
            path(sub, "path"),
            opt(sub, "from"),
            opt(sub, "to"),
        ),
        Some(("inspect", sub)) => commands::inspect(
            &config,
            path(sub, "path"),
            opt(sub, "from"),
            opt(sub, "format").unwrap_or("treeviz"),
            sub.get_flag("show-ranges"),
        ),
        Some(("ranges", sub)) => commands::ranges(
            &config,
            path(sub, "path"),
            opt(sub, "from"),
            sub.get_flag("json"),
        ),
        Some(("extract", sub)) => commands::extract(
            &config,
            path(sub, "snapshot"),
            opt(sub, "dialect"),
        ),
        Some(("formats", _)) => Ok(commands::formats()),
        _ => Err(CliError::Usage("unknown command".to_string())),
    }
}

fn main() {
    let matches = build_cli().get_matches();
    match run(&matches) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}
