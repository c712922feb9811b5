//! evaedn CLI entry point.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use evaedn::reader::Grammar;
use evaedn::{EVA_EDN_MIME_TYPE, Reader, ReaderConfig};
use tracing_subscriber::EnvFilter;

/// What to do with the parsed input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Command {
    /// Print the canonical serialization.
    #[default]
    Fmt,
    /// Only validate.
    Check,
}

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    command: Command,
    file: Option<PathBuf>,
    strict: bool,
    format: Option<String>,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut command = None;
    let mut input_named = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--strict" => config.strict = true,
            "--format" => {
                i += 1;
                if i >= args.len() {
                    return Err("--format requires a value".into());
                }
                config.format = Some(args[i].clone());
            }
            arg if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unknown option: {arg}").into());
            }
            "fmt" if command.is_none() => command = Some(Command::Fmt),
            "check" if command.is_none() => command = Some(Command::Check),
            path if !input_named => {
                // A leading file name selects the default command.
                if command.is_none() {
                    command = Some(Command::default());
                }
                input_named = true;
                if path != "-" {
                    config.file = Some(PathBuf::from(path));
                }
            }
            extra => return Err(format!("unexpected argument: {extra}").into()),
        }
        i += 1;
    }

    config.command = command.unwrap_or_default();
    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("evaedn {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let source = match &config.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let reader_config = if config.strict {
        ReaderConfig::strict()
    } else {
        ReaderConfig::default()
    };
    let reader = Reader::with_config(Grammar::with_defaults()?, reader_config);

    let element = reader.parse(&source)?;
    tracing::debug!(element_type = %element.element_type(), "input parsed");

    match config.command {
        Command::Fmt => {
            let format = config.format.as_deref().unwrap_or(EVA_EDN_MIME_TYPE);
            println!("{}", element.serialize(format)?);
        }
        Command::Check => {}
    }
    Ok(())
}

fn print_help() {
    println!(
        "evaedn - Reader and writer for the eva notation

USAGE:
    evaedn [COMMAND] [OPTIONS] [FILE]

COMMANDS:
    fmt      Parse the input and print its canonical form (default)
    check    Parse the input and report errors only

ARGUMENTS:
    [FILE]   File to read; stdin when omitted or '-'

OPTIONS:
    -h, --help          Print help information
    -V, --version       Print version information
    --strict            Apply the strict reader limits
    --format MIME       Output format for fmt (default {EVA_EDN_MIME_TYPE})

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=evaedn_reader=trace

EXAMPLES:
    evaedn data.edn
    evaedn fmt --format application/vnd.eva+edn data.edn
    echo '{{:a 1}}' | evaedn check"
    );
}
