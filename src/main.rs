use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wgsl_directives::{Constant, Options, Preprocessor, PreprocessorConfig};

#[derive(Parser)]
#[command(name = "wgslpp")]
#[command(about = "Flatten #import trees and evaluate #if / #(constant) directives in WGSL shaders")]
struct Cli {
    /// Top-level shader file
    input: PathBuf,

    /// JSON file with "conditions" and "constants" maps
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON file with engine limits ("max_import_depth", "max_line_length")
    #[arg(long)]
    config: Option<PathBuf>,

    /// Set a condition: NAME, NAME=true or NAME=false
    #[arg(short = 'D', value_name = "NAME[=BOOL]")]
    define: Vec<String>,

    /// Set a constant: NAME=VALUE
    #[arg(short = 'C', value_name = "NAME=VALUE")]
    constant: Vec<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_condition(arg: &str) -> Result<(String, bool), String> {
    match arg.split_once('=') {
        None => Ok((arg.to_string(), true)),
        Some((name, value)) => value
            .parse::<bool>()
            .map(|v| (name.to_string(), v))
            .map_err(|_| format!("invalid condition value in '{}'", arg)),
    }
}

fn parse_constant(arg: &str) -> Result<(String, Constant), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let value = match value.parse::<Constant>() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    Ok((name.to_string(), value))
}

fn build_options(cli: &Cli) -> Result<Options, String> {
    let mut options = match &cli.options {
        Some(path) => Options::load_from_file(path)
            .map_err(|e| format!("Error loading options {}: {}", path.display(), e))?,
        None => Options::new(),
    };
    for arg in &cli.define {
        let (name, value) = parse_condition(arg)?;
        options.conditions.insert(name, value);
    }
    for arg in &cli.constant {
        let (name, value) = parse_constant(arg)?;
        options.constants.insert(name, value);
    }
    Ok(options)
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = build_options(cli)?;
    let config = match &cli.config {
        Some(path) => PreprocessorConfig::load_from_file(path)
            .map_err(|e| format!("Error loading config {}: {}", path.display(), e))?,
        None => PreprocessorConfig::default(),
    };

    let mut preprocessor = Preprocessor::new().with_config(config);
    let output = preprocessor
        .process(&cli.input, &options)
        .map_err(|e| e.to_string())?;

    match &cli.output {
        Some(path) => fs::write(path, output)
            .map_err(|e| format!("Error writing {}: {}", path.display(), e))?,
        None => print!("{}", output),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("wgslpp: {}", e);
            ExitCode::FAILURE
        }
    }
}
