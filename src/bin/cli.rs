use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use provider_normalize::prelude::*;
use serde_json::Value;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pncli")]
#[command(version, about = "Provider record CLI - Normalize provider verification records into canonical JSON", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML); defaults to the user config directory
    #[arg(long, global = true, env = "PVN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform one raw record into a canonical record
    Transform(TransformArgs),
    /// Print only the profile metadata of a record
    Summary(SummaryArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct TransformArgs {
    /// Raw record JSON file, or "-" for stdin
    input: PathBuf,
    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct SummaryArgs {
    /// Raw record JSON file, or "-" for stdin
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<NormalizeError>() {
            Some(normalize_err) => eprintln!("Error: {}", normalize_err.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

/// Route `tracing` events to stderr; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => NormalizeConfig::from_file(path)?,
        None => NormalizeConfig::load(),
    };

    match cli.command {
        Commands::Transform(args) => cmd_transform(args, &config),
        Commands::Summary(args) => cmd_summary(args, &config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_input(input: &Path) -> Result<serde_json::Value> {
    if input == Path::new("-") {
        read_record(io::stdin().lock())
    } else {
        load_record(input)
    }
}

fn cmd_transform(args: TransformArgs, config: &NormalizeConfig) -> anyhow::Result<()> {
    let raw = load_input(&args.input)?;
    let record = Normalizer::with_config(config).transform(&raw)?;

    let exporter = JsonExporter::from_config(config).with_pretty_print(config.pretty_print && !args.compact);
    match &args.output {
        Some(path) => {
            exporter.export(&record, path)?;
            tracing::info!(output = %path.display(), "wrote canonical record");
        }
        None => exporter
            .write(&record, io::stdout().lock())
            .context("Failed to write canonical record to stdout")?,
    }
    Ok(())
}

/// Strings print bare; `null` and missing values print as "(none)"
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(none)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn cmd_summary(args: SummaryArgs, config: &NormalizeConfig) -> anyhow::Result<()> {
    let raw = load_input(&args.input)?;
    let record = Normalizer::with_config(config).transform(&raw)?;
    let meta = &record.profile_metadata;

    let show = |values: &[Value]| {
        values
            .iter()
            .map(|v| display_value(Some(v)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("NPI:            {}", display_value(meta.npi.as_ref()));
    println!(
        "Provider type:  {} ({})",
        display_value(meta.provider_type_label.as_ref()),
        meta.provider_type_code.as_deref().unwrap_or("")
    );
    println!("Board action:   {}", if meta.has_board_action { "yes" } else { "no" });
    println!("States:         {}", meta.states.join(", "));
    println!("Categories:     {}", show(meta.categories.as_slice()));
    println!("Issuers:        {}", show(meta.issuers.as_slice()));
    println!("Licenses:       {}", record.licenses.len());
    Ok(())
}
