//! pchgen CLI
//!
//! Generates the precompiled umbrella header of one build module and
//! patches the module's implementation files to include it.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use pchgen_core::{Config, DryRunFileSystem, FileSystem, OsFileSystem};
use pchgen_emit::{PchMode, Pipeline, PipelineReport};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: pchgen <moduleName> <fileList.txt> [1:addPCHtoCPP]";

#[derive(Parser, Debug)]
#[command(name = "pchgen")]
#[command(author, version, about = "Precompiled header generator for C++ build modules", long_about = None)]
struct Cli {
    /// Module name, used for <MODULE>_PCH.h and its include guard
    #[arg(value_name = "MODULE")]
    module: String,

    /// Newline-delimited list of the module's headers and sources
    #[arg(value_name = "FILE_LIST")]
    file_list: PathBuf,

    /// 0 removes the generated files and include blocks, anything else adds them
    #[arg(value_name = "ENABLE")]
    enable: Option<String>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the umbrella header (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Header extension recognised in include targets (repeatable)
    #[arg(long = "header-ext", value_name = "EXT")]
    header_ext: Vec<String>,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// What the command line asks for
#[derive(Debug)]
enum Invocation {
    Run(Cli),
    /// Help or version text requested
    Info(clap::Error),
    /// Wrong arguments: print the usage line and exit normally
    Usage,
}

fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Invocation::Run(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Invocation::Info(err)
        }
        Err(err) => {
            debug!("Argument error: {}", err.kind());
            Invocation::Usage
        }
    }
}

fn main() -> Result<()> {
    let cli = match parse_args(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Info(err) => {
            err.print()?;
            return Ok(());
        }
        Invocation::Usage => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let mode = PchMode::from_flag(cli.enable.as_deref());
    debug!("Running module {} in {:?} mode", cli.module, mode);

    let report = if cli.dry_run {
        let fs = DryRunFileSystem::new(OsFileSystem);
        let report = run(&fs, &config, &cli.module, &cli.file_list, mode)?;
        for (path, written) in fs.pending_changes() {
            let verb = if written { "write" } else { "remove" };
            println!("would {} {}", verb, path.display());
        }
        report
    } else {
        run(&OsFileSystem, &config, &cli.module, &cli.file_list, mode)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output.output_dir = dir.clone();
    }
    if !cli.header_ext.is_empty() {
        config.scan.header_extensions = cli
            .header_ext
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }

    Ok(config)
}

fn run(
    fs: &dyn FileSystem,
    config: &Config,
    module: &str,
    file_list: &Path,
    mode: PchMode,
) -> Result<PipelineReport> {
    Pipeline::new(fs, config, module)
        .run(file_list, mode)
        .with_context(|| format!("Failed to process module list {}", file_list.display()))
}
