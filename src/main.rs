// CollectLog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. The collection run (the report file is created once discovery succeeds)

use clap::{CommandFactory, Parser};
use collectlog::app::collect::run_collection;
use collectlog::app::options::{self, RawOptions};
use collectlog::platform::config::{self, PlatformPaths};
use collectlog::platform::fs::StdOpener;
use collectlog::util;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

const EXAMPLES: &str = "\
EXAMPLES:
    collectlog --eventDate=2019-10-10 --eventTime=23:33:02
        Shallow collection from the current directory for the hour before the event

    collectlog --eventDate=2019-11-04 --eventTime=03:33:21 --directory=.;./dirA;./dirB
        Collects from each of the listed directories

    collectlog --eventDate=2019-08-12 --eventTime=09:05:44 --directory=../. --timeWindow=30[m]
        Collects from '../.' for the thirty minutes before the event

    collectlog --eventDate=2019-08-12 --eventTime=09:05:44 --directory=../. --searchDepth=deep
        Searches every file in '../.' rather than only messages.p* and TBT*";

/// CollectLog - collect log history leading up to an incident.
///
/// Scans log files for lines whose embedded timestamp falls inside the time
/// window ending at the event, writing them to the console and a report file.
#[derive(Parser, Debug)]
#[command(name = "collectlog", version, about, after_help = EXAMPLES)]
struct Cli {
    /// Date of the event.
    #[arg(long = "eventDate", value_name = "yyyy-mm-dd")]
    event_date: String,

    /// Time of the event.
    #[arg(long = "eventTime", value_name = "HH:mm:ss")]
    event_time: String,

    /// Directory to search, or a semicolon-separated list of directories
    /// [default: .]
    #[arg(long = "directory", value_name = "PATH[;PATH...]")]
    directory: Option<String>,

    /// Window before the event to collect, in minutes [m] or hours [h]
    /// [default: 1[h]]
    #[arg(long = "timeWindow", value_name = "N[m|h]")]
    time_window: Option<String>,

    /// Report file [default: CLD_<date>T<time>_<window>_<depth>.csv]
    #[arg(long = "outputFilename", value_name = "FILE")]
    output_filename: Option<String>,

    /// shallow searches messages.p* and TBT* only; deep searches every file
    /// [default: shallow]
    #[arg(long = "searchDepth", value_name = "shallow|deep")]
    search_depth: Option<String>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let (app_config, config_warnings) = match config::load_config(&config_path, explicit) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "CollectLog starting"
    );

    let raw = RawOptions {
        event_date: cli.event_date,
        event_time: cli.event_time,
        directory: cli.directory,
        time_window: cli.time_window,
        output_filename: cli.output_filename,
        search_depth: cli.search_depth,
    };

    let request = match options::resolve(&raw, &app_config) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Unable to process command line arguments!");
            eprintln!("  {e}");
            eprintln!();
            let _ = Cli::command().print_help();
            return ExitCode::from(2);
        }
    };

    let create_output = || std::fs::File::create(&request.output).map(BufWriter::new);
    match run_collection(&request, &StdOpener, std::io::stdout().lock(), create_output) {
        Ok(summary) => {
            tracing::debug!(summary = ?summary, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
