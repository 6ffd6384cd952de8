//! Interactive prompt for running a pickup volleyball session.
//!
//! Reads one command per line, runs it against the rotation engine and
//! saves the state after every change.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use volley_queue::GameMode;

use vq_cli::{
    app::{App, Reply},
    commands::parse_command,
    config::CliConfig,
};

const HELP: &str = "\
Run the volleyball queue and rotation prompt

USAGE:
  vq_cli [OPTIONS]

OPTIONS:
  --data       PATH        State file  [default: env VQ_DATA_FILE or volley_queue.json]
  --mode       4v4|6v6     Default game mode  [default: env VQ_DEFAULT_MODE or saved setting]

FLAGS:
  --no-save                Don't write the state file
  -h, --help               Print help information

ENVIRONMENT:
  VQ_DATA_FILE             State file path
  VQ_DEFAULT_MODE          Default game mode (4v4 or 6v6)
  VQ_FORMATION_PRIORITY    Balancing order, e.g. priority,setter,gender
  VQ_AUTOSAVE              Save after every change (true or false)
  RUST_LOG                 Log level (default: info)
";

struct Args {
    data: Option<PathBuf>,
    mode: Option<GameMode>,
    no_save: bool,
}

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        data: pargs.opt_value_from_str("--data")?,
        mode: pargs.opt_value_from_str("--mode")?,
        no_save: pargs.contains("--no-save"),
    };

    // State is saved after every change, so exiting on a signal loses nothing.
    set_handler(|| std::process::exit(0))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = CliConfig::from_env(args.data, args.mode, args.no_save)?;
    info!("Using state file {}", config.data_file.display());
    let app = App::load(config).context("Failed to load saved state")?;

    run(app)
}

fn run(mut app: App) -> Result<()> {
    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match app.execute(command) {
            Ok(Reply::Text(text)) => println!("{}", text.trim_end()),
            Ok(Reply::Quit) => break,
            Err(err) => println!("{err}"),
        }
    }

    app.persist();
    info!("Bye");
    Ok(())
}
