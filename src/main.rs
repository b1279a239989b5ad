//! Fairsplit CLI
//!
//! Reads expense lines from a file or the terminal and prints who must pay
//! whom to settle up.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- trip.txt
//! cargo run              # interactive, finish with Ctrl-D
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use fairsplit::config::usage;
use fairsplit::{Config, OutputFormat, Result, Session};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{}", e.diagnostic());
        process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "fairsplit".to_string());

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprint!("{}", usage(&program));
            return Err(e);
        }
    };

    if config.help {
        print!("{}", usage(&program));
        return Ok(());
    }

    // Keep CSV on stdout clean of prompts and line errors.
    let mut diagnostics: Box<dyn Write> = match config.format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Csv => Box::new(io::stderr()),
    };

    let mut session = Session::new(config.policy);
    match &config.input {
        Some(path) => {
            let file = File::open(path)?;
            session.read_transactions(BufReader::new(file), &mut diagnostics)?;
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            session.set_interactive(interactive);
            if interactive {
                session.write_intro(&mut diagnostics)?;
            }
            session.read_transactions(stdin.lock(), &mut diagnostics)?;
        }
    }
    diagnostics.flush()?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    session.write_report(&config, handle)?;

    Ok(())
}
