use std::{
    io::{BufWriter, stdin, stdout},
    path::PathBuf,
};

use clap::Parser;
use log::debug;

use crate::{common::error::AppError, domain::ledger::Ledger, io::shell::Shell};

/// Interactive record keeper for live and silent auctions.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Saved auction to load at startup (skips the load question)
    #[arg(short, long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// File used when a save prompt is left blank; `.json` selects the
    /// document format, anything else the two-sheet workbook
    #[arg(short, long, value_name = "FILE", default_value = "auction.csv")]
    pub output: PathBuf,

    /// Enable verbose logging (use -vv for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn from_args<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.into()).collect();
        Ok(Config::try_parse_from(args)?)
    }

    /// Default `env_logger` filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Runs one interactive session on the process's stdin/stdout.
pub fn run(config: &Config) -> Result<(), AppError> {
    debug!("config: {:?}", config);

    let stdin = stdin();
    let stdout = stdout();
    let mut shell = Shell::new(
        stdin.lock(),
        BufWriter::new(stdout.lock()),
        config.output.clone(),
    );

    let mut ledger = Ledger::new();
    shell.run(&mut ledger, config.load.as_deref())
}
