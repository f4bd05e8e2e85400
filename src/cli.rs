//! CLI definitions and command routing.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{LineError, RecordError};
use crate::parse::{HandleSet, Input, Set};
use crate::record::Record;
use crate::storage::{DefaultStorage, Storage};

#[derive(Parser)]
#[command(name = "hostsfile")]
#[command(about = "Check, query and dump hosts files")]
pub struct Cli {
    /// TOML config with default files and parser settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report lines that fail to parse; exits non-zero if there are any
    Check {
        /// Only print the summary
        #[arg(long)]
        quiet: bool,
        files: Vec<PathBuf>,
    },

    /// Look up names or addresses across hosts files
    Lookup {
        #[command(subcommand)]
        cmd: LookupCmd,
    },

    /// Print every valid record in canonical form
    Dump { files: Vec<PathBuf> },
}

#[derive(Subcommand)]
pub enum LookupCmd {
    /// Print the addresses of a hostname
    Name { name: String, files: Vec<PathBuf> },
    /// Print the hostnames of an address
    Addr { addr: IpAddr, files: Vec<PathBuf> },
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { quiet, files } => cmd_check(&config, files, quiet),
        Commands::Lookup { cmd } => cmd_lookup(&config, cmd),
        Commands::Dump { files } => cmd_dump(&config, files),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "hostsfile=warn",
        1 => "hostsfile=debug",
        _ => "hostsfile=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_all(files: &[PathBuf]) -> Result<Vec<Input<std::fs::File>>> {
    files
        .iter()
        .map(|p| Input::open(p).with_context(|| format!("opening {}", p.display())))
        .collect()
}

/// Counts records and prints invalid lines as `source:line N: error`.
struct Report {
    quiet: bool,
    valid: usize,
    invalid: usize,
    blank: usize,
}

impl Set for Report {
    fn add(&mut self, _rec: Record) {
        self.valid += 1;
    }
}

impl HandleSet for Report {
    fn handle_invalid(&mut self, source: Option<&str>, line: &[u8], err: LineError) {
        // Blank and comment lines are normal in hosts files.
        if err.source == RecordError::EmptyLine {
            self.blank += 1;
            return;
        }
        self.invalid += 1;
        if !self.quiet {
            println!("{}:{err}", source.unwrap_or("-"));
            println!("\t{}", String::from_utf8_lossy(line));
        }
    }
}

fn cmd_check(config: &Config, files: Vec<PathBuf>, quiet: bool) -> Result<()> {
    let files = config.files_or(files)?;
    let parser = config.parser();
    let mut total_invalid = 0;

    for (path, input) in files.iter().zip(open_all(&files)?) {
        let mut report = Report {
            quiet,
            valid: 0,
            invalid: 0,
            blank: 0,
        };
        parser
            .parse_handled(input, &mut report)
            .with_context(|| format!("checking {}", path.display()))?;
        println!(
            "{}: {} records, {} invalid lines",
            path.display(),
            report.valid,
            report.invalid
        );
        debug!(path = %path.display(), blank = report.blank, "checked");
        total_invalid += report.invalid;
    }

    if total_invalid > 0 {
        anyhow::bail!("{total_invalid} invalid lines");
    }
    Ok(())
}

fn cmd_lookup(config: &Config, cmd: LookupCmd) -> Result<()> {
    match cmd {
        LookupCmd::Name { name, files } => {
            let storage = build_storage(config, files)?;
            let addrs = storage.by_name(&name);
            if addrs.is_empty() {
                anyhow::bail!("no addresses for {name}");
            }
            for addr in addrs {
                println!("{addr}");
            }
            Ok(())
        }
        LookupCmd::Addr { addr, files } => {
            let storage = build_storage(config, files)?;
            let names = storage.by_addr(addr);
            if names.is_empty() {
                anyhow::bail!("no hostnames for {addr}");
            }
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn build_storage(config: &Config, files: Vec<PathBuf>) -> Result<DefaultStorage> {
    let files = config.files_or(files)?;
    let inputs = open_all(&files)?;
    DefaultStorage::with_parser(config.parser(), inputs).context("building hosts index")
}

fn cmd_dump(config: &Config, files: Vec<PathBuf>) -> Result<()> {
    let files = config.files_or(files)?;
    let parser = config.parser();
    let mut print = |rec: Record| println!("{rec}");

    for (path, input) in files.iter().zip(open_all(&files)?) {
        match parser.parse(input, &mut print) {
            Ok(()) => {}
            Err(e) if !e.is_read_error() => {
                debug!(
                    path = %path.display(),
                    skipped = e.line_errors().len(),
                    "dumped with invalid lines"
                );
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
    Ok(())
}
