//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report::DEFAULT_OUTPUT_FOLDER;
use crate::web::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(
    name = "profkit",
    about = "Text profiles and GC statistics for the current process",
    after_help = "\
EXAMPLES:
    profkit gc                               One-line GC statistics
    profkit --detailed threads               One line per thread
    profkit symbol 0x55d0c0a41234            Resolve an address
    profkit report --output ./generated      Write every profile to files
    profkit serve --port 7777                Serve profiles over HTTP"
)]
pub struct Args {
    /// Print one line per item with raw and human-readable values
    #[arg(short, long, global = true)]
    pub detailed: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Garbage collection statistics
    Gc,
    /// Thread dump
    Threads,
    /// Number of OS threads
    ThreadCreate,
    /// Live heap counters
    Heap,
    /// Cumulative allocation counters
    Allocs,
    /// Resolve addresses of this process to function names
    Symbol {
        /// Addresses (0x hex or decimal)
        #[arg(value_name = "ADDR", required = true)]
        addrs: Vec<String>,
    },
    /// Write every profile to files
    Report {
        /// Output folder
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FOLDER)]
        output: PathBuf,
    },
    /// Serve profiles over HTTP
    Serve {
        /// Listening port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Output folder for /report
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FOLDER)]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["profkit", "threads", "--detailed"]).unwrap();
        assert!(args.detailed);
        assert_eq!(args.command, Command::Threads);
    }

    #[test]
    fn test_serve_defaults() {
        let args = Args::try_parse_from(["profkit", "serve"]).unwrap();
        assert_eq!(
            args.command,
            Command::Serve { port: DEFAULT_PORT, output: PathBuf::from(DEFAULT_OUTPUT_FOLDER) }
        );
    }

    #[test]
    fn test_symbol_requires_address() {
        assert!(Args::try_parse_from(["profkit", "symbol"]).is_err());
        let args = Args::try_parse_from(["profkit", "symbol", "0x10", "0x20"]).unwrap();
        assert_eq!(args.command, Command::Symbol { addrs: vec!["0x10".into(), "0x20".into()] });
    }
}
