//! # Cli
//!
//! Command-line front-end for `cmm` (spec §6.2). Flag parsing, mode
//! selection and usage text are an external collaborator to the
//! interpreter core (spec §1), kept in their own module the way the
//! teacher keeps `src/bin/why/cli.rs` separate from the compiler proper.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tree-walking interpreter for the CMM language")]
pub struct Cli {
    /// Path to the .cmm source file to run.
    pub file: PathBuf,

    /// Dump the token stream and exit without parsing.
    #[arg(short = 'l', long = "lex")]
    pub lex_only: bool,

    /// Dump the parsed AST and exit without evaluating.
    #[arg(short = 'p', long = "parse")]
    pub parse_only: bool,

    /// Dump the parsed AST, then interpret as usual.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Echo the source file to standard output and exit.
    #[arg(short = 'f', long = "file")]
    pub echo_file: bool,

    /// Log verbosity.
    #[arg(value_enum, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,

    /// Arguments passed through to the program's `main` as a string array
    /// (spec §6.2, §4.7).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub program_args: Vec<String>,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Mirrors the teacher's `LogLevel` (`src/bin/why/cli.rs`): only `-d/--debug`
/// normally needs anything past `Error`, so that stays the default.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
