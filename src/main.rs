//! # cmm
//!
//! The `cmm` binary: wires `SourceManager` -> `Lexer` -> `Parser` ->
//! `Interpreter` and dispatches on the CLI mode flags (spec §6.2).

mod cli;

use std::fs;
use std::process::ExitCode;

use cli::Cli;
use cmm::evaluator::Interpreter;
use cmm::lexer::Lexer;
use cmm::natives::NativeTable;
use cmm::parser;
use cmm::source::{DiagnosticMode, SourceManager};

fn main() -> ExitCode {
    let args = Cli::init();

    let level = if args.debug {
        log::Level::Debug
    } else {
        (&args.verbosity).into()
    };
    simple_logger::init_with_level(level).ok();

    if args.echo_file {
        match fs::read_to_string(&args.file) {
            Ok(contents) => {
                print!("{contents}");
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                eprintln!("cmm: could not open '{}': {err}", args.file.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let mut manager = SourceManager::load(&args.file, DiagnosticMode::Instant);

    if args.lex_only {
        let mut lexer = Lexer::new(&mut manager);
        loop {
            let token = lexer.lex();
            let is_eof = token.is_eof();
            println!("{token:?}");
            if is_eof {
                break;
            }
        }
        return ExitCode::SUCCESS;
    }

    let program = {
        let lexer = Lexer::new(&mut manager);
        match parser::parse(lexer) {
            Ok(program) => program,
            Err(_) => {
                // The diagnostic was already raised (instant mode) at the
                // point of failure; nothing left to print here.
                return ExitCode::FAILURE;
            }
        }
    };
    manager.flush_diagnostics();

    if args.parse_only || args.debug {
        match serde_json::to_string_pretty(&program) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to render AST: {err}"),
        }
        if args.parse_only {
            return ExitCode::SUCCESS;
        }
    }

    let natives = NativeTable::new();
    let mut interpreter = Interpreter::new(&program, &natives);
    match interpreter.run(args.program_args) {
        Ok(code) => ExitCode::from(code.rem_euclid(256) as u8),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
