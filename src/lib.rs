//! Library surface for the `cmm` binary and its integration test suite.

pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod natives;
pub mod parser;
pub mod source;
pub mod value;

use std::io::Write;

use evaluator::Interpreter;
use lexer::Lexer;
use natives::NativeTable;
use source::{DiagnosticMode, SourceManager};

/// Run a CMM program end to end: parse `source`, then interpret it with
/// `program_args` passed through to `main`. Returns the process exit code.
///
/// `src/main.rs` builds the same pipeline by hand instead of calling this
/// directly, since the CLI also needs to splice in `-l`/`-p`/`-d` dumps
/// between stages; this is the plain embedding entry point for callers
/// (and tests) that just want a result.
pub fn run_source(name: &str, source: &str, program_args: Vec<String>) -> i32 {
    let mut manager = SourceManager::from_bytes(name.to_string(), source.as_bytes().to_vec(), DiagnosticMode::Instant);
    let program = {
        let lexer = Lexer::new(&mut manager);
        match parser::parse(lexer) {
            Ok(program) => program,
            Err(err) => {
                eprintln!("{err}");
                return 1;
            }
        }
    };
    manager.flush_diagnostics();

    let natives = NativeTable::new();
    let mut interpreter = Interpreter::new(&program, &natives);
    match interpreter.run(program_args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            let _ = std::io::stderr().flush();
            1
        }
    }
}
