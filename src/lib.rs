pub mod util;
pub mod interpreter;


use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use crate::interpreter::error::LoxError;
use crate::interpreter::evaluator::Interpreter;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts an interactive prompt when omitted")]
    pub script: Option<PathBuf>,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

/// Runs one unit of source text. Nothing is executed if the source has a lexical or syntax error.
pub fn run(source: &str, interpreter: &mut Interpreter) -> Result<(), LoxError> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let statements = parser.parse();

    if parser.had_error() {
        return Err(LoxError::Static(parser.into_errors()));
    }

    interpreter.interpret(&statements)?;
    Ok(())
}

pub fn run_file(path: &Path, interpreter: &mut Interpreter) -> Result<(), LoxError> {
    let source = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "read script");

    run(&source, interpreter)
}

/// Reads and runs one line at a time until `input` is exhausted. Globals persist between lines;
/// errors are reported and then forgotten.
pub fn run_prompt(input: &mut impl BufRead, prompt: &mut impl Write, interpreter: &mut Interpreter) -> Result<(), std::io::Error> {
    let mut line = String::new();

    loop {
        write!(prompt, "> ")?;
        prompt.flush()?;

        line.clear();

        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        if let Err(err) = run(&line, interpreter) {
            report(&err);
        }
    }
}

/// Prints diagnostics to stderr.
pub fn report(error: &LoxError) {
    match error {
        LoxError::Static(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
        },
        LoxError::Runtime(error) => eprintln!("{}", error.report()),
        LoxError::Io(error) => eprintln!("Error: {}", error),
    }
}
