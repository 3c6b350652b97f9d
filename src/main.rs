use std::process::ExitCode;
use clap::Parser as ClapParser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use lox_lang::Config;
use lox_lang::interpreter::evaluator::Interpreter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let config: Config = Config::parse();
    init_tracing(config.verbose);

    let mut interpreter = Interpreter::new();

    match config.script {
        Some(path) => match lox_lang::run_file(&path, &mut interpreter) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                lox_lang::report(&err);
                ExitCode::from(err.exit_code())
            },
        },
        None => {
            let stdin = std::io::stdin();

            match lox_lang::run_prompt(&mut stdin.lock(), &mut std::io::stdout(), &mut interpreter) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    ExitCode::from(74)
                },
            }
        },
    }
}
