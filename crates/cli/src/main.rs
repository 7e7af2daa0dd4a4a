use clap::Parser;
use larum_cli::args::{CliArgs, LogLevel};
use larum_cli::runner;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_level);

    let engine = match runner::run(&args, Box::new(io::stdout())) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("larum: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let fault = engine.fault();
    // A fatal fault is a host configuration error, not a program result.
    if !fault.is_some_and(|fault| fault.is_fatal()) {
        print!("{}", engine.execution_state().data_stack());
    }

    match fault {
        None => ExitCode::SUCCESS,
        Some(fault) => {
            eprintln!(
                "larum: fault at pc {}: {fault}",
                engine.execution_state().pc()
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: Option<LogLevel>) {
    let env_filter = match level {
        Some(level) => EnvFilter::default()
            .add_directive(LevelFilter::from_level(tracing::Level::from(level)).into()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("error")),
    };
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}
