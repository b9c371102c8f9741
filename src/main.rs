//! miniterm
//!
//! A minimalist terminal.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use miniterm::cli::{CliArgs, Invocation};
use miniterm::{settings, App};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("option parsing failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.version {
        println!("miniterm {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let invocation = match Invocation::from_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("miniterm: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config_path = args.config.clone().or_else(settings::default_config_path);

    log::debug!("starting miniterm");

    let app = App::new(invocation, config_path);
    if let Err(e) = app.register_signals() {
        log::warn!("failed to register signal handlers: {}", e);
    }

    match app.run() {
        Ok(status) => {
            log::debug!("miniterm exited with status {}", status);
            ExitCode::from(u8::try_from(status).unwrap_or(1))
        }
        Err(e) => {
            log::error!("fatal error: {}", e);
            eprintln!("miniterm: {}", e);
            ExitCode::FAILURE
        }
    }
}
