use clap::Parser;
use clap::error::ErrorKind;
use std::backtrace::Backtrace;
use std::process::ExitCode;

use sofle_flash::cli::{self, Cli};
use sofle_flash::errors::FlashError;
use sofle_flash::utils::logging::init_cli_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    if let Err(e) = init_cli_logging(cli.verbose, cli.quiet) {
        eprintln!("⚠️  Failed to initialize logging: {}", e);
    }
    install_panic_exit_hook();

    let result = tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => Err(FlashError::Interrupted.into()),
        result = cli::run(cli) => result,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Report panics with a backtrace and exit 1 like any other fatal error
fn install_panic_exit_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        previous(info);
        eprintln!("{}", Backtrace::force_capture());
        std::process::exit(1);
    }));
}

fn report_error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("{}", cli::error_report(err));
}
