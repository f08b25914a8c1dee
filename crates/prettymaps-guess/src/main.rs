use clap::Parser;
use futures::prelude::*;
use prettymaps_guess::{tracing_err, Args};
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if dotenvy::dotenv().is_err() {
        eprintln!("Dotenv config was not found, ignoring this...")
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(prettymaps_guess::parse_error_exit_code(&err));
        }
    };

    let logging_task = match prettymaps_guess::init_logging(args.verbose) {
        Ok(task) => task,
        Err(err) => {
            eprintln!("Failed to initialize logging: {err:?}");
            return ExitCode::FAILURE;
        }
    };

    info!(?args, "Starting...");

    let exit_code = AssertUnwindSafe(async {
        let result = try_main(&args).await;

        result.map(|()| ExitCode::SUCCESS).unwrap_or_else(|err| {
            error!(
                err = tracing_err(&err),
                err_id = err.id(),
                "Exitting with an error..."
            );
            ExitCode::FAILURE
        })
    })
    .catch_unwind()
    .unwrap_or_else(|_| {
        error!("Exitting due to a panic...");
        ExitCode::FAILURE
    })
    .await;

    logging_task.shutdown().await;

    exit_code
}

async fn try_main(args: &Args) -> prettymaps_guess::Result {
    prettymaps_guess::run(args).await
}
