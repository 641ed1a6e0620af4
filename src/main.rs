use std::process::ExitCode;

use clap::Parser;
use rxcal_lib::cli::{self, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match cli::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Calibration failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
