//! Cache and Memory Latency Sweep via Pointer Chasing
//!
//! Writes `Size,Runtime` CSV to stdout, one row per working-set size. Tunables come from
//! `CHASE_*` environment variables and logging goes to stderr (`RUST_LOG`, default `info`).

use chase_latency_rs::affinity::place_current_thread;
use chase_latency_rs::sweep;
use chase_latency_rs::SweepConfig;
use log::{error, info};
use std::process::ExitCode;

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SweepConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };
    config.log_summary();

    place_current_thread(config.pin_core, config.max_priority);

    match sweep::run(&config, std::io::stdout().lock()) {
        Ok(points) => {
            info!("Sweep complete, {points} points measured");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Sweep aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
