//! Memory Allocation Simulator Binary Entry Point
//!
//! `allocate -f <file> -m <strategy> -q <quantum>`
//!
//! Prints the execution trace followed by the performance summary on stdout.
//! Diagnostics are controlled with `RUST_LOG` and go to stderr.

use std::io::{self, BufWriter};
use std::process;

use clap::Parser;
use frameworks_simulator_init::{run, SimulatorArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = SimulatorArgs::parse();
    log::debug!("arguments: {:?}", args);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Err(e) = run(&args, &mut out) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
