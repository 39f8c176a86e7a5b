//! Transient circuit simulator CLI.
//!
//! # Usage
//!
//! ```bash
//! simulate circuit.net -o trace.txt
//! ```
//!
//! Exit codes: 0 success, 1 file not found / parse error, 2 singular
//! system, 3 no convergence, 4 too many unknowns.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use mna_sim::circuit::{validate_circuit, Circuit};
use mna_sim::netlist;
use mna_sim::solver::Integrator;
use mna_sim::trace::write_trace;

/// Transient circuit simulator driven by Modified Nodal Analysis.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Write the trace here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> mna_sim::Result<()> {
    let parsed = netlist::parse_file(&args.netlist)?;
    let circuit = Circuit::from_parsed(parsed)?;
    validate_circuit(&circuit)?;

    let integrator = Integrator::new(circuit);
    let column_names = integrator.variable_names();
    let rows = integrator.run()?;

    write_trace(args.output.as_deref(), &column_names, &rows)
        .map_err(|source| mna_sim::SimError::FileNotFound {
            path: args
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            source,
        })?;

    Ok(())
}
