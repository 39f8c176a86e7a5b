//! Trace writer (C7): emits the tabular solution trace, one header row plus
//! one data row per accepted step recorded by the [`crate::solver::Integrator`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::solver::StepRecord;

/// Write the trace to `path`, or to stdout if `path` is `None`.
pub fn write_trace(
    path: Option<&Path>,
    column_names: &[String],
    rows: &[StepRecord],
) -> io::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_to(BufWriter::new(file), column_names, rows)
        }
        None => write_to(io::stdout().lock(), column_names, rows),
    }
}

fn write_to<W: Write>(mut out: W, column_names: &[String], rows: &[StepRecord]) -> io::Result<()> {
    write!(out, "time")?;
    for name in column_names {
        write!(out, " {name}")?;
    }
    writeln!(out)?;

    for row in rows {
        write!(out, "{}", row.time)?;
        for value in &row.values {
            write!(out, " {value}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
