//! Runs the simulation and prints the result.

use crate::args::{Args, Format, Source};
use log::{info, warn};
use std::{
    error::Error,
    ffi::OsStr,
    fs,
    io::{self, BufWriter, Write},
    path::Path,
    time::Instant,
};
use torlife_lib::{Config, Grid, History, Rule, Status};

/// Reads the initial grid from a pattern file.
///
/// Files ending with `.rle` are read as RLE, everything else as Plaintext.
fn read_pattern(path: &Path, size: Option<usize>) -> Result<Grid, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let grid = match path.extension().and_then(OsStr::to_str) {
        Some("rle") => Grid::from_rle(&text, size)?,
        _ => Grid::from_plaintext(&text, size)?,
    };
    Ok(grid)
}

fn initial_grid(source: &Source, config: &Config) -> Result<Grid, Box<dyn Error>> {
    match source {
        Source::File(path) => read_pattern(path, config.size),
        Source::Random => Ok(config.random_grid()?),
    }
}

/// Prints one generation.
///
/// The generation number and whether it equals the previous one go into a
/// comment line, so that the output stays a valid pattern file.
fn print_grid<W: Write>(
    out: &mut W,
    format: Format,
    rule: &Rule,
    gen: usize,
    grid: &Grid,
    stable: Option<bool>,
) -> io::Result<()> {
    let note = match stable {
        Some(true) => " (stable)",
        _ => "",
    };
    match format {
        Format::Rle => {
            writeln!(out, "#C Generation {}{}", gen, note)?;
            write!(out, "{}", grid.rle(rule))
        }
        _ => {
            writeln!(out, "!Generation {}{}", gen, note)?;
            write!(out, "{}", grid)
        }
    }
}

fn print_history<W: Write>(
    out: &mut W,
    format: Format,
    rule: &Rule,
    history: &History,
    last: bool,
) -> Result<(), Box<dyn Error>> {
    let gen_count = history.len();
    if format == Format::Json {
        if last {
            serde_json::to_writer_pretty(&mut *out, history.last())?;
        } else {
            serde_json::to_writer_pretty(&mut *out, history)?;
        }
        writeln!(out)?;
        return Ok(());
    }
    let start = if last { gen_count - 1 } else { 0 };
    for gen in start..gen_count {
        let stable = gen.checked_sub(1).map(|i| history.stable_flags()[i]);
        print_grid(out, format, rule, gen, &history.grids()[gen], stable)?;
    }
    Ok(())
}

/// Runs the simulation described by the arguments.
pub(crate) fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let initial = initial_grid(&args.source, &args.config)?;
    let mut simulation = args.config.simulation(initial)?;

    let status = match args.time_limit {
        Some(limit) => simulation.advance_until(Instant::now() + limit),
        None => simulation.advance(None),
    };
    let history = simulation.history();
    match status {
        Status::Finished => info!("computed {} generations", history.len()),
        Status::Paused => warn!(
            "time limit reached, computed {} of {} generations",
            history.len(),
            simulation.duration()
        ),
    }
    if let Some(gen) = history.first_stable_step() {
        info!("stable from generation {}", gen);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    print_history(&mut out, args.format, simulation.rule(), history, args.last)?;
    out.flush()?;
    Ok(())
}
