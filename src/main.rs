//! Falling-block stacker
//!
//! Reads lines of drop instructions such as `I0,I4,Q8`, plays each line on a
//! 10-column grid where completed rows disappear, and prints the resulting
//! stack height, one line of output per line of input.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stacker::visualization::{format_catalog, format_grid};
use stacker::{Catalog, ErrorPolicy, Simulation};

/// Drops tetromino pieces into a 10-column grid and reports the stack height.
#[derive(Parser)]
#[command(name = "stacker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Play every input line and print the final stack heights.
    Run(RunArgs),
    /// Print the shape of every known piece.
    Shapes,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Input file with one run per line (defaults to stdin).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file for the heights (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print each input line and the resulting grid to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// What to do with a token that cannot be placed.
    #[arg(long, value_enum, default_value_t = OnError::Halt)]
    on_error: OnError,

    /// Carry the grid over from one line to the next instead of starting
    /// each line on an empty grid.
    #[arg(long)]
    keep_grid: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnError {
    Halt,
    Skip,
}

impl From<OnError> for ErrorPolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Halt => ErrorPolicy::Halt,
            OnError::Skip => ErrorPolicy::Skip,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Run(args)) => run(&args),
        Some(Command::Shapes) => {
            print!("{}", format_catalog(Catalog::standard_ref()));
            Ok(())
        }
        None => run(&cli.run),
    }
}

/// Plays every input line and writes one height per line.
fn run(args: &RunArgs) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("couldn't open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("couldn't create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let policy = ErrorPolicy::from(args.on_error);
    let mut simulation = Simulation::standard();
    tracing::info!(keep_grid = args.keep_grid, ?policy, "starting run");

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("couldn't read line {line_number}"))?;
        if !args.keep_grid {
            simulation.reset();
        }

        let report = match simulation.run_line(&line, policy) {
            Ok(report) => report,
            Err(err) => {
                writer.flush()?;
                bail!("line {line_number}: {err}");
            }
        };
        tracing::info!(
            line = line_number,
            placed = report.placed,
            skipped = report.skipped,
            cleared = report.rows_cleared,
            height = report.height,
            "line done"
        );

        writeln!(writer, "{}", report.height).context("couldn't write height")?;
        if args.verbose {
            eprintln!("{}", line.trim_end());
            eprint!("{}", format_grid(simulation.grid()));
        }
    }

    writer.flush().context("couldn't flush output")?;
    Ok(())
}
