use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error};
use simple_logger::SimpleLogger;

use kway_merge::config::{Options, clamp_count, parse_count};
use kway_merge::display::DEFAULT_WIDTH;
use kway_merge::{Result, demo};

/// Create k sorted rows of n random integers and merge them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of rows (k). Prompted for when omitted.
    #[arg(short = 'k', long = "rows", allow_negative_numbers = true)]
    rows: Option<i64>,

    /// Values per row (n). Prompted for when omitted.
    #[arg(short = 'n', long = "len", allow_negative_numbers = true)]
    len: Option<i64>,

    /// Smallest generated value.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    min: i64,

    /// Largest generated value.
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    max: i64,

    /// Seed for reproducible rows.
    #[arg(long)]
    seed: Option<u64>,

    /// Field width for printed values.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Write rows as run files into this directory and merge from disk.
    #[arg(long)]
    spill_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialize logger: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    if args.rows.is_none() || args.len.is_none() {
        writeln!(
            out,
            "We're going to create k sorted arrays each containing n integers \
             between {} and {} (inclusive)\n",
            args.min, args.max
        )?;
    }
    let k = match args.rows {
        Some(k) => clamp_count(k),
        None => prompt(&mut input, &mut out, "k = ")?,
    };
    let n = match args.len {
        Some(n) => clamp_count(n),
        None => prompt(&mut input, &mut out, "n = ")?,
    };
    writeln!(out)?;

    let options = Options {
        rows: k,
        row_len: n,
        value_range: args.min..=args.max,
        seed: args.seed,
        width: args.width,
        spill_dir: args.spill_dir,
    };

    demo::run(&options, &mut out)?;
    Ok(())
}

/// Print `label`, read one line, and parse it as a count.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<usize> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_count(&line))
}
