use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use groebner_min::cover::Espresso;
use groebner_min::error::Error;
use groebner_min::formula::RewriteStrategy;
use groebner_min::pipeline::{run, Minimizer, Options};
use groebner_min::pla::TruthTable;
use groebner_min::stats::RunStatistics;
use groebner_min::synth::{SynthConfig, MAX_DEPTH};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MinimizerArg {
    /// In-process prime implicants and greedy cover
    Prime,
    /// External espresso executable
    Espresso,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RewriteArg {
    /// Repeat the rewrite pass until nothing changes
    Fixpoint,
    /// Exactly two rewrite passes
    TwoPass,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Groebner bases for Boolean function minimization")]
struct Cli {
    /// Espresso input file (PLA format), or a bit-CSV directory with `--bit`.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Store the generated formula and run statistics in this file.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Synthesize the complement and negate the result.
    #[arg(long)]
    negate: bool,

    /// Print statistics about this run.
    #[arg(long)]
    stats: bool,

    /// Print more verbose information.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print warnings and errors only.
    #[arg(short, long)]
    quiet: bool,

    /// Two-level minimizer used by the ideal oracle.
    #[arg(long, value_enum, default_value = "prime")]
    minimizer: MinimizerArg,

    /// Path to the espresso executable.
    #[arg(long, value_name = "PATH", env = "ESPRESSO_EXECUTABLE", default_value = "espresso")]
    espresso: PathBuf,

    /// Extra argument passed to espresso (repeatable).
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    espresso_arg: Vec<String>,

    /// Read output bit K from a bit-CSV directory.
    #[arg(long, value_name = "K")]
    bit: Option<usize>,

    /// Recursion depth limit.
    #[arg(long, value_name = "INT", default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// Size budget of the top-level synthesis.
    #[arg(long, value_name = "INT")]
    budget: Option<usize>,

    /// Rewrite strategy.
    #[arg(long, value_enum, default_value = "fixpoint")]
    rewrite: RewriteArg,

    /// Write the final formula tree in DOT format.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else if args.quiet {
        simplelog::LevelFilter::Warn
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    info!("args = {:?}", args);

    let table = match args.bit {
        Some(bit) => {
            let table = TruthTable::read_bits_csv(&args.input, bit)?;
            for (i, b) in table.input_bits().iter().enumerate() {
                info!("x[{}] is input bit {}", i, b);
            }
            table
        }
        None => TruthTable::read_pla(&args.input)?,
    };

    let options = Options {
        negate: args.negate,
        minimizer: match args.minimizer {
            MinimizerArg::Prime => Minimizer::Prime,
            MinimizerArg::Espresso => {
                let espresso = Espresso::new(args.espresso.clone());
                Minimizer::Espresso(args.espresso_arg.iter().fold(espresso, |e, a| e.arg(a.as_str())))
            }
        },
        rewrite: match args.rewrite {
            RewriteArg::Fixpoint => RewriteStrategy::Fixpoint,
            RewriteArg::TwoPass => RewriteStrategy::TwoPass,
        },
        synth: SynthConfig {
            max_depth: args.max_depth,
            initial_budget: args.budget.unwrap_or(usize::MAX),
        },
    };

    let mut stats = RunStatistics::new(table.num_vars());
    let outcome = match run(&table, &options, &mut stats) {
        Ok(outcome) => outcome,
        Err(e @ Error::Mismatch { .. }) => {
            error!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    println!("formula = {}", outcome.code);

    if args.stats {
        println!();
        println!("{}", stats);
    }

    if let Some(path) = &args.output {
        fs::write(path, format!("{}\n{}\n", outcome.code, stats))?;
        info!("Wrote {}", path.display());
    }

    if let Some(path) = &args.dot {
        fs::write(path, outcome.formula.to_dot()?)?;
        info!("Wrote {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
