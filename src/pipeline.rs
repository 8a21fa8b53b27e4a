//! End-to-end minimization of a truth table.
//!
//! ```
//! use groebner_min::pipeline::{run, Options};
//! use groebner_min::pla::TruthTable;
//! use groebner_min::stats::RunStatistics;
//!
//! let table = TruthTable::parse_pla(".i 2\n.o 1\n10 1\n11 1\n.e\n").unwrap();
//! let mut stats = RunStatistics::default();
//! let outcome = run(&table, &Options::default(), &mut stats).unwrap();
//! assert_eq!(outcome.code, "|x| x[0] & 1");
//! ```

use std::time::Instant;

use log::{debug, info};

use crate::cover::{Espresso, PrimeCover};
use crate::error::Error;
use crate::export;
use crate::formula::{Formula, RewriteStrategy};
use crate::oracle::{GroebnerOracle, IdealOracle, MultilinearFactorizer};
use crate::pla::TruthTable;
use crate::reduce::reduce;
use crate::stats::{timed, RunStatistics};
use crate::synth::{Polarity, SynthConfig, Synthesizer};
use crate::types::{vars, Point, Var};

/// Two-level minimizer backing the ideal oracle.
#[derive(Debug, Clone, Default)]
pub enum Minimizer {
    /// In-process prime implicants and greedy cover.
    #[default]
    Prime,
    /// An `espresso` executable.
    Espresso(Espresso),
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Synthesize the OFF-set and negate.
    pub negate: bool,
    pub minimizer: Minimizer,
    pub rewrite: RewriteStrategy,
    pub synth: SynthConfig,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// The rewritten and reduced formula.
    pub formula: Formula,
    /// The exported code, already checked against the table.
    pub code: String,
    /// Size of `formula`.
    pub size: usize,
}

/// Minimizes `table` and checks the exported code against every record.
pub fn run(table: &TruthTable, options: &Options, stats: &mut RunStatistics) -> Result<Outcome, Error> {
    let start = Instant::now();
    let n = table.num_vars();
    stats.num_vars = n;

    let xs = vars(n)?;
    let target = table.target(options.negate);
    let polarity = if options.negate {
        Polarity::Negative
    } else {
        Polarity::Positive
    };
    info!(
        "Synthesizing {} of {} records over {} variables{}",
        target.len(),
        table.records().len(),
        n,
        if options.negate { " (negated)" } else { "" }
    );

    let formula = match &options.minimizer {
        Minimizer::Prime => synthesize(GroebnerOracle::new(PrimeCover), &xs, &target, polarity, options.synth, stats)?,
        Minimizer::Espresso(espresso) => synthesize(
            GroebnerOracle::new(espresso.clone()),
            &xs,
            &target,
            polarity,
            options.synth,
            stats,
        )?,
    };
    debug!("synthesized: {}", formula);

    let (formula, elapsed) = timed(|| {
        let formula = formula.normalize(options.rewrite);
        reduce(formula, n, stats)
    });
    stats.time_tree_simplification += elapsed;
    let formula = formula?;
    debug!("reduced: {}", formula);

    info!("Generating code");
    let code = export::code(&formula)?;
    info!("Testing validity");
    export::validate(&code, table)?;

    let size = formula.size();
    stats.formula_size = size;
    stats.time_total += start.elapsed();
    Ok(Outcome { formula, code, size })
}

fn synthesize<I: IdealOracle>(
    ideal: I,
    vars: &[Var],
    target: &[Point],
    polarity: Polarity,
    config: SynthConfig,
    stats: &mut RunStatistics,
) -> Result<Formula, Error> {
    let mut synth = Synthesizer::new(ideal, MultilinearFactorizer, config);
    synth.synthesize_function(vars, target, polarity, stats)
}
