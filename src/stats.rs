//! Run statistics.
//!
//! A [`RunStatistics`] value is threaded by `&mut` through every component
//! that calls an oracle or does measurable work. It never influences results.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    /// Number of variables of the input.
    pub num_vars: usize,
    pub ideal_calls: usize,
    pub factor_calls: usize,
    pub time_minimizer: Duration,
    pub time_groebner: Duration,
    pub time_factor: Duration,
    pub time_setcover: Duration,
    pub time_tree_simplification: Duration,
    pub time_total: Duration,
    /// Size of the final formula tree.
    pub formula_size: usize,
}

impl RunStatistics {
    pub fn new(num_vars: usize) -> Self {
        RunStatistics {
            num_vars,
            ..Default::default()
        }
    }
}

/// Runs `f` and returns its result together with the elapsed wall time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timing:")?;
        writeln!(f, "TIME_IN_MINIMIZER={:.3}", self.time_minimizer.as_secs_f64())?;
        writeln!(f, "TIME_IN_GROEBNER={:.3}", self.time_groebner.as_secs_f64())?;
        writeln!(f, "TIME_IN_FACTOR={:.3}", self.time_factor.as_secs_f64())?;
        writeln!(f, "TIME_IN_SETCOVER={:.3}", self.time_setcover.as_secs_f64())?;
        writeln!(f, "TIME_TREE_SIMPLIFICATION={:.3}", self.time_tree_simplification.as_secs_f64())?;
        writeln!(f, "TIME_TOTAL={:.3}", self.time_total.as_secs_f64())?;
        writeln!(f)?;
        writeln!(f, "Stats:")?;
        writeln!(f, "TOTAL_GROEBNER_CALLS={}", self.ideal_calls)?;
        writeln!(f, "TOTAL_FACTOR_CALLS={}", self.factor_calls)?;
        writeln!(f, "n={}", self.num_vars)?;
        write!(f, "tree_size={}", self.formula_size)
    }
}
