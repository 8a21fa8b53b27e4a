//! Recursive synthesis of formula trees from oracle output.
//!
//! For a target subset `S` the ideal oracle returns a basis `g_1..g_k` whose
//! OR is the indicator of `S`. Each `g_j` is split into irreducible factors
//! and the factors are ANDed, giving a sum-of-products over factors.
//!
//! A factor `h` of degree two or more can itself be synthesized: its zero set
//! is the target of a recursive call with flipped [`Polarity`]. Under negative
//! polarity every literal is negated and the roles of AND and OR swap (De
//! Morgan), so the recursive call returns a formula for `h` itself. The
//! recursive result replaces the literal form of `h` only when it is strictly
//! smaller.
//!
//! The search is bounded twice: by a depth limit, past which every factor is
//! kept as a literal, and by a size budget. A call whose basis alone is larger
//! than its budget gives up and reports `None`; the caller then keeps the
//! literal. A recursive call on `h` gets twice the literal size of `h` as
//! budget.

use log::debug;

use crate::anf::Polynomial;
use crate::error::Error;
use crate::factor::Factor;
use crate::formula::Formula;
use crate::oracle::{FactorOracle, IdealOracle};
use crate::stats::RunStatistics;
use crate::types::{Point, Var};

/// Depth past which factors are no longer decomposed.
pub const MAX_DEPTH: usize = 5;

#[derive(Debug, Copy, Clone)]
pub struct SynthConfig {
    /// Factors found at a depth greater than this are kept as literals.
    pub max_depth: usize,
    /// Size budget of the top-level call.
    pub initial_budget: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            max_depth: MAX_DEPTH,
            initial_budget: usize::MAX,
        }
    }
}

/// Whether a call synthesizes the indicator of its target or its complement.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn flip(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }

    pub fn is_negative(self) -> bool {
        self == Polarity::Negative
    }

    /// Combines the factors of one basis element.
    fn product(self, literals: Vec<Formula>) -> Formula {
        match self {
            Polarity::Positive => Formula::and(literals),
            Polarity::Negative => Formula::or(literals),
        }
    }

    /// Combines the per-element products.
    fn sum(self, terms: Vec<Formula>) -> Formula {
        match self {
            Polarity::Positive => Formula::or(terms),
            Polarity::Negative => Formula::and(terms),
        }
    }
}

pub struct Synthesizer<I, F> {
    ideal: I,
    factorizer: F,
    config: SynthConfig,
}

impl<I: IdealOracle, F: FactorOracle> Synthesizer<I, F> {
    pub fn new(ideal: I, factorizer: F, config: SynthConfig) -> Self {
        Synthesizer {
            ideal,
            factorizer,
            config,
        }
    }

    /// Top-level synthesis with the configured budget.
    ///
    /// With [`Polarity::Positive`] the result is one exactly on `target`;
    /// with [`Polarity::Negative`] it is one exactly off `target`.
    pub fn synthesize_function(
        &mut self,
        vars: &[Var],
        target: &[Point],
        polarity: Polarity,
        stats: &mut RunStatistics,
    ) -> Result<Formula, Error> {
        let budget = self.config.initial_budget;
        self.synthesize(vars, target, polarity, 0, budget, stats)?
            .ok_or(Error::BudgetExhausted { budget })
    }

    /// One step of the search. Returns `Ok(None)` when the basis exceeds the
    /// size budget.
    pub fn synthesize(
        &mut self,
        vars: &[Var],
        target: &[Point],
        polarity: Polarity,
        depth: usize,
        budget: usize,
        stats: &mut RunStatistics,
    ) -> Result<Option<Formula>, Error> {
        if target.is_empty() {
            return Ok(Some(polarity.sum(Vec::new())));
        }

        stats.ideal_calls += 1;
        let basis = self.ideal.basis(vars, target, stats)?;
        let basis_size: usize = basis.iter().map(Polynomial::tree_size).sum();
        if basis_size > budget {
            debug!("{} basis size {} exceeds budget {}", "-".repeat(depth), basis_size, budget);
            return Ok(None);
        }

        let mut terms = Vec::with_capacity(basis.len());
        for element in basis.iter() {
            stats.factor_calls += 1;
            let factors = self.factorizer.factor(element, stats)?;
            let mut literals = Vec::with_capacity(factors.len());
            for factor in factors.iter() {
                debug!("{} {}", "-".repeat(depth), factor.poly);
                literals.push(self.synthesize_factor(factor, polarity, depth, stats)?);
            }
            terms.push(polarity.product(literals));
        }
        Ok(Some(polarity.sum(terms)))
    }

    fn synthesize_factor(
        &mut self,
        factor: &Factor,
        polarity: Polarity,
        depth: usize,
        stats: &mut RunStatistics,
    ) -> Result<Formula, Error> {
        if factor.degree <= 1 || depth > self.config.max_depth {
            return literal(factor, polarity);
        }

        let literal_size = factor.poly.tree_size();
        let complement = &factor.poly + &Polynomial::one();
        let (sub_vars, sub_target) = sample(&complement);
        let sub = self.synthesize(
            &sub_vars,
            &sub_target,
            polarity.flip(),
            depth + 1,
            literal_size.saturating_mul(2),
            stats,
        )?;

        match sub {
            Some(formula) if formula.size() < literal_size => {
                debug!("{} decomposed: {} < {}", "-".repeat(depth), formula.size(), literal_size);
                Ok(formula)
            }
            _ => literal(factor, polarity),
        }
    }
}

/// The factor as an XOR-of-ANDs literal, negated under negative polarity.
fn literal(factor: &Factor, polarity: Polarity) -> Result<Formula, Error> {
    let formula = factor.poly.to_formula()?;
    if polarity.is_negative() {
        Ok(Formula::not(formula))
    } else {
        Ok(formula)
    }
}

/// The points, over the variables of `p`, where `p` is one.
///
/// Bit `j` of each returned point is the value of the `j`-th returned
/// variable.
pub fn sample(p: &Polynomial) -> (Vec<Var>, Vec<Point>) {
    let vars = p.variables();
    let k = vars.len();
    let points = Point::all(k)
        .filter(|local| {
            let assignment = vars
                .iter()
                .enumerate()
                .filter(|&(j, _)| local.get(j))
                .fold(0u64, |acc, (_, v)| acc | v.mask());
            p.evaluate(assignment)
        })
        .collect();
    (vars, points)
}
