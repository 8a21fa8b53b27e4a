//! Request/response contracts of the two algebraic oracles.
//!
//! The synthesizer only sees the traits. [`GroebnerOracle`] backs the ideal
//! oracle with a [`CoverMinimizer`] and a Boolean Gröbner basis computation,
//! and [`MultilinearFactorizer`] backs the factorization oracle.

use log::debug;

use crate::anf::Polynomial;
use crate::cover::CoverMinimizer;
use crate::error::Error;
use crate::factor::{factor, Factor};
use crate::groebner::groebner_basis;
use crate::stats::{timed, RunStatistics};
use crate::types::{Point, Var};

/// Computes a generating set of the ideal of polynomials vanishing outside a
/// domain subset.
///
/// Bit `i` of every target point is the value of `vars[i]`. The OR of the
/// returned basis elements is one exactly on the target points.
pub trait IdealOracle {
    fn basis(&mut self, vars: &[Var], target: &[Point], stats: &mut RunStatistics) -> Result<Vec<Polynomial>, Error>;
}

/// Splits a polynomial into its irreducible factors.
pub trait FactorOracle {
    fn factor(&mut self, poly: &Polynomial, stats: &mut RunStatistics) -> Result<Vec<Factor>, Error>;
}

impl<T: IdealOracle + ?Sized> IdealOracle for &mut T {
    fn basis(&mut self, vars: &[Var], target: &[Point], stats: &mut RunStatistics) -> Result<Vec<Polynomial>, Error> {
        (**self).basis(vars, target, stats)
    }
}

impl<T: FactorOracle + ?Sized> FactorOracle for &mut T {
    fn factor(&mut self, poly: &Polynomial, stats: &mut RunStatistics) -> Result<Vec<Factor>, Error> {
        (**self).factor(poly, stats)
    }
}

/// Two-level minimization followed by a reduced Gröbner basis of the ideal
/// generated by the cube polynomials.
#[derive(Debug, Clone)]
pub struct GroebnerOracle<M> {
    minimizer: M,
}

impl<M: CoverMinimizer> GroebnerOracle<M> {
    pub fn new(minimizer: M) -> Self {
        GroebnerOracle { minimizer }
    }
}

impl<M: CoverMinimizer> IdealOracle for GroebnerOracle<M> {
    fn basis(&mut self, vars: &[Var], target: &[Point], stats: &mut RunStatistics) -> Result<Vec<Polynomial>, Error> {
        let (cubes, elapsed) = timed(|| self.minimizer.minimize(vars.len(), target));
        stats.time_minimizer += elapsed;
        let cubes = cubes?;

        let relations: Vec<Polynomial> = cubes.iter().map(|c| c.to_polynomial(vars)).collect();
        let (basis, elapsed) = timed(|| groebner_basis(relations));
        stats.time_groebner += elapsed;

        debug!(
            "GroebnerOracle: {} points, {} cubes, basis of {} elements",
            target.len(),
            cubes.len(),
            basis.len()
        );
        Ok(basis)
    }
}

/// Exact factorization of multilinear polynomials.
#[derive(Debug, Default, Clone)]
pub struct MultilinearFactorizer;

impl FactorOracle for MultilinearFactorizer {
    fn factor(&mut self, poly: &Polynomial, stats: &mut RunStatistics) -> Result<Vec<Factor>, Error> {
        let (factors, elapsed) = timed(|| factor(poly));
        stats.time_factor += elapsed;
        factors
    }
}
