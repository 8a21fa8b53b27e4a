//! Factorization of multilinear polynomials over GF(2).
//!
//! Every polynomial in algebraic normal form has degree at most one in each
//! variable, so its irreducible factors have pairwise disjoint variable sets.
//! Two variables `x`, `y` belong to the same irreducible factor iff
//!
//! ```text
//! f * d²f/dxdy != df/dx * df/dy
//! ```
//!
//! where the products are taken in the ordinary polynomial ring (squares do
//! not collapse). Once the variables are grouped, the factor over a group `A`
//! is `f` with every other variable fixed to a point `p` where `f(p) = 1`:
//! the remaining factors all evaluate to one there.

use std::collections::BTreeSet;

use log::debug;

use crate::anf::{Monomial, Polynomial};
use crate::error::Error;
use crate::types::Var;

/// An irreducible factor together with its total degree.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Factor {
    pub poly: Polynomial,
    pub degree: u32,
}

impl Factor {
    pub fn new(poly: Polynomial) -> Self {
        let degree = poly.degree();
        Factor { poly, degree }
    }
}

/// Splits `f` into its irreducible factors, ordered by their lowest variable.
///
/// The constant `1` has no factors. Factoring `0` is an error.
pub fn factor(f: &Polynomial) -> Result<Vec<Factor>, Error> {
    if f.is_zero() {
        return Err(Error::Oracle("factorization of 0 is not defined".to_string()));
    }
    if f.degree() == 0 {
        return Ok(Vec::new());
    }

    let vars = f.variables();
    let mut groups: Vec<(Var, u64)> = Vec::new();
    for &v in vars.iter() {
        match groups.iter_mut().find(|(rep, _)| same_factor(f, *rep, v)) {
            Some((_, mask)) => *mask |= v.mask(),
            None => groups.push((v, v.mask())),
        }
    }

    let point = satisfying_point(f);
    let support = f.support();
    let factors: Vec<Factor> = groups
        .iter()
        .map(|&(_, mask)| Factor::new(f.substitute(support & !mask, point)))
        .collect();
    debug!("factor({}) = [{}]", f, factors.iter().map(|g| format!("({})", g.poly)).collect::<Vec<_>>().join(", "));
    Ok(factors)
}

/// Whether `x` and `y` occur in the same irreducible factor of `f`.
fn same_factor(f: &Polynomial, x: Var, y: Var) -> bool {
    let fx = derivative(f, x);
    let fy = derivative(f, y);
    let fxy = derivative(&fx, y);
    exact_product(f, &fxy) != exact_product(&fx, &fy)
}

/// Partial derivative of a multilinear polynomial.
fn derivative(f: &Polynomial, var: Var) -> Polynomial {
    let x = Monomial::var(var);
    Polynomial::from_monomials(f.monomials().filter(|m| x.divides(*m)).map(|m| m.div(x)))
}

/// Product of two multilinear polynomials in the ordinary polynomial ring.
///
/// Exponents are at most two, so a monomial is encoded as the pair of masks
/// `(exponent >= 1, exponent == 2)`.
fn exact_product(a: &Polynomial, b: &Polynomial) -> BTreeSet<(u64, u64)> {
    let mut result = BTreeSet::new();
    for l in a.monomials() {
        for r in b.monomials() {
            let key = (l.mask() | r.mask(), l.mask() & r.mask());
            if !result.remove(&key) {
                result.insert(key);
            }
        }
    }
    result
}

/// A point where `f` is one: the variables of a minimal-degree monomial set
/// to one, all others zero. No other monomial divides it.
fn satisfying_point(f: &Polynomial) -> u64 {
    f.monomials().min_by_key(|m| m.degree()).map(|m| m.mask()).unwrap_or(0)
}
