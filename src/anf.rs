//! Boolean polynomials in algebraic normal form.
//!
//! A [`Polynomial`] is a sum (xor) of distinct [`Monomial`]s over GF(2) with
//! the field equations `x^2 = x` built in: a monomial is just the set of its
//! variables, stored as a bit mask, and the product of two monomials is the
//! union of their variable sets.
//!
//! Monomials are ordered degree-reverse-lexicographically with
//! `x0 > x1 > x2 > ...`, so the leading monomial of a polynomial is the last
//! element of its ordered monomial set.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use crate::error::Error;
use crate::formula::Formula;
use crate::types::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Monomial(u64);

impl Monomial {
    /// The empty product.
    pub const ONE: Monomial = Monomial(0);

    pub fn from_mask(mask: u64) -> Self {
        Monomial(mask)
    }

    pub fn var(var: Var) -> Self {
        Monomial(var.mask())
    }

    pub fn mask(self) -> u64 {
        self.0
    }

    pub fn degree(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_one(self) -> bool {
        self.0 == 0
    }

    /// Whether `self` divides `other`.
    pub fn divides(self, other: Monomial) -> bool {
        self.0 & !other.0 == 0
    }

    /// Whether the two monomials share no variable.
    pub fn is_coprime(self, other: Monomial) -> bool {
        self.0 & other.0 == 0
    }

    /// Boolean product (variable set union).
    pub fn mul(self, other: Monomial) -> Monomial {
        Monomial(self.0 | other.0)
    }

    /// `self / other`, assuming `other` divides `self`.
    pub fn div(self, other: Monomial) -> Monomial {
        Monomial(self.0 & !other.0)
    }

    /// Value at an assignment where bit `i` of `assignment` is `x{i}`.
    pub fn evaluate(self, assignment: u64) -> bool {
        self.0 & !assignment == 0
    }

    /// Variables of the monomial, in ascending index order.
    pub fn variables(self) -> impl Iterator<Item = Var> {
        let mask = self.0;
        (0..64u32).filter(move |i| (mask >> i) & 1 == 1).map(Var::new)
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.degree().cmp(&other.degree()) {
            Ordering::Equal => {
                let diff = self.0 ^ other.0;
                if diff == 0 {
                    return Ordering::Equal;
                }
                // Reverse lexicographic: at the last differing variable,
                // the monomial containing it is the smaller one.
                let last = 63 - diff.leading_zeros();
                if (self.0 >> last) & 1 == 1 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            ord => ord,
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        for (i, var) in self.variables().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "{}", var)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Polynomial {
    monomials: BTreeSet<Monomial>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn one() -> Self {
        Polynomial::from_monomial(Monomial::ONE)
    }

    pub fn var(var: Var) -> Self {
        Polynomial::from_monomial(Monomial::var(var))
    }

    pub fn from_monomial(m: Monomial) -> Self {
        Polynomial {
            monomials: BTreeSet::from([m]),
        }
    }

    /// Sums the given monomials; pairs of equal monomials cancel.
    pub fn from_monomials(monomials: impl IntoIterator<Item = Monomial>) -> Self {
        let mut p = Polynomial::zero();
        for m in monomials {
            p.toggle(m);
        }
        p
    }

    /// Adds a single monomial.
    pub fn toggle(&mut self, m: Monomial) {
        if !self.monomials.remove(&m) {
            self.monomials.insert(m);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.monomials.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.monomials.len() == 1 && self.monomials.contains(&Monomial::ONE)
    }

    /// Whether the constant monomial `1` is present.
    pub fn has_constant(&self) -> bool {
        self.monomials.contains(&Monomial::ONE)
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Leading monomial, `None` for the zero polynomial.
    pub fn lead(&self) -> Option<Monomial> {
        self.monomials.last().copied()
    }

    /// Monomials in descending order.
    pub fn monomials(&self) -> impl Iterator<Item = Monomial> + '_ {
        self.monomials.iter().rev().copied()
    }

    /// Total degree; `0` for constants.
    pub fn degree(&self) -> u32 {
        self.monomials.iter().map(|m| m.degree()).max().unwrap_or(0)
    }

    /// Mask of all variables occurring in the polynomial.
    pub fn support(&self) -> u64 {
        self.monomials.iter().fold(0, |acc, m| acc | m.mask())
    }

    /// Variables occurring in the polynomial, in ascending index order.
    pub fn variables(&self) -> Vec<Var> {
        Monomial::from_mask(self.support()).variables().collect()
    }

    /// Value at an assignment where bit `i` of `assignment` is `x{i}`.
    pub fn evaluate(&self, assignment: u64) -> bool {
        self.monomials.iter().filter(|m| m.evaluate(assignment)).count() % 2 == 1
    }

    /// Boolean product with a monomial.
    pub fn mul_monomial(&self, m: Monomial) -> Polynomial {
        Polynomial::from_monomials(self.monomials.iter().map(|&t| t.mul(m)))
    }

    /// Fixes the variables in `fixed` to the corresponding bits of `values`.
    pub fn substitute(&self, fixed: u64, values: u64) -> Polynomial {
        let zeros = fixed & !values;
        Polynomial::from_monomials(
            self.monomials
                .iter()
                .filter(|m| m.mask() & zeros == 0)
                .map(|m| Monomial::from_mask(m.mask() & !fixed)),
        )
    }

    /// Converts to a literal formula tree: an `Xor` over the non-constant
    /// monomials (each an `And` of leaves), negated when the constant
    /// monomial is present.
    ///
    /// Constant polynomials have no non-constant monomials and fail with
    /// [`Error::EmptyXor`].
    pub fn to_formula(&self) -> Result<Formula, Error> {
        let terms: Vec<Formula> = self
            .monomials()
            .filter(|m| !m.is_one())
            .map(|m| Formula::and(m.variables().map(Formula::leaf).collect()))
            .collect();
        let xor = Formula::xor(terms)?;
        if self.has_constant() {
            Ok(Formula::not(xor))
        } else {
            Ok(xor)
        }
    }

    /// Size of the tree [`Polynomial::to_formula`] would build, also defined
    /// for constants.
    pub fn tree_size(&self) -> usize {
        let terms: usize = self
            .monomials
            .iter()
            .filter(|m| !m.is_one())
            .map(|m| 1 + m.degree() as usize)
            .sum();
        1 + terms + self.has_constant() as usize
    }
}

impl AddAssign<&Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: &Polynomial) {
        for &m in rhs.monomials.iter() {
            self.toggle(m);
        }
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    /// Boolean product: `Summands(a*b) = { l | r : (l, r) in a x b }`, with
    /// equal summands cancelling pairwise.
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for &l in self.monomials.iter() {
            for &r in rhs.monomials.iter() {
                result.toggle(l.mul(r));
            }
        }
        result
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, m) in self.monomials().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::Point;

    fn x(i: u32) -> Polynomial {
        Polynomial::var(Var::new(i))
    }

    fn m(vars: &[u32]) -> Monomial {
        Monomial::from_mask(vars.iter().fold(0, |acc, &i| acc | (1 << i)))
    }

    #[test]
    fn test_monomial_order() {
        // Degree first.
        assert!(m(&[2, 3]) > m(&[0]));
        // Same degree: x0 > x1 > x2.
        assert!(m(&[0]) > m(&[1]));
        assert!(m(&[0, 1]) > m(&[0, 2]));
        assert!(m(&[0, 2]) > m(&[1, 2]));
        // Reverse lex: x0*x3 < x1*x2 (last differing variable is x3).
        assert!(m(&[0, 3]) < m(&[1, 2]));
        assert!(Monomial::ONE < m(&[5]));
    }

    #[test]
    fn test_add_cancels() {
        let p = &(&x(0) + &x(1)) + &x(0);
        assert_eq!(p, x(1));
        assert!((&p + &p).is_zero());
    }

    #[test]
    fn test_boolean_product() {
        // (x0 + 1) * x0 = x0 + x0 = 0
        let p = &(&x(0) + &Polynomial::one()) * &x(0);
        assert!(p.is_zero());
        // (x0 + x1) * (x0 + x1) = x0 + x1 (idempotent)
        let q = &x(0) + &x(1);
        assert_eq!(&q * &q, q);
    }

    #[test]
    fn test_lead_and_degree() {
        let p = Polynomial::from_monomials([m(&[1]), m(&[0, 2]), Monomial::ONE]);
        assert_eq!(p.lead(), Some(m(&[0, 2])));
        assert_eq!(p.degree(), 2);
        assert_eq!(p.variables(), vec![Var::new(0), Var::new(1), Var::new(2)]);
        assert_eq!(p.to_string(), "x0*x2 + x1 + 1");
    }

    #[test]
    fn test_evaluate() {
        // x0*x1 + x2
        let p = Polynomial::from_monomials([m(&[0, 1]), m(&[2])]);
        for pt in Point::all(3) {
            let expected = (pt.get(0) && pt.get(1)) ^ pt.get(2);
            assert_eq!(p.evaluate(pt.bits()), expected);
        }
    }

    #[test]
    fn test_substitute() {
        // x0*x1 + x1*x2 + x2 with x1 = 1 gives x0 + x2 + x2 = x0
        let p = Polynomial::from_monomials([m(&[0, 1]), m(&[1, 2]), m(&[2])]);
        assert_eq!(p.substitute(0b010, 0b010), x(0));
        // with x1 = 0 gives x2
        assert_eq!(p.substitute(0b010, 0), x(2));
    }

    #[test]
    fn test_to_formula() {
        // x0 + 1 renders as ~x[0] after normalization.
        let p = &x(0) + &Polynomial::one();
        let f = p.to_formula().unwrap();
        assert_eq!(f.size(), p.tree_size());
        assert_eq!(f.render().unwrap(), "~x[0]");
        for pt in Point::all(1) {
            assert_eq!(f.evaluate(pt), p.evaluate(pt.bits()));
        }
    }

    #[test]
    fn test_constant_formula_fails() {
        assert!(matches!(Polynomial::one().to_formula(), Err(Error::EmptyXor)));
        assert_eq!(Polynomial::one().tree_size(), 2);
        assert_eq!(Polynomial::zero().tree_size(), 1);
    }
}
