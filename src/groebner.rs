//! Gröbner bases of ideals in the Boolean polynomial ring.
//!
//! Buchberger's algorithm over `GF(2)[x0..] / (x_i^2 + x_i)`. Besides the
//! usual pairwise S-polynomials, the field equations contribute one
//! S-polynomial `x * g` for each variable `x` of the leading monomial of
//! every basis element `g` (the product may lose its leading monomial, since
//! `x * x = x`).
//!
//! Leading monomials of elements that are multiplied by a monomial disjoint
//! from their own leading monomial stay leading, so reduction steps always
//! cancel the reduced monomial.
//!
//! The field equations are implicit and never part of the returned basis.

use std::collections::VecDeque;

use log::debug;

use crate::anf::{Monomial, Polynomial};

/// Computes the reduced Gröbner basis of the ideal generated by `generators`.
///
/// The result is sorted by descending leading monomial. The zero ideal has an
/// empty basis and the unit ideal has the basis `[1]`.
pub fn groebner_basis(generators: impl IntoIterator<Item = Polynomial>) -> Vec<Polynomial> {
    let mut basis: Vec<Polynomial> = Vec::new();
    let mut queue: VecDeque<Polynomial> = generators.into_iter().filter(|p| !p.is_zero()).collect();
    let mut reductions = 0usize;

    while let Some(p) = queue.pop_front() {
        reductions += 1;
        let r = normal_form(p, &basis);
        let Some(lead) = r.lead() else {
            continue;
        };
        if lead.is_one() {
            debug!("groebner_basis: unit ideal");
            return vec![Polynomial::one()];
        }

        for g in basis.iter() {
            if let Some(s) = s_polynomial(&r, g) {
                queue.push_back(s);
            }
        }
        for var in lead.variables() {
            let s = r.mul_monomial(Monomial::var(var));
            if !s.is_zero() {
                queue.push_back(s);
            }
        }
        basis.push(r);
    }
    debug!("groebner_basis: {} elements after {} reductions", basis.len(), reductions);

    reduce_basis(basis)
}

/// S-polynomial of `f` and `g`, or `None` when their leading monomials are
/// coprime (Buchberger's first criterion).
fn s_polynomial(f: &Polynomial, g: &Polynomial) -> Option<Polynomial> {
    let lf = f.lead()?;
    let lg = g.lead()?;
    if lf.is_coprime(lg) {
        return None;
    }
    let lcm = lf.mul(lg);
    let s = &f.mul_monomial(lcm.div(lf)) + &g.mul_monomial(lcm.div(lg));
    Some(s)
}

/// Fully reduces `p` modulo `basis`.
pub fn normal_form(p: Polynomial, basis: &[Polynomial]) -> Polynomial {
    let mut p = p;
    let mut remainder = Polynomial::zero();
    while let Some(lead) = p.lead() {
        let divisor = basis.iter().find(|g| g.lead().is_some_and(|lg| lg.divides(lead)));
        match divisor {
            Some(g) => {
                // Invariant: `lg` divides `lead`, so the product's leading
                // monomial is `lead` and it cancels.
                let lg = g.lead().unwrap_or(Monomial::ONE);
                p += &g.mul_monomial(lead.div(lg));
            }
            None => {
                p.toggle(lead);
                remainder.toggle(lead);
            }
        }
    }
    remainder
}

/// Turns a Gröbner basis into the reduced one.
fn reduce_basis(basis: Vec<Polynomial>) -> Vec<Polynomial> {
    // Minimal basis: drop elements whose leading monomial is divisible by
    // another element's leading monomial.
    let mut minimal: Vec<Polynomial> = Vec::with_capacity(basis.len());
    for (i, g) in basis.iter().enumerate() {
        let Some(lg) = g.lead() else {
            continue;
        };
        let redundant = basis.iter().enumerate().any(|(j, h)| {
            j != i && h.lead().is_some_and(|lh| lh.divides(lg) && (lh != lg || j < i))
        });
        if !redundant {
            minimal.push(g.clone());
        }
    }

    // Inter-reduction: reduce each tail modulo the other elements.
    let mut reduced: Vec<Polynomial> = Vec::with_capacity(minimal.len());
    for i in 0..minimal.len() {
        let g = &minimal[i];
        let Some(lg) = g.lead() else {
            continue;
        };
        let others: Vec<Polynomial> = minimal
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, h)| h.clone())
            .collect();
        let mut tail = g.clone();
        tail.toggle(lg);
        let mut r = normal_form(tail, &others);
        r.toggle(lg);
        reduced.push(r);
    }

    reduced.sort_by(|a, b| b.lead().cmp(&a.lead()));
    reduced
}
