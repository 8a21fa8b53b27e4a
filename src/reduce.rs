//! Redundancy elimination by weighted set cover.
//!
//! Every `And`/`Or` node with at least two children is pruned to a subset of
//! its children that covers the same points: for `Or` the points where a child
//! is true, for `And` the points where it is false. A child weighs its tree
//! size. `Xor` subtrees are not entered.
//!
//! Cover sets are computed by evaluating every child on all `2^n` points of
//! the domain, so the pass is exponential in the number of variables and only
//! meant for the small functions this crate targets.

use log::{debug, warn};

use crate::bitset::BitSet;
use crate::error::Error;
use crate::formula::Formula;
use crate::setcover::greedy_set_cover;
use crate::stats::{timed, RunStatistics};
use crate::types::{Point, MAX_VARS};

/// Above this many variables the exhaustive evaluation gets slow.
pub const LARGE_DOMAIN: usize = 20;

/// Prunes redundant children of every `And`/`Or` node, bottom-up.
///
/// The result evaluates like `formula` on every point of the `num_vars`
/// variable domain.
pub fn reduce(formula: Formula, num_vars: usize, stats: &mut RunStatistics) -> Result<Formula, Error> {
    if num_vars >= MAX_VARS {
        return Err(Error::TooManyVariables { n: num_vars });
    }
    if num_vars > LARGE_DOMAIN {
        warn!("Redundancy elimination evaluates 2^{} points per child", num_vars);
    }

    let domain: Vec<Point> = Point::all(num_vars).collect();
    let before = formula.size();
    let (reduced, elapsed) = timed(|| reduce_node(formula, &domain));
    stats.time_setcover += elapsed;
    debug!("reduce: size {} -> {}", before, reduced.size());
    Ok(reduced)
}

fn reduce_node(formula: Formula, domain: &[Point]) -> Formula {
    match formula {
        Formula::Leaf(_) | Formula::Xor(_) => formula,
        Formula::Not(child) => Formula::not(reduce_node(*child, domain)),
        Formula::And(cs) => {
            let cs = cs.into_iter().map(|c| reduce_node(c, domain)).collect();
            Formula::And(select(cs, domain, false))
        }
        Formula::Or(cs) => {
            let cs = cs.into_iter().map(|c| reduce_node(c, domain)).collect();
            Formula::Or(select(cs, domain, true))
        }
    }
}

/// Keeps a light subset of `children` whose `covering`-valued points have the
/// same union as those of all children.
fn select(children: Vec<Formula>, domain: &[Point], covering: bool) -> Vec<Formula> {
    if children.len() < 2 {
        return children;
    }

    let sets: Vec<BitSet> = children
        .iter()
        .map(|c| {
            let mut s = BitSet::new(domain.len());
            for (i, &p) in domain.iter().enumerate() {
                if c.evaluate(p) == covering {
                    s.insert(i);
                }
            }
            s
        })
        .collect();
    let weights: Vec<usize> = children.iter().map(Formula::size).collect();
    let selected = greedy_set_cover(&sets, &weights);

    children
        .into_iter()
        .zip(selected)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::types::Var;

    fn x(i: u32) -> Formula {
        Formula::leaf(Var::new(i))
    }

    fn assert_equivalent(a: &Formula, b: &Formula, n: usize) {
        for p in Point::all(n) {
            assert_eq!(a.evaluate(p), b.evaluate(p), "{} vs {} at {}", a, b, p);
        }
    }

    #[test]
    fn test_absorption_or() {
        // x0 | (x0 & x1) == x0
        let f = Formula::or(vec![x(0), Formula::and(vec![x(0), x(1)])]);
        let mut stats = RunStatistics::new(2);
        let r = reduce(f.clone(), 2, &mut stats).unwrap();
        assert_eq!(r, Formula::or(vec![x(0)]));
        assert_equivalent(&f, &r, 2);
    }

    #[test]
    fn test_absorption_and() {
        // x0 & (x0 | x1) == x0
        let f = Formula::and(vec![Formula::or(vec![x(0), x(1)]), x(0)]);
        let mut stats = RunStatistics::new(2);
        let r = reduce(f, 2, &mut stats).unwrap();
        assert_eq!(r, Formula::and(vec![x(0)]));
    }

    #[test]
    fn test_xor_untouched() {
        let inner = Formula::or(vec![x(0), Formula::and(vec![x(0), x(1)])]);
        let f = Formula::xor(vec![inner, x(1)]).unwrap();
        let mut stats = RunStatistics::new(2);
        let r = reduce(f.clone(), 2, &mut stats).unwrap();
        assert_eq!(r, f);
    }

    #[test]
    fn test_descends_into_not() {
        let f = Formula::not(Formula::or(vec![x(1), Formula::and(vec![x(0), x(1)])]));
        let mut stats = RunStatistics::new(2);
        let r = reduce(f, 2, &mut stats).unwrap();
        assert_eq!(r, Formula::not(Formula::or(vec![x(1)])));
    }

    #[test]
    fn test_consensus_term_dropped() {
        // (x0 & x1) | (~x0 & x2) | (x1 & x2): the consensus term is redundant.
        let f = Formula::or(vec![
            Formula::and(vec![x(0), x(1)]),
            Formula::and(vec![Formula::not(x(0)), x(2)]),
            Formula::and(vec![x(1), x(2)]),
        ]);
        let mut stats = RunStatistics::new(3);
        let r = reduce(f.clone(), 3, &mut stats).unwrap();
        assert_eq!(r.children().len(), 2);
        assert_equivalent(&f, &r, 3);
    }

    #[test]
    fn test_preserves_semantics() {
        let f = Formula::and(vec![
            Formula::or(vec![x(0), x(1), Formula::and(vec![x(0), x(2)])]),
            Formula::or(vec![x(2), Formula::not(x(3))]),
            Formula::or(vec![x(0), x(1), x(2)]),
            Formula::xor(vec![x(1), x(3)]).unwrap(),
            Formula::one(),
        ]);
        let mut stats = RunStatistics::new(4);
        let r = reduce(f.clone(), 4, &mut stats).unwrap();
        assert_equivalent(&f, &r, 4);
        assert!(r.size() < f.size());
    }

    #[test]
    fn test_constant_children() {
        // An always-false child of an `Or` covers nothing.
        let f = Formula::or(vec![Formula::zero(), x(0)]);
        let mut stats = RunStatistics::new(1);
        let r = reduce(f, 1, &mut stats).unwrap();
        assert_eq!(r, Formula::or(vec![x(0)]));
    }

    #[test]
    fn test_too_many_variables() {
        let mut stats = RunStatistics::default();
        assert!(matches!(reduce(x(0), 64, &mut stats), Err(Error::TooManyVariables { n: 64 })));
    }
}
