//! Formula trees over AND/OR/XOR/NOT and variable leaves.
//!
//! A [`Formula`] exclusively owns its children, so every transformation takes
//! the tree by value and returns the rewritten tree. Connectives are variadic:
//! an empty `Or` is the constant false, an empty `And` the constant true, and
//! an empty `Xor` has no value and is rejected by [`Formula::xor`] and
//! [`Formula::render`].
//!
//! ## Rewrite rules
//!
//! [`Formula::rewrite_pass`] applies, bottom-up, to every node:
//!
//! - `~~x => x`
//! - `op(x) => x` for `op` in `&`, `|`, `^`
//! - `op(.., op(a, b), ..) => op(.., a, b, ..)` (in place, order preserved)
//!
//! [`Formula::normalize`] repeats the pass, either until nothing changes or a
//! fixed two times (see [`RewriteStrategy`]).

use std::collections::BTreeSet;
use std::fmt;

use crate::error::Error;
use crate::types::{Point, Var};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Leaf(Var),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Xor(Vec<Formula>),
}

/// How many times the rewrite pass is applied by [`Formula::normalize`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RewriteStrategy {
    /// Repeat until a pass changes nothing.
    #[default]
    Fixpoint,
    /// Exactly two passes, which may leave collapsible nodes behind.
    TwoPass,
}

impl Formula {
    pub fn leaf(var: Var) -> Self {
        Formula::Leaf(var)
    }

    pub fn not(child: Self) -> Self {
        Formula::Not(Box::new(child))
    }

    pub fn and(children: Vec<Self>) -> Self {
        Formula::And(children)
    }

    pub fn or(children: Vec<Self>) -> Self {
        Formula::Or(children)
    }

    /// Creates an `Xor` node. Fails on an empty child list.
    pub fn xor(children: Vec<Self>) -> Result<Self, Error> {
        if children.is_empty() {
            return Err(Error::EmptyXor);
        }
        Ok(Formula::Xor(children))
    }

    /// The constant false, an empty `Or`.
    pub fn zero() -> Self {
        Formula::Or(Vec::new())
    }

    /// The constant true, an empty `And`.
    pub fn one() -> Self {
        Formula::And(Vec::new())
    }

    /// Children of a connective, empty for leaves and negations.
    pub fn children(&self) -> &[Formula] {
        match self {
            Formula::And(cs) | Formula::Or(cs) | Formula::Xor(cs) => cs,
            Formula::Leaf(_) | Formula::Not(_) => &[],
        }
    }

    /// Infix symbol of the node.
    pub fn symbol(&self) -> &'static str {
        match self {
            Formula::Leaf(_) => "",
            Formula::Not(_) => "~",
            Formula::And(_) => "&",
            Formula::Or(_) => "|",
            Formula::Xor(_) => "^",
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Formula::Leaf(_) => 1,
            Formula::Not(child) => 1 + child.size(),
            Formula::And(cs) | Formula::Or(cs) | Formula::Xor(cs) => 1 + cs.iter().map(Formula::size).sum::<usize>(),
        }
    }

    /// Evaluates the formula at a point of the global domain, where bit `i`
    /// of the point is the value of variable `x{i}`.
    ///
    /// An `Xor` without children must not occur; [`Formula::xor`] rejects it.
    pub fn evaluate(&self, point: Point) -> bool {
        match self {
            Formula::Leaf(var) => point.get(var.index()),
            Formula::Not(child) => !child.evaluate(point),
            Formula::And(cs) => cs.iter().all(|c| c.evaluate(point)),
            Formula::Or(cs) => cs.iter().any(|c| c.evaluate(point)),
            Formula::Xor(cs) => {
                debug_assert!(!cs.is_empty(), "Xor node without children has no value");
                cs.iter().fold(false, |acc, c| acc ^ c.evaluate(point))
            }
        }
    }

    /// Variables occurring in the tree.
    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<Var>) {
        match self {
            Formula::Leaf(var) => {
                vars.insert(*var);
            }
            Formula::Not(child) => child.collect_variables(vars),
            Formula::And(cs) | Formula::Or(cs) | Formula::Xor(cs) => {
                for c in cs {
                    c.collect_variables(vars);
                }
            }
        }
    }

    /// Renders the formula as a parenthesized infix expression over an
    /// indexed bit-vector `x`, e.g. `(x[0] & ~x[2])`.
    pub fn render(&self) -> Result<String, Error> {
        self.render_with(&|var: Var| format!("x[{}]", var.index()))
    }

    /// Same as [`Formula::render`], with a custom leaf renderer.
    pub fn render_with<F>(&self, leaf: &F) -> Result<String, Error>
    where
        F: Fn(Var) -> String,
    {
        match self {
            Formula::Leaf(var) => Ok(leaf(*var)),
            Formula::Not(child) => Ok(format!("~{}", child.render_with(leaf)?)),
            Formula::And(cs) | Formula::Or(cs) | Formula::Xor(cs) => {
                match cs.len() {
                    0 => match self {
                        Formula::Or(_) => Ok("0".to_string()),
                        Formula::And(_) => Ok("1".to_string()),
                        _ => Err(Error::EmptyXor),
                    },
                    1 => cs[0].render_with(leaf),
                    _ => {
                        let parts = cs.iter().map(|c| c.render_with(leaf)).collect::<Result<Vec<_>, _>>()?;
                        let sep = format!(" {} ", self.symbol());
                        Ok(format!("({})", parts.join(&sep)))
                    }
                }
            }
        }
    }
}

impl Formula {
    /// Applies the rewrite rules to every node, children before parents.
    pub fn rewrite_pass(self) -> Self {
        let mut changed = false;
        self.rewrite(&mut changed)
    }

    /// Rewrites the tree according to the given strategy.
    pub fn normalize(self, strategy: RewriteStrategy) -> Self {
        match strategy {
            RewriteStrategy::TwoPass => self.rewrite_pass().rewrite_pass(),
            RewriteStrategy::Fixpoint => {
                let mut formula = self;
                let mut passes = 0;
                loop {
                    let mut changed = false;
                    formula = formula.rewrite(&mut changed);
                    passes += 1;
                    if !changed {
                        break;
                    }
                }
                log::debug!("normalize: fixpoint after {} passes", passes);
                formula
            }
        }
    }

    fn rewrite(self, changed: &mut bool) -> Self {
        let node = match self {
            Formula::Leaf(var) => Formula::Leaf(var),
            Formula::Not(child) => Formula::Not(Box::new(child.rewrite(changed))),
            Formula::And(cs) => Formula::And(rewrite_all(cs, changed)),
            Formula::Or(cs) => Formula::Or(rewrite_all(cs, changed)),
            Formula::Xor(cs) => Formula::Xor(rewrite_all(cs, changed)),
        };
        let node = node.simplify_not_not(changed);
        let node = node.simplify_single_child(changed);
        node.simplify_flatten(changed)
    }

    fn simplify_not_not(self, changed: &mut bool) -> Self {
        match self {
            Formula::Not(child) => match *child {
                Formula::Not(inner) => {
                    *changed = true;
                    *inner
                }
                child => Formula::Not(Box::new(child)),
            },
            node => node,
        }
    }

    fn simplify_single_child(self, changed: &mut bool) -> Self {
        match self {
            Formula::And(mut cs) | Formula::Or(mut cs) | Formula::Xor(mut cs) if cs.len() == 1 => {
                *changed = true;
                cs.swap_remove(0)
            }
            node => node,
        }
    }

    fn simplify_flatten(self, changed: &mut bool) -> Self {
        match self {
            Formula::And(cs) => Formula::And(flatten(cs, changed, |c| match c {
                Formula::And(inner) => Ok(inner),
                other => Err(other),
            })),
            Formula::Or(cs) => Formula::Or(flatten(cs, changed, |c| match c {
                Formula::Or(inner) => Ok(inner),
                other => Err(other),
            })),
            Formula::Xor(cs) => Formula::Xor(flatten(cs, changed, |c| match c {
                Formula::Xor(inner) => Ok(inner),
                other => Err(other),
            })),
            node => node,
        }
    }
}

fn rewrite_all(children: Vec<Formula>, changed: &mut bool) -> Vec<Formula> {
    children.into_iter().map(|c| c.rewrite(changed)).collect()
}

/// Inlines every child for which `same_op` yields its grandchildren.
fn flatten<F>(children: Vec<Formula>, changed: &mut bool, same_op: F) -> Vec<Formula>
where
    F: Fn(Formula) -> Result<Vec<Formula>, Formula>,
{
    let mut result = Vec::with_capacity(children.len());
    for child in children {
        match same_op(child) {
            Ok(inner) => {
                *changed = true;
                result.extend(inner);
            }
            Err(other) => result.push(other),
        }
    }
    result
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Leaf(var) => write!(f, "{}", var),
            Formula::Not(child) => write!(f, "~{}", child),
            Formula::And(cs) | Formula::Or(cs) | Formula::Xor(cs) => {
                if cs.is_empty() {
                    return match self {
                        Formula::Or(_) => write!(f, "0"),
                        Formula::And(_) => write!(f, "1"),
                        _ => write!(f, "(^)"),
                    };
                }
                write!(f, "(")?;
                for (i, c) in cs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", self.symbol())?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn x(i: u32) -> Formula {
        Formula::leaf(Var::new(i))
    }

    #[test]
    fn test_size() {
        assert_eq!(x(0).size(), 1);
        assert_eq!(Formula::not(x(0)).size(), 2);
        let f = Formula::and(vec![x(0), Formula::or(vec![x(1), x(2)])]);
        assert_eq!(f.size(), 5);
        assert_eq!(Formula::zero().size(), 1);
    }

    #[test]
    fn test_evaluate() {
        // f = x0 & (x1 ^ ~x2)
        let f = Formula::and(vec![x(0), Formula::xor(vec![x(1), Formula::not(x(2))]).unwrap()]);
        for p in Point::all(3) {
            let expected = p.get(0) && (p.get(1) ^ !p.get(2));
            assert_eq!(f.evaluate(p), expected, "at {}", p);
        }
    }

    #[test]
    fn test_constants() {
        let p = Point::new(0, 1);
        assert!(!Formula::zero().evaluate(p));
        assert!(Formula::one().evaluate(p));
        assert_eq!(Formula::zero().render().unwrap(), "0");
        assert_eq!(Formula::one().render().unwrap(), "1");
    }

    #[test]
    fn test_empty_xor_fails() {
        assert!(matches!(Formula::xor(vec![]), Err(Error::EmptyXor)));
        let f = Formula::not(Formula::Xor(vec![]));
        assert!(matches!(f.render(), Err(Error::EmptyXor)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Xor node without children")]
    fn test_evaluate_empty_xor_panics() {
        Formula::and(vec![Formula::Xor(vec![])]).evaluate(Point::new(0, 1));
    }

    #[test]
    fn test_render() {
        let f = Formula::or(vec![Formula::and(vec![x(0), Formula::not(x(1))]), x(2)]);
        assert_eq!(f.render().unwrap(), "((x[0] & ~x[1]) | x[2])");
        assert_eq!(f.to_string(), "((x0 & ~x1) | x2)");
        // Single-child connectives render as their child.
        assert_eq!(Formula::and(vec![x(3)]).render().unwrap(), "x[3]");
    }

    #[test]
    fn test_not_not() {
        let f = Formula::not(Formula::not(Formula::not(Formula::not(x(0)))));
        assert_eq!(f.rewrite_pass(), x(0));
    }

    #[test]
    fn test_single_child_collapse() {
        let f = Formula::or(vec![Formula::and(vec![x(1)])]);
        assert_eq!(f.rewrite_pass(), x(1));
    }

    #[test]
    fn test_flatten_preserves_order() {
        let f = Formula::and(vec![x(0), Formula::and(vec![x(1), x(2)]), x(3), Formula::or(vec![x(4), x(5)])]);
        let expected = Formula::and(vec![x(0), x(1), x(2), x(3), Formula::or(vec![x(4), x(5)])]);
        assert_eq!(f.rewrite_pass(), expected);
    }

    #[test]
    fn test_two_pass_is_not_a_fixpoint_for_single_pass() {
        // Flattening the empty `Or` leaves a single-child `Or` that only the
        // next pass collapses.
        let f = Formula::or(vec![Formula::zero(), x(0)]);
        let once = f.clone().rewrite_pass();
        assert_eq!(once, Formula::or(vec![x(0)]));
        assert_eq!(f.clone().normalize(RewriteStrategy::TwoPass), x(0));
        assert_eq!(f.normalize(RewriteStrategy::Fixpoint), x(0));
    }

    #[test]
    fn test_normalize_idempotent() {
        let f = Formula::or(vec![
            Formula::and(vec![Formula::not(Formula::not(Formula::and(vec![x(0), x(1)]))), x(2)]),
            Formula::or(vec![Formula::or(vec![]), Formula::xor(vec![Formula::xor(vec![x(3)]).unwrap(), x(4)]).unwrap()]),
            Formula::and(vec![Formula::or(vec![Formula::zero(), Formula::not(x(5))])]),
        ]);
        let once = f.clone().normalize(RewriteStrategy::Fixpoint);
        let twice = once.clone().normalize(RewriteStrategy::Fixpoint);
        assert_eq!(once, twice);
        assert_eq!(once.clone().rewrite_pass(), once);
        for p in Point::all(6) {
            assert_eq!(f.evaluate(p), once.evaluate(p));
        }
    }

    #[test]
    fn test_variables() {
        let f = Formula::or(vec![x(3), Formula::not(x(1)), Formula::and(vec![x(3), x(0)])]);
        let vars: Vec<_> = f.variables().into_iter().map(|v| v.index()).collect();
        assert_eq!(vars, vec![0, 1, 3]);
    }
}
