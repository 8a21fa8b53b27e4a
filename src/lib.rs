//! # groebner-min: Boolean function minimization with Gröbner bases
//!
//! **`groebner-min`** derives a compact formula for a Boolean function given as a truth table.
//! The function's ON-set is described by an ideal of Boolean polynomials; its reduced Gröbner
//! basis, split into irreducible factors, is read back as an OR of ANDs of XOR-literals.
//! Factors of degree two or more are themselves synthesized recursively when that pays off.
//!
//! ## Pipeline
//!
//! 1. **Input**: a PLA truth table or a bit-CSV directory ([`pla`]).
//! 2. **Synthesis**: recursive branch-and-bound over two oracles ([`synth`], [`oracle`]):
//!    - the ideal oracle covers the target points with cubes ([`cover`]) and computes a
//!      Gröbner basis ([`groebner`]) over [`anf`] polynomials,
//!    - the factor oracle splits basis elements into irreducible factors ([`factor`]).
//! 3. **Rewriting**: double negations, single-child connectives and nested connectives of the
//!    same kind are removed ([`formula`]).
//! 4. **Redundancy elimination**: each AND/OR keeps a light subset of its children found by
//!    weighted set cover over the whole domain ([`reduce`], [`setcover`]).
//! 5. **Export**: the formula is rendered as code and re-evaluated against the table ([`export`]).
//!
//! [`pipeline::run`] ties these together.
//!
//! ## Basic Usage
//!
//! ```rust
//! use groebner_min::pipeline::{run, Options};
//! use groebner_min::pla::TruthTable;
//! use groebner_min::stats::RunStatistics;
//!
//! // f = x0 & (x1 | x2)
//! let table = TruthTable::from_fn(3, |p| p.get(0) && (p.get(1) || p.get(2))).unwrap();
//! let mut stats = RunStatistics::default();
//! let outcome = run(&table, &Options::default(), &mut stats).unwrap();
//! for &(point, value) in table.records() {
//!     assert_eq!(outcome.formula.evaluate(point), value);
//! }
//! println!("formula = {}", outcome.code);
//! ```
//!
//! Redundancy elimination and the self-check evaluate all `2^n` points, so the crate targets
//! functions of at most a few tens of variables.

pub mod anf;
pub mod bitset;
pub mod cover;
pub mod dot;
pub mod error;
pub mod export;
pub mod factor;
pub mod formula;
pub mod groebner;
pub mod oracle;
pub mod pipeline;
pub mod pla;
pub mod reduce;
pub mod setcover;
pub mod stats;
pub mod synth;
pub mod types;
