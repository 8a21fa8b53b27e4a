//! Two-level covers of domain subsets.
//!
//! A [`Cube`] is a product of signed literals over the local positions of a
//! variable list. A [`CoverMinimizer`] turns a set of points into a small set
//! of cubes whose union is exactly that set:
//!
//! - [`PrimeCover`] runs in-process: Quine-McCluskey prime generation
//!   followed by a greedy cover.
//! - [`Espresso`] delegates to an external `espresso` executable through the
//!   PLA text protocol.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::debug;

use crate::anf::{Monomial, Polynomial};
use crate::bitset::BitSet;
use crate::error::Error;
use crate::setcover::greedy_set_cover;
use crate::types::{Point, Var};

/// A product of literals. Position `i` is a literal iff bit `i` of `care` is
/// set, positive iff bit `i` of `value` is set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cube {
    care: u64,
    value: u64,
    len: u32,
}

impl Cube {
    pub fn new(care: u64, value: u64, len: usize) -> Self {
        Cube {
            care,
            value: value & care,
            len: len as u32,
        }
    }

    /// The cube containing exactly `point`.
    pub fn minterm(point: Point) -> Self {
        let full = Point::new(u64::MAX, point.len()).bits();
        Cube::new(full, point.bits(), point.len())
    }

    /// Parses an espresso cube such as `1-0`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut care = 0u64;
        let mut value = 0u64;
        for (i, c) in s.chars().enumerate() {
            match c {
                '-' | '2' => {}
                '1' => {
                    care |= 1 << i;
                    value |= 1 << i;
                }
                '0' => care |= 1 << i,
                _ => return Err(format!("unexpected character {:?} in cube {:?}", c, s)),
            }
        }
        Ok(Cube::new(care, value, s.chars().count()))
    }

    /// Number of positions.
    pub fn width(self) -> usize {
        self.len as usize
    }

    pub fn care(self) -> u64 {
        self.care
    }

    pub fn value(self) -> u64 {
        self.value
    }

    /// Number of literals.
    pub fn literals(self) -> usize {
        self.care.count_ones() as usize
    }

    pub fn contains(self, point: Point) -> bool {
        point.bits() & self.care == self.value
    }

    /// The product `prod (x or x + 1)` over the given variable handles,
    /// where position `i` refers to `vars[i]`.
    pub fn to_polynomial(self, vars: &[Var]) -> Polynomial {
        let mut p = Polynomial::one();
        for (i, &var) in vars.iter().enumerate() {
            if (self.care >> i) & 1 == 0 {
                continue;
            }
            let x = Monomial::var(var);
            if (self.value >> i) & 1 == 1 {
                p = p.mul_monomial(x);
            } else {
                // p * (x + 1)
                let px = p.mul_monomial(x);
                p += &px;
            }
        }
        p
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            let c = match ((self.care >> i) & 1, (self.value >> i) & 1) {
                (0, _) => '-',
                (_, 1) => '1',
                _ => '0',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Covers a domain subset with cubes.
pub trait CoverMinimizer {
    /// Returns cubes over `num_vars` positions whose union is exactly `points`.
    fn minimize(&mut self, num_vars: usize, points: &[Point]) -> Result<Vec<Cube>, Error>;
}

/// In-process two-level minimizer.
#[derive(Debug, Default, Clone)]
pub struct PrimeCover;

impl PrimeCover {
    /// All prime implicants of the point set, by iterated merging of cubes
    /// that differ in exactly one literal.
    pub fn prime_implicants(points: &[Point]) -> Vec<Cube> {
        let mut current: BTreeSet<Cube> = points.iter().map(|&p| Cube::minterm(p)).collect();
        let mut primes = Vec::new();
        while !current.is_empty() {
            let mut next = BTreeSet::new();
            let mut merged = BTreeSet::new();
            for &c in current.iter() {
                let mut bits = c.care & !c.value;
                while bits != 0 {
                    let b = bits & bits.wrapping_neg();
                    bits &= bits - 1;
                    let partner = Cube::new(c.care, c.value | b, c.len as usize);
                    if current.contains(&partner) {
                        next.insert(Cube::new(c.care & !b, c.value, c.len as usize));
                        merged.insert(c);
                        merged.insert(partner);
                    }
                }
            }
            primes.extend(current.iter().filter(|c| !merged.contains(c)).copied());
            current = next;
        }
        primes
    }
}

impl CoverMinimizer for PrimeCover {
    fn minimize(&mut self, num_vars: usize, points: &[Point]) -> Result<Vec<Cube>, Error> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let primes = PrimeCover::prime_implicants(points);
        let sets: Vec<BitSet> = primes
            .iter()
            .map(|c| {
                let mut s = BitSet::new(points.len());
                for (i, &p) in points.iter().enumerate() {
                    if c.contains(p) {
                        s.insert(i);
                    }
                }
                s
            })
            .collect();
        // Fewer literals per cube is better.
        let weights: Vec<usize> = primes.iter().map(|c| 1 + c.literals()).collect();
        let selected = greedy_set_cover(&sets, &weights);
        let cover: Vec<Cube> = primes
            .into_iter()
            .zip(selected)
            .filter_map(|(c, sel)| sel.then_some(c))
            .collect();
        debug!("PrimeCover: {} points over {} vars -> {} cubes", points.len(), num_vars, cover.len());
        Ok(cover)
    }
}

/// Out-of-process minimizer calling the `espresso` executable.
#[derive(Debug, Clone)]
pub struct Espresso {
    pub executable: PathBuf,
    /// Extra arguments passed before the PLA is piped in.
    pub args: Vec<String>,
}

impl Espresso {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Espresso {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The PLA input listing every point as an ON-set row.
    pub fn pla_input(num_vars: usize, points: &[Point]) -> String {
        let mut input = format!(".i {}\n.o 1\n", num_vars);
        for p in points {
            input.push_str(&format!("{} 1\n", p));
        }
        input.push_str(".e\n");
        input
    }

    /// Parses the cubes of an espresso output PLA. Every cube must have
    /// exactly `num_vars` positions.
    pub fn parse_output(output: &str, num_vars: usize) -> Result<Vec<Cube>, Error> {
        let mut cubes = Vec::new();
        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('.') || line.starts_with('#') {
                continue;
            }
            let cube = line
                .split_whitespace()
                .next()
                .ok_or_else(|| Error::Oracle(format!("malformed espresso output line {:?}", line)))?;
            let cube = Cube::parse(cube).map_err(Error::Oracle)?;
            if cube.width() != num_vars {
                return Err(Error::Oracle(format!(
                    "espresso cube {} has {} positions, expected {}",
                    cube,
                    cube.width(),
                    num_vars
                )));
            }
            cubes.push(cube);
        }
        Ok(cubes)
    }
}

impl CoverMinimizer for Espresso {
    fn minimize(&mut self, num_vars: usize, points: &[Point]) -> Result<Vec<Cube>, Error> {
        debug!("Starting espresso ({} bits, {} truth-values)", num_vars, points.len());
        let mut child = Command::new(&self.executable)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Oracle(format!("cannot run {}: {}", self.executable.display(), e)))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| Error::Oracle("espresso stdin unavailable".to_string()))?;
            stdin
                .write_all(Espresso::pla_input(num_vars, points).as_bytes())
                .map_err(|e| Error::Oracle(format!("cannot write to espresso: {}", e)))?;
        }

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(Error::Oracle(stderr.trim().to_string()));
        }
        if !output.status.success() {
            return Err(Error::Oracle(format!("espresso exited with {}", output.status)));
        }
        Espresso::parse_output(&String::from_utf8_lossy(&output.stdout), num_vars)
    }
}
