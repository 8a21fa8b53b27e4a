//! Type-safe wrappers for variables and domain points.
//!
//! Variables are abstract handles into the ordered variable list of a truth
//! table. Domain points are bit-packed assignments to such a list.

use std::fmt;

use crate::error::Error;

/// Maximum number of variables a [`Point`] can hold.
pub const MAX_VARS: usize = 64;

/// A variable handle (0-indexed).
///
/// The index is the position of the variable in the input bit-vector, so a
/// variable renders as `x[i]` in exported code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 64`.
    pub fn new(index: u32) -> Self {
        assert!((index as usize) < MAX_VARS, "Variable index must be < {}", MAX_VARS);
        Var(index)
    }

    /// Returns the raw variable index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the single-bit mask of this variable.
    pub fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Returns the handles `x0 .. x{n-1}`.
pub fn vars(n: usize) -> Result<Vec<Var>, Error> {
    if n > MAX_VARS {
        return Err(Error::TooManyVariables { n });
    }
    Ok((0..n as u32).map(Var::new).collect())
}

/// One full assignment of `len` Boolean variables.
///
/// Bit `i` of `bits` is the value of the `i`-th variable of the list the point
/// is defined over. For the global domain that is variable `x{i}`; inside a
/// recursive sub-problem it is the `i`-th variable of the sub-problem.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Point {
    bits: u64,
    len: u32,
}

impl Point {
    /// Creates a point from packed bits. Bits above `len` are cleared.
    pub fn new(bits: u64, len: usize) -> Self {
        assert!(len <= MAX_VARS, "Point length must be <= {}", MAX_VARS);
        let mask = if len == MAX_VARS { u64::MAX } else { (1u64 << len) - 1 };
        Point {
            bits: bits & mask,
            len: len as u32,
        }
    }

    /// Creates a point from a slice of bits, `bits[i]` being variable `i`.
    pub fn from_bools(bits: &[bool]) -> Self {
        let packed = bits.iter().enumerate().fold(0u64, |acc, (i, &b)| acc | ((b as u64) << i));
        Point::new(packed, bits.len())
    }

    pub fn bits(self) -> u64 {
        self.bits
    }

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Value of the `i`-th variable.
    pub fn get(self, i: usize) -> bool {
        (self.bits >> i) & 1 == 1
    }

    /// Iterates over all `2^len` points of the given length, in index order.
    pub fn all(len: usize) -> impl Iterator<Item = Point> {
        assert!(len < MAX_VARS, "Cannot enumerate a 2^{} domain", len);
        (0..1u64 << len).map(move |bits| Point::new(bits, len))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            write!(f, "{}", self.get(i) as u8)?;
        }
        Ok(())
    }
}

/// A set of domain points, kept in insertion order without duplicates.
pub type DomainSubset = Vec<Point>;
