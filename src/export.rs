//! Code export and self-check.
//!
//! A formula is exported as a closure over an indexed bit-vector `x`, masked
//! to a single bit:
//!
//! ```text
//! |x| ((x[0] & ~x[1]) | x[2]) & 1
//! ```
//!
//! [`Program`] parses exactly this language back and evaluates it with
//! two's-complement bitwise semantics, so the self-check runs against the
//! exported text rather than the tree it came from. Precedence, from
//! tightest: `~`, `&`, `^`, `|`.

use log::debug;

use crate::error::Error;
use crate::formula::Formula;
use crate::pla::TruthTable;
use crate::types::Point;

/// Renders `formula` as exported code.
pub fn code(formula: &Formula) -> Result<String, Error> {
    Ok(format!("|x| {} & 1", formula.render()?))
}

/// Evaluates `code` on every record of `table`. Fails on the first record
/// where the result differs from the table.
pub fn validate(code: &str, table: &TruthTable) -> Result<(), Error> {
    let program = Program::compile(code, table.num_vars())?;
    for &(point, expected) in table.records() {
        let actual = program.call(point);
        if actual != expected {
            return Err(Error::Mismatch {
                point,
                expected,
                actual,
            });
        }
    }
    debug!("validate: {} records agree", table.records().len());
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Const(i64),
    Input(usize),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, point: Point) -> i64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Input(i) => point.get(*i) as i64,
            Expr::Not(e) => !e.eval(point),
            Expr::And(a, b) => a.eval(point) & b.eval(point),
            Expr::Or(a, b) => a.eval(point) | b.eval(point),
            Expr::Xor(a, b) => a.eval(point) ^ b.eval(point),
        }
    }
}

/// A compiled exported closure.
#[derive(Debug, Clone)]
pub struct Program {
    body: Expr,
}

impl Program {
    /// Parses `|x| <expr>`, rejecting inputs `x[i]` with `i >= num_vars`.
    pub fn compile(code: &str, num_vars: usize) -> Result<Self, Error> {
        let body = code
            .trim()
            .strip_prefix("|x|")
            .ok_or_else(|| code_error("expected `|x|`"))?;
        let mut parser = Parser {
            chars: body.chars().collect(),
            pos: 0,
            num_vars,
        };
        let body = parser.parse_or()?;
        parser.skip_whitespace();
        if parser.pos != parser.chars.len() {
            return Err(code_error(&format!("unexpected trailing input at offset {}", parser.pos)));
        }
        Ok(Program { body })
    }

    pub fn call(&self, point: Point) -> bool {
        self.body.eval(point) & 1 == 1
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    num_vars: usize,
}

impl Parser {
    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).copied()
    }

    fn expect(&mut self, c: char) -> Result<(), Error> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(code_error(&format!("expected {:?} at offset {}", c, self.pos)))
        }
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_xor()?;
        while self.peek() == Some('|') {
            self.pos += 1;
            let rhs = self.parse_xor()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_xor(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some('^') {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Xor(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_unary()?;
        while self.peek() == Some('&') {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        match self.peek() {
            Some('~') => {
                self.pos += 1;
                Ok(Expr::Not(Box::new(self.parse_unary()?)))
            }
            Some('(') => {
                self.pos += 1;
                let e = self.parse_or()?;
                self.expect(')')?;
                Ok(e)
            }
            Some('x') => {
                self.pos += 1;
                self.expect('[')?;
                let i = self.parse_number()? as usize;
                self.expect(']')?;
                if i >= self.num_vars {
                    return Err(code_error(&format!("index x[{}] out of range for {} inputs", i, self.num_vars)));
                }
                Ok(Expr::Input(i))
            }
            Some(c) if c.is_ascii_digit() => Ok(Expr::Const(self.parse_number()?)),
            Some(c) => Err(code_error(&format!("unexpected {:?} at offset {}", c, self.pos))),
            None => Err(code_error("unexpected end of input")),
        }
    }

    fn parse_number(&mut self) -> Result<i64, Error> {
        self.skip_whitespace();
        let start = self.pos;
        while self.chars.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| code_error(&format!("expected a number at offset {}", start)))
    }
}

fn code_error(message: &str) -> Error {
    Error::Parse {
        line: 1,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::types::Var;

    fn x(i: u32) -> Formula {
        Formula::leaf(Var::new(i))
    }

    #[test]
    fn test_code() {
        let f = Formula::or(vec![Formula::and(vec![x(0), Formula::not(x(1))]), x(2)]);
        assert_eq!(code(&f).unwrap(), "|x| ((x[0] & ~x[1]) | x[2]) & 1");
        assert_eq!(code(&Formula::zero()).unwrap(), "|x| 0 & 1");
        assert!(matches!(code(&Formula::Xor(vec![])), Err(Error::EmptyXor)));
    }

    #[test]
    fn test_negation_is_bitwise() {
        // ~x[0] & 1 is 1 exactly when x[0] is 0.
        let p = Program::compile("|x| ~x[0] & 1", 1).unwrap();
        assert!(p.call(Point::new(0, 1)));
        assert!(!p.call(Point::new(1, 1)));
        // Without the mask, ~~x[0] is x[0] again.
        let q = Program::compile("|x| ~~x[0]", 1).unwrap();
        assert!(q.call(Point::new(1, 1)));
    }

    #[test]
    fn test_precedence() {
        // x[0] | x[1] & x[2] parses as x[0] | (x[1] & x[2]).
        let p = Program::compile("|x| x[0] | x[1] & x[2]", 3).unwrap();
        for pt in Point::all(3) {
            assert_eq!(p.call(pt), pt.get(0) || (pt.get(1) && pt.get(2)), "at {}", pt);
        }
        // x[0] ^ x[1] | x[2] parses as (x[0] ^ x[1]) | x[2].
        let q = Program::compile("|x| x[0] ^ x[1] | x[2]", 3).unwrap();
        for pt in Point::all(3) {
            assert_eq!(q.call(pt), (pt.get(0) ^ pt.get(1)) || pt.get(2), "at {}", pt);
        }
    }

    #[test]
    fn test_code_matches_formula() {
        let f = Formula::xor(vec![
            Formula::not(Formula::and(vec![x(0), x(1)])),
            Formula::or(vec![x(2), Formula::one()]),
            x(3),
        ])
        .unwrap();
        let p = Program::compile(&code(&f).unwrap(), 4).unwrap();
        for pt in Point::all(4) {
            assert_eq!(p.call(pt), f.evaluate(pt), "at {}", pt);
        }
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(Program::compile("x[0] & 1", 1), Err(Error::Parse { .. })));
        assert!(matches!(Program::compile("|x| x[2] & 1", 2), Err(Error::Parse { .. })));
        assert!(matches!(Program::compile("|x| (x[0] & 1", 1), Err(Error::Parse { .. })));
        assert!(matches!(Program::compile("|x| x[0] x[0]", 1), Err(Error::Parse { .. })));
        assert!(matches!(Program::compile("|x| x[0] &", 1), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_validate() {
        let table = TruthTable::parse_pla(".i 2\n10 1\n11 1\n").unwrap();
        validate(&code(&x(0)).unwrap(), &table).unwrap();
        let err = validate(&code(&x(1)).unwrap(), &table);
        match err {
            Err(Error::Mismatch { point, expected, actual }) => {
                assert_eq!(point.to_string(), "10");
                assert!(expected);
                assert!(!actual);
            }
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }
}
