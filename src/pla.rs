//! Truth-table input.
//!
//! Two formats are read:
//!
//! - Espresso PLA files: a `.i n` header, `#` comments and one `bits output`
//!   record per line. Points without a record have output 0.
//! - Bit-CSV directories: `bits.csv` lists, per output bit, the input bit
//!   positions it depends on; `bit_k.csv` has one `x,y` record per line, the
//!   integer input `x` and output bit `y`. Inputs are projected onto the
//!   relevant positions.
//!
//! In both formats, character `i` of a bit string is variable `x{i}`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::types::{DomainSubset, Point, MAX_VARS};

#[derive(Debug, Clone)]
pub struct TruthTable {
    num_vars: usize,
    /// For each variable, the input bit it was read from.
    input_bits: Vec<usize>,
    records: Vec<(Point, bool)>,
}

impl TruthTable {
    /// Tabulates `f` on the whole domain.
    pub fn from_fn(num_vars: usize, f: impl Fn(Point) -> bool) -> Result<Self, Error> {
        if num_vars >= MAX_VARS {
            return Err(Error::TooManyVariables { n: num_vars });
        }
        Ok(TruthTable {
            num_vars,
            input_bits: (0..num_vars).collect(),
            records: Point::all(num_vars).map(|p| (p, f(p))).collect(),
        })
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn input_bits(&self) -> &[usize] {
        &self.input_bits
    }

    pub fn records(&self) -> &[(Point, bool)] {
        &self.records
    }

    /// The points with output 1, or output 0 when `negate` is set.
    pub fn target(&self, negate: bool) -> DomainSubset {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|&&(_, y)| y != negate)
            .map(|&(p, _)| p)
            .filter(|p| seen.insert(*p))
            .collect()
    }

    pub fn read_pla(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path.as_ref())?;
        TruthTable::parse_pla(&text)
    }

    pub fn parse_pla(text: &str) -> Result<Self, Error> {
        let mut num_vars: Option<usize> = None;
        let mut outputs: HashMap<Point, bool> = HashMap::new();
        let mut records = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(directive) = line.strip_prefix('.') {
                let mut parts = directive.split_whitespace();
                match parts.next() {
                    Some("i") => {
                        let n = parts
                            .next()
                            .and_then(|s| s.parse::<usize>().ok())
                            .ok_or_else(|| parse_error(line_no, "expected `.i <count>`"))?;
                        if num_vars.is_some_and(|m| m != n) {
                            return Err(parse_error(line_no, "`.i` does not match the records"));
                        }
                        num_vars = Some(n);
                    }
                    Some("e") | Some("end") => break,
                    _ => {}
                }
                continue;
            }

            let mut parts = line.split_whitespace();
            let (Some(bits), Some(out), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(parse_error(line_no, "expected `<input bits> <output bit>`"));
            };

            let width = bits.chars().count();
            if width >= MAX_VARS {
                return Err(Error::TooManyVariables { n: width });
            }
            match num_vars {
                Some(n) if n != width => {
                    return Err(parse_error(line_no, &format!("expected {} input bits, found {}", n, width)));
                }
                _ => num_vars = Some(width),
            }

            let mut values = Vec::with_capacity(width);
            for c in bits.chars() {
                match c {
                    '0' => values.push(false),
                    '1' => values.push(true),
                    '-' | '2' => return Err(Error::DontCare { line: line_no }),
                    _ => return Err(parse_error(line_no, &format!("unexpected input character {:?}", c))),
                }
            }
            let y = match out {
                "0" => false,
                "1" => true,
                _ => return Err(parse_error(line_no, &format!("unsupported output {:?}", out))),
            };

            let point = Point::from_bools(&values);
            match outputs.insert(point, y) {
                Some(prev) if prev != y => {
                    return Err(parse_error(line_no, &format!("conflicting outputs for {}", point)));
                }
                _ => records.push((point, y)),
            }
        }

        let num_vars = num_vars.unwrap_or(0);
        if num_vars >= MAX_VARS {
            return Err(Error::TooManyVariables { n: num_vars });
        }
        let explicit = records.len();
        records.extend(Point::all(num_vars).filter(|p| !outputs.contains_key(p)).map(|p| (p, false)));
        debug!("PLA: {} variables, {} explicit records, {} total", num_vars, explicit, records.len());

        Ok(TruthTable {
            num_vars,
            input_bits: (0..num_vars).collect(),
            records,
        })
    }

    /// Reads output bit `bit` from a bit-CSV directory.
    pub fn read_bits_csv(dir: impl AsRef<Path>, bit: usize) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let bits_text = fs::read_to_string(dir.join("bits.csv"))?;
        let data_text = fs::read_to_string(dir.join(format!("bit_{}.csv", bit)))?;
        TruthTable::parse_bits_csv(&bits_text, &data_text, bit)
    }

    /// Parses the contents of `bits.csv` and `bit_{bit}.csv`.
    pub fn parse_bits_csv(bits_text: &str, data_text: &str, bit: usize) -> Result<Self, Error> {
        let line = bits_text
            .lines()
            .nth(bit)
            .ok_or_else(|| parse_error(bit + 1, &format!("no relevant bits listed for output bit {}", bit)))?;
        let input_bits = line
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<usize>() {
                Ok(b) if b < MAX_VARS => Ok(b),
                _ => Err(parse_error(bit + 1, &format!("invalid bit position {:?}", s))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let num_vars = input_bits.len();
        if num_vars >= MAX_VARS {
            return Err(Error::TooManyVariables { n: num_vars });
        }

        let mut records = Vec::new();
        for (index, line) in data_text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((x, y)) = line.split_once(',') else {
                return Err(parse_error(line_no, "expected `x,y`"));
            };
            let x: u64 = x
                .trim()
                .parse()
                .map_err(|_| parse_error(line_no, &format!("invalid input {:?}", x)))?;
            let y = match y.trim() {
                "0" => false,
                "1" => true,
                other => return Err(parse_error(line_no, &format!("invalid output {:?}", other))),
            };
            let values: Vec<bool> = input_bits.iter().map(|&b| (x >> b) & 1 == 1).collect();
            records.push((Point::from_bools(&values), y));
        }
        debug!("bit-CSV: output bit {} depends on {:?}, {} records", bit, input_bits, records.len());

        Ok(TruthTable {
            num_vars,
            input_bits,
            records,
        })
    }
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_parse_pla_fills_zeros() {
        let text = "# x0 and anything\n.i 2\n.o 1\n10 1\n11 1\n.e\n";
        let table = TruthTable::parse_pla(text).unwrap();
        assert_eq!(table.num_vars(), 2);
        assert_eq!(table.records().len(), 4);
        let on: Vec<_> = table.target(false).iter().map(|p| p.to_string()).collect();
        assert_eq!(on, vec!["10", "11"]);
        let off: Vec<_> = table.target(true).iter().map(|p| p.to_string()).collect();
        assert_eq!(off, vec!["00", "01"]);
    }

    #[test]
    fn test_explicit_zero_records() {
        let table = TruthTable::parse_pla("100 0\n011 1\n").unwrap();
        assert_eq!(table.num_vars(), 3);
        assert_eq!(table.records().len(), 8);
        assert_eq!(table.records()[0], (Point::from_bools(&[true, false, false]), false));
        assert_eq!(table.target(false), vec![Point::from_bools(&[false, true, true])]);
    }

    #[test]
    fn test_dont_care_rejected() {
        let err = TruthTable::parse_pla(".i 2\n1- 1\n");
        assert!(matches!(err, Err(Error::DontCare { line: 2 })));
    }

    #[test]
    fn test_width_mismatch() {
        let err = TruthTable::parse_pla(".i 3\n10 1\n");
        assert!(matches!(err, Err(Error::Parse { line: 2, .. })));
        let err = TruthTable::parse_pla("10 1\n101 1\n");
        assert!(matches!(err, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_conflicting_records() {
        let err = TruthTable::parse_pla("10 1\n10 0\n");
        assert!(matches!(err, Err(Error::Parse { line: 2, .. })));
        // Repeating a record with the same output is fine.
        assert!(TruthTable::parse_pla("10 1\n10 1\n").is_ok());
    }

    #[test]
    fn test_malformed_record() {
        assert!(matches!(TruthTable::parse_pla("101\n"), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(TruthTable::parse_pla("101 x\n"), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(TruthTable::parse_pla(".i two\n"), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_parse_bits_csv() {
        // Output bit 1 depends on input bits 0 and 3.
        let bits = "0,1\n0,3,\n";
        let data = "9,1\n8,0\n1,0\n0,0\n";
        let table = TruthTable::parse_bits_csv(bits, data, 1).unwrap();
        assert_eq!(table.num_vars(), 2);
        assert_eq!(table.input_bits(), &[0, 3]);
        assert_eq!(table.records().len(), 4);
        assert_eq!(table.target(false), vec![Point::from_bools(&[true, true])]);
        assert_eq!(table.records()[1].0, Point::from_bools(&[false, true]));
    }

    #[test]
    fn test_bits_csv_errors() {
        assert!(matches!(TruthTable::parse_bits_csv("0\n", "1,1\n", 3), Err(Error::Parse { .. })));
        assert!(matches!(TruthTable::parse_bits_csv("0\n", "1;1\n", 0), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(TruthTable::parse_bits_csv("0\n", "1,2\n", 0), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_read_bits_csv_dir() {
        let dir = std::env::temp_dir().join(format!("groebner-min-bits-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bits.csv"), "1\n").unwrap();
        fs::write(dir.join("bit_0.csv"), "2,1\n0,0\n").unwrap();
        let table = TruthTable::read_bits_csv(&dir, 0).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(table.target(false), vec![Point::from_bools(&[true])]);
    }

    #[test]
    fn test_missing_file() {
        let err = TruthTable::read_pla("/nonexistent/table.pla");
        assert!(matches!(err, Err(Error::Io(_))));
    }

    #[test]
    fn test_from_fn() {
        let table = TruthTable::from_fn(3, |p| p.get(0) ^ p.get(2)).unwrap();
        assert_eq!(table.records().len(), 8);
        assert_eq!(table.target(false).len(), 4);
    }
}
