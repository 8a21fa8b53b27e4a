//! Formula tree to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! - **Connectives** (`&`, `|`, `^`) are ellipses labelled with their symbol
//! - **Leaves** are boxes labelled `x[i]`
//! - **Constants** (empty `And`/`Or`) are boxes labelled `1`/`0`
//! - **Negation** is not a node: the edge into the negated subtree is drawn
//!   dotted with a hollow arrowhead
//!
//! # Examples
//!
//! ```
//! use groebner_min::formula::Formula;
//! use groebner_min::types::Var;
//!
//! let f = Formula::and(vec![Formula::leaf(Var::new(0)), Formula::not(Formula::leaf(Var::new(1)))]);
//! let dot = f.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::formula::Formula;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for connective nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Shape for variable leaves (default: "box")
    pub leaf_shape: &'static str,
    /// Shape for constants (default: "square")
    pub constant_shape: &'static str,
    /// Style for plain edges (default: "solid")
    pub edge_style: &'static str,
    /// Style for negated edges (default: "dotted")
    pub negated_edge_style: &'static str,
    /// Rank the leaves together at the bottom (default: true)
    pub leaves_at_bottom: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            leaf_shape: "box",
            constant_shape: "square",
            edge_style: "solid",
            negated_edge_style: "dotted",
            leaves_at_bottom: true,
        }
    }
}

impl Formula {
    /// Converts the tree to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the tree to DOT format.
    ///
    /// Nodes are numbered in pre-order, so the output is deterministic.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph formula {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        let mut writer = DotWriter {
            dot: &mut dot,
            config,
            next_id: 0,
            leaves: Vec::new(),
        };
        let (root, negated) = writer.write_node(self)?;
        if negated {
            // A negated root gets an explicit entry edge.
            writeln!(writer.dot, "root [shape=point];")?;
            writeln!(
                writer.dot,
                "root -> n{} [style={}, arrowhead=onormal];",
                root, config.negated_edge_style
            )?;
        }

        if config.leaves_at_bottom && !writer.leaves.is_empty() {
            let leaves: Vec<String> = writer.leaves.iter().map(|id| format!("n{}", id)).collect();
            writeln!(dot, "{{ rank=sink; {}; }}", leaves.join("; "))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

struct DotWriter<'a> {
    dot: &'a mut String,
    config: &'a DotConfig,
    next_id: usize,
    leaves: Vec<usize>,
}

impl DotWriter<'_> {
    /// Writes the subtree and returns the id of its top node, and whether the
    /// edge into it is negated.
    fn write_node(&mut self, formula: &Formula) -> Result<(usize, bool), std::fmt::Error> {
        if let Formula::Not(child) = formula {
            let (id, negated) = self.write_node(child)?;
            return Ok((id, !negated));
        }

        let id = self.next_id;
        self.next_id += 1;
        match formula {
            Formula::Leaf(var) => {
                writeln!(self.dot, "n{} [label=\"x[{}]\", shape={}];", id, var.index(), self.config.leaf_shape)?;
                self.leaves.push(id);
            }
            Formula::And(cs) if cs.is_empty() => {
                writeln!(self.dot, "n{} [label=\"1\", shape={}];", id, self.config.constant_shape)?;
            }
            Formula::Or(cs) if cs.is_empty() => {
                writeln!(self.dot, "n{} [label=\"0\", shape={}];", id, self.config.constant_shape)?;
            }
            _ => {
                writeln!(self.dot, "n{} [label=\"{}\"];", id, formula.symbol())?;
                for child in formula.children() {
                    let (child_id, negated) = self.write_node(child)?;
                    if negated {
                        writeln!(
                            self.dot,
                            "n{} -> n{} [style={}, arrowhead=onormal];",
                            id, child_id, self.config.negated_edge_style
                        )?;
                    } else {
                        writeln!(self.dot, "n{} -> n{} [style={}];", id, child_id, self.config.edge_style)?;
                    }
                }
            }
        }
        Ok((id, false))
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
    fn test_to_dot() {
        let f = Formula::or(vec![Formula::and(vec![x(0), Formula::not(x(1))]), x(2)]);
        let dot = f.to_dot().unwrap();
        assert!(dot.starts_with("digraph formula {"));
        assert!(dot.contains("n0 [label=\"|\"];"));
        assert!(dot.contains("n1 [label=\"&\"];"));
        assert!(dot.contains("n3 [label=\"x[1]\", shape=box];"));
        assert!(dot.contains("n1 -> n3 [style=dotted, arrowhead=onormal];"));
        assert!(dot.contains("n0 -> n4 [style=solid];"));
        assert!(dot.contains("{ rank=sink; n2; n3; n4; }"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_double_negation_cancels() {
        let f = Formula::and(vec![Formula::not(Formula::not(x(0))), x(1)]);
        let dot = f.to_dot().unwrap();
        assert!(dot.contains("n0 -> n1 [style=solid];"));
    }

    #[test]
    fn test_negated_root_and_constants() {
        let dot = Formula::not(x(0)).to_dot().unwrap();
        assert!(dot.contains("root -> n0 [style=dotted, arrowhead=onormal];"));

        let config = DotConfig {
            constant_shape: "circle",
            leaves_at_bottom: false,
            ..DotConfig::default()
        };
        let dot = Formula::zero().to_dot_with_config(&config).unwrap();
        assert!(dot.contains("n0 [label=\"0\", shape=circle];"));
        assert!(!dot.contains("rank=sink"));
    }
}
