//! End-to-end tests: truth tables in, checked formulas out.

use groebner_min::error::Error;
use groebner_min::formula::{Formula, RewriteStrategy};
use groebner_min::pipeline::{run, Options};
use groebner_min::pla::TruthTable;
use groebner_min::stats::RunStatistics;
use groebner_min::synth::SynthConfig;
use groebner_min::types::Point;

fn minimize(table: &TruthTable, options: &Options) -> Formula {
    let mut stats = RunStatistics::default();
    let outcome = run(table, options, &mut stats).unwrap();
    for &(point, value) in table.records() {
        assert_eq!(outcome.formula.evaluate(point), value, "{} at {}", outcome.code, point);
    }
    assert_eq!(stats.formula_size, outcome.size);
    outcome.formula
}

fn table(n: usize, f: impl Fn(Point) -> bool) -> TruthTable {
    TruthTable::from_fn(n, f).unwrap()
}

// ─── Round Trip ────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_small_functions() {
    let functions: Vec<(usize, Box<dyn Fn(Point) -> bool>)> = vec![
        (1, Box::new(|p| !p.get(0))),
        (2, Box::new(|p| p.get(0) && !p.get(1))),
        (2, Box::new(|p| p.get(0) == p.get(1))),
        (3, Box::new(|p| p.get(0) ^ p.get(1) ^ p.get(2))),
        (3, Box::new(|p| if p.get(0) { p.get(1) } else { p.get(2) })),
        (4, Box::new(|p| p.bits().count_ones() == 2)),
        (4, Box::new(|p| (p.get(0) || p.get(1)) && (p.get(2) || p.get(3)))),
        (5, Box::new(|p| p.bits() % 3 == 0)),
    ];
    for (n, f) in functions {
        let t = table(n, f);
        minimize(&t, &Options::default());
        minimize(
            &t,
            &Options {
                negate: true,
                ..Options::default()
            },
        );
    }
}

#[test]
fn roundtrip_all_two_variable_functions() {
    for truth in 0..16u64 {
        let t = table(2, |p| (truth >> p.bits()) & 1 == 1);
        minimize(&t, &Options::default());
    }
}

#[test]
fn roundtrip_pla_input() {
    let text = "\
# 3-input majority
.i 3
.o 1
110 1
101 1
011 1
111 1
.e
";
    let t = TruthTable::parse_pla(text).unwrap();
    let f = minimize(&t, &Options::default());
    assert!(f.size() <= 10, "{}", f);
}

// ─── Options ───────────────────────────────────────────────────────────────────

#[test]
fn depth_zero_still_correct() {
    let t = table(5, |p| (p.get(0) && p.get(1)) ^ (p.get(2) && (p.get(3) || p.get(4))));
    let options = Options {
        synth: SynthConfig {
            max_depth: 0,
            ..SynthConfig::default()
        },
        ..Options::default()
    };
    minimize(&t, &options);
}

#[test]
fn two_pass_and_fixpoint_agree_semantically() {
    let t = table(4, |p| (p.get(0) || p.get(3)) && (p.get(1) ^ p.get(2)));
    let a = minimize(&t, &Options::default());
    let b = minimize(
        &t,
        &Options {
            rewrite: RewriteStrategy::TwoPass,
            ..Options::default()
        },
    );
    for p in Point::all(4) {
        assert_eq!(a.evaluate(p), b.evaluate(p));
    }
}

#[test]
fn tiny_budget_is_exhausted() {
    let t = table(3, |p| p.get(0) ^ (p.get(1) && p.get(2)));
    let options = Options {
        synth: SynthConfig {
            initial_budget: 1,
            ..SynthConfig::default()
        },
        ..Options::default()
    };
    let mut stats = RunStatistics::default();
    assert!(matches!(
        run(&t, &options, &mut stats),
        Err(Error::BudgetExhausted { budget: 1 })
    ));
}

// ─── Statistics ────────────────────────────────────────────────────────────────

#[test]
fn statistics_are_reported() {
    let t = table(3, |p| p.get(0) && (p.get(1) || p.get(2)));
    let mut stats = RunStatistics::default();
    let outcome = run(&t, &Options::default(), &mut stats).unwrap();
    let report = stats.to_string();
    assert!(report.contains("n=3"));
    assert!(report.contains(&format!("tree_size={}", outcome.size)));
    assert!(stats.ideal_calls >= 1);
    assert!(stats.time_total >= stats.time_tree_simplification);
}
