//! Weighted set cover.
//!
//! The greedy heuristic repeatedly picks the set with the most not yet
//! covered elements per unit of weight, until the union of all sets is
//! covered. It is an `H(max |S|)`-approximation, not an exact minimum.

use log::debug;

use crate::bitset::BitSet;

/// Selects sets whose union equals the union of all `sets`.
///
/// Returns one flag per set. Ties are broken towards the lowest index, and
/// sets that add nothing new are never selected, so a set whose elements are
/// already covered (in particular an empty set) is dropped.
///
/// # Panics
///
/// Panics if `weights` and `sets` differ in length or a weight is zero.
pub fn greedy_set_cover(sets: &[BitSet], weights: &[usize]) -> Vec<bool> {
    assert_eq!(sets.len(), weights.len(), "One weight per set is required");
    assert!(weights.iter().all(|&w| w > 0), "Weights must be positive");

    let mut target = BitSet::new(0);
    for s in sets {
        target.union_with(s);
    }

    let mut selected = vec![false; sets.len()];
    let mut covered = BitSet::new(0);
    while covered.len() < target.len() {
        // Compare gain/weight ratios by cross-multiplication.
        let mut best: Option<(usize, usize)> = None;
        for (i, s) in sets.iter().enumerate() {
            if selected[i] {
                continue;
            }
            let gain = s.count_difference(&covered);
            if gain == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((j, best_gain)) => gain * weights[j] > best_gain * weights[i],
            };
            if better {
                best = Some((i, gain));
            }
        }
        let Some((i, gain)) = best else {
            break;
        };
        debug!("greedy_set_cover: pick {} (gain {}, weight {})", i, gain, weights[i]);
        selected[i] = true;
        covered.union_with(&sets[i]);
    }
    selected
}
