//! Permutation recombination and perturbation primitives.
//!
//! These work on raw `&[usize]` orders holding each of `0..n` exactly once
//! and are wrapped by [`PmxCrossover`](super::PmxCrossover),
//! [`OrderCrossover`](super::OrderCrossover) and
//! [`SwapMutation`](super::SwapMutation).

use crate::random;
use rand::RngCore;

/// Order crossover (OX).
///
/// Each child keeps a random segment of one parent in place and fills the
/// remaining slots, starting right after the segment and wrapping around,
/// with the other parent's genes in their original relative order.
pub fn order(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut dyn RngCore,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    if n < 2 || n != parent2.len() {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let (start, end) = segment(n, rng);
    (
        order_child(parent1, parent2, start, end),
        order_child(parent2, parent1, start, end),
    )
}

fn order_child(keep: &[usize], fill: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = keep.len();
    let mut child = keep.to_vec();
    let mut kept = vec![false; n];
    for &gene in &keep[start..=end] {
        kept[gene] = true;
    }

    let mut slot = (end + 1) % n;
    for k in 1..=n {
        let gene = fill[(end + k) % n];
        if !kept[gene] {
            child[slot] = gene;
            slot = (slot + 1) % n;
        }
    }
    child
}

/// Partially mapped crossover (PMX).
///
/// Each child copies a random segment from one parent; genes of the other
/// parent's segment that were displaced are relocated by following the
/// segment mapping until a slot outside the segment is found, and every
/// remaining slot is taken from the other parent unchanged.
pub fn pmx(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut dyn RngCore,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    if n < 2 || n != parent2.len() {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let (start, end) = segment(n, rng);
    (
        pmx_child(parent1, parent2, start, end),
        pmx_child(parent2, parent1, start, end),
    )
}

fn pmx_child(keep: &[usize], fill: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = keep.len();
    let mut position_in_fill = vec![0; n];
    for (pos, &gene) in fill.iter().enumerate() {
        position_in_fill[gene] = pos;
    }

    let mut child: Vec<Option<usize>> = vec![None; n];
    let mut placed = vec![false; n];
    for i in start..=end {
        child[i] = Some(keep[i]);
        placed[keep[i]] = true;
    }

    for i in start..=end {
        let gene = fill[i];
        if placed[gene] {
            continue;
        }
        let mut pos = position_in_fill[keep[i]];
        while (start..=end).contains(&pos) {
            pos = position_in_fill[keep[pos]];
        }
        child[pos] = Some(gene);
        placed[gene] = true;
    }

    child
        .into_iter()
        .zip(fill)
        .map(|(slot, &gene)| slot.unwrap_or(gene))
        .collect()
}

/// Exchanges two distinct random positions.
pub fn swap(order: &mut [usize], rng: &mut dyn RngCore) {
    let n = order.len();
    if n < 2 {
        return;
    }
    let i = random::index(rng, n);
    let mut j = random::index(rng, n - 1);
    if j >= i {
        j += 1;
    }
    order.swap(i, j);
}

/// A random inclusive segment `[start, end]` inside `0..n`.
fn segment(n: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let a = random::index(rng, n);
    let b = random::index(rng, n);
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn is_permutation(order: &[usize], n: usize) -> bool {
        let mut seen = vec![false; n];
        order.len() == n
            && order
                .iter()
                .all(|&g| g < n && !std::mem::replace(&mut seen[g], true))
    }

    // ---- OX ----

    #[test]
    fn test_order_children_are_permutations() {
        let mut rng = create_rng(42);
        let p1: Vec<usize> = (0..8).collect();
        let p2: Vec<usize> = (0..8).rev().collect();
        for _ in 0..200 {
            let (c1, c2) = order(&p1, &p2, &mut rng);
            assert!(is_permutation(&c1, 8), "{c1:?}");
            assert!(is_permutation(&c2, 8), "{c2:?}");
        }
    }

    #[test]
    fn test_order_segment_kept_in_place() {
        let p1 = vec![0, 1, 2, 3, 4, 5];
        let p2 = vec![5, 3, 1, 4, 2, 0];
        let child = order_child(&p1, &p2, 2, 3);
        assert_eq!(&child[2..=3], &[2, 3]);
        // Fill starts after the segment: p2 from index 4 on is 2,0,5,3,1,4.
        assert_eq!(child, vec![1, 4, 2, 3, 0, 5]);
    }

    // ---- PMX ----

    #[test]
    fn test_pmx_children_are_permutations() {
        let mut rng = create_rng(7);
        let p1: Vec<usize> = (0..8).collect();
        let p2 = vec![3, 7, 5, 1, 6, 0, 2, 4];
        for _ in 0..200 {
            let (c1, c2) = pmx(&p1, &p2, &mut rng);
            assert!(is_permutation(&c1, 8), "{c1:?}");
            assert!(is_permutation(&c2, 8), "{c2:?}");
        }
    }

    #[test]
    fn test_pmx_follows_mapping_chain() {
        let p1 = vec![1, 2, 3, 4, 5, 6, 7, 8, 0];
        let p2 = vec![4, 5, 2, 1, 8, 7, 6, 0, 3];
        let child = pmx_child(&p1, &p2, 3, 5);
        assert_eq!(&child[3..=5], &[4, 5, 6]);
        assert!(is_permutation(&child, 9));
        // Genes displaced from p2's segment land where the mapping ends.
        assert_eq!(child, vec![1, 8, 2, 4, 5, 6, 7, 0, 3]);
    }

    #[test]
    fn test_identical_parents_unchanged() {
        let mut rng = create_rng(1);
        let p: Vec<usize> = (0..6).collect();
        assert_eq!(pmx(&p, &p, &mut rng), (p.clone(), p.clone()));
        assert_eq!(order(&p, &p, &mut rng), (p.clone(), p.clone()));
    }

    // ---- Swap ----

    #[test]
    fn test_swap_changes_exactly_two_positions() {
        let mut rng = create_rng(3);
        for _ in 0..100 {
            let mut p: Vec<usize> = (0..10).collect();
            swap(&mut p, &mut rng);
            let moved = p.iter().enumerate().filter(|(i, &g)| *i != g).count();
            assert_eq!(moved, 2);
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut rng = create_rng(3);
        let mut p = vec![0];
        swap(&mut p, &mut rng);
        assert_eq!(p, vec![0]);
    }

    proptest! {
        #[test]
        fn prop_crossovers_preserve_permutations(n in 2usize..30, seed in 0u64..1000) {
            let mut rng = create_rng(seed);
            let p1 = random::int_permutation(n, &mut rng);
            let p2 = random::int_permutation(n, &mut rng);
            let (a, b) = pmx(&p1, &p2, &mut rng);
            prop_assert!(is_permutation(&a, n) && is_permutation(&b, n));
            let (a, b) = order(&p1, &p2, &mut rng);
            prop_assert!(is_permutation(&a, n) && is_permutation(&b, n));
        }
    }
}
