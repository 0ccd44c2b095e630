//! Permutation crossover and mutation operators.
//!
//! # Crossover
//!
//! - [`pmx_child`] / [`pmx`]: Partially Mapped Crossover around a prefix
//!   cut point (Goldberg & Lingle, 1985)
//! - [`crossover_pool`]: applies PMX to every consecutive pair of a mating
//!   pool with one shared cut point
//!
//! # Mutation
//!
//! - [`swap_mutation`]: exchange two distinct random positions
//! - [`mutate`]: bounded number of independent swap trials on a copy
//!
//! # References
//!
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use crate::error::{Result, TspError};
use crate::tour::{is_permutation, Tour};
use rand::Rng;

const EMPTY: usize = usize::MAX;

// ============================================================================
// Crossover operators
// ============================================================================

/// Builds one PMX child from `template` and `donor` with cut point `cut`.
///
/// # Algorithm
///
/// 1. Copy `template[0..=cut]` into the child
/// 2. For each `i` in `0..=cut` whose `donor[i]` is not yet in the child,
///    follow the mapping chain `pos ← index of template[pos] in donor`
///    until it leaves the prefix, and place `donor[i]` there
/// 3. Fill remaining positions from `donor`
///
/// The chain walk is bounded by `n` steps.
///
/// # Complexity
/// O(n²) worst case, O(n) space
///
/// # Errors
/// [`TspError::CrossoverResolutionFailure`] if the parents differ in
/// length, `cut` is outside `[0, n - 2]`, a value is out of range, the
/// chain does not terminate, or the result is not a permutation.
pub fn pmx_child(template: &[usize], donor: &[usize], cut: usize) -> Result<Vec<usize>> {
    let n = template.len();
    if donor.len() != n {
        return Err(failure(format!(
            "parents differ in length ({n} vs {})",
            donor.len()
        )));
    }
    if cut + 1 >= n {
        return Err(failure(format!("cut point {cut} out of range for length {n}")));
    }
    if let Some(&v) = template.iter().chain(donor).find(|&&v| v >= n) {
        return Err(failure(format!("node {v} out of range for length {n}")));
    }

    let mut donor_pos = vec![EMPTY; n];
    for (i, &v) in donor.iter().enumerate() {
        donor_pos[v] = i;
    }

    // Step 1: copy prefix from template
    let mut child = vec![EMPTY; n];
    let mut placed = vec![false; n];
    for i in 0..=cut {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    // Step 2: relocate donor prefix values through the mapping chain
    for i in 0..=cut {
        let value = donor[i];
        if placed[value] {
            continue;
        }
        let mut pos = i;
        let mut steps = 0;
        while pos <= cut {
            if steps == n {
                return Err(failure(format!(
                    "mapping chain for node {value} did not leave the prefix"
                )));
            }
            let mapped = template[pos];
            pos = donor_pos[mapped];
            if pos == EMPTY {
                return Err(failure(format!("node {mapped} missing from donor")));
            }
            steps += 1;
        }
        if child[pos] != EMPTY {
            return Err(failure(format!("position {pos} already filled")));
        }
        child[pos] = value;
        placed[value] = true;
    }

    // Step 3: fill remaining from donor
    for i in 0..n {
        if child[i] == EMPTY {
            child[i] = donor[i];
        }
    }

    if !is_permutation(&child) {
        return Err(failure(format!("child {child:?} is not a permutation")));
    }
    Ok(child)
}

/// PMX over two tours: keeps `a`'s prefix up to `cut`, fills from `b`.
pub fn pmx(a: &Tour, b: &Tour, cut: usize) -> Result<Tour> {
    pmx_child(a.as_slice(), b.as_slice(), cut).map(Tour::from_permutation)
}

/// Draws a PMX cut point uniformly from `[1, n - 2]`.
///
/// Returns `None` when `n < 3`, where the range is empty.
pub fn draw_cut_point<R: Rng>(n: usize, rng: &mut R) -> Option<usize> {
    if n < 3 {
        return None;
    }
    Some(rng.random_range(1..=n - 2))
}

/// Crosses every consecutive pair of `pool` in both directions.
///
/// A single cut point is drawn from the first tour's length and shared by
/// all pairs. A pool of `m ≥ 2` tours yields `2·(m − 1)` children; smaller
/// pools yield none. For 2-node tours the children are parent copies.
pub fn crossover_pool<R: Rng>(pool: &[Tour], rng: &mut R) -> Result<Vec<Tour>> {
    if pool.len() < 2 {
        return Ok(Vec::new());
    }

    let cut = draw_cut_point(pool[0].len(), rng);
    let mut children = Vec::with_capacity(2 * (pool.len() - 1));

    for pair in pool.windows(2) {
        let (p1, p2) = (&pair[0], &pair[1]);
        match cut {
            Some(k) => {
                children.push(pmx(p1, p2, k)?);
                children.push(pmx(p2, p1, k)?);
            }
            None => {
                children.push(p1.clone());
                children.push(p2.clone());
            }
        }
    }

    Ok(children)
}

fn failure(message: String) -> TspError {
    TspError::CrossoverResolutionFailure(message)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two distinct random positions.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    perm.swap(i, j);
}

/// Returns a mutated copy of `tour`.
///
/// Runs `trials` independent trials; each one swaps two distinct positions
/// with probability `probability`. Zero to `trials` swaps may apply.
pub fn mutate<R: Rng>(tour: &Tour, trials: usize, probability: f64, rng: &mut R) -> Tour {
    let mut result = tour.clone();
    for _ in 0..trials {
        if rng.random::<f64>() < probability {
            swap_mutation(result.as_mut_slice(), rng);
        }
    }
    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn tour(nodes: &[usize]) -> Tour {
        Tour::new(nodes.to_vec(), nodes.len()).unwrap()
    }

    // ---- PMX ----

    #[test]
    fn test_pmx_known_child() {
        let a = [0, 1, 2, 3, 4, 5, 6, 7];
        let b = [3, 7, 5, 1, 6, 0, 2, 4];
        let child = pmx_child(&a, &b, 2).unwrap();
        assert_eq!(child, vec![0, 1, 2, 7, 6, 3, 5, 4]);
    }

    #[test]
    fn test_pmx_follows_chain() {
        // donor[1] = 2 maps 1 -> donor pos 0 -> 0 -> donor pos 3
        let a = [0, 1, 2, 3, 4];
        let b = [1, 2, 3, 0, 4];
        let child = pmx_child(&a, &b, 1).unwrap();
        assert_eq!(child, vec![0, 1, 3, 2, 4]);
    }

    #[test]
    fn test_pmx_keeps_prefix() {
        let a = [4, 2, 0, 1, 3, 5];
        let b = [5, 4, 3, 2, 1, 0];
        for cut in 1..=4 {
            let child = pmx_child(&a, &b, cut).unwrap();
            assert_eq!(&child[..=cut], &a[..=cut]);
            assert!(is_permutation(&child));
        }
    }

    #[test]
    fn test_pmx_identical_parents() {
        let p = tour(&[3, 0, 4, 1, 2]);
        assert_eq!(pmx(&p, &p, 2).unwrap(), p);
    }

    #[test]
    fn test_pmx_non_terminating_chain() {
        let a = [0, 0, 2, 3];
        let b = [1, 0, 2, 3];
        assert!(matches!(
            pmx_child(&a, &b, 1),
            Err(TspError::CrossoverResolutionFailure(_))
        ));
    }

    #[test]
    fn test_pmx_rejects_malformed_input() {
        let a = [0, 1, 2, 3];
        assert!(pmx_child(&a, &[0, 1, 2, 9], 1).is_err());
        assert!(pmx_child(&a, &[0, 1, 2], 1).is_err());
        assert!(pmx_child(&a, &[3, 2, 1, 0], 3).is_err());
        // duplicate outside the prefix survives the walk but not the final check
        assert!(pmx_child(&a, &[1, 0, 3, 3], 1).is_err());
    }

    // ---- Pool crossover ----

    #[test]
    fn test_crossover_pool_child_count() {
        let mut rng = create_rng(42);
        let pool = vec![
            tour(&[0, 1, 2, 3, 4, 5]),
            tour(&[5, 4, 3, 2, 1, 0]),
            tour(&[2, 0, 4, 1, 5, 3]),
            tour(&[1, 3, 5, 0, 2, 4]),
        ];
        let children = crossover_pool(&pool, &mut rng).unwrap();
        assert_eq!(children.len(), 6);
        assert!(children.iter().all(|c| is_permutation(c.as_slice())));
    }

    #[test]
    fn test_crossover_pool_shares_cut_point() {
        let pool = vec![
            tour(&[0, 1, 2, 3, 4, 5, 6]),
            tour(&[6, 5, 4, 3, 2, 1, 0]),
            tour(&[3, 6, 2, 5, 1, 4, 0]),
        ];
        let k = draw_cut_point(7, &mut create_rng(11)).unwrap();
        let children = crossover_pool(&pool, &mut create_rng(11)).unwrap();

        let expected = vec![
            pmx(&pool[0], &pool[1], k).unwrap(),
            pmx(&pool[1], &pool[0], k).unwrap(),
            pmx(&pool[1], &pool[2], k).unwrap(),
            pmx(&pool[2], &pool[1], k).unwrap(),
        ];
        assert_eq!(children, expected);
    }

    #[test]
    fn test_crossover_pool_too_small() {
        let mut rng = create_rng(42);
        assert!(crossover_pool(&[], &mut rng).unwrap().is_empty());
        assert!(crossover_pool(&[tour(&[0, 1, 2])], &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_crossover_pool_two_nodes() {
        let mut rng = create_rng(42);
        let pool = vec![tour(&[0, 1]), tour(&[1, 0])];
        let children = crossover_pool(&pool, &mut rng).unwrap();
        assert_eq!(children, pool);
    }

    #[test]
    fn test_draw_cut_point_range() {
        let mut rng = create_rng(42);
        assert_eq!(draw_cut_point(2, &mut rng), None);
        assert_eq!(draw_cut_point(3, &mut rng), Some(1));
        for _ in 0..1000 {
            let k = draw_cut_point(10, &mut rng).unwrap();
            assert!((1..=8).contains(&k));
        }
    }

    // ---- Mutation ----

    #[test]
    fn test_swap_changes_two_positions() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut perm: Vec<usize> = (0..10).collect();
            swap_mutation(&mut perm, &mut rng);
            let moved = perm.iter().enumerate().filter(|(i, &v)| *i != v).count();
            assert_eq!(moved, 2);
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut rng = create_rng(42);
        let mut perm = vec![0];
        swap_mutation(&mut perm, &mut rng);
        assert_eq!(perm, vec![0]);
    }

    #[test]
    fn test_mutate_probability_bounds() {
        let mut rng = create_rng(42);
        let t = Tour::identity(8);

        assert_eq!(mutate(&t, 5, 0.0, &mut rng), t);
        assert_eq!(mutate(&t, 0, 1.0, &mut rng), t);

        let m = mutate(&t, 1, 1.0, &mut rng);
        assert_ne!(m, t);
        assert_eq!(t, Tour::identity(8), "input must not be modified");
    }

    #[test]
    fn test_mutate_bounded_swaps() {
        let mut rng = create_rng(42);
        let t = Tour::identity(20);
        for _ in 0..100 {
            let m = mutate(&t, 3, 0.5, &mut rng);
            let moved = m
                .as_slice()
                .iter()
                .enumerate()
                .filter(|(i, &v)| *i != v)
                .count();
            assert!(moved <= 6);
        }
    }

    // ---- Properties ----

    fn parents_and_cut() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, usize)> {
        (3usize..30).prop_flat_map(|n| {
            let base: Vec<usize> = (0..n).collect();
            (
                Just(base.clone()).prop_shuffle(),
                Just(base).prop_shuffle(),
                1..=n - 2,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_pmx_yields_permutation((a, b, cut) in parents_and_cut()) {
            let child = pmx_child(&a, &b, cut).unwrap();
            prop_assert!(is_permutation(&child));
            prop_assert_eq!(&child[..=cut], &a[..=cut]);
        }

        #[test]
        fn prop_mutate_preserves_permutation(
            perm in (2usize..30).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle()),
            seed in any::<u64>(),
            trials in 0usize..10,
        ) {
            let n = perm.len();
            let t = Tour::new(perm, n).unwrap();
            let mut rng = create_rng(seed);
            let m = mutate(&t, trials, 0.7, &mut rng);
            prop_assert!(is_permutation(m.as_slice()));
        }
    }
}
