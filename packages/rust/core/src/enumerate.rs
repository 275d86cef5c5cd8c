//! Subset enumerator.
//!
//! Turns the project-name list into the ordered sequence of variants to
//! build: for each size in [min, max], every combination of that size in
//! lexicographic order with respect to store order, and in permutations
//! mode every ordering of each combination. Fully deterministic, no
//! randomness.

use tracing::{debug, instrument};

use resumeforge_shared::{BuildMode, ResumeForgeError, Result};

/// Validate subset size bounds against the store size.
///
/// Mirrors the CLI flag names in its messages since that is where the
/// numbers come from.
pub fn validate_bounds(total: usize, min: usize, max: usize) -> Result<()> {
    if total == 0 {
        return Err(ResumeForgeError::validation(
            "the projects directory is empty. Add at least one .tex fragment to generate resumes.",
        ));
    }
    if min < 1 || min > total {
        return Err(ResumeForgeError::validation(format!(
            "invalid --min-projects: {min}. Must be between 1 and {total}."
        )));
    }
    if max < 1 || max > total {
        return Err(ResumeForgeError::validation(format!(
            "invalid --max-projects: {max}. Must be between 1 and {total}."
        )));
    }
    if min > max {
        return Err(ResumeForgeError::validation(format!(
            "--min-projects ({min}) cannot be greater than --max-projects ({max})."
        )));
    }
    Ok(())
}

/// Enumerate all variants for the given names, mode, and size range.
///
/// Bounds are validated first; the returned tuples are in final build order.
#[instrument(skip(names), fields(total = names.len()))]
pub fn enumerate_variants(
    names: &[String],
    mode: BuildMode,
    min: usize,
    max: usize,
) -> Result<Vec<Vec<String>>> {
    validate_bounds(names.len(), min, max)?;

    let mut variants = Vec::new();
    for size in min..=max {
        for combo in combinations(names, size) {
            match mode {
                BuildMode::Combinations => variants.push(combo),
                BuildMode::Permutations => {
                    permutations_of(&combo, &mut Vec::with_capacity(size), &mut variants);
                }
            }
        }
    }

    debug!(variant_count = variants.len(), "variants enumerated");

    Ok(variants)
}

/// Output folder name for one variant: underscore-join in tuple order.
pub fn folder_name(tuple: &[String]) -> String {
    tuple.join("_")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// All k-element combinations of `names`, preserving input order within each
/// tuple and emitting tuples in lexicographic index order.
fn combinations(names: &[String], k: usize) -> Vec<Vec<String>> {
    let n = names.len();
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }

    // indices holds the current combination as positions into `names`
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        out.push(indices.iter().map(|&i| names[i].clone()).collect());

        // Advance to the next combination: find the rightmost index that can
        // still move right, bump it, and reset everything after it.
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// All orderings of `remaining`, appended to `out` in lexicographic order
/// with respect to the order of `remaining`.
fn permutations_of(remaining: &[String], prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    if remaining.is_empty() {
        out.push(prefix.clone());
        return;
    }

    for (i, name) in remaining.iter().enumerate() {
        let mut rest = remaining.to_vec();
        rest.remove(i);
        prefix.push(name.clone());
        permutations_of(&rest, prefix, out);
        prefix.pop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn binomial(n: usize, k: usize) -> usize {
        if k > n {
            return 0;
        }
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    fn factorial(k: usize) -> usize {
        (1..=k).product::<usize>().max(1)
    }

    #[test]
    fn combinations_counts_match_binomial() {
        let projects = names(&["a", "b", "c", "d", "e"]);
        for min in 1..=5 {
            for max in min..=5 {
                let variants =
                    enumerate_variants(&projects, BuildMode::Combinations, min, max).unwrap();
                let expected: usize = (min..=max).map(|k| binomial(5, k)).sum();
                assert_eq!(variants.len(), expected, "min={min} max={max}");
            }
        }
    }

    #[test]
    fn permutations_counts_match_k_factorial_times_binomial() {
        let projects = names(&["a", "b", "c", "d"]);
        for min in 1..=4 {
            for max in min..=4 {
                let variants =
                    enumerate_variants(&projects, BuildMode::Permutations, min, max).unwrap();
                let expected: usize = (min..=max)
                    .map(|k| factorial(k) * binomial(4, k))
                    .sum();
                assert_eq!(variants.len(), expected, "min={min} max={max}");
            }
        }
    }

    #[test]
    fn three_projects_pairs_yield_three_combinations() {
        let projects = names(&["proj1", "proj2", "proj3"]);
        let variants = enumerate_variants(&projects, BuildMode::Combinations, 2, 2).unwrap();

        assert_eq!(variants.len(), 3);
        let folders: Vec<String> = variants.iter().map(|v| folder_name(v)).collect();
        assert_eq!(folders, vec!["proj1_proj2", "proj1_proj3", "proj2_proj3"]);
    }

    #[test]
    fn enumeration_order_is_lexicographic_and_sized_ascending() {
        let projects = names(&["a", "b", "c"]);
        let variants = enumerate_variants(&projects, BuildMode::Combinations, 1, 3).unwrap();
        let folders: Vec<String> = variants.iter().map(|v| folder_name(v)).collect();
        assert_eq!(
            folders,
            vec!["a", "b", "c", "a_b", "a_c", "b_c", "a_b_c"]
        );
    }

    #[test]
    fn permutation_folder_names_are_unique() {
        let projects = names(&["a", "b", "c", "d"]);
        let variants = enumerate_variants(&projects, BuildMode::Permutations, 1, 4).unwrap();

        let folders: Vec<String> = variants.iter().map(|v| folder_name(v)).collect();
        let unique: HashSet<&String> = folders.iter().collect();
        assert_eq!(unique.len(), folders.len());
    }

    #[test]
    fn permutations_of_pair_orders_lexicographically() {
        let projects = names(&["x", "y"]);
        let variants = enumerate_variants(&projects, BuildMode::Permutations, 2, 2).unwrap();
        let folders: Vec<String> = variants.iter().map(|v| folder_name(v)).collect();
        assert_eq!(folders, vec!["x_y", "y_x"]);
    }

    #[test]
    fn empty_store_is_rejected() {
        let err = enumerate_variants(&[], BuildMode::Combinations, 1, 1).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn bounds_outside_range_are_rejected() {
        let projects = names(&["a", "b"]);

        let err = enumerate_variants(&projects, BuildMode::Combinations, 0, 2).unwrap_err();
        assert!(err.to_string().contains("--min-projects: 0"));

        let err = enumerate_variants(&projects, BuildMode::Combinations, 1, 3).unwrap_err();
        assert!(err.to_string().contains("--max-projects: 3"));
    }

    #[test]
    fn min_greater_than_max_is_rejected() {
        let projects = names(&["a", "b", "c"]);
        let err = enumerate_variants(&projects, BuildMode::Combinations, 3, 2).unwrap_err();
        assert!(err.to_string().contains("cannot be greater"));
    }

    #[test]
    fn folder_name_joins_with_underscores() {
        assert_eq!(folder_name(&names(&["proj2", "proj1"])), "proj2_proj1");
        assert_eq!(folder_name(&names(&["solo"])), "solo");
    }
}
