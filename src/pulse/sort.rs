//! Stable index sort for pulse length orderings

/// Return the original positions of `values` in ascending value order.
///
/// Equal values keep their original relative order, so the permutation is
/// deterministic.
pub fn sort_indices<T: Ord>(values: &[T]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    // sort_by is stable
    indices.sort_by(|&a, &b| values[a].cmp(&values[b]));
    indices
}
