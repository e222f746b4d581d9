//! Two-way merge of sorted sequences.

/// Merge two individually sorted slices into one sorted vector.
///
/// The two inputs are conceptually adjacent halves of a single buffer. The
/// merge walks a cursor over each half and appends the smaller element into a
/// freshly allocated output. Ties are taken from `lower` first, so relative
/// order of equal elements is preserved across the two halves. When either
/// cursor exhausts its half the remainder of the other half is appended.
///
/// Both inputs must already be sorted. This precondition is not re-checked;
/// for unsorted inputs the output order is unspecified.
pub fn merge_sorted<T: Ord + Copy>(lower: &[T], upper: &[T]) -> Vec<T> {
    let mut merged = Vec::with_capacity(lower.len() + upper.len());

    let mut i = 0;
    let mut j = 0;

    while i < lower.len() && j < upper.len() {
        if lower[i] <= upper[j] {
            merged.push(lower[i]);
            i += 1;
        } else {
            merged.push(upper[j]);
            j += 1;
        }
    }

    merged.extend_from_slice(&lower[i..]);
    merged.extend_from_slice(&upper[j..]);

    merged
}
