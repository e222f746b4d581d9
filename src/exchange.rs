//! Local in-place exchange sort.

/// Sort a slice ascending in place using a bounded exchange (bubble) sort.
///
/// Each pass swaps every adjacent out-of-order pair. After pass `c` the
/// largest `c + 1` elements are in their final positions, so each pass scans
/// one element fewer. The sort stops after a pass without swaps or after
/// `n - 1` passes, whichever comes first. Slices of length 0 or 1 are a
/// no-op. No allocation.
pub fn exchange_sort<T: Ord>(slice: &mut [T]) {
    let n = slice.len();
    if n <= 1 {
        return;
    }

    for pass in 0..n - 1 {
        let mut swapped = false;
        for index in 0..n - 1 - pass {
            if slice[index] > slice[index + 1] {
                slice.swap(index, index + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use super::exchange_sort;
    use itertools::Itertools;

    #[test]
    fn test_descending_input() {
        let mut arr = vec![4, 3, 2, 1];
        exchange_sort(&mut arr);
        assert_eq!(arr, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<i32> = Vec::new();
        exchange_sort(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![7];
        exchange_sort(&mut single);
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn test_duplicates() {
        let mut arr = vec![5, 1, 5, 3, 1, 3];
        exchange_sort(&mut arr);
        assert_eq!(arr, vec![1, 1, 3, 3, 5, 5]);
    }

    #[test]
    fn test_idempotent() {
        let mut arr = (1..20).collect_vec();
        let expected = arr.clone();
        exchange_sort(&mut arr);
        assert_eq!(arr, expected);

        let mut arr = vec![9, 2, 8, 3, 7, 4];
        exchange_sort(&mut arr);
        let once = arr.clone();
        exchange_sort(&mut arr);
        assert_eq!(arr, once);
    }
}
