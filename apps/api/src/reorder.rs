//! Drag-reorder as a pure list splice. The drag gesture itself is client
//! plumbing; the engine only ever sees (source, destination) index pairs,
//! and the result flows through the edit-sync engine like any other update.

/// Moves the item at `source` to `destination`, preserving the relative
/// order of everything else.
///
/// A `None` destination (drag cancelled outside a valid target) and an
/// out-of-bounds source are both no-ops; the input comes back unchanged.
/// A destination past the end clamps to the end.
pub fn reorder<T>(mut items: Vec<T>, source: usize, destination: Option<usize>) -> Vec<T> {
    let Some(destination) = destination else {
        return items;
    };
    if source >= items.len() {
        return items;
    }
    let item = items.remove(source);
    let destination = destination.min(items.len());
    items.insert(destination, item);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_index_two_to_zero() {
        let result = reorder(vec!["a", "b", "c", "d"], 2, Some(0));
        assert_eq!(result, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_drag_forward() {
        let result = reorder(vec!["a", "b", "c", "d"], 0, Some(2));
        assert_eq!(result, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_cancelled_drag_is_noop() {
        let result = reorder(vec![1, 2, 3], 1, None);
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_source_out_of_bounds_is_noop() {
        let result = reorder(vec![1, 2, 3], 7, Some(0));
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_destination_clamps_to_end() {
        let result = reorder(vec![1, 2, 3], 0, Some(99));
        assert_eq!(result, vec![2, 3, 1]);
    }

    #[test]
    fn test_same_index_keeps_order() {
        let result = reorder(vec![1, 2, 3], 1, Some(1));
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_preserves_multiset_and_relative_order() {
        let items: Vec<u32> = (0..8).collect();
        for source in 0..items.len() {
            for dest in 0..items.len() {
                let result = reorder(items.clone(), source, Some(dest));
                assert_eq!(result.len(), items.len());

                let mut sorted = result.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, items, "multiset preserved for {source}->{dest}");

                let rest: Vec<u32> = result
                    .iter()
                    .copied()
                    .filter(|v| *v != items[source])
                    .collect();
                let expected: Vec<u32> = items
                    .iter()
                    .copied()
                    .filter(|v| *v != items[source])
                    .collect();
                assert_eq!(rest, expected, "relative order preserved for {source}->{dest}");
            }
        }
    }
}
