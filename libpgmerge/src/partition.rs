//! Contiguous splitting of an ordered merge list.

/// Split `items` into contiguous groups of at most `chunk_size` elements,
/// preserving the original order. The last group may be shorter. An empty
/// input yields no groups.
///
/// Callers wanting at most `c` groups should pass
/// `chunk_size = items.len().div_ceil(c)`.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
pub(crate) fn split<T>(items: &[T], chunk_size: usize) -> Vec<&[T]> {
    items.chunks(chunk_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let items = [1, 2, 3, 4];
        let groups = split(&items, 2);
        assert_eq!(groups, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_last_group_shorter() {
        let items = [1, 2, 3, 4, 5];
        let groups = split(&items, 3);
        assert_eq!(groups, vec![&[1, 2, 3][..], &[4, 5][..]]);
    }

    #[test]
    fn test_chunk_size_larger_than_input() {
        let items = [1, 2];
        let groups = split(&items, 10);
        assert_eq!(groups, vec![&[1, 2][..]]);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let items: [u8; 0] = [];
        assert!(split(&items, 3).is_empty());
    }

    #[test]
    fn test_group_count_bounded_by_chunks() {
        // the ceil-divided chunk size must never produce more groups than
        // requested
        for len in 1..50usize {
            for chunks in 1..8usize {
                let items: Vec<usize> = (0..len).collect();
                let chunk_size = len.div_ceil(chunks);
                let groups = split(&items, chunk_size);
                assert!(groups.len() <= chunks, "len={len} chunks={chunks}");
                let flattened: Vec<usize> =
                    groups.iter().flat_map(|g| g.iter().copied()).collect();
                assert_eq!(flattened, items);
            }
        }
    }
}
