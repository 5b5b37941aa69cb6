// ABOUTME: Greedy single-pass repacking of undersized chunks into fewer, larger ones.
// ABOUTME: Preserves order, concatenates without separators, never splits oversized chunks.

use std::mem;

use crate::char_len;

/// Pack consecutive chunks together while the combined length fits `max_size`.
///
/// Chunks are concatenated as-is, with no separator. When the next chunk would
/// overflow the accumulator, the accumulator is emitted and the chunk starts a
/// new one. A chunk that is already oversized is emitted alone, unchanged.
/// Running the merge on its own output returns the same sequence.
pub fn merge_chunks<I>(chunks: I, max_size: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut merged = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for chunk in chunks {
        let len = char_len(&chunk);
        if current_len + len <= max_size {
            current.push_str(&chunk);
            current_len += len;
        } else {
            if !current.is_empty() {
                merged.push(mem::take(&mut current));
            }
            current = chunk;
            current_len = len;
        }
    }

    if !current.is_empty() {
        merged.push(current);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn greedy_packing() {
        let merged = merge_chunks(strings(&["ab", "cd", "ef"]), 4);
        assert_eq!(merged, strings(&["abcd", "ef"]));
    }

    #[test]
    fn everything_fits_in_one() {
        let merged = merge_chunks(strings(&["a", "b", "c"]), 10);
        assert_eq!(merged, strings(&["abc"]));
    }

    #[test]
    fn empty_input() {
        assert!(merge_chunks(Vec::<String>::new(), 10).is_empty());
    }

    #[test]
    fn oversized_chunk_passes_through_alone() {
        let merged = merge_chunks(strings(&["toolongchunk", "ab", "cd"]), 4);
        assert_eq!(merged, strings(&["toolongchunk", "abcd"]));

        let merged = merge_chunks(strings(&["ab", "toolongchunk", "cd"]), 4);
        assert_eq!(merged, strings(&["ab", "toolongchunk", "cd"]));
    }

    #[test]
    fn no_lookahead_or_reordering() {
        // Optimal packing would pair "aaa" with "b"; greedy keeps order.
        let merged = merge_chunks(strings(&["aaa", "cc", "b"]), 4);
        assert_eq!(merged, strings(&["aaa", "ccb"]));
    }

    #[test]
    fn merge_is_idempotent() {
        let inputs = [
            strings(&["ab", "cd", "ef"]),
            strings(&["toolongchunk", "a", "bcd", "e"]),
            strings(&["x", "y", "zzzzzz", "w"]),
        ];
        for input in inputs {
            let once = merge_chunks(input, 4);
            let twice = merge_chunks(once.clone(), 4);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let merged = merge_chunks(strings(&["éé", "üü"]), 4);
        assert_eq!(merged, strings(&["ééüü"]));
    }
}
