use std::mem::size_of;

const WORD: usize = size_of::<usize>();

/// Returns `true` when both slices have the same length and bytes.
///
/// Interior bytes are compared a machine word at a time, with the head and
/// tail that don't fill a word compared byte by byte.
pub fn equal(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let head = (WORD - left.as_ptr() as usize % WORD) % WORD;
    let head = head.min(left.len());
    if left[..head] != right[..head] {
        return false;
    }

    let mut left_words = left[head..].chunks_exact(WORD);
    let mut right_words = right[head..].chunks_exact(WORD);
    for (l, r) in left_words.by_ref().zip(right_words.by_ref()) {
        if word(l) != word(r) {
            return false;
        }
    }

    left_words.remainder() == right_words.remainder()
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at index 0; a needle longer than the haystack
/// never matches.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack
        .windows(needle.len())
        .position(|window| equal(window, needle))
}

fn word(bytes: &[u8]) -> usize {
    let mut buf = [0u8; WORD];
    buf.copy_from_slice(bytes);
    usize::from_ne_bytes(buf)
}
