//! Helpers on 32-bit machine words.

/// The number of bits in a word of [`BitArray`](crate::bit_vectors::BitArray).
pub const WORD_LEN: usize = 32;

/// Returns the number of bits set in `x`.
#[inline(always)]
pub const fn popcount(x: u32) -> usize {
    x.count_ones() as usize
}

/// Returns a mask of the lowest `len` bits.
///
/// # Examples
///
/// ```
/// use trie_encodings::broadword::low_mask;
///
/// assert_eq!(low_mask(0), 0);
/// assert_eq!(low_mask(3), 0b111);
/// assert_eq!(low_mask(32), u32::MAX);
/// ```
#[inline(always)]
pub const fn low_mask(len: usize) -> u32 {
    if len >= WORD_LEN {
        u32::MAX
    } else {
        (1 << len) - 1
    }
}

/// Returns the position of the `k`-th set bit of `x` counting from zero, or
/// [`None`] if `x` has no more than `k` bits set.
///
/// # Examples
///
/// ```
/// use trie_encodings::broadword::select_in_word;
///
/// assert_eq!(select_in_word(0b1010, 0), Some(1));
/// assert_eq!(select_in_word(0b1010, 1), Some(3));
/// assert_eq!(select_in_word(0b1010, 2), None);
/// ```
#[inline(always)]
pub fn select_in_word(mut x: u32, k: usize) -> Option<usize> {
    for _ in 0..k {
        if x == 0 {
            return None;
        }
        x &= x - 1;
    }
    (x != 0).then(|| x.trailing_zeros() as usize)
}

/// Returns the number of words needed to hold `len` bits.
#[inline(always)]
pub const fn words_for(len: usize) -> usize {
    crate::utils::ceiled_divide(len, WORD_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(2774701), 12);
        assert_eq!(popcount(u32::MAX), 32);
    }

    #[test]
    fn test_select_in_word() {
        assert_eq!(select_in_word(0, 0), None);
        assert_eq!(select_in_word(1 << 31, 0), Some(31));
        assert_eq!(select_in_word(u32::MAX, 31), Some(31));
        assert_eq!(select_in_word(u32::MAX, 32), None);
    }

    #[test]
    fn test_words_for() {
        assert_eq!(words_for(0), 0);
        assert_eq!(words_for(1), 1);
        assert_eq!(words_for(32), 1);
        assert_eq!(words_for(33), 2);
    }
}
