//! Bit array with a table of cumulative per-word one-counts.

use std::io::{Read, Write};

use anyhow::Result;

use crate::bit_vectors::prelude::*;
use crate::bit_vectors::BitArray;
use crate::broadword::{self, WORD_LEN};
use crate::{Error, Serializable};

/// Bit array supporting constant-time rank and logarithmic-time select.
///
/// Beside the `N` raw words of a [`BitArray`], it keeps `N` auxiliary counters
/// where counter `j` is the number of ones in raw words `0..=j`.
/// The counters are computed by [`Self::count_bucket_ranks()`], which must run
/// after the last [`Self::set_bit()`]. Until then, rank and select queries return [`None`].
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::bit_vectors::{RankedBitArray, prelude::*};
///
/// let mut bv = RankedBitArray::with_len(40);
/// bv.set_bit(3, true)?;
/// bv.set_bit(35, true)?;
/// assert_eq!(bv.rank1(36), None);
///
/// bv.count_bucket_ranks();
/// assert_eq!(bv.rank1(36), Some(2));
/// assert_eq!(bv.select0(4), Some(4));
/// assert_eq!(bv.select1(2), Some(35));
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RankedBitArray {
    bv: BitArray,
    bucket_ranks: Vec<usize>,
    stale: bool,
}

impl RankedBitArray {
    /// Creates a new array from `bv` and counts its bucket ranks.
    pub fn new(bv: BitArray) -> Self {
        let mut this = Self {
            bv,
            bucket_ranks: vec![],
            stale: true,
        };
        this.count_bucket_ranks();
        this
    }

    /// Creates a new array of `len` unset bits.
    pub fn with_len(len: usize) -> Self {
        Self::new(BitArray::new(len))
    }

    /// Creates a new array from input bit stream `bits`.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self::new(BitArray::from_bits(bits))
    }

    /// Creates a new array from the physical layout of `len` bits:
    /// `N` raw words followed by `N` cumulative one-counts.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedEncoding`] is returned if the layout does not hold `len` bits
    /// or if the counters disagree with the raw words.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> anyhow::Result<()> {
    /// use trie_encodings::bit_vectors::{RankedBitArray, Rank};
    ///
    /// let bv = RankedBitArray::from_layout(&[0b1011, 3], 4)?;
    /// assert_eq!(bv.rank1(4), Some(3));
    /// assert!(RankedBitArray::from_layout(&[0b1011, 2], 4).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_layout(layout: &[u32], len: usize) -> Result<Self> {
        let num_words = broadword::words_for(len);
        if layout.len() != 2 * num_words {
            return Err(Error::malformed(format!(
                "{len} bits need {} layout words, but got {}",
                2 * num_words,
                layout.len()
            ))
            .into());
        }
        let (raw, aux) = layout.split_at(num_words);
        let this = Self::new(BitArray::from_words(raw.to_vec(), len)?);
        let consistent = this
            .bucket_ranks
            .iter()
            .zip(aux)
            .all(|(&r, &a)| r == a as usize);
        if !consistent {
            return Err(Error::malformed("bucket ranks disagree with the raw words").into());
        }
        Ok(this)
    }

    /// Returns the physical layout: `N` raw words followed by `N` cumulative one-counts.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] is returned if a count does not fit in 32 bits.
    pub fn to_layout(&self) -> Result<Vec<u32>> {
        let mut layout = Vec::with_capacity(2 * self.bv.num_words());
        layout.extend_from_slice(self.bv.words());
        for &r in &self.bucket_ranks {
            layout.push(crate::utils::to_u32(r, "bucket rank")?);
        }
        Ok(layout)
    }

    /// Updates the `pos`-th bit to `bit` and marks the bucket ranks stale.
    ///
    /// # Errors
    ///
    /// An error is returned if `self.num_bits() <= pos`.
    pub fn set_bit(&mut self, pos: usize, bit: bool) -> Result<()> {
        self.bv.set_bit(pos, bit)?;
        self.stale = true;
        Ok(())
    }

    /// Recomputes the cumulative one-count of every word in $`O(N)`$ time.
    pub fn count_bucket_ranks(&mut self) {
        let mut acc = 0;
        self.bucket_ranks.clear();
        self.bucket_ranks.reserve(self.bv.num_words());
        for &w in self.bv.words() {
            acc += broadword::popcount(w);
            self.bucket_ranks.push(acc);
        }
        self.stale = false;
    }

    /// Checks if the bucket ranks reflect the current bits.
    pub const fn is_ranked(&self) -> bool {
        !self.stale
    }

    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    #[inline(always)]
    pub fn get_bit(&self, pos: usize) -> Option<bool> {
        self.bv.get_bit(pos)
    }

    /// Returns the reference of the internal bit array.
    pub const fn bit_array(&self) -> &BitArray {
        &self.bv
    }

    /// Returns the cumulative one-count of every word.
    pub fn bucket_ranks(&self) -> &[usize] {
        &self.bucket_ranks
    }

    /// Returns the number of zeros in words `0..=word`, excluding padding.
    #[inline(always)]
    fn zeros_through(&self, word: usize) -> usize {
        ((word + 1) * WORD_LEN).min(self.bv.len()) - self.bucket_ranks[word]
    }

    /// Returns the first word for which `count(word) >= k`.
    #[inline(always)]
    fn search_bucket<F>(&self, k: usize, count: F) -> usize
    where
        F: Fn(usize) -> usize,
    {
        let (mut lo, mut hi) = (0, self.bv.num_words() - 1);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if count(mid) >= k {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }
}

impl NumBits for RankedBitArray {
    fn num_bits(&self) -> usize {
        self.bv.len()
    }

    /// Returns the number of bits set.
    ///
    /// It reads the last bucket rank, so it reflects the last [`RankedBitArray::count_bucket_ranks()`].
    fn num_ones(&self) -> usize {
        self.bucket_ranks.last().copied().unwrap_or(0)
    }
}

impl Access for RankedBitArray {
    fn access(&self, pos: usize) -> Option<bool> {
        self.bv.get_bit(pos)
    }
}

impl Rank for RankedBitArray {
    /// Returns the number of ones from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.num_bits() < pos` or the bucket ranks are stale.
    ///
    /// # Complexity
    ///
    /// Constant
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{RankedBitArray, Rank};
    ///
    /// let bv = RankedBitArray::from_bits([true, false, false, true]);
    /// assert_eq!(bv.rank1(0), Some(0));
    /// assert_eq!(bv.rank1(1), Some(1));
    /// assert_eq!(bv.rank1(4), Some(2));
    /// assert_eq!(bv.rank1(5), None);
    /// ```
    fn rank1(&self, pos: usize) -> Option<usize> {
        if self.stale || self.bv.len() < pos {
            return None;
        }
        let (wpos, left) = (pos / WORD_LEN, pos % WORD_LEN);
        let bucket_rank = if wpos == 0 {
            0
        } else {
            self.bucket_ranks[wpos - 1]
        };
        if left == 0 {
            return Some(bucket_rank);
        }
        let masked = self.bv.words()[wpos] & broadword::low_mask(left);
        Some(bucket_rank + broadword::popcount(masked))
    }

    /// Returns the number of zeros from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.num_bits() < pos` or the bucket ranks are stale.
    fn rank0(&self, pos: usize) -> Option<usize> {
        Some(pos - self.rank1(pos)?)
    }
}

impl Select for RankedBitArray {
    /// Searches the position of the `k`-th bit set.
    ///
    /// The word holding the answer is found by binary search over the bucket ranks,
    /// and then scanned bit by bit.
    ///
    /// # Complexity
    ///
    /// Logarithmic
    fn select1(&self, k: usize) -> Option<usize> {
        if self.stale || k == 0 || self.num_ones() < k {
            return None;
        }
        let word = self.search_bucket(k, |j| self.bucket_ranks[j]);
        let mut count = if word == 0 {
            0
        } else {
            self.bucket_ranks[word - 1]
        };
        for pos in word * WORD_LEN..self.bv.len() {
            if self.bv.get_bit(pos)? {
                count += 1;
                if count == k {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// Searches the position of the `k`-th bit unset.
    ///
    /// The word holding the answer is found by binary search over zero counts derived
    /// from the bucket ranks, and then scanned bit by bit.
    ///
    /// # Complexity
    ///
    /// Logarithmic
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{RankedBitArray, Select};
    ///
    /// let bv = RankedBitArray::from_bits([true, false, false, true]);
    /// assert_eq!(bv.select0(0), None);
    /// assert_eq!(bv.select0(1), Some(1));
    /// assert_eq!(bv.select0(2), Some(2));
    /// assert_eq!(bv.select0(3), None);
    /// ```
    fn select0(&self, k: usize) -> Option<usize> {
        if self.stale || k == 0 || self.num_zeros() < k {
            return None;
        }
        let word = self.search_bucket(k, |j| self.zeros_through(j));
        let mut count = if word == 0 {
            0
        } else {
            self.zeros_through(word - 1)
        };
        for pos in word * WORD_LEN..self.bv.len() {
            if !self.bv.get_bit(pos)? {
                count += 1;
                if count == k {
                    return Some(pos);
                }
            }
        }
        None
    }
}

impl Serializable for RankedBitArray {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = crate::utils::to_u32(self.bv.len(), "bit length")?
            .serialize_into(&mut writer)?;
        for w in self.to_layout()? {
            mem += w.serialize_into(&mut writer)?;
        }
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = u32::deserialize_from(&mut reader)? as usize;
        let layout = (0..2 * broadword::words_for(len))
            .map(|_| u32::deserialize_from(&mut reader))
            .collect::<Result<Vec<_>>>()?;
        Self::from_layout(&layout, len)
    }

    fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<u32>() * (1 + 2 * self.bv.num_words())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    const WORD: u32 = 2774701;

    fn gen_random_bits(len: usize, p: f64, seed: u64) -> Vec<bool> {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_bool(p)).collect()
    }

    fn test_rank_select1(bits: &[bool], bv: &RankedBitArray) {
        let mut cur_rank = 0;
        for i in 0..bits.len() {
            assert_eq!(bv.rank1(i), Some(cur_rank));
            if bits[i] {
                cur_rank += 1;
                assert_eq!(bv.select1(cur_rank), Some(i));
            }
        }
        assert_eq!(bv.rank1(bits.len()), Some(cur_rank));
        assert_eq!(cur_rank, bv.num_ones());
        assert_eq!(bv.select1(cur_rank + 1), None);
    }

    fn test_rank_select0(bits: &[bool], bv: &RankedBitArray) {
        let mut cur_rank = 0;
        for i in 0..bits.len() {
            assert_eq!(bv.rank0(i), Some(cur_rank));
            if !bits[i] {
                cur_rank += 1;
                assert_eq!(bv.select0(cur_rank), Some(i));
            }
        }
        assert_eq!(cur_rank, bv.num_zeros());
        assert_eq!(bv.select0(cur_rank + 1), None);
    }

    #[test]
    fn test_fixture_rank1() {
        let bv = RankedBitArray::from_layout(&[WORD, WORD, 12, 24], 64).unwrap();
        for (pos, expected) in [(0, 0), (1, 1), (2, 1), (3, 2), (32, 12), (33, 13)] {
            assert_eq!(bv.rank1(pos), Some(expected), "pos={pos}");
        }
    }

    #[test]
    fn test_fixture_select0() {
        let bv = RankedBitArray::from_layout(&[WORD, WORD, 12, 24], 64).unwrap();
        for (k, expected) in [(0, None), (1, Some(1)), (2, Some(4)), (3, Some(6))] {
            assert_eq!(bv.select0(k), expected, "k={k}");
        }
        assert_eq!(bv.select0(12), Some(23));
        assert_eq!(bv.select0(21), Some(33));
        assert_eq!(bv.select0(40), Some(63));
        assert_eq!(bv.select0(41), None);
    }

    #[test]
    fn test_layout() {
        let bv = RankedBitArray::new(BitArray::from_words(vec![WORD, WORD], 64).unwrap());
        assert_eq!(bv.to_layout().unwrap(), vec![WORD, WORD, 12, 24]);
    }

    #[test]
    fn test_stale_until_counted() {
        let mut bv = RankedBitArray::with_len(10);
        assert_eq!(bv.rank1(10), Some(0));
        bv.set_bit(2, true).unwrap();
        assert!(!bv.is_ranked());
        assert_eq!(bv.rank1(10), None);
        assert_eq!(bv.select1(1), None);
        assert_eq!(bv.select0(1), None);
        bv.count_bucket_ranks();
        assert!(bv.is_ranked());
        assert_eq!(bv.rank1(10), Some(1));
        assert_eq!(bv.select1(1), Some(2));
    }

    #[test]
    fn test_rank1_all_zeros() {
        let bv = RankedBitArray::from_bits([false, false, false]);
        assert_eq!(bv.rank1(0), Some(0));
        assert_eq!(bv.rank1(3), Some(0));
        assert_eq!(bv.rank1(4), None);
        assert_eq!(bv.select1(1), None);
    }

    #[test]
    fn test_select0_all_ones() {
        let bv = RankedBitArray::from_bits([true; 40]);
        assert_eq!(bv.select0(1), None);
        assert_eq!(bv.rank0(40), Some(0));
    }

    #[test]
    fn test_empty() {
        let bv = RankedBitArray::with_len(0);
        assert_eq!(bv.rank1(0), Some(0));
        assert_eq!(bv.select0(1), None);
        assert_eq!(bv.select1(1), None);
    }

    #[test]
    fn test_rank_monotone_and_select_consistent() {
        let bits = gen_random_bits(3000, 0.5, 7);
        let bv = RankedBitArray::from_bits(bits.iter().cloned());
        let mut prev = 0;
        for i in 0..=bits.len() {
            let r = bv.rank1(i).unwrap();
            assert!(prev <= r);
            prev = r;
        }
        for k in 1..=bv.num_zeros() {
            let pos = bv.select0(k).unwrap();
            assert_eq!(bv.rank0(pos + 1), Some(k));
        }
    }

    #[test]
    fn test_random_bits() {
        for seed in 0..30 {
            for p in [0.1, 0.5, 0.9] {
                let bits = gen_random_bits(1000 + seed as usize, p, seed);
                let bv = RankedBitArray::from_bits(bits.iter().cloned());
                test_rank_select1(&bits, &bv);
                test_rank_select0(&bits, &bv);
            }
        }
    }

    #[test]
    fn test_serialize() {
        let mut bytes = vec![];
        let bv = RankedBitArray::from_bits(gen_random_bits(1000, 0.5, 42));
        let size = bv.serialize_into(&mut bytes).unwrap();
        let other = RankedBitArray::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(bv, other);
        assert_eq!(size, bytes.len());
        assert_eq!(size, bv.size_in_bytes());
    }

    #[test]
    fn test_deserialize_rejects_bad_ranks() {
        let bv = RankedBitArray::from_bits([true, true, false]);
        let mut bytes = bv.to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 3;
        let e = RankedBitArray::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            e.downcast_ref::<Error>(),
            Some(&Error::MalformedEncoding(
                "bucket ranks disagree with the raw words".to_string()
            ))
        );
    }
}
