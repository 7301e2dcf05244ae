//! Bit array packed into 32-bit words.

use std::io::{Read, Write};

use anyhow::{anyhow, Result};

use crate::bit_vectors::prelude::*;
use crate::broadword::{self, WORD_LEN};
use crate::utils::MatrixView;
use crate::{Error, Serializable};

/// Bit array packed into 32-bit words.
///
/// Bit `i` lives in word `i >> 5` at bit position `i & 31`.
/// Bits past [`Self::len()`] up to [`Self::capacity()`] are kept unset.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::bit_vectors::BitArray;
///
/// let mut bv = BitArray::new(33);
/// assert_eq!(bv.len(), 33);
/// assert_eq!(bv.capacity(), 64);
///
/// bv.set_bit(0, true)?;
/// bv.set_bit(32, true)?;
/// assert_eq!(bv.get_bit(0), Some(true));
/// assert_eq!(bv.get_bit(1), Some(false));
/// assert_eq!(bv.get_bit(33), None);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Clone, PartialEq, Eq)]
pub struct BitArray {
    words: Vec<u32>,
    len: usize,
}

impl BitArray {
    /// Creates a new array of `len` unset bits.
    pub fn new(len: usize) -> Self {
        Self::from_bit(false, len)
    }

    /// Creates a new array that stores `len` bits,
    /// where each bit is initialized by `bit`.
    ///
    /// # Arguments
    ///
    ///  - `bit`: Bit value used for intinialization.
    ///  - `len`: Number of elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::BitArray;
    ///
    /// let bv = BitArray::from_bit(true, 5);
    /// assert_eq!(bv.len(), 5);
    /// assert_eq!(bv.words(), &[0b11111]);
    /// ```
    pub fn from_bit(bit: bool, len: usize) -> Self {
        let word = if bit { u32::MAX } else { 0 };
        let mut words = vec![word; broadword::words_for(len)];
        let shift = len % WORD_LEN;
        if let (Some(last), true) = (words.last_mut(), shift != 0) {
            *last &= broadword::low_mask(shift);
        }
        Self { words, len }
    }

    /// Creates a new array from input bit stream `bits`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::BitArray;
    ///
    /// let bv = BitArray::from_bits([false, true, false]);
    /// assert_eq!(bv.len(), 3);
    /// assert_eq!(bv.get_bit(1), Some(true));
    /// ```
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut this = Self::default();
        bits.into_iter().for_each(|b| this.push_bit(b));
        this
    }

    /// Creates a new array from raw words, keeping the lowest `len` bits.
    ///
    /// # Errors
    ///
    /// An error is returned if `words` cannot hold exactly `len` bits in whole words,
    /// or if a bit past `len` is set.
    pub fn from_words(words: Vec<u32>, len: usize) -> Result<Self> {
        if words.len() != broadword::words_for(len) {
            return Err(Error::malformed(format!(
                "{} words cannot hold exactly {len} bits",
                words.len()
            ))
            .into());
        }
        let shift = len % WORD_LEN;
        if let (Some(&last), true) = (words.last(), shift != 0) {
            if last & !broadword::low_mask(shift) != 0 {
                return Err(Error::malformed("bits past the length must be unset").into());
            }
        }
        Ok(Self { words, len })
    }

    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    ///
    /// # Arguments
    ///
    ///  - `pos`: Bit position.
    #[inline(always)]
    pub fn get_bit(&self, pos: usize) -> Option<bool> {
        if pos < self.len {
            let (block, shift) = (pos / WORD_LEN, pos % WORD_LEN);
            Some((self.words[block] >> shift) & 1 == 1)
        } else {
            None
        }
    }

    /// Updates the `pos`-th bit to `bit`.
    ///
    /// # Arguments
    ///
    ///  - `pos`: Bit position.
    ///  - `bit`: Bit value set.
    ///
    /// # Errors
    ///
    /// An error is returned if `self.len() <= pos`.
    #[inline(always)]
    pub fn set_bit(&mut self, pos: usize, bit: bool) -> Result<()> {
        if self.len() <= pos {
            return Err(anyhow!(
                "pos must be no greater than self.len()={}, but got {pos}.",
                self.len()
            ));
        }
        let word = pos / WORD_LEN;
        let pos_in_word = pos % WORD_LEN;
        self.words[word] &= !(1 << pos_in_word);
        self.words[word] |= (bit as u32) << pos_in_word;
        Ok(())
    }

    /// Pushes `bit` at the end.
    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) {
        let pos_in_word = self.len % WORD_LEN;
        if pos_in_word == 0 {
            self.words.push(bit as u32);
        } else if let Some(cur_word) = self.words.last_mut() {
            *cur_word |= (bit as u32) << pos_in_word;
        }
        self.len += 1;
    }

    /// Creates an iterator for enumerating bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::BitArray;
    ///
    /// let bv = BitArray::from_bits([false, true, false]);
    /// let mut it = bv.iter();
    /// assert_eq!(it.next(), Some(false));
    /// assert_eq!(it.next(), Some(true));
    /// assert_eq!(it.next(), Some(false));
    /// assert_eq!(it.next(), None);
    /// ```
    pub const fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Returns the number of bits stored.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the array is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bits the words can hold.
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_LEN
    }

    /// Gets the slice of raw words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Gets the number of words.
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }
}

impl NumBits for BitArray {
    /// Returns the number of bits stored (just wrapping [`Self::len()`]).
    fn num_bits(&self) -> usize {
        self.len()
    }

    /// Returns the number of bits set.
    ///
    /// # Notes on complexity
    ///
    /// It is performed by linear scan in $`O(u)`$ time.
    fn num_ones(&self) -> usize {
        self.words.iter().map(|&w| broadword::popcount(w)).sum()
    }
}

impl Access for BitArray {
    fn access(&self, pos: usize) -> Option<bool> {
        self.get_bit(pos)
    }
}

impl Rank for BitArray {
    /// Returns the number of ones from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.len() < pos`.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{BitArray, Rank};
    ///
    /// let bv = BitArray::from_bits([true, false, false, true]);
    /// assert_eq!(bv.rank1(1), Some(1));
    /// assert_eq!(bv.rank1(4), Some(2));
    /// assert_eq!(bv.rank1(5), None);
    /// ```
    fn rank1(&self, pos: usize) -> Option<usize> {
        if self.len() < pos {
            return None;
        }
        let (wpos, left) = (pos / WORD_LEN, pos % WORD_LEN);
        let mut r: usize = self.words[..wpos]
            .iter()
            .map(|&w| broadword::popcount(w))
            .sum();
        if left != 0 {
            r += broadword::popcount(self.words[wpos] & broadword::low_mask(left));
        }
        Some(r)
    }

    /// Returns the number of zeros from the 0-th bit to the `pos-1`-th bit, or
    /// [`None`] if `self.len() < pos`.
    fn rank0(&self, pos: usize) -> Option<usize> {
        Some(pos - self.rank1(pos)?)
    }
}

impl Select for BitArray {
    /// Searches the position of the `k`-th bit set.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{BitArray, Select};
    ///
    /// let bv = BitArray::from_bits([true, false, false, true]);
    /// assert_eq!(bv.select1(0), None);
    /// assert_eq!(bv.select1(1), Some(0));
    /// assert_eq!(bv.select1(2), Some(3));
    /// assert_eq!(bv.select1(3), None);
    /// ```
    fn select1(&self, k: usize) -> Option<usize> {
        let k = k.checked_sub(1)?;
        let mut cur_rank = 0;
        for (wpos, &word) in self.words.iter().enumerate() {
            let cnt = broadword::popcount(word);
            if k < cur_rank + cnt {
                let sel = wpos * WORD_LEN + broadword::select_in_word(word, k - cur_rank)?;
                return Some(sel);
            }
            cur_rank += cnt;
        }
        None
    }

    /// Searches the position of the `k`-th bit unset.
    ///
    /// # Complexity
    ///
    /// - Linear
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{BitArray, Select};
    ///
    /// let bv = BitArray::from_bits([true, false, false, true]);
    /// assert_eq!(bv.select0(1), Some(1));
    /// assert_eq!(bv.select0(2), Some(2));
    /// assert_eq!(bv.select0(3), None);
    /// ```
    fn select0(&self, k: usize) -> Option<usize> {
        let k = k.checked_sub(1)?;
        let mut cur_rank = 0;
        for (wpos, &word) in self.words.iter().enumerate() {
            let cnt = broadword::popcount(!word);
            if k < cur_rank + cnt {
                let sel = wpos * WORD_LEN + broadword::select_in_word(!word, k - cur_rank)?;
                // Padding bits past the length read as zeros.
                return (sel < self.len()).then_some(sel);
            }
            cur_rank += cnt;
        }
        None
    }
}

/// Iterator for enumerating bits, created by [`BitArray::iter()`].
pub struct Iter<'a> {
    bv: &'a BitArray,
    pos: usize,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    pub const fn new(bv: &'a BitArray) -> Self {
        Self { bv, pos: 0 }
    }
}

impl Iterator for Iter<'_> {
    type Item = bool;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.bv.get_bit(self.pos)?;
        self.pos += 1;
        Some(x)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bv.len() - self.pos;
        (left, Some(left))
    }
}

impl std::iter::Extend<bool> for BitArray {
    fn extend<I>(&mut self, bits: I)
    where
        I: IntoIterator<Item = bool>,
    {
        bits.into_iter().for_each(|b| self.push_bit(b));
    }
}

impl std::fmt::Debug for BitArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits: Vec<u8> = self.iter().map(u8::from).collect();
        f.debug_struct("BitArray")
            .field("bits", &MatrixView::new(&bits, 16))
            .field("len", &self.len)
            .finish()
    }
}

impl Serializable for BitArray {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = crate::utils::to_u32(self.len, "bit length")?.serialize_into(&mut writer)?;
        for w in &self.words {
            mem += w.serialize_into(&mut writer)?;
        }
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = u32::deserialize_from(&mut reader)? as usize;
        let words = (0..broadword::words_for(len))
            .map(|_| u32::deserialize_from(&mut reader))
            .collect::<Result<Vec<_>>>()?;
        Self::from_words(words, len)
    }

    fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<u32>() * (1 + self.words.len())
    }
}
