//! Top module for bit vectors.
//!
//! # Introduction
//!
//! Let $`S \subseteq \{ 0,1,\dots,u-1 \}`$ be a set of positions
//! at which bits are set in a bit vector of length $`u`$.
//! The bit vectors here support the following queries:
//!
//! - $`\textrm{Access}(i)`$ returns `true` if $`i \in S`$ or `false` otherwise (implemented by [`Access`]).
//! - $`\textrm{Rank}(i)`$ returns the cardinality of $`\{ x \in S \mid x < i \}`$ (implemented by [`Rank`]).
//! - $`\textrm{Select}(k)`$ returns the $`k`$-th smallest position in $`S`$, counting from one (implemented by [`Select`]).
//!
//! # Data structures
//!
//! | Implementations | Access | Rank | Select | Update | Memory (bits) |
//! | --- | :-: | :-: | :-: | :-: | :-: |
//! | [`BitArray`] | $`O(1)`$ | $`O(u)`$ | $`O(u)`$ | $`O(1)`$ | $`u`$ |
//! | [`RankedBitArray`] | $`O(1)`$ | $`O(1)`$ | $`O(\lg u)`$ | rebuild | $`2u`$ |
//!
//! [`BitArray`] packs bits into 32-bit words. Bit $`i`$ lives in word $`i \gg 5`$ at
//! position $`i \mathbin{\&} 31`$, and the capacity is rounded up to whole words.
//!
//! [`RankedBitArray`] pairs every raw word with the cumulative number of ones up to and
//! including that word. Rank reads one table entry and one masked popcount. Select
//! binary-searches the table for the word holding the answer and then scans that word.
//!
//! [`Louds`] adds level-order tree navigation on top of a [`RankedBitArray`].
//!
//! # Examples
//!
//! ```
//! use trie_encodings::bit_vectors::{RankedBitArray, prelude::*};
//!
//! let bv = RankedBitArray::from_bits([true, false, false, true]);
//!
//! assert_eq!(bv.num_bits(), 4);
//! assert_eq!(bv.num_ones(), 2);
//!
//! assert_eq!(bv.access(1), Some(false));
//!
//! assert_eq!(bv.rank1(1), Some(1));
//! assert_eq!(bv.rank0(1), Some(0));
//!
//! assert_eq!(bv.select1(2), Some(3));
//! assert_eq!(bv.select0(1), Some(1));
//! ```
pub mod bit_array;
pub mod louds;
pub mod prelude;
pub mod ranked_bit_array;

pub use bit_array::BitArray;
pub use louds::Louds;
pub use ranked_bit_array::RankedBitArray;

/// Interface for reporting basic statistics in a bit vector.
pub trait NumBits {
    /// Returns the number of bits stored.
    fn num_bits(&self) -> usize;

    /// Returns the number of bits set.
    fn num_ones(&self) -> usize;

    /// Returns the number of bits unset.
    #[inline(always)]
    fn num_zeros(&self) -> usize {
        self.num_bits() - self.num_ones()
    }
}

/// Interface for accessing elements on bit arrays.
pub trait Access {
    /// Returns the `pos`-th bit, or [`None`] if out of bounds.
    fn access(&self, pos: usize) -> Option<bool>;
}

/// Interface for rank queries on bit vectors.
///
/// Let $`S \subseteq \{ 0,1,\dots,u-1 \}`$ be a set of positions
/// at which bits are set in a bit vector of length $`u`$.
pub trait Rank {
    /// Returns the cardinality of $`\{ x \in S \mid x < i \}`$,
    /// or [`None`] if $`u < i`$.
    fn rank1(&self, i: usize) -> Option<usize>;

    /// Returns the cardinality of $`\{ x \not\in S \mid 0 \leq x < i \}`$,
    /// or [`None`] if $`u < i`$.
    fn rank0(&self, i: usize) -> Option<usize>;
}

/// Interface for select queries on bit vectors.
///
/// Occurrences count from one: `select1(1)` is the position of the first set bit,
/// and `select1(0)` is always [`None`].
pub trait Select {
    /// Returns the position of the $`k`$-th set bit, or
    /// [`None`] if $`k = 0`$ or fewer than $`k`$ bits are set.
    fn select1(&self, k: usize) -> Option<usize>;

    /// Returns the position of the $`k`$-th unset bit, or
    /// [`None`] if $`k = 0`$ or fewer than $`k`$ bits are unset.
    fn select0(&self, k: usize) -> Option<usize>;
}
