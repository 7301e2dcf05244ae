//! # `trie-encodings`: prefix-searchable string sets in three encodings
//!
//! This crate indexes a set of byte strings for exact-match and prefix search, in three
//! interchangeable encodings that trade build cost, memory footprint, and query speed.
//!
//! ## Data structures
//!
//! - [`Trie`]
//!   - Live trie over an arena of nodes, supporting incremental insertion and a recursive
//!     binary format in which every record carries its own byte size.
//! - [`BinaryTrie`]
//!   - Flat, offset-addressed buffer answering queries directly on the bytes.
//! - [`LabelledTree`]
//!   - Succinct trie made of a LOUDS bit vector and two label arrays.
//!
//! [`BinaryTrie`] and [`LabelledTree`] are one-shot snapshots of a [`Trie`]; they are
//! immutable once built and can be queried from any number of threads.
//!
//! The succinct stack below [`LabelledTree`] is exposed in [`bit_vectors`]:
//! [`BitArray`](bit_vectors::BitArray), [`RankedBitArray`](bit_vectors::RankedBitArray),
//! and [`Louds`](bit_vectors::Louds).
//!
//! ## Keys
//!
//! Keys are bytes. A `&str` contributes its UTF-8 bytes; use [`utils::code_units`] to map
//! each `char` in `U+0000..=U+00FF` to a single byte instead.
//!
//! ## Examples
//!
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use trie_encodings::{prelude::*, BinaryTrie, LabelledTree, Trie};
//!
//! let words = ["hello", "hey", "world"];
//! let trie = Trie::create(words);
//! let binary = BinaryTrie::create(&trie)?;
//! let succinct = LabelledTree::create(&trie);
//!
//! assert!(trie.search("hello") && binary.search("hello") && succinct.search("hello"));
//! assert!(!trie.search("he") && !binary.search("he") && !succinct.search("he"));
//! assert!(trie.starts_with("he") && binary.starts_with("he") && succinct.starts_with("he"));
//!
//! let bytes = succinct.to_bytes()?;
//! let other = LabelledTree::from_bytes(&bytes)?;
//! assert!(other.search("world"));
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]

pub mod bit_vectors;
pub mod broadword;
pub mod cursor;
pub mod error;
pub mod queue;
pub mod serial;
pub mod tries;
pub mod utils;

pub use cursor::ByteCursor;
pub use error::Error;
pub use queue::Queue;
pub use serial::Serializable;
pub use tries::{BinaryTrie, LabelledTree, Trie};

use anyhow::Result;

/// Interface for building an index from a set of words.
pub trait Build {
    /// Creates a new index holding every word of `words`.
    ///
    /// # Errors
    ///
    /// An error is returned if the words do not fit in the fixed-width fields of the encoding.
    fn build_from_words<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
        Self: Sized;
}

/// Interface for exact-match and prefix queries.
pub trait Search {
    /// Checks if `word` was inserted as a whole word.
    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool;

    /// Checks if some inserted word starts with `prefix`.
    fn starts_with<W: AsRef<[u8]>>(&self, prefix: W) -> bool;
}

/// The prelude of the crate, importing every trait.
///
/// ```
/// # #![allow(unused_imports)]
/// use trie_encodings::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bit_vectors::prelude::*;
    pub use crate::{Build, Search, Serializable};
}
