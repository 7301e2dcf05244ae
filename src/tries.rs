//! Top module for the trie encodings.
//!
//! # Introduction
//!
//! All three encodings index the same logical structure: a tree whose edges are labelled
//! with single bytes, where a node is flagged when the path from the root to it spells
//! an inserted word. They answer the same two queries through [`Search`](crate::Search):
//!
//! - `search(w)` is `true` iff `w` was inserted.
//! - `starts_with(p)` is `true` iff some inserted word starts with `p`.
//!
//! # Encodings
//!
//! | Encodings | Insert | Query step | Memory per node (bytes) |
//! | --- | :-: | :-: | :-: |
//! | [`Trie`] | yes | $`O(\lg \sigma)`$ | heap node + child table |
//! | [`BinaryTrie`] | -- | $`O(\sigma)`$ | $`2 + 5 \cdot \textrm{children}`$ |
//! | [`LabelledTree`] | -- | $`O(\sigma \lg n)`$ | $`2 + 1/4`$ |
//!
//! where $`\sigma`$ is the number of children of the visited node.
//!
//! Children are always visited in ascending key order, so every encoding built from the
//! same [`Trie`] is byte-for-byte reproducible.
//!
//! ## Binary layouts
//!
//! All multi-byte integers are 4 bytes, most significant byte first.
//!
//! - [`Trie`] record: `size:u32 | eow:u8 | { key:u8 | <child record> }*`, where `size`
//!   covers the whole record including its descendants.
//! - [`BinaryTrie`] record: `eow:u8 | count:u8 | { key:u8 | offset:u32 }*`, where `offset`
//!   is the absolute position of the child record.
//! - [`LabelledTree`]: `louds ++ keys ++ eow`.
pub mod binary_trie;
pub mod labelled_tree;
pub mod trie;

pub use binary_trie::BinaryTrie;
pub use labelled_tree::LabelledTree;
pub use trie::{LevelOrder, LevelStep, NodeId, Trie, TrieNode};
