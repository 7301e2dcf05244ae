//! Utilities shared by the encodings.

use anyhow::Result;

use crate::Error;

/// Returns `ceil(x / y)`.
///
/// # Examples
///
/// ```
/// use trie_encodings::utils::ceiled_divide;
///
/// assert_eq!(ceiled_divide(10, 2), 5);
/// assert_eq!(ceiled_divide(10, 3), 4);
/// ```
///
/// # Panics
///
/// It will panic if `y == 0`.
pub const fn ceiled_divide(x: usize, y: usize) -> usize {
    (x + y - 1) / y
}

/// Converts `text` into single-byte keys, one per `char`.
///
/// Unlike `text.as_bytes()`, which yields UTF-8 bytes, this maps each code point
/// in `U+0000..=U+00FF` to the byte of the same value.
///
/// # Errors
///
/// [`Error::KeyOutOfRange`] is returned for the first char above `U+00FF`.
///
/// # Examples
///
/// ```
/// use trie_encodings::utils::code_units;
///
/// assert_eq!(code_units("é").unwrap(), vec![0xE9]);
/// assert!(code_units("日本").is_err());
/// ```
pub fn code_units(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| anyhow::Error::from(Error::KeyOutOfRange(c))))
        .collect()
}

/// Converts `len` into a `u32` field, or fails with [`Error::CapacityExceeded`].
pub(crate) fn to_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        anyhow::Error::from(Error::CapacityExceeded(format!(
            "{what} {len} does not fit in 32 bits"
        )))
    })
}

/// A debug view of a matrix-like structure for long arrays.
pub(crate) struct MatrixView<'a, T> {
    data: &'a [T],
    cols: usize,
}

impl<'a, T> MatrixView<'a, T> {
    /// Creates a new `MatrixView` from a slice and the number of columns.
    pub fn new(data: &'a [T], cols: usize) -> Self {
        assert!(cols > 0, "Number of columns must be greater than zero.");
        Self { data, cols }
    }
}

impl<'a, T: std::fmt::Debug> std::fmt::Debug for MatrixView<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "[")?;
            for row in self.data.chunks(self.cols) {
                write!(f, "    ")?;
                for (i, item) in row.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                writeln!(f, ",")?;
            }
            write!(f, "]")
        } else {
            write!(f, "[{} items]", self.data.len())
        }
    }
}
