//! Source bitmap addressing

/// Pixels per bitmap word
pub const WORD_BITS: u16 = 16;

/// Dimensions of the interpreter's display bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitmapSize {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl BitmapSize {
    /// Create a bitmap size
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// A zero-sized bitmap means no display has been set up yet
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of 16-bit words per row (rows are padded to a whole word)
    pub const fn words_per_row(&self) -> usize {
        (self.width as usize).div_ceil(WORD_BITS as usize)
    }

    /// Word index of `column` in `row`
    pub const fn word_index(&self, row: u16, column: usize) -> usize {
        row as usize * self.words_per_row() + column
    }
}

/// Read access to a packed 1-bpp bitmap
pub trait DisplayBitmap {
    /// Fetch the word at `index` (row-major, `words_per_row` words per row)
    fn word(&self, index: usize) -> u16;
}

impl DisplayBitmap for [u16] {
    fn word(&self, index: usize) -> u16 {
        self.get(index).copied().unwrap_or(0)
    }
}

impl<const N: usize> DisplayBitmap for [u16; N] {
    fn word(&self, index: usize) -> u16 {
        self.as_slice().word(index)
    }
}
