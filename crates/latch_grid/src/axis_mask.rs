//! Fixed-width signed bit field for one axis of a packed cell ID.
//!
//! A composite ID is built by repeatedly making room in an accumulator and
//! OR-ing in the next axis:
//!
//! ```text
//! width(x)=20, width(y)=24, width(z)=20
//! ┌──────────────┬──────────────────┬──────────────┐
//! │ x: bits 63:44│ y: bits 43:20    │ z: bits 19:0 │
//! └──────────────┴──────────────────┴──────────────┘
//! ```
//!
//! Encoding masks (never rejects); decoding sign-extends the field back to
//! a full `i64`.

/// Largest width a single axis may claim.
pub const MAX_WIDTH: u32 = u64::BITS;

/// Bit field codec for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisMask {
    width: u32,
    mask: u64,
    sign_bit: u64,
}

impl AxisMask {
    /// A zero-width mask for a flattened axis.
    pub const NONE: Self = Self::new(0);

    /// Create a mask covering the low `width` bits.
    ///
    /// # Panics
    /// Panics if `width` exceeds [`MAX_WIDTH`]. [`Grid::with_bits`] rejects
    /// such allocations with an error before any mask is built.
    ///
    /// [`Grid::with_bits`]: crate::Grid::with_bits
    pub const fn new(width: u32) -> Self {
        assert!(width <= MAX_WIDTH, "axis width exceeds 64 bits");
        if width == 0 {
            return Self {
                width: 0,
                mask: 0,
                sign_bit: 0,
            };
        }
        Self {
            width,
            mask: u64::MAX >> (MAX_WIDTH - width),
            sign_bit: 1 << (width - 1),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    #[inline]
    pub fn sign_bit(&self) -> u64 {
        self.sign_bit
    }

    /// Smallest value that survives an encode/decode cycle.
    pub fn min_value(&self) -> i64 {
        if self.width == 0 {
            0
        } else {
            i64::MIN >> (MAX_WIDTH - self.width)
        }
    }

    /// Largest value that survives an encode/decode cycle.
    pub fn max_value(&self) -> i64 {
        if self.width == 0 {
            0
        } else {
            i64::MAX >> (MAX_WIDTH - self.width)
        }
    }

    /// Whether `value` fits in this field without truncation.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }

    /// Shift `accumulator` left by this field's width.
    ///
    /// A 64-bit field pushes everything out.
    #[inline]
    pub fn make_room(&self, accumulator: u64) -> u64 {
        accumulator.checked_shl(self.width).unwrap_or(0)
    }

    /// Drop this field from the low end of `word`.
    #[inline]
    pub fn advance(&self, word: u64) -> u64 {
        word.checked_shr(self.width).unwrap_or(0)
    }

    /// OR the low `width` bits of `value` into `accumulator`.
    ///
    /// The caller must already have called [`make_room`](Self::make_room).
    /// Out of range values are truncated to their low bits.
    #[inline]
    pub fn encode(&self, value: i64, accumulator: u64) -> u64 {
        accumulator | (value as u64 & self.mask)
    }

    /// Read the low `width` bits of `word` as a signed value.
    #[inline]
    pub fn decode(&self, word: u64) -> i64 {
        if self.width == 0 {
            return 0;
        }
        let shift = MAX_WIDTH - self.width;
        ((word << shift) as i64) >> shift
    }
}

impl Default for AxisMask {
    fn default() -> Self {
        Self::NONE
    }
}
