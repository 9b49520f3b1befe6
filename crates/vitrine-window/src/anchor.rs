//! Scroll anchor representation.
//!
//! The anchor is the slot currently treated as the scroll-position
//! reference, plus a sub-slot pixel offset into it. Anchor walks live on
//! [`WindowModel`](crate::WindowModel) because they need slot heights.

/// The slot + sub-slot offset that anchors the scroll position.
///
/// In steady state `0.0 <= offset < height(index)`; the offset can leave
/// that range transiently while a scroll delta is being resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnchor {
    /// Index of the anchoring slot.
    pub index: usize,
    /// Pixel offset into the anchoring slot.
    pub offset: f32,
}

impl ScrollAnchor {
    /// Anchor at the very top of the collection.
    pub const ZERO: ScrollAnchor = ScrollAnchor {
        index: 0,
        offset: 0.0,
    };

    /// Creates an anchor at the given slot and sub-slot offset.
    pub fn new(index: usize, offset: f32) -> Self {
        Self { index, offset }
    }
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        assert_eq!(ScrollAnchor::default(), ScrollAnchor::ZERO);
        assert_eq!(ScrollAnchor::ZERO.index, 0);
        assert_eq!(ScrollAnchor::ZERO.offset, 0.0);
    }
}
