//! Shared tombstone geometry estimate.
//!
//! One representative placeholder node is measured per renderer session and
//! its box stands in for every slot whose real geometry is unknown. The
//! estimate is invalidated and remeasured on viewport resize.

/// Fallback tombstone height when the representative node measures to a
/// degenerate (zero or negative) box, so offset math never divides by zero.
pub const DEFAULT_TOMBSTONE_HEIGHT: f32 = 100.0;

/// The single shared geometry estimate for unmeasured slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TombstoneLayout {
    /// Estimated per-item height in scroll-axis pixels. Always positive.
    pub height: f32,
    /// Estimated per-item width in cross-axis pixels.
    pub width: f32,
}

impl TombstoneLayout {
    /// Creates a layout from a measured placeholder box, substituting the
    /// default height for degenerate measurements.
    pub fn from_measured(height: f32, width: f32) -> Self {
        let height = if height > 0.0 {
            height
        } else {
            log::warn!(
                "tombstone measured with degenerate height {height}, \
                 falling back to {DEFAULT_TOMBSTONE_HEIGHT}"
            );
            DEFAULT_TOMBSTONE_HEIGHT
        };
        Self { height, width }
    }

    /// Items per row for multi-column row packing, guarded to at least one
    /// column for degenerate viewport widths.
    pub fn columns(&self, viewport_width: f32) -> usize {
        if self.width <= 0.0 || viewport_width <= 0.0 {
            return 1;
        }
        ((viewport_width / self.width).floor() as usize).max(1)
    }

    /// Estimated scroll-axis extent of `item_count` items packed into rows
    /// of [`columns`](Self::columns) at the given viewport width.
    pub fn estimate_extent(&self, item_count: usize, viewport_width: f32) -> f32 {
        let columns = self.columns(viewport_width);
        let rows = item_count.div_ceil(columns);
        rows as f32 * self.height
    }
}

impl Default for TombstoneLayout {
    fn default() -> Self {
        Self {
            height: DEFAULT_TOMBSTONE_HEIGHT,
            width: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_measurement_falls_back() {
        let layout = TombstoneLayout::from_measured(0.0, 80.0);
        assert_eq!(layout.height, DEFAULT_TOMBSTONE_HEIGHT);
        let layout = TombstoneLayout::from_measured(-5.0, 80.0);
        assert_eq!(layout.height, DEFAULT_TOMBSTONE_HEIGHT);
    }

    #[test]
    fn test_columns_guards_degenerate_widths() {
        let layout = TombstoneLayout::from_measured(100.0, 250.0);
        assert_eq!(layout.columns(1000.0), 4);
        // Narrower than one item still packs one column.
        assert_eq!(layout.columns(120.0), 1);
        assert_eq!(layout.columns(0.0), 1);
        assert_eq!(layout.columns(-50.0), 1);

        let zero_width = TombstoneLayout::from_measured(100.0, 0.0);
        assert_eq!(zero_width.columns(1000.0), 1);
    }

    #[test]
    fn test_estimate_extent_packs_rows() {
        let layout = TombstoneLayout::from_measured(100.0, 250.0);
        // 10 items, 4 columns -> 3 rows -> 300px.
        assert_eq!(layout.estimate_extent(10, 1000.0), 300.0);
        // Single column fallback: 10 rows.
        assert_eq!(layout.estimate_extent(10, 0.0), 1000.0);
    }
}
