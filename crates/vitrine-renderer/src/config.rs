//! Renderer configuration.

use web_time::Duration;

/// Default addressing bound on logical slots.
pub const DEFAULT_MAX_RECORDS: usize = 500;

/// Default overscan above the viewport (items rendered behind the scroll
/// direction on a steady forward scroll).
pub const DEFAULT_OVERSCAN_ABOVE: usize = 10;

/// Default overscan below the viewport (items rendered ahead of the scroll
/// direction on a steady forward scroll).
pub const DEFAULT_OVERSCAN_BELOW: usize = 50;

/// Default runway kept past the last rendered item, in pixels.
pub const DEFAULT_RUNWAY_LENGTH: f32 = 2000.0;

/// Default duration of the tombstone-to-content swap animation.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Default bounds on a single content request, in records.
pub const DEFAULT_MIN_REQUEST: usize = 25;
pub const DEFAULT_MAX_REQUEST: usize = 120;

/// Tunable knobs for [`ViewportRenderer`](crate::ViewportRenderer).
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Upper bound on how many logical slots the window model addresses.
    pub max_records: usize,
    /// Overscan slots kept behind the direction of travel.
    pub overscan_above: usize,
    /// Overscan slots kept ahead of the direction of travel.
    pub overscan_below: usize,
    /// Extra scrollable length kept past the last rendered item.
    pub runway_length: f32,
    /// Duration of swap/position transitions. Zero disables deferral:
    /// outgoing tombstones return to the pool on the next pass.
    pub animation_duration: Duration,
    /// Minimum records per content request.
    pub min_request: usize,
    /// Maximum records per content request.
    pub max_request: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            overscan_above: DEFAULT_OVERSCAN_ABOVE,
            overscan_below: DEFAULT_OVERSCAN_BELOW,
            runway_length: DEFAULT_RUNWAY_LENGTH,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            min_request: DEFAULT_MIN_REQUEST,
            max_request: DEFAULT_MAX_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.max_records, 500);
        assert_eq!(config.overscan_above, 10);
        assert_eq!(config.overscan_below, 50);
        assert_eq!(config.runway_length, 2000.0);
        assert_eq!(config.animation_duration, Duration::from_millis(200));
        assert_eq!(config.min_request, 25);
        assert_eq!(config.max_request, 120);
    }
}
