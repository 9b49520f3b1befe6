//! Content request gating.
//!
//! Decides when to ask the data collaborator for more records and how many.
//! At most one request is in flight at a time; a delivery that comes up
//! short marks the end of the collection so later passes stop re-asking.

use crate::host::ContentSource;

/// Tracks the fetch in-flight flag and request sizing.
#[derive(Debug)]
pub struct ContentRequester {
    min_request: usize,
    max_request: usize,
    in_flight: bool,
    last_requested: usize,
    end_reached: bool,
}

impl ContentRequester {
    pub fn new(min_request: usize, max_request: usize) -> Self {
        Self {
            min_request,
            max_request,
            in_flight: false,
            last_requested: 0,
            end_reached: false,
        }
    }

    /// Issues a request if the window overruns loaded data.
    ///
    /// `needed = min(last_item, known_count) - loaded_count`; when positive
    /// and nothing is in flight, requests `needed` clamped to the
    /// configured min/max and sets the in-flight flag. Returns the request
    /// size, or `None` when suppressed.
    pub fn maybe_request(
        &mut self,
        last_item: usize,
        known_count: usize,
        loaded_count: usize,
        source: &mut dyn ContentSource,
    ) -> Option<usize> {
        if self.in_flight || self.end_reached {
            return None;
        }
        let target = last_item.min(known_count);
        let needed = target.saturating_sub(loaded_count);
        if needed == 0 {
            return None;
        }
        let count = needed.clamp(self.min_request, self.max_request);
        self.in_flight = true;
        self.last_requested = count;
        log::debug!("requesting {count} records ({loaded_count} loaded, window end {last_item})");
        source.request_more(count);
        Some(count)
    }

    /// Records a delivery of `count` records.
    ///
    /// Always clears the in-flight flag, even on an empty delivery — a
    /// short delivery is not an error, it marks the end of the collection
    /// and leaves the remaining slots permanently tombstoned.
    pub fn delivered(&mut self, count: usize) {
        if self.in_flight && count < self.last_requested {
            log::debug!(
                "short delivery ({count} of {} requested), collection exhausted",
                self.last_requested
            );
            self.end_reached = true;
        }
        self.in_flight = false;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    /// Clears all fetch state (full reset).
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.last_requested = 0;
        self.end_reached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSource {
        known: usize,
        requests: Vec<usize>,
    }

    impl ContentSource for RecordingSource {
        fn known_record_count(&self) -> usize {
            self.known
        }

        fn request_more(&mut self, count: usize) {
            self.requests.push(count);
        }
    }

    #[test]
    fn test_no_request_when_window_is_within_loaded_data() {
        // knownRecordCount = 40, loaded = 40, window [30, 60).
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 40,
            requests: Vec::new(),
        };
        assert_eq!(requester.maybe_request(60, 40, 40, &mut source), None);
        assert!(source.requests.is_empty());
        assert!(!requester.in_flight());
    }

    #[test]
    fn test_request_covers_shortfall() {
        // loaded = 40, window [30, 70) -> needed 30 -> request 30.
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 500,
            requests: Vec::new(),
        };
        assert_eq!(requester.maybe_request(70, 500, 40, &mut source), Some(30));
        assert_eq!(source.requests, vec![30]);
        assert!(requester.in_flight());
    }

    #[test]
    fn test_request_clamped_to_bounds() {
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 500,
            requests: Vec::new(),
        };
        // Shortfall of 5 is padded up to the minimum.
        assert_eq!(requester.maybe_request(45, 500, 40, &mut source), Some(25));
        requester.delivered(25);
        // Shortfall of 300 is capped at the maximum.
        assert_eq!(requester.maybe_request(365, 500, 65, &mut source), Some(120));
        assert_eq!(source.requests, vec![25, 120]);
    }

    #[test]
    fn test_duplicate_request_suppressed_while_in_flight() {
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 500,
            requests: Vec::new(),
        };
        requester.maybe_request(70, 500, 40, &mut source);
        assert_eq!(requester.maybe_request(70, 500, 40, &mut source), None);
        assert_eq!(source.requests.len(), 1);

        requester.delivered(30);
        assert!(!requester.in_flight());
        assert!(requester.maybe_request(110, 500, 70, &mut source).is_some());
    }

    #[test]
    fn test_short_delivery_marks_end_of_collection() {
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 500,
            requests: Vec::new(),
        };
        requester.maybe_request(70, 500, 40, &mut source);
        requester.delivered(7);
        assert!(!requester.in_flight());
        assert!(requester.end_reached());
        // Later shortfalls no longer re-request.
        assert_eq!(requester.maybe_request(120, 500, 47, &mut source), None);
    }

    #[test]
    fn test_reset_clears_fetch_state() {
        let mut requester = ContentRequester::new(25, 120);
        let mut source = RecordingSource {
            known: 500,
            requests: Vec::new(),
        };
        requester.maybe_request(70, 500, 40, &mut source);
        requester.delivered(0);
        assert!(requester.end_reached());

        requester.reset();
        assert!(!requester.end_reached());
        assert!(!requester.in_flight());
        assert!(requester.maybe_request(70, 500, 40, &mut source).is_some());
    }
}
