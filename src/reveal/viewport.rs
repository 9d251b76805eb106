//! Viewport: auto-scroll policy and coalesced scroll-to-bottom requests.
//!
//! The viewport keeps the newest content pinned in view until the user
//! scrolls away from the bottom, and pins it again once they scroll back.
//! Distances are in whatever unit the view measures, pixels or rows.

/// Default distance from the bottom within which auto-scroll stays on.
pub const DEFAULT_NEAR_BOTTOM_THRESHOLD: f64 = 100.0;

/// Configuration for the viewport policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Auto-scroll is on while the distance from the bottom is below this.
    pub near_bottom_threshold: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            near_bottom_threshold: DEFAULT_NEAR_BOTTOM_THRESHOLD,
        }
    }
}

/// A scroll position observed by the view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Offset of the top of the visible area.
    pub scroll_top: f64,
    /// Height of the whole scrollable content.
    pub scroll_height: f64,
    /// Height of the visible area.
    pub client_height: f64,
}

impl ViewportMetrics {
    /// How far the visible area is from the bottom of the content.
    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Auto-scroll state and the pending scroll request.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    auto_scroll: bool,
    /// Set by any number of requests, drained once per frame.
    scroll_requested: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    /// Create a viewport pinned to the bottom.
    pub const fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            auto_scroll: true,
            scroll_requested: false,
        }
    }

    /// Whether new content should scroll into view.
    pub const fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Record a scroll position reported by the view.
    ///
    /// Returns the new auto-scroll state.
    pub fn observe(&mut self, metrics: ViewportMetrics) -> bool {
        self.observe_distance(metrics.distance_from_bottom())
    }

    /// Record the distance from the bottom of the content.
    pub fn observe_distance(&mut self, distance: f64) -> bool {
        let near_bottom = distance < self.config.near_bottom_threshold;
        if near_bottom != self.auto_scroll {
            tracing::trace!(distance, near_bottom, "auto-scroll toggled");
        }
        self.auto_scroll = near_bottom;
        self.auto_scroll
    }

    /// Ask for a scroll to the bottom if auto-scroll is on.
    ///
    /// Returns whether a request was recorded.
    pub fn request_scroll_to_bottom(&mut self) -> bool {
        if self.auto_scroll {
            self.scroll_requested = true;
        }
        self.auto_scroll
    }

    /// Re-enable auto-scroll and request a scroll regardless of the current
    /// position. Used when a new turn starts.
    pub fn pin_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_requested = true;
    }

    /// Whether a scroll is waiting for the next frame.
    pub const fn has_pending_request(&self) -> bool {
        self.scroll_requested
    }

    /// Drain the pending request for the frame being rendered.
    ///
    /// Any number of requests since the last frame collapse into one `true`.
    /// While the user is scrolled away the request stays pending and fires on
    /// the first frame after they return near the bottom.
    pub fn take_scroll_request(&mut self) -> bool {
        if !self.auto_scroll {
            return false;
        }
        std::mem::take(&mut self.scroll_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_pinned() {
        let viewport = Viewport::default();
        assert!(viewport.auto_scroll());
        assert!(!viewport.has_pending_request());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut viewport = Viewport::default();
        assert!(viewport.observe_distance(99.9));
        assert!(!viewport.observe_distance(100.0));
        assert!(viewport.observe_distance(0.0));
    }

    #[test]
    fn test_observe_metrics() {
        let mut viewport = Viewport::default();
        let scrolled_up = ViewportMetrics {
            scroll_top: 0.0,
            scroll_height: 2000.0,
            client_height: 600.0,
        };
        assert!(!viewport.observe(scrolled_up));

        let at_bottom = ViewportMetrics {
            scroll_top: 1350.0,
            ..scrolled_up
        };
        assert!(viewport.observe(at_bottom));
    }

    #[test]
    fn test_requests_coalesce() {
        let mut viewport = Viewport::default();
        for _ in 0..5 {
            viewport.request_scroll_to_bottom();
        }
        assert!(viewport.take_scroll_request());
        assert!(!viewport.take_scroll_request());
    }

    #[test]
    fn test_no_request_while_scrolled_away() {
        let mut viewport = Viewport::default();
        viewport.observe_distance(500.0);
        assert!(!viewport.request_scroll_to_bottom());
        assert!(!viewport.take_scroll_request());
    }

    #[test]
    fn test_pin_overrides_manual_scroll() {
        let mut viewport = Viewport::default();
        viewport.observe_distance(500.0);
        viewport.pin_to_bottom();
        assert!(viewport.auto_scroll());
        assert!(viewport.take_scroll_request());
    }

    #[test]
    fn test_request_held_while_scrolled_away() {
        let mut viewport = Viewport::default();
        viewport.request_scroll_to_bottom();
        viewport.observe_distance(300.0);
        assert!(!viewport.take_scroll_request());
        assert!(!viewport.take_scroll_request());
        assert!(viewport.has_pending_request());

        viewport.observe_distance(40.0);
        assert!(viewport.take_scroll_request());
        assert!(!viewport.has_pending_request());
    }
}
