//! Surface size tracking
//!
//! Keeps the surface's backing resolution in sync with the size the host
//! reports for the drawable area. Size reports arrive on a separate callback
//! channel from the frame loop, so the observed target is stored here and
//! only applied to the surface when the next frame reconciles it.

/// A backing resolution in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area extent cannot back a surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One size report from the host.
///
/// Hosts differ in how precisely they can describe the drawable area, so a
/// report carries up to three metrics. `device_pixel_box` is authoritative
/// (density already applied); the other two are logical sizes that must be
/// scaled by the display density. winit reports device pixels directly, so
/// desktop windows always take the first path; the fallbacks cover hosts
/// that only expose logical layout sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeObservation {
    /// Drawable size in device pixels, density already applied.
    pub device_pixel_box: Option<(u32, u32)>,
    /// Drawable size in logical pixels.
    pub content_box: Option<(f64, f64)>,
    /// Legacy drawable rectangle in logical pixels.
    pub content_rect: Option<(f64, f64)>,
    /// Ratio of device pixels to logical pixels.
    pub scale_factor: f64,
}

impl SizeObservation {
    pub fn from_device_pixels(width: u32, height: u32) -> Self {
        Self {
            device_pixel_box: Some((width, height)),
            scale_factor: 1.0,
            ..Default::default()
        }
    }

    pub fn from_content_box(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            content_box: Some((width, height)),
            scale_factor,
            ..Default::default()
        }
    }

    pub fn from_content_rect(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            content_rect: Some((width, height)),
            scale_factor,
            ..Default::default()
        }
    }
}

/// Stores the most recently observed target size and reconciles the surface
/// backing resolution against it.
///
/// Single writer (the resize callback), single reader (the frame step); both
/// run on the event loop thread, so no locking is needed. A threaded host
/// would wrap this in a mutex.
#[derive(Debug, Default)]
pub struct ExtentTracker {
    target: Extent,
}

impl ExtentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a size report, picking the most precise metric available.
    ///
    /// Only the device-pixel metric gives the exact answer; the logical
    /// metrics are an imperfect fallback scaled by the display density. A
    /// report carrying no metric at all is ignored.
    pub fn observe(&mut self, observation: &SizeObservation) {
        let target = if let Some((width, height)) = observation.device_pixel_box {
            // Density is already baked into this metric
            Extent::new(width, height)
        } else if let Some((width, height)) = observation.content_box {
            scaled(width, height, observation.scale_factor)
        } else if let Some((width, height)) = observation.content_rect {
            scaled(width, height, observation.scale_factor)
        } else {
            return;
        };
        self.target = target;
    }

    /// The last observed target size.
    pub fn target(&self) -> Extent {
        self.target
    }

    /// Bring `backing` up to date with the observed target.
    ///
    /// Returns true when the backing resolution changed, so the caller knows
    /// the surface needs reconfiguring before the next draw.
    pub fn reconcile(&self, backing: &mut Extent) -> bool {
        let changed = *backing != self.target;
        if changed {
            *backing = self.target;
        }
        changed
    }
}

fn scaled(width: f64, height: f64, scale_factor: f64) -> Extent {
    Extent::new(
        (width * scale_factor).round() as u32,
        (height * scale_factor).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_pixel_metric_ignores_density() {
        let mut tracker = ExtentTracker::new();
        let mut observation = SizeObservation::from_device_pixels(200, 100);
        observation.scale_factor = 2.0;
        tracker.observe(&observation);
        assert_eq!(tracker.target(), Extent::new(200, 100));
    }

    #[test]
    fn content_box_is_scaled_by_density() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_content_box(200.0, 100.0, 2.0));
        assert_eq!(tracker.target(), Extent::new(400, 200));
    }

    #[test]
    fn content_rect_is_scaled_by_density() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_content_rect(320.5, 240.5, 1.0));
        assert_eq!(tracker.target(), Extent::new(321, 241));
    }

    #[test]
    fn device_pixel_metric_wins_over_the_fallbacks() {
        let mut tracker = ExtentTracker::new();
        let observation = SizeObservation {
            device_pixel_box: Some((200, 100)),
            content_box: Some((999.0, 999.0)),
            content_rect: Some((111.0, 111.0)),
            scale_factor: 2.0,
        };
        tracker.observe(&observation);
        assert_eq!(tracker.target(), Extent::new(200, 100));
    }

    #[test]
    fn content_box_wins_over_content_rect() {
        let mut tracker = ExtentTracker::new();
        let observation = SizeObservation {
            device_pixel_box: None,
            content_box: Some((200.0, 100.0)),
            content_rect: Some((111.0, 111.0)),
            scale_factor: 2.0,
        };
        tracker.observe(&observation);
        assert_eq!(tracker.target(), Extent::new(400, 200));
    }

    #[test]
    fn scaling_rounds_to_nearest_pixel() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_content_box(100.3, 100.7, 1.0));
        assert_eq!(tracker.target(), Extent::new(100, 101));
    }

    #[test]
    fn empty_observation_keeps_the_previous_target() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_device_pixels(640, 480));
        tracker.observe(&SizeObservation::default());
        assert_eq!(tracker.target(), Extent::new(640, 480));
    }

    #[test]
    fn reconcile_reports_changed_only_on_mismatch() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_device_pixels(640, 480));

        let mut backing = Extent::new(0, 0);
        assert!(tracker.reconcile(&mut backing));
        assert_eq!(backing, Extent::new(640, 480));

        // Already in sync
        assert!(!tracker.reconcile(&mut backing));
        assert_eq!(backing, Extent::new(640, 480));
    }

    #[test]
    fn reconcile_detects_single_dimension_changes() {
        let mut tracker = ExtentTracker::new();
        tracker.observe(&SizeObservation::from_device_pixels(640, 480));

        let mut backing = Extent::new(640, 479);
        assert!(tracker.reconcile(&mut backing));
        assert_eq!(backing, Extent::new(640, 480));
    }

    #[test]
    fn empty_extent() {
        assert!(Extent::new(0, 480).is_empty());
        assert!(Extent::new(640, 0).is_empty());
        assert!(!Extent::new(640, 480).is_empty());
    }
}
