//! Window state management
//!
//! Per-window state: window handle, GPU surface, size tracking, and the
//! built backdrop pipeline.

use std::sync::Arc;

use backdrop_renderer::{BackdropPipeline, Extent, ExtentTracker};
use winit::window::Window;

use crate::gpu::WindowGpuState;

pub struct WindowState {
    pub window: Arc<Window>,
    pub gpu: WindowGpuState,
    /// Last-observed target size. Written by resize events, read by the
    /// frame step; both run on the event loop thread.
    pub extent: ExtentTracker,
    /// Built once at mount. None when program construction failed, in
    /// which case the redraw loop is never started.
    pub backdrop: Option<BackdropPipeline>,
    /// Checked before each frame re-arms the loop; cleared on close so an
    /// in-flight redraw does not reference a window being torn down.
    pub running: bool,
    pub frame_count: u32,
}

impl WindowState {
    /// The surface's current backing resolution.
    pub fn backing_extent(&self) -> Extent {
        Extent::new(self.gpu.config.width, self.gpu.config.height)
    }
}
