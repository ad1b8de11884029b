//! Rendering logic
//!
//! One pass per frame: reconcile the backing resolution with the last
//! observed size, set the full viewport, clear, and draw the backdrop quad
//! with the uniform color.

use crate::config::BackdropConfig;
use crate::gpu::SharedGpuState;
use crate::window::WindowState;

fn to_wgpu_color(rgba: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}

/// Render a single frame for a window
pub fn render_frame(state: &mut WindowState, shared: &SharedGpuState, config: &BackdropConfig) {
    let Some(backdrop) = state.backdrop.as_ref() else {
        return;
    };

    state.frame_count = state.frame_count.saturating_add(1);

    // Apply the last observed size before drawing. Resize events only
    // store the target; the surface is reconfigured here so a burst of
    // observations between frames costs one reconfigure.
    let mut backing = state.backing_extent();
    if state.extent.reconcile(&mut backing) {
        if backing.is_empty() {
            // Minimized or zero-area layout, nothing to back a surface with
            return;
        }
        state.gpu.config.width = backing.width;
        state.gpu.config.height = backing.height;
        state.gpu.surface.configure(&shared.device, &state.gpu.config);
        log::debug!("Surface resized to {}x{}", backing.width, backing.height);
    }

    let frame = match state.gpu.surface.get_current_texture() {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Failed to get surface texture: {:?}", e);
            return;
        }
    };
    let view = frame.texture.create_view(&Default::default());

    backdrop.set_color(&shared.queue, config.color);

    let mut encoder = shared.device.create_command_encoder(&Default::default());
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Backdrop Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(to_wgpu_color(config.clear)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Viewport covers the full surface every frame, resize or not
        render_pass.set_viewport(
            0.0,
            0.0,
            state.gpu.config.width as f32,
            state.gpu.config.height as f32,
            0.0,
            1.0,
        );

        backdrop.draw(&mut render_pass);
    }

    shared.queue.submit(std::iter::once(encoder.finish()));
    frame.present();
}
