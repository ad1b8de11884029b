//! GPU state management
//!
//! Shared and per-window GPU resources for wgpu rendering.

use anyhow::Context;

/// Shared GPU resources: instance, adapter, device, queue
pub struct SharedGpuState {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl SharedGpuState {
    /// Initialize shared GPU resources.
    ///
    /// Fails instead of panicking when no suitable adapter or device
    /// exists; the caller degrades to an inert window.
    pub fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .context("failed to create device")?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

/// Per-window GPU state (surface tied to a specific window)
pub struct WindowGpuState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
}
