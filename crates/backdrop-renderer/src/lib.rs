//! Backdrop renderer - shader program building and quad rendering
//!
//! This crate holds everything the backdrop window needs below the event
//! loop: WGSL stage compilation and link checking (no GPU required), the
//! surface size model, the static quad mesh, and the wgpu pipeline that
//! draws it.

pub mod backdrop;
pub mod extent;
pub mod program;
pub mod quad;
pub mod shaders;

pub use backdrop::{BackdropPipeline, DEFAULT_COLOR};
pub use extent::{Extent, ExtentTracker, SizeObservation};
pub use program::{
    CompiledStage, ProgramError, ShaderProgram, StageKind, build_program, compile_stage,
};
