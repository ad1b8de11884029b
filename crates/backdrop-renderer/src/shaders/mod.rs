//! Shader module - WGSL stages for the backdrop
//!
//! Stages are stored as external .wgsl files and included at compile time,
//! one file per pipeline phase. They are opaque text as far as the program
//! builder is concerned; only the named interface (`vert_pos`, `vert_coord`,
//! `u_color`) is required.

/// Built-in shader stages included at compile time
pub mod builtin {
    /// Vertex stage - passes the quad through in clip space
    pub const VERTEX: &str = include_str!("backdrop.vert.wgsl");

    /// Fragment stage - fills the quad with the uniform color
    pub const FRAGMENT: &str = include_str!("backdrop.frag.wgsl");
}
