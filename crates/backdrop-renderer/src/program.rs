//! Shader program building
//!
//! Compiles two WGSL stages with the naga front-end and cross-checks their
//! interface before any GPU object is created, reporting failure instead of
//! panicking. A successfully built [`ShaderProgram`] carries the validated
//! stages plus the shader locations the mesh and bind group need.

use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Module, ScalarKind, ShaderStage, Type, TypeInner, VectorSize};
use thiserror::Error;

/// Name of the per-vertex position input the vertex stage must expose.
pub const POSITION_INPUT: &str = "vert_pos";
/// Name of the per-vertex texture coordinate input the vertex stage must expose.
pub const COORD_INPUT: &str = "vert_coord";
/// Name of the color uniform the fragment stage must expose.
pub const COLOR_UNIFORM: &str = "u_color";

/// Pipeline phase a stage belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }

    fn shader_stage(self) -> ShaderStage {
        match self {
            StageKind::Vertex => ShaderStage::Vertex,
            StageKind::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("could not compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },

    #[error("could not link the shader program: {0}")]
    Link(String),
}

/// One compiled and validated shader stage.
pub struct CompiledStage {
    kind: StageKind,
    source: String,
    module: Module,
}

impl CompiledStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// The source text this stage was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn entry_point(&self) -> Result<&naga::EntryPoint, ProgramError> {
        let stage = self.kind.shader_stage();
        let mut points = self.module.entry_points.iter().filter(|ep| ep.stage == stage);
        let Some(entry) = points.next() else {
            return Err(link_error(format!("{} stage has no entry point", self.kind)));
        };
        if points.next().is_some() {
            return Err(link_error(format!("{} stage has more than one entry point", self.kind)));
        }
        Ok(entry)
    }
}

/// Two validated stages linked into one drawable program.
///
/// Immutable once built; the captured locations and binding are what the
/// quad layout and the uniform bind group are created from.
pub struct ShaderProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
    vertex_entry: String,
    fragment_entry: String,
    position_location: u32,
    coord_location: u32,
    color_binding: u32,
}

impl ShaderProgram {
    pub fn vertex_stage(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment_stage(&self) -> &CompiledStage {
        &self.fragment
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    /// Shader location of the `vert_pos` input.
    pub fn position_location(&self) -> u32 {
        self.position_location
    }

    /// Shader location of the `vert_coord` input.
    pub fn coord_location(&self) -> u32 {
        self.coord_location
    }

    /// Binding index of the `u_color` uniform within bind group 0.
    pub fn color_binding(&self) -> u32 {
        self.color_binding
    }
}

/// Compile and validate one shader stage.
///
/// Failures are logged with the stage kind and the emitted diagnostic, then
/// returned to the caller; nothing partially created survives.
pub fn compile_stage(source: &str, kind: StageKind) -> Result<CompiledStage, ProgramError> {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(module) => module,
        Err(e) => {
            let log = e.emit_to_string(source);
            log::warn!("could not compile {} shader:\n{}", kind, log);
            return Err(ProgramError::Compile { stage: kind, log });
        }
    };

    if let Err(e) = Validator::new(ValidationFlags::all(), Capabilities::empty()).validate(&module) {
        let log = e.emit_to_string(source);
        log::warn!("could not compile {} shader:\n{}", kind, log);
        return Err(ProgramError::Compile { stage: kind, log });
    }

    Ok(CompiledStage {
        kind,
        source: source.to_owned(),
        module,
    })
}

/// Compile both stages and link them into one program.
///
/// Both stages are compiled independently so each reports its own
/// diagnostics even when the other fails. No partial program is ever
/// returned: any compile or link failure yields an error and releases
/// everything built so far.
pub fn build_program(vertex_source: &str, fragment_source: &str) -> Result<ShaderProgram, ProgramError> {
    let vertex = compile_stage(vertex_source, StageKind::Vertex);
    let fragment = compile_stage(fragment_source, StageKind::Fragment);

    let (vertex, fragment) = match (vertex, fragment) {
        (Ok(vertex), Ok(fragment)) => (vertex, fragment),
        (Err(e), _) | (_, Err(e)) => return Err(e),
    };

    link(vertex, fragment)
}

fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<ShaderProgram, ProgramError> {
    let (vertex_entry, position_location, coord_location) = {
        let entry = vertex.entry_point()?;

        // Every fragment input must be fed by a matching vertex output
        let outputs = result_io(&vertex.module, &entry.function);
        let fs_entry = fragment.entry_point()?;
        for input in argument_io(&fragment.module, &fs_entry.function) {
            let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
                return Err(link_error(format!(
                    "fragment input at location {} has no matching vertex output",
                    input.location
                )));
            };
            if io_shape(&vertex.module, output.ty) != io_shape(&fragment.module, input.ty) {
                return Err(link_error(format!(
                    "vertex output and fragment input at location {} have mismatched types",
                    input.location
                )));
            }
        }

        let position_location = vertex_input(&vertex.module, &entry.function, POSITION_INPUT)?;
        let coord_location = vertex_input(&vertex.module, &entry.function, COORD_INPUT)?;
        (entry.name.clone(), position_location, coord_location)
    };

    let (fragment_entry, color_binding) = {
        let entry = fragment.entry_point()?;
        (entry.name.clone(), color_uniform_binding(&fragment.module)?)
    };

    Ok(ShaderProgram {
        vertex,
        fragment,
        vertex_entry,
        fragment_entry,
        position_location,
        coord_location,
        color_binding,
    })
}

fn link_error(reason: String) -> ProgramError {
    log::warn!("could not link the shader program: {}", reason);
    ProgramError::Link(reason)
}

/// One user-defined inter-stage variable.
struct IoVar {
    location: u32,
    ty: Handle<Type>,
}

fn collect_io(module: &Module, ty: Handle<Type>, binding: Option<&Binding>, out: &mut Vec<IoVar>) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(IoVar { location: *location, ty }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { ref members, .. } = module.types[ty].inner {
                for member in members {
                    collect_io(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Location-bound inputs of an entry point.
fn argument_io(module: &Module, function: &naga::Function) -> Vec<IoVar> {
    let mut io = Vec::new();
    for arg in &function.arguments {
        collect_io(module, arg.ty, arg.binding.as_ref(), &mut io);
    }
    io
}

/// Location-bound outputs of an entry point.
fn result_io(module: &Module, function: &naga::Function) -> Vec<IoVar> {
    let mut io = Vec::new();
    if let Some(ref result) = function.result {
        collect_io(module, result.ty, result.binding.as_ref(), &mut io);
    }
    io
}

/// Shape of an inter-stage type: scalar kind, byte width, component count.
/// Only scalars and vectors are valid in the stage interface.
fn io_shape(module: &Module, ty: Handle<Type>) -> Option<(ScalarKind, u8, u32)> {
    match module.types[ty].inner {
        TypeInner::Scalar(scalar) => Some((scalar.kind, scalar.width, 1)),
        TypeInner::Vector { size, scalar } => Some((scalar.kind, scalar.width, vector_len(size))),
        _ => None,
    }
}

fn vector_len(size: VectorSize) -> u32 {
    match size {
        VectorSize::Bi => 2,
        VectorSize::Tri => 3,
        VectorSize::Quad => 4,
    }
}

/// Find the shader location of a named per-vertex input, which must be a
/// two-component float vector to match the quad layout.
fn vertex_input(module: &Module, function: &naga::Function, name: &str) -> Result<u32, ProgramError> {
    for arg in &function.arguments {
        match arg.binding {
            Some(Binding::Location { location, .. }) => {
                if arg.name.as_deref() == Some(name) {
                    check_input_shape(module, arg.ty, name)?;
                    return Ok(location);
                }
            }
            Some(_) => {}
            None => {
                if let TypeInner::Struct { ref members, .. } = module.types[arg.ty].inner {
                    for member in members {
                        if let Some(Binding::Location { location, .. }) = member.binding {
                            if member.name.as_deref() == Some(name) {
                                check_input_shape(module, member.ty, name)?;
                                return Ok(location);
                            }
                        }
                    }
                }
            }
        }
    }
    Err(link_error(format!("vertex stage does not expose input `{}`", name)))
}

fn check_input_shape(module: &Module, ty: Handle<Type>, name: &str) -> Result<(), ProgramError> {
    match io_shape(module, ty) {
        Some((ScalarKind::Float, _, 2)) => Ok(()),
        _ => Err(link_error(format!("vertex input `{}` must be a vec2<f32>", name))),
    }
}

/// Find the `u_color` uniform: a vec4<f32> in bind group 0.
fn color_uniform_binding(module: &Module) -> Result<u32, ProgramError> {
    for (_, var) in module.global_variables.iter() {
        if var.name.as_deref() != Some(COLOR_UNIFORM) {
            continue;
        }
        if var.space != AddressSpace::Uniform {
            return Err(link_error(format!("`{}` must be a uniform", COLOR_UNIFORM)));
        }
        let Some(ref binding) = var.binding else {
            return Err(link_error(format!("uniform `{}` has no binding", COLOR_UNIFORM)));
        };
        if binding.group != 0 {
            return Err(link_error(format!("uniform `{}` must live in bind group 0", COLOR_UNIFORM)));
        }
        match module.types[var.ty].inner {
            TypeInner::Vector { size: VectorSize::Quad, scalar } if scalar.kind == ScalarKind::Float => {}
            _ => return Err(link_error(format!("uniform `{}` must be a vec4<f32>", COLOR_UNIFORM))),
        }
        return Ok(binding.binding);
    }
    Err(link_error(format!("program does not expose uniform `{}`", COLOR_UNIFORM)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_kind_names() {
        assert_eq!(StageKind::Vertex.as_str(), "vertex");
        assert_eq!(StageKind::Fragment.as_str(), "fragment");
    }

    #[test]
    fn compile_reports_the_failing_stage() {
        let err = compile_stage("this is not wgsl", StageKind::Vertex).unwrap_err();
        match err {
            ProgramError::Compile { stage, log } => {
                assert_eq!(stage, StageKind::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn validation_failures_are_compile_failures() {
        // Parses, but the entry point returns the wrong type
        let source = "
            @vertex
            fn vs_main() -> @builtin(position) f32 {
                return 1.0;
            }
        ";
        let err = compile_stage(source, StageKind::Vertex).unwrap_err();
        assert!(matches!(err, ProgramError::Compile { stage: StageKind::Vertex, .. }));
    }

    #[test]
    fn compilation_is_deterministic() {
        let source = "fn nope(";
        let first = compile_stage(source, StageKind::Fragment).unwrap_err();
        let second = compile_stage(source, StageKind::Fragment).unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }
}
