//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

pub mod sdf_pipeline;
pub mod shapes;

pub use sdf_pipeline::SdfRenderState;
pub use shapes::{dotted_path, remaining_route};
