//! WebGPU rendering module
//!
//! The engine emits screen-space triangles each frame; the pipeline maps
//! them to NDC on the CPU and uploads one vertex buffer.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
