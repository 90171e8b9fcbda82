//! WebGPU rendering module
//!
//! Tessellates the game state into flat-colored triangles each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
