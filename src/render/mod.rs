/// Backend trait and frame buffers.
pub mod backend;
/// `vello_cpu` raster backend.
pub mod cpu;
/// The per-frame solar system renderer.
pub mod frame;
/// Backend-agnostic draw operations.
pub mod plan;
pub(crate) mod text;
