/// The fixed celestial-body table.
pub mod bodies;
/// Per-frame renderer inputs.
pub mod input;
/// JSON track sheets that feed the host loop.
pub mod track;
