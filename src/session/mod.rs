//! Track-driven rendering sessions.

/// Single-frame and range rendering for a loaded track sheet.
pub mod render_session;
