use crate::foundation::core::{Canvas, Point, Rgba8};

/// On/off lengths for a dashed stroke, in pixels along the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashPattern {
    /// Painted segment length.
    pub dash: f64,
    /// Gap length.
    pub gap: f64,
}

/// A single paint operation. Ops execute in order, each painting over the previous ones.
///
/// Ellipse sizes are full diameters, not radii. Diameters are passed through as computed and may
/// be zero or negative; backends paint by magnitude.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole surface.
    Clear {
        /// Fill color.
        color: Rgba8,
    },
    /// Fill an axis-aligned ellipse.
    FillEllipse {
        /// Ellipse center.
        center: Point,
        /// Horizontal diameter.
        width: f64,
        /// Vertical diameter.
        height: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Stroke the outline of an ellipse, optionally rotated about its center and dashed.
    StrokeEllipse {
        /// Ellipse center.
        center: Point,
        /// Diameter along the ellipse's own x axis.
        width: f64,
        /// Diameter along the ellipse's own y axis.
        height: f64,
        /// Clockwise rotation in degrees (screen space, y down).
        rotation_deg: f64,
        /// Stroke color.
        color: Rgba8,
        /// Line width in pixels.
        stroke_width: f64,
        /// Dash pattern; `None` strokes a solid line.
        dash: Option<DashPattern>,
    },
    /// A single line of text, centered horizontally on `anchor.x` with its baseline at
    /// `anchor.y`.
    ///
    /// Glyphs are filled only; no outline stroke is drawn around the text.
    Text {
        /// Text to draw. Never wrapped or truncated.
        text: String,
        /// Horizontal center and baseline.
        anchor: Point,
        /// Font size in pixels.
        size_px: f32,
        /// Fill color.
        color: Rgba8,
    },
}

/// Where a planet landed in a given frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBody {
    /// Body name.
    pub name: &'static str,
    /// Index in display order.
    pub orbit_index: usize,
    /// Orbit radius in pixels.
    pub orbit_radius: f64,
    /// Orbital angle in degrees, `[0, 360)`.
    pub angle_deg: f64,
    /// Screen-space center.
    pub position: Point,
    /// Diameter after volume mapping.
    pub size: f64,
}

/// Everything needed to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Target surface size.
    pub canvas: Canvas,
    /// Frame counter the plan was computed for.
    pub frame_counter: u64,
    /// Paint operations in order.
    pub ops: Vec<DrawOp>,
    /// Planet placements in display order.
    pub bodies: Vec<PlacedBody>,
}

impl FramePlan {
    /// Placement of a planet by name.
    pub fn body(&self, name: &str) -> Option<&PlacedBody> {
        self.bodies.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }
}
