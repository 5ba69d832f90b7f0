use crate::foundation::core::{BezPath, Canvas, Point, Rgba8};
use crate::foundation::error::{OrreryError, OrreryResult};
use crate::foundation::math::flatten_premul_px;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::plan::{DashPattern, DrawOp, FramePlan};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};
use anyhow::Context as _;
use kurbo::Shape;
use std::path::Path;
use std::sync::Arc;

const ELLIPSE_TOLERANCE: f64 = 0.1;
const OVERSIZE_REACH_FACTOR: f64 = 16.0;

/// Options for the CPU backend.
#[derive(Debug, Clone, Default)]
pub struct CpuBackendOpts {
    pub(crate) font: Option<Arc<Vec<u8>>>,
}

impl CpuBackendOpts {
    /// Use `bytes` (TTF/OTF) for text ops.
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.font = Some(Arc::new(bytes));
        self
    }

    /// Read a TTF/OTF file and use it for text ops.
    pub fn with_font_file(self, path: impl AsRef<Path>) -> OrreryResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(self.with_font_bytes(bytes))
    }

    /// Whether a font is configured.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

/// CPU backend powered by `vello_cpu` for vector and text rasterization.
///
/// Every plan is painted onto a fresh pixmap sized to the plan's canvas, so a resize between
/// frames never sees stale pixels. Text ops are skipped with a warning when no font is
/// configured.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    text: Option<TextLayoutEngine>,
    warned_missing_font: bool,
}

impl CpuBackend {
    /// Create a backend. Fonts are registered lazily on the first text op.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self {
            opts,
            text: None,
            warned_missing_font: false,
        }
    }

    fn text_engine(&mut self) -> OrreryResult<&mut TextLayoutEngine> {
        if self.text.is_none() {
            let bytes = self
                .opts
                .font
                .clone()
                .ok_or_else(|| OrreryError::render("no font configured for text"))?;
            self.text = Some(TextLayoutEngine::new(bytes)?);
        }
        self.text
            .as_mut()
            .ok_or_else(|| OrreryError::render("text engine missing"))
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Canvas,
        op: &DrawOp,
    ) -> OrreryResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Clear { color } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(canvas.width),
                    f64::from(canvas.height),
                ));
                Ok(())
            }
            DrawOp::FillEllipse {
                center,
                width,
                height,
                color,
            } => {
                let Some(path) = ellipse_path(canvas, *center, *width, *height, 0.0, 0.0) else {
                    return Ok(());
                };
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
                Ok(())
            }
            DrawOp::StrokeEllipse {
                center,
                width,
                height,
                rotation_deg,
                color,
                stroke_width,
                dash,
            } => {
                let Some(mut path) = ellipse_path(
                    canvas,
                    *center,
                    *width,
                    *height,
                    *rotation_deg,
                    *stroke_width,
                ) else {
                    return Ok(());
                };
                if let Some(pattern) = dash {
                    path = dash_path(&path, *pattern);
                }
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*stroke_width));
                ctx.set_paint(color_to_cpu(*color));
                ctx.stroke_path(&bezpath_to_cpu(&path));
                Ok(())
            }
            DrawOp::Text {
                text,
                anchor,
                size_px,
                color,
            } => self.draw_text(ctx, text, *anchor, *size_px, *color),
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        anchor: Point,
        size_px: f32,
        color: Rgba8,
    ) -> OrreryResult<()> {
        if !self.opts.has_font() {
            if !self.warned_missing_font {
                tracing::warn!("no lyric font configured; text ops are skipped");
                self.warned_missing_font = true;
            }
            return Ok(());
        }

        let engine = self.text_engine()?;
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let shaped = engine.layout_line(text, size_px, brush)?;
        let origin_x = anchor.x - f64::from(shaped.advance) / 2.0;
        let origin_y = anchor.y - f64::from(shaped.baseline);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(engine.font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(level = "trace", skip_all, fields(frame = plan.frame_counter))]
    fn render_plan(&mut self, plan: &FramePlan) -> OrreryResult<FrameRGBA> {
        let (w, h) = surface_dims(plan.canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for op in &plan.ops {
            self.draw_op(&mut ctx, plan.canvas, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        // Translucent strokes over an opaque clear come back with alpha 254 from the u8
        // pipeline.
        if let Some(bg) = opaque_clear(plan) {
            for px in data.chunks_exact_mut(4) {
                flatten_premul_px(px, bg);
            }
        }

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn surface_dims(canvas: Canvas) -> OrreryResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| OrreryError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| OrreryError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(OrreryError::validation("surface width/height must be > 0"));
    }
    Ok((w, h))
}

/// Background of a plan whose first op is an opaque clear.
fn opaque_clear(plan: &FramePlan) -> Option<[u8; 3]> {
    match plan.ops.first() {
        Some(DrawOp::Clear { color }) if color.a == 255 => Some([color.r, color.g, color.b]),
        _ => None,
    }
}

/// Ellipse outline from full diameters. Negative diameters paint by magnitude; zero or
/// non-finite geometry paints nothing.
///
/// An ellipse whose smaller radius reaches past every canvas corner is replaced by a circle
/// just beyond the farthest corner, which paints the same pixels. The other radius is capped
/// at `OVERSIZE_REACH_FACTOR` times that distance.
fn ellipse_path(
    canvas: Canvas,
    center: Point,
    width: f64,
    height: f64,
    rotation_deg: f64,
    stroke_width: f64,
) -> Option<BezPath> {
    let mut rx = width.abs() / 2.0;
    let mut ry = height.abs() / 2.0;
    let finite = rx.is_finite() && ry.is_finite() && center.x.is_finite() && center.y.is_finite();
    if !finite || rx == 0.0 || ry == 0.0 {
        return None;
    }
    let reach = farthest_corner(canvas, center) + 1.0 + stroke_width.abs();
    if rx.min(ry) > reach {
        rx = reach;
        ry = reach;
    } else {
        rx = rx.min(reach * OVERSIZE_REACH_FACTOR);
        ry = ry.min(reach * OVERSIZE_REACH_FACTOR);
    }
    let rotation = if rotation_deg.is_finite() {
        rotation_deg.to_radians()
    } else {
        0.0
    };
    Some(kurbo::Ellipse::new(center, (rx, ry), rotation).to_path(ELLIPSE_TOLERANCE))
}

fn farthest_corner(canvas: Canvas, center: Point) -> f64 {
    let dx = center.x.abs().max((f64::from(canvas.width) - center.x).abs());
    let dy = center.y.abs().max((f64::from(canvas.height) - center.y).abs());
    dx.hypot(dy)
}

fn dash_path(path: &BezPath, pattern: DashPattern) -> BezPath {
    let dashes = [pattern.dash, pattern.gap];
    kurbo::dash(path.elements().iter().copied(), 0.0, &dashes).collect()
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
