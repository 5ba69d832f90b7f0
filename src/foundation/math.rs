/// `a + (b - a) * t`, unclamped.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Re-map `v` from `[in_lo, in_hi]` onto `[out_lo, out_hi]` without clamping.
///
/// A degenerate input range maps everything to `out_lo`.
pub(crate) fn map_range(v: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    let span = in_hi - in_lo;
    if span == 0.0 {
        return out_lo;
    }
    lerp(out_lo, out_hi, (v - in_lo) / span)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite one premultiplied RGBA8 pixel over an opaque `bg`.
pub(crate) fn flatten_premul_px(px: &mut [u8], bg: [u8; 3]) {
    let inv = 255 - u16::from(px[3]);
    if inv == 0 {
        return;
    }
    for (c, b) in px.iter_mut().zip(bg) {
        *c = (u16::from(*c) + mul_div255_u16(u16::from(b), inv)).min(255) as u8;
    }
    px[3] = 255;
}

/// Undo alpha premultiplication for one channel.
pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
