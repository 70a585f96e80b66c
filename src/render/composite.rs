use crate::foundation::error::{SkyhourError, SkyhourResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8. Compositing an opaque destination
/// keeps it opaque, which is what lets the saved frames stay straight-alpha.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Constant-ratio blend of two pixels, `weight` toward `b`.
pub fn blend_weighted(a: PremulRgba8, b: PremulRgba8, weight: f32) -> PremulRgba8 {
    let weight = weight.clamp(0.0, 1.0);
    let tt = ((weight * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> SkyhourResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SkyhourError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
