use crate::foundation::{
    core::Canvas,
    error::{PlacescapeError, PlacescapeResult},
    math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with an extra group opacity in `[0, 1]`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PlacescapeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PlacescapeError::evaluation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a same-width `src` layer over `dst` shifted down by `dy` rows.
///
/// Rows falling outside `dst` are clipped. This is how a viewport-sized sticky panel lands on the
/// frame at its scroll-dependent offset.
pub fn over_rows_at(
    dst: &mut [u8],
    dst_canvas: Canvas,
    src: &[u8],
    src_canvas: Canvas,
    dy: i64,
    opacity: f32,
) -> PlacescapeResult<()> {
    if dst.len() != dst_canvas.byte_len() || src.len() != src_canvas.byte_len() {
        return Err(PlacescapeError::evaluation(
            "over_rows_at expects buffers matching their canvases",
        ));
    }
    if dst_canvas.width != src_canvas.width {
        return Err(PlacescapeError::evaluation(
            "over_rows_at expects equal-width layers",
        ));
    }

    let stride = dst_canvas.width as usize * 4;
    let first = dy.max(0);
    let last = (dy + i64::from(src_canvas.height)).min(i64::from(dst_canvas.height));
    for y in first..last {
        let d = (y as usize) * stride;
        let s = ((y - dy) as usize) * stride;
        over_in_place(&mut dst[d..d + stride], &src[s..s + stride], opacity)?;
    }
    Ok(())
}
