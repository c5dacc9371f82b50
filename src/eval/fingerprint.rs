use crate::{eval::evaluator::EvaluatedPage, foundation::math::Fnv1a64};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Stable fingerprint of everything that affects a rendered frame.
///
/// The scroll offset itself is not hashed: two offsets that place every region identically with
/// identical signals render the same pixels.
pub fn fingerprint_page(page: &EvaluatedPage) -> PageFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    write_u64_pair(&mut a, &mut b, u64::from(page.viewport.width));
    write_u64_pair(&mut a, &mut b, u64::from(page.viewport.height));
    write_u8_pair(&mut a, &mut b, u8::from(page.narrow));

    for region in [&page.hero, &page.footer] {
        write_u8_pair(&mut a, &mut b, u8::from(region.visible));
        if region.visible {
            write_f64_pair(&mut a, &mut b, region.top_px);
        }
    }

    write_u64_pair(&mut a, &mut b, page.sections.len() as u64);
    for s in &page.sections {
        write_u8_pair(&mut a, &mut b, u8::from(s.visible));
        // Off-screen sections contribute nothing to the frame.
        if !s.visible {
            continue;
        }
        write_str_pair(&mut a, &mut b, &s.id);
        write_f64_pair(&mut a, &mut b, s.panel_top_px);
        write_f64_pair(&mut a, &mut b, s.signals.opacity);
        write_f64_pair(&mut a, &mut b, s.signals.scale);
        write_f64_pair(&mut a, &mut b, s.signals.blur_px);
    }

    PageFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    a.write_f64(v);
    b.write_f64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
