use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"placescape");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'p');
    b.write_bytes(b"lacescape");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_treats_signed_zero_alike() {
    let mut a = Fnv1a64::new_default();
    a.write_f64(0.0);
    let mut b = Fnv1a64::new_default();
    b.write_f64(-0.0);
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn css_numbers_print_compactly() {
    assert_eq!(css_number(80.0), "80");
    assert_eq!(css_number(0.8), "0.8");
    assert_eq!(css_number(-0.0), "0");
    assert_eq!(css_number(-0.00001), "0");
    assert_eq!(css_number(33.333_333), "33.3333");
    assert_eq!(css_number(0.1 + 0.2), "0.3");
}
