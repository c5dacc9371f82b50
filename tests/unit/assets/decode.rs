use std::io::Cursor;

use super::*;

fn png(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png(1, 1, vec![100, 50, 200, 128])).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn transparent_pixels_lose_their_colour() {
    let prepared = decode_image(&png(2, 1, vec![9, 9, 9, 0, 1, 2, 3, 255])).unwrap();
    assert_eq!(prepared.rgba8_premul.as_slice(), &[0, 0, 0, 0, 1, 2, 3, 255]);
}

#[test]
fn garbage_bytes_do_not_decode() {
    assert!(decode_image(b"definitely not a png").is_err());
}

#[test]
fn parse_svg_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"#;
    let svg = parse_svg(ok).unwrap();
    assert_eq!(svg.tree.size().width(), 4.0);

    assert!(parse_svg(br#"<svg"#).is_err());
}
