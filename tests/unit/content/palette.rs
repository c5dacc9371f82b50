use super::*;

#[test]
fn resolves_named_shades_and_keywords() {
    assert_eq!(color("cyan-400").unwrap(), Color::rgb(0x22, 0xd3, 0xee));
    assert_eq!(color("amber-950").unwrap(), Color::rgb(0x45, 0x1a, 0x03));
    assert_eq!(color("black").unwrap(), Color::BLACK);
    assert_eq!(color("transparent").unwrap().a, 0);
}

#[test]
fn opacity_suffix_scales_alpha() {
    let c = color("black/20").unwrap();
    assert_eq!((c.r, c.g, c.b), (0, 0, 0));
    assert_eq!(c.a, 51);
    assert_eq!(color("black/60").unwrap().a, 153);
    assert!(color("black/120").is_err());
    assert!(color("black/x").is_err());
}

#[test]
fn rejects_unknown_tokens() {
    assert!(color("cyan-450").is_err());
    assert!(color("chartreuse-400").is_err());
    assert!(color("cyan").is_err());
    assert!(text_color("cyan-400").is_err());
    assert!(font_family("font-display").is_err());
}

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(parse_hex("#ff0000").unwrap(), Color::rgb(255, 0, 0));
    let c = parse_hex("#0000FF80").unwrap();
    assert_eq!((c.b, c.a), (255, 128));
    assert!(parse_hex("#fff").is_err());
    assert!(parse_hex("#gg0000").is_err());
}

#[test]
fn solid_and_gradient_backgrounds() {
    assert_eq!(background("bg-black").unwrap(), Fill::Solid(Color::BLACK));

    let fill = background("bg-gradient-to-br from-red-950 via-orange-900 to-amber-950").unwrap();
    let Fill::Linear { direction, stops } = &fill else {
        panic!("expected gradient");
    };
    assert_eq!(*direction, Direction::ToBr);
    assert_eq!(stops.len(), 3);
    assert_eq!(
        fill.css(),
        "linear-gradient(to bottom right, #450a0a, #7c2d12, #451a03)"
    );
    let offsets: Vec<f64> = fill.stops().iter().map(|(o, _)| *o).collect();
    assert_eq!(offsets, vec![0.0, 0.5, 1.0]);

    let two = background("bg-linear-to-r from-transparent to-black/60").unwrap();
    assert_eq!(two.stops().len(), 2);
}

#[test]
fn gradient_requires_both_ends() {
    assert!(background("bg-gradient-to-br from-red-950").is_err());
    assert!(background("bg-gradient-to-xx from-red-950 to-black").is_err());
    assert!(background("bg-black text-white").is_err());
    assert!(background("").is_err());
}

#[test]
fn css_literals() {
    assert_eq!(Color::rgb(1, 2, 255).css(), "#0102ff");
    assert_eq!(color("black/60").unwrap().css(), "rgba(0, 0, 0, 0.6)");
}

#[test]
fn side_gradient_line_spans_the_box() {
    let ((x0, y0), (x1, y1)) = Direction::ToR.gradient_line(200.0, 100.0);
    assert_eq!((x0, y0, x1, y1), (0.0, 50.0, 200.0, 50.0));
    let ((x0, y0), (x1, y1)) = Direction::ToB.gradient_line(200.0, 100.0);
    assert_eq!((x0, y0, x1, y1), (100.0, 0.0, 100.0, 100.0));
}

#[test]
fn corner_gradient_line_is_perpendicular_to_the_opposite_diagonal() {
    let (w, h) = (2.0, 1.0);
    let ((_, _), (x1, y1)) = Direction::ToBr.gradient_line(w, h);
    // The bottom-right corner lies on the perpendicular through the end point.
    let (dx, dy) = (h, w);
    assert!(((w - x1) * dx + (h - y1) * dy).abs() < 1e-9);
}
