use super::*;

#[test]
fn wrap_words_is_greedy() {
    assert_eq!(
        wrap_words("the mental map vs the app", 10),
        vec!["the mental", "map vs the", "app"]
    );
    assert_eq!(wrap_words("   ", 10), Vec::<String>::new());
    assert_eq!(wrap_words("anthropogenic heat", 5), vec!["anthropogenic", "heat"]);
}

#[test]
fn wrap_to_width_uses_family_advance() {
    // 0.6em * 10px = 6px per glyph; 60px fits 10 glyphs.
    let lines = wrap_to_width("aaaa bbbb cccc", 60.0, 10.0, "monospace");
    assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
}

#[test]
fn families_map_from_tokens() {
    assert_eq!(generic_family("font-mono"), "monospace");
    assert_eq!(generic_family("font-serif"), "serif");
    assert_eq!(generic_family("font-sans"), "sans-serif");
    assert_eq!(generic_family("font-display"), "sans-serif");
}

#[test]
fn overlay_escapes_copy_and_carries_style() {
    let runs = [TextRun::new(10.0, 20.0, "PLACES & <LANDSCAPES>", 32.0, Color::WHITE)
        .bold()
        .centered()
        .opacity(0.5)];
    let svg = overlay_svg(100, 50, &runs);
    assert!(svg.contains("PLACES &amp; &lt;LANDSCAPES&gt;"));
    assert!(svg.contains(r#"font-weight="700""#));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r##"fill="#ffffff""##));
    assert!(svg.contains(r#"fill-opacity="0.500""#));
    assert!(usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).is_ok());
}

#[test]
fn painting_nothing_leaves_the_target_alone() {
    let painter = TextPainter::new(Arc::new(usvg::fontdb::Database::new()));
    let mut pm = resvg::tiny_skia::Pixmap::new(4, 4).unwrap();
    painter.paint(&mut pm, &[]).unwrap();
    assert!(pm.data().iter().all(|&b| b == 0));
    // Without any fonts the text is dropped, not an error.
    painter
        .paint(&mut pm, &[TextRun::new(0.0, 3.0, "x", 3.0, Color::WHITE)])
        .unwrap();
}
