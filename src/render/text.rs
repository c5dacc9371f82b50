//! Text overlays rendered through `usvg`/`resvg`.
//!
//! Copy is laid out here (greedy word wrap with an average glyph advance), emitted as an SVG
//! document of `<text>` runs and rasterized with the shared font database.

use std::{fmt::Write as _, sync::Arc};

use anyhow::Context;

use crate::{
    content::palette::Color,
    foundation::error::{PlacescapeError, PlacescapeResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

impl Anchor {
    fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// One single-line text run positioned by its baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub baseline: f64,
    pub text: String,
    pub size_px: f64,
    pub color: Color,
    pub opacity: f64,
    /// Generic SVG family (`sans-serif`, `serif`, `monospace`).
    pub family: &'static str,
    pub bold: bool,
    /// Extra tracking in em.
    pub letter_spacing_em: f64,
    pub anchor: Anchor,
}

impl TextRun {
    pub fn new(x: f64, baseline: f64, text: impl Into<String>, size_px: f64, color: Color) -> Self {
        Self {
            x,
            baseline,
            text: text.into(),
            size_px,
            color,
            opacity: 1.0,
            family: "sans-serif",
            bold: false,
            letter_spacing_em: 0.0,
            anchor: Anchor::Start,
        }
    }

    pub fn family(mut self, family: &'static str) -> Self {
        self.family = family;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn tracking(mut self, em: f64) -> Self {
        self.letter_spacing_em = em;
        self
    }

    pub fn centered(mut self) -> Self {
        self.anchor = Anchor::Middle;
        self
    }
}

/// Generic family for a `font-*` token; unknown tokens fall back to sans-serif.
pub fn generic_family(font_token: &str) -> &'static str {
    match font_token.trim() {
        "font-serif" => "serif",
        "font-mono" => "monospace",
        _ => "sans-serif",
    }
}

/// Average advance of one glyph in em, per family.
pub fn average_advance_em(family: &str) -> f64 {
    match family {
        "monospace" => 0.6,
        "serif" => 0.5,
        _ => 0.55,
    }
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a line are kept whole.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lines that fit `width_px` at `size_px` in `family`.
pub fn wrap_to_width(text: &str, width_px: f64, size_px: f64, family: &str) -> Vec<String> {
    let advance = (size_px * average_advance_em(family)).max(1.0);
    wrap_words(text, (width_px / advance).floor().max(1.0) as usize)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// SVG document of `width` x `height` holding `runs`.
pub fn overlay_svg(width: u32, height: u32, runs: &[TextRun]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for r in runs {
        let c = r.color;
        let opacity = r.opacity.clamp(0.0, 1.0) * f64::from(c.a) / 255.0;
        let _ = write!(
            svg,
            r##"<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{size:.2}" font-weight="{weight}" letter-spacing="{tracking:.3}" text-anchor="{anchor}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{opacity:.3}" xml:space="preserve">{text}</text>"##,
            x = r.x,
            y = r.baseline,
            family = r.family,
            size = r.size_px,
            weight = if r.bold { 700 } else { 400 },
            tracking = r.letter_spacing_em * r.size_px,
            anchor = r.anchor.svg(),
            r = c.r,
            g = c.g,
            b = c.b,
            text = escape_xml(&r.text),
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Rasterizes text overlays with a shared font database.
#[derive(Clone, Debug)]
pub struct TextPainter {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl TextPainter {
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Paint `runs` onto `target`, with run coordinates in target pixels.
    pub fn paint(
        &self,
        target: &mut resvg::tiny_skia::Pixmap,
        runs: &[TextRun],
    ) -> PlacescapeResult<()> {
        if runs.is_empty() {
            return Ok(());
        }
        let svg = overlay_svg(target.width(), target.height(), runs);
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
            .context("parse text overlay")
            .map_err(PlacescapeError::from)?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut target.as_mut(),
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
