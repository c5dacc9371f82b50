use resvg::tiny_skia::{
    self, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Mask, Paint, PathBuilder,
    Pixmap, PixmapPaint, Shader, SpreadMode, Transform,
};

use crate::{
    assets::{fonts::build_fontdb, store::VisualStore},
    content::{
        model::{Block, ParagraphStyle, SectionDescriptor, SectionRegistry, index_label},
        palette::{self, Color, Direction, Fill},
    },
    eval::evaluator::{EvaluatedPage, EvaluatedRegion, EvaluatedSection},
    foundation::{
        core::{Affine, Rect, Viewport},
        error::{PlacescapeError, PlacescapeResult},
    },
    page::layout::{PageLayout, PanelSplit},
    render::{
        backend::{FrameRGBA, RenderSettings},
        blur::blur_css,
        composite::over_rows_at,
        text::{TextPainter, TextRun, generic_family, wrap_to_width},
    },
    scroll::{transformer::VisualSignals, window::ContainerGeometry},
};

const HERO_BACKGROUND: &str = "bg-linear-to-br from-slate-950 via-blue-950 to-black";
/// Image opacity inside the visual pane.
const VISUAL_OPACITY: f32 = 0.8;

/// Paint inputs for one section, resolved once from its theme.
#[derive(Debug)]
struct SectionPaint {
    label: String,
    title: String,
    subtitle: String,
    content: Vec<Block>,
    bg: Fill,
    text_primary: Color,
    text_secondary: Color,
    accent: Color,
    family: &'static str,
    title_family: &'static str,
    visual: Option<Pixmap>,
    container: ContainerGeometry,
}

impl SectionPaint {
    fn resolve(
        index: usize,
        section: &SectionDescriptor,
        container: ContainerGeometry,
        visuals: &VisualStore,
    ) -> PlacescapeResult<Self> {
        let theme = &section.theme;
        let visual = match visuals.image(&section.id) {
            Some(img) => {
                let size = IntSize::from_wh(img.width, img.height).ok_or_else(|| {
                    PlacescapeError::evaluation(format!(
                        "visual for '{}' has zero size",
                        section.id
                    ))
                })?;
                let pm = Pixmap::from_vec(img.rgba8_premul.as_ref().clone(), size).ok_or_else(
                    || PlacescapeError::evaluation("visual pixel buffer does not match its size"),
                )?;
                Some(pm)
            }
            None => None,
        };

        Ok(Self {
            label: index_label(index),
            title: section.title.clone(),
            subtitle: section.subtitle.clone(),
            content: section.content.clone(),
            bg: palette::background(&theme.bg)?,
            text_primary: palette::text_color(&theme.text_primary)?,
            text_secondary: palette::text_color(&theme.text_secondary)?,
            accent: palette::color(&theme.accent)?,
            family: generic_family(&theme.font),
            title_family: generic_family(&theme.title_font),
            visual,
            container,
        })
    }
}

#[derive(Debug)]
struct PageCopy {
    hero: [String; 4],
    footer: [String; 2],
}

/// CPU renderer for one registry at one viewport.
///
/// Everything that does not depend on scroll (resolved palette, visuals as pixmaps, pane masks,
/// fonts) is prepared up front, so [`CpuRenderer::render`] only paints.
pub struct CpuRenderer {
    settings: RenderSettings,
    viewport: Viewport,
    narrow: bool,
    split: PanelSplit,
    pane_mask: Mask,
    hero_fill: Fill,
    hero: ContainerGeometry,
    footer: ContainerGeometry,
    copy: PageCopy,
    sections: Vec<SectionPaint>,
    text: Option<TextPainter>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("viewport", &self.viewport)
            .field("narrow", &self.narrow)
            .field("sections", &self.sections.len())
            .field("text", &self.text.is_some())
            .finish()
    }
}

impl CpuRenderer {
    pub fn new(
        registry: &SectionRegistry,
        layout: &PageLayout,
        visuals: &VisualStore,
        settings: RenderSettings,
    ) -> PlacescapeResult<Self> {
        let fontdb = settings.draw_text.then(|| build_fontdb(None));
        Self::with_fonts(registry, layout, visuals, settings, fontdb)
    }

    /// Like [`CpuRenderer::new`] with an already-built font database (shared across workers).
    pub fn with_fonts(
        registry: &SectionRegistry,
        layout: &PageLayout,
        visuals: &VisualStore,
        settings: RenderSettings,
        fontdb: Option<std::sync::Arc<usvg::fontdb::Database>>,
    ) -> PlacescapeResult<Self> {
        if registry.len() != layout.sections().len() {
            return Err(PlacescapeError::validation(
                "layout was not computed for this registry",
            ));
        }
        let viewport = layout.viewport();
        let split = layout.panel_split();

        let sections = registry
            .iter()
            .zip(layout.sections())
            .map(|(section, slot)| {
                if section.id != slot.id {
                    return Err(PlacescapeError::validation(format!(
                        "layout slot '{}' does not match section '{}'",
                        slot.id, section.id
                    )));
                }
                SectionPaint::resolve(slot.index, section, slot.container, visuals)
            })
            .collect::<PlacescapeResult<Vec<_>>>()?;

        let hero = registry.hero();
        let footer = registry.footer();
        Ok(Self {
            pane_mask: rect_mask(viewport, split.visual)?,
            hero_fill: palette::background(HERO_BACKGROUND)?,
            hero: layout.hero(),
            footer: layout.footer(),
            copy: PageCopy {
                hero: [
                    hero.title.clone(),
                    hero.tagline.clone(),
                    hero.kicker.clone(),
                    hero.prompt.clone(),
                ],
                footer: [footer.title.clone(), footer.credit.clone()],
            },
            text: if settings.draw_text {
                fontdb.map(TextPainter::new)
            } else {
                None
            },
            settings,
            viewport,
            narrow: layout.is_narrow(),
            split,
            sections,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Paint one evaluated page into a premultiplied viewport frame.
    #[tracing::instrument(level = "trace", skip_all, fields(scroll_y = page.scroll_y))]
    pub fn render(&self, page: &EvaluatedPage) -> PlacescapeResult<FrameRGBA> {
        if page.viewport != self.viewport {
            return Err(PlacescapeError::evaluation(format!(
                "page evaluated at {}x{} but renderer is {}x{}",
                page.viewport.width, page.viewport.height, self.viewport.width, self.viewport.height
            )));
        }
        if page.sections.len() != self.sections.len() {
            return Err(PlacescapeError::evaluation(
                "page section count does not match renderer",
            ));
        }

        let mut frame = new_pixmap(self.viewport.width, self.viewport.height)?;
        let [r, g, b, a] = self.settings.clear_rgba;
        frame.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        if page.hero.visible {
            self.paint_hero(&mut frame, page.hero)?;
        }

        let canvas = self.viewport.canvas();
        for (sp, s) in self.sections.iter().zip(&page.sections) {
            if !s.visible {
                continue;
            }
            let box_top = sp.container.top_px - page.scroll_y;
            fill_box(
                &mut frame,
                Rect::new(0.0, box_top, self.viewport.width_px(), box_top + sp.container.height_px),
                &sp.bg,
            );

            if s.signals.opacity <= 0.0 {
                continue;
            }
            let panel = self.paint_panel(sp, s)?;
            over_rows_at(
                frame.data_mut(),
                canvas,
                panel.data(),
                canvas,
                s.panel_top_px.round() as i64,
                s.signals.opacity as f32,
            )?;
        }

        if page.footer.visible {
            self.paint_footer(&mut frame, page.footer)?;
        }

        Ok(FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: frame.take(),
            premultiplied: true,
        })
    }

    fn paint_hero(&self, frame: &mut Pixmap, hero: EvaluatedRegion) -> PlacescapeResult<()> {
        let w = self.viewport.width_px();
        let box_ = Rect::new(0.0, hero.top_px, w, hero.top_px + hero.height_px);
        fill_box(frame, box_, &self.hero_fill);

        let Some(text) = &self.text else {
            return Ok(());
        };
        let runs = hero_runs(&self.copy.hero, box_, self.viewport.width);
        text.paint(frame, &runs)
    }

    fn paint_footer(&self, frame: &mut Pixmap, footer: EvaluatedRegion) -> PlacescapeResult<()> {
        let w = self.viewport.width_px();
        let box_ = Rect::new(0.0, footer.top_px, w, footer.top_px + footer.height_px);
        fill_box(frame, box_, &Fill::Solid(Color::BLACK));

        let Some(text) = &self.text else {
            return Ok(());
        };
        let cx = w / 2.0;
        let [title, credit] = &self.copy.footer;
        let runs = [
            TextRun::new(cx, box_.y0 + 48.0 + 14.0, title, 14.0, Color::WHITE.with_opacity(0.6))
                .family("monospace")
                .centered(),
            TextRun::new(cx, box_.y0 + 48.0 + 14.0 + 8.0 + 14.0, credit, 12.0, Color::WHITE.with_opacity(0.4))
                .centered(),
        ];
        text.paint(frame, &runs)
    }

    /// The sticky panel at full opacity; group opacity is applied when it lands on the frame.
    fn paint_panel(&self, sp: &SectionPaint, s: &EvaluatedSection) -> PlacescapeResult<Pixmap> {
        let mut panel = new_pixmap(self.viewport.width, self.viewport.height)?;
        let pane = self.split.visual;

        fill_box(&mut panel, pane, &Fill::Solid(Color::BLACK.with_opacity(0.2)));
        let layer = self.paint_visual_layer(sp, pane, s.signals)?;

        // Zoom about the pane centre, clipped to the pane.
        let (cx, cy) = (pane.width() / 2.0, pane.height() / 2.0);
        let zoom = Affine::translate((pane.x0 + cx, pane.y0 + cy))
            * Affine::scale(s.signals.scale)
            * Affine::translate((-cx, -cy));
        panel.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            },
            to_transform(zoom),
            Some(&self.pane_mask),
        );

        fill_box(&mut panel, self.split.text, &sp.bg);
        let (runs, rule) = section_runs(sp, self.split, self.narrow);
        fill_box(&mut panel, rule, &Fill::Solid(sp.accent));
        if let Some(text) = &self.text {
            text.paint(&mut panel, &runs)?;
        }
        Ok(panel)
    }

    /// Pane-sized layer: object-cover visual at 80% opacity, blurred, under the darkening
    /// gradient.
    fn paint_visual_layer(
        &self,
        sp: &SectionPaint,
        pane: Rect,
        signals: VisualSignals,
    ) -> PlacescapeResult<Pixmap> {
        let pw = pane.width().round().max(1.0) as u32;
        let ph = pane.height().round().max(1.0) as u32;
        let mut layer = new_pixmap(pw, ph)?;

        if let Some(img) = &sp.visual {
            let (iw, ih) = (f64::from(img.width()), f64::from(img.height()));
            let k = (f64::from(pw) / iw).max(f64::from(ph) / ih);
            let (tx, ty) = ((f64::from(pw) - iw * k) / 2.0, (f64::from(ph) - ih * k) / 2.0);
            layer.draw_pixmap(
                0,
                0,
                img.as_ref(),
                &PixmapPaint {
                    opacity: VISUAL_OPACITY,
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                },
                Transform::from_row(k as f32, 0.0, 0.0, k as f32, tx as f32, ty as f32),
                None,
            );
        }

        if signals.blur_px > 0.0 {
            let blurred = blur_css(layer.data(), pw, ph, signals.blur_px)?;
            layer = pixmap_from_vec(blurred, pw, ph)?;
        }

        let direction = if self.narrow {
            Direction::ToB
        } else {
            Direction::ToR
        };
        fill_box(
            &mut layer,
            Rect::new(0.0, 0.0, f64::from(pw), f64::from(ph)),
            &Fill::Linear {
                direction,
                stops: vec![Color::TRANSPARENT, Color::BLACK.with_opacity(0.6)],
            },
        );
        Ok(layer)
    }
}

/// Centred hero copy: title, tagline, kicker, then the scroll prompt.
fn hero_runs(copy: &[String; 4], box_: Rect, viewport_width: u32) -> Vec<TextRun> {
    let (title_px, tagline_px, kicker_px) = match viewport_width {
        w if w >= 1024 => (96.0, 24.0, 14.0),
        w if w >= 768 => (72.0, 24.0, 14.0),
        w if w >= 640 => (48.0, 20.0, 12.0),
        _ => (36.0, 16.0, 12.0),
    };
    let prompt_px = 12.0;
    let block = title_px + 24.0 + tagline_px * 1.5 + 16.0 + kicker_px * 1.5 + 64.0 + prompt_px;
    let cx = box_.x0 + box_.width() / 2.0;
    let mut y = box_.y0 + (box_.height() - block).max(0.0) / 2.0;

    let [title, tagline, kicker, prompt] = copy;
    let mut runs = Vec::with_capacity(4);
    y += title_px;
    runs.push(TextRun::new(cx, y, title, title_px, Color::WHITE).bold().tracking(-0.05).centered());
    y += 24.0 + tagline_px * 1.2;
    runs.push(
        TextRun::new(cx, y, tagline, tagline_px, Color::rgb(0x93, 0xc5, 0xfd))
            .family("monospace")
            .centered(),
    );
    y += 16.0 + kicker_px * 1.4;
    runs.push(
        TextRun::new(cx, y, kicker.to_uppercase(), kicker_px, Color::rgb(0x60, 0xa5, 0xfa).with_opacity(0.6))
            .tracking(0.1)
            .centered(),
    );
    y += 64.0 + prompt_px;
    runs.push(
        TextRun::new(cx, y, prompt.to_uppercase(), prompt_px, Color::WHITE.with_opacity(0.4))
            .family("monospace")
            .tracking(0.05)
            .centered(),
    );
    runs
}

/// Text runs for a section panel and the accent rule under the subtitle.
///
/// Copy flows top-down through the text pane and stops at the pane's bottom padding.
fn section_runs(sp: &SectionPaint, split: PanelSplit, narrow: bool) -> (Vec<TextRun>, Rect) {
    let mut runs = Vec::new();

    let (label_px, label_inset) = if narrow { (48.0, 16.0) } else { (128.0, 48.0) };
    runs.push(
        TextRun::new(
            split.visual.x0 + label_inset,
            split.visual.y0 + label_inset + label_px * 0.8,
            &sp.label,
            label_px,
            sp.text_secondary,
        )
        .bold()
        .opacity(0.3),
    );

    let pad = if narrow { 16.0 } else { 64.0 };
    let x = split.text.x0 + pad;
    let width = (split.text.width() - 2.0 * pad).max(1.0);
    let bottom = split.text.y1 - pad;
    let mut y = split.text.y0 + pad;

    let title_px = if narrow { 30.0 } else { 60.0 };
    for line in wrap_to_width(&sp.title, width, title_px, sp.title_family) {
        y += title_px;
        runs.push(
            TextRun::new(x, y, line, title_px, sp.text_primary)
                .family(sp.title_family)
                .bold()
                .tracking(-0.05),
        );
    }

    let sub_px = if narrow { 12.0 } else { 14.0 };
    y += if narrow { 12.0 } else { 16.0 };
    for line in wrap_to_width(&sp.subtitle.to_uppercase(), width, sub_px, "monospace") {
        y += sub_px * 1.4;
        runs.push(
            TextRun::new(x, y, line, sub_px, sp.text_secondary)
                .family("monospace")
                .tracking(0.05),
        );
    }

    y += if narrow { 16.0 } else { 24.0 };
    let rule = Rect::new(x, y, x + 64.0, y + 2.0);
    y += if narrow { 16.0 } else { 24.0 };

    let mut flow = TextFlow {
        runs,
        x,
        y,
        width,
        bottom,
        body_px: if narrow { 14.0 } else { 16.0 },
        sp,
    };
    for block in &sp.content {
        if !flow.block(block) {
            break;
        }
    }
    (flow.runs, rule)
}

struct TextFlow<'a> {
    runs: Vec<TextRun>,
    x: f64,
    y: f64,
    width: f64,
    bottom: f64,
    body_px: f64,
    sp: &'a SectionPaint,
}

impl TextFlow<'_> {
    /// Lay out wrapped `text`; `false` once the pane is full.
    fn lines(&mut self, text: &str, size: f64, color: Color, bold: bool, family: &'static str) -> bool {
        for line in wrap_to_width(text, self.width, size, family) {
            if self.y + size * 1.6 > self.bottom {
                return false;
            }
            self.y += size * 1.6;
            let mut run = TextRun::new(self.x, self.y, line, size, color).family(family);
            if bold {
                run = run.bold();
            }
            self.runs.push(run);
        }
        true
    }

    fn gap(&mut self, px: f64) {
        self.y += px;
    }

    fn block(&mut self, block: &Block) -> bool {
        let sp = self.sp;
        let body = self.body_px;
        match block {
            Block::Heading { text, level } => {
                self.gap(body * 0.5);
                let size = if *level <= 3 { body * 1.5 } else { body * 1.25 };
                self.lines(text, size, sp.text_primary, true, sp.title_family)
            }
            Block::Paragraph { text, style } => {
                let (size, color) = match style {
                    ParagraphStyle::Lead => (body * 1.125, sp.text_primary),
                    ParagraphStyle::Quote => (body, sp.text_secondary),
                    ParagraphStyle::Emphasis => (body, sp.accent),
                    ParagraphStyle::Body => (body, sp.text_primary.with_opacity(0.9)),
                };
                let ok = self.lines(text, size, color, false, sp.family);
                self.gap(body * 0.5);
                ok
            }
            Block::List { title, items } => {
                if let Some(t) = title
                    && !self.lines(t, body, sp.text_secondary, true, sp.family)
                {
                    return false;
                }
                items
                    .iter()
                    .all(|item| self.lines(&format!("\u{2022} {item}"), body, sp.text_primary, false, sp.family))
            }
            Block::Card { title, blocks } => {
                self.lines(title, body * 1.25, sp.accent, true, sp.title_family)
                    && blocks.iter().all(|b| self.block(b))
            }
            Block::Compare {
                term,
                definition,
                rows,
            } => {
                if !self.lines(term, body * 1.25, sp.accent, true, sp.title_family) {
                    return false;
                }
                if let Some(d) = definition
                    && !self.lines(d, body, sp.text_secondary, false, sp.family)
                {
                    return false;
                }
                rows.iter().all(|row| {
                    self.lines(
                        &format!("{}: {}", row.label, row.text),
                        body,
                        sp.text_primary,
                        false,
                        sp.family,
                    )
                })
            }
            Block::Columns { columns } => columns.iter().flatten().all(|b| self.block(b)),
            Block::Stat {
                value,
                caption,
                note,
            } => {
                self.lines(value, body * 2.0, sp.accent, true, sp.title_family)
                    && self.lines(caption, body, sp.text_primary, false, sp.family)
                    && note
                        .as_deref()
                        .is_none_or(|n| self.lines(n, body * 0.875, sp.text_secondary, false, sp.family))
            }
            Block::Rule => {
                self.gap(body);
                true
            }
        }
    }
}

fn new_pixmap(width: u32, height: u32) -> PlacescapeResult<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| PlacescapeError::evaluation(format!("failed to allocate {width}x{height} pixmap")))
}

fn pixmap_from_vec(data: Vec<u8>, width: u32, height: u32) -> PlacescapeResult<Pixmap> {
    IntSize::from_wh(width, height)
        .and_then(|size| Pixmap::from_vec(data, size))
        .ok_or_else(|| PlacescapeError::evaluation("pixel buffer does not match pixmap size"))
}

fn rect_mask(viewport: Viewport, rect: Rect) -> PlacescapeResult<Mask> {
    let mut mask = Mask::new(viewport.width, viewport.height)
        .ok_or_else(|| PlacescapeError::evaluation("failed to allocate pane mask"))?;
    let r = to_skia_rect(rect)
        .ok_or_else(|| PlacescapeError::evaluation("visual pane has no area"))?;
    mask.fill_path(
        &PathBuilder::from_rect(r),
        FillRule::Winding,
        false,
        Transform::identity(),
    );
    Ok(mask)
}

fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

fn to_transform(a: Affine) -> Transform {
    let [sx, ky, kx, sy, tx, ty] = a.as_coeffs();
    Transform::from_row(sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32)
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Fill `box_` with `fill`; gradients span the box the way a CSS background does.
fn fill_box(target: &mut Pixmap, box_: Rect, fill: &Fill) {
    let Some(rect) = to_skia_rect(box_) else {
        return;
    };
    let mut paint = Paint::default();
    match fill {
        Fill::Solid(c) => paint.set_color(skia_color(*c)),
        Fill::Linear { direction, .. } => {
            let ((x0, y0), (x1, y1)) = direction.gradient_line(box_.width(), box_.height());
            let stops = fill
                .stops()
                .into_iter()
                .map(|(at, c)| GradientStop::new(at as f32, skia_color(c)))
                .collect::<Vec<_>>();
            let first = fill.stops().first().map(|(_, c)| *c).unwrap_or(Color::TRANSPARENT);
            paint.shader = LinearGradient::new(
                tiny_skia::Point::from_xy((box_.x0 + x0) as f32, (box_.y0 + y0) as f32),
                tiny_skia::Point::from_xy((box_.x0 + x1) as f32, (box_.y0 + y1) as f32),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or(Shader::SolidColor(skia_color(first)));
        }
    }
    target.fill_rect(rect, &paint, Transform::identity(), None);
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
