//! Static HTML export of the essay route.
//!
//! The page carries no script. Each section declares a named view timeline and its animated
//! layers run `@keyframes` generated from the [`SignalPolicy`] on that timeline, so the browser
//! reproduces the same scroll-linked opacity, zoom and blur the evaluator computes.

use std::fmt::Write as _;

use crate::{
    animation::keyframes::Keyframes,
    content::{
        model::{Block, ParagraphStyle, SectionDescriptor, SectionRegistry, index_label},
        palette::{self, Color},
    },
    foundation::{error::PlacescapeResult, math::css_number},
    page::layout::PageConfig,
    scroll::{
        offset::{Intersection, ScrollOffset},
        transformer::SignalPolicy,
    },
};

const HERO_BACKGROUND: &str = "bg-linear-to-br from-slate-950 via-blue-950 to-black";
const TIMELINE: &str = "--section";

/// Render the whole route as one self-contained HTML document.
#[tracing::instrument(level = "debug", skip_all, fields(sections = registry.len()))]
pub fn export_page(registry: &SectionRegistry, config: &PageConfig) -> PlacescapeResult<String> {
    config.validate()?;
    registry.validate()?;

    let mut html = String::with_capacity(64 * 1024);
    let hero = registry.hero();
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(html, "<title>{}</title>", escape_html(&hero.title));
    html.push_str("<style>\n");
    html.push_str(&stylesheet(config)?);
    html.push_str("</style>\n</head>\n<body>\n<main>\n");

    write_hero(&mut html, registry);
    for (index, section) in registry.iter().enumerate() {
        write_section(&mut html, index, section)?;
    }
    write_footer(&mut html, registry);

    html.push_str("</main>\n</body>\n</html>\n");
    Ok(html)
}

/// `animation-range` for a section's scroll window.
///
/// The default window is exactly the `exit-crossing` range. Other offsets are expressed as
/// lengths into the `cover` range, which starts when the section's top meets the viewport bottom.
pub fn animation_range(offset: &ScrollOffset, section_height_vh: f64) -> String {
    if *offset == ScrollOffset::SECTION_EXIT {
        return "exit-crossing".to_string();
    }
    let at = |i: Intersection| {
        let vh = (i.target.fraction() * section_height_vh + 1.0 - i.viewport.fraction()) * 100.0;
        format!("cover {}vh", css_number(vh))
    };
    format!("{} {}", at(offset.start), at(offset.end))
}

/// One `@keyframes` rule for a signal track.
///
/// Stops outside the track are pinned at 0% and 100% so the track holds its end values, as it
/// does when sampled.
pub fn keyframes_css(name: &str, track: &Keyframes<f64>, declare: impl Fn(f64) -> String) -> String {
    let keys = track.keys();
    let mut css = format!("@keyframes {name} {{\n");
    if let Some(first) = keys.first()
        && first.at > 0.0
    {
        let _ = writeln!(css, "  0% {{ {}; }}", declare(first.value));
    }
    for k in keys {
        let _ = writeln!(
            css,
            "  {}% {{ {}; animation-timing-function: {}; }}",
            css_number(k.at * 100.0),
            declare(k.value),
            k.ease.css_timing()
        );
    }
    if let Some(last) = keys.last()
        && last.at < 1.0
    {
        let _ = writeln!(css, "  100% {{ {}; }}", declare(last.value));
    }
    css.push_str("}\n");
    css
}

fn signal_keyframes(policy: &SignalPolicy) -> String {
    [
        keyframes_css("placescape-opacity", &policy.opacity, |v| {
            format!("opacity: {}", css_number(v))
        }),
        keyframes_css("placescape-scale", &policy.scale, |v| {
            format!("transform: scale({})", css_number(v))
        }),
        // Zero blur is emitted as blur(0px) rather than `none` so every stop interpolates.
        keyframes_css("placescape-blur", &policy.blur_px, |v| {
            format!("filter: blur({}px)", css_number(v))
        }),
    ]
    .concat()
}

/// Entrance of one section element. Timings are in seconds on a notional clock that spans
/// [`REVEAL_SPAN_S`], laid onto the section's `entry` range.
struct Reveal {
    selector: &'static str,
    name: &'static str,
    from: &'static str,
    delay_s: f64,
    duration_s: f64,
    easing: &'static str,
}

const REVEAL_SPAN_S: f64 = 1.6;

// Overshooting curve standing in for a spring with bounce 0.4.
const SPRING_EASING: &str = "cubic-bezier(0.34, 1.56, 0.64, 1)";

const REVEALS: [Reveal; 6] = [
    Reveal {
        selector: ".index",
        name: "placescape-reveal-index",
        from: "opacity: 0; transform: translateX(-50px) rotate(-10deg);",
        delay_s: 0.0,
        duration_s: 1.0,
        easing: SPRING_EASING,
    },
    Reveal {
        selector: ".masthead",
        name: "placescape-reveal-masthead",
        from: "opacity: 0;",
        delay_s: 0.0,
        duration_s: 0.6,
        easing: "ease",
    },
    Reveal {
        selector: ".masthead h2",
        name: "placescape-reveal-title",
        from: "opacity: 0; transform: translateY(30px);",
        delay_s: 0.1,
        duration_s: 0.8,
        easing: "ease",
    },
    Reveal {
        selector: ".masthead .subtitle",
        name: "placescape-reveal-subtitle",
        from: "opacity: 0; transform: translateX(-20px);",
        delay_s: 0.3,
        duration_s: 0.6,
        easing: "ease",
    },
    Reveal {
        selector: ".masthead .rule",
        name: "placescape-reveal-rule",
        from: "transform: scaleX(0);",
        delay_s: 0.5,
        duration_s: 1.0,
        easing: "ease-out",
    },
    Reveal {
        selector: ".content",
        name: "placescape-reveal-content",
        from: "opacity: 0; transform: translateY(40px);",
        delay_s: 0.6,
        duration_s: 0.8,
        easing: "ease",
    },
];

fn reveal_range(reveal: &Reveal) -> String {
    let pct = |t: f64| css_number((t / REVEAL_SPAN_S).clamp(0.0, 1.0) * 100.0);
    format!(
        "entry {}% entry {}%",
        pct(reveal.delay_s),
        pct(reveal.delay_s + reveal.duration_s)
    )
}

fn reveal_keyframes() -> String {
    let mut css = String::new();
    for r in &REVEALS {
        let _ = writeln!(css, "@keyframes {} {{ from {{ {} }} }}", r.name, r.from);
    }
    css
}

fn reveal_rules() -> String {
    let mut css = String::new();
    for r in &REVEALS {
        let _ = writeln!(
            css,
            "  {} {{ animation-name: {}; animation-timing-function: {}; animation-fill-mode: both; animation-duration: auto; animation-timeline: {TIMELINE}; animation-range: {}; }}",
            r.selector,
            r.name,
            r.easing,
            reveal_range(r),
        );
    }
    css
}

fn stylesheet(config: &PageConfig) -> PlacescapeResult<String> {
    let hero_bg = palette::background(HERO_BACKGROUND)?.css();
    let sans = palette::font_family("font-sans")?;
    let mono = palette::font_family("font-mono")?;
    let section_vh = config.section_min_height_vh * 100.0;
    let range = animation_range(&config.offset, config.section_min_height_vh);
    let narrow_max = config.narrow_breakpoint_px.saturating_sub(1);

    let mut css = String::new();
    let _ = write!(
        css,
        r#"*, *::before, *::after {{ box-sizing: border-box; margin: 0; padding: 0; }}
body {{ background: #000; color: #fff; font-family: {sans}; }}
.hero {{ position: relative; min-height: {hero_vh}vh; display: flex; align-items: center; justify-content: center; overflow: hidden; padding: 0 1rem; background: {hero_bg}; text-align: center; }}
.hero h1 {{ font-size: 6rem; font-weight: 700; letter-spacing: -0.05em; margin-bottom: 1.5rem; }}
.hero .tagline {{ font-size: 1.5rem; color: #93c5fd; font-family: {mono}; margin-bottom: 1rem; }}
.hero .kicker {{ font-size: 0.875rem; color: rgba(96, 165, 250, 0.6); text-transform: uppercase; letter-spacing: 0.1em; }}
.hero .prompt {{ margin-top: 4rem; font-size: 0.75rem; color: rgba(255, 255, 255, 0.4); font-family: {mono}; text-transform: uppercase; letter-spacing: 0.05em; }}
.scene {{ position: relative; min-height: {section_vh}vh; view-timeline: {TIMELINE} block; }}
.sticky {{ position: sticky; top: 0; height: 100vh; }}
.panel {{ height: 100%; display: grid; grid-template-columns: 1fr 1fr; }}
.visual {{ position: relative; overflow: hidden; background: rgba(0, 0, 0, 0.2); }}
.zoom, .blur {{ position: absolute; inset: 0; }}
.blur img {{ width: 100%; height: 100%; object-fit: cover; opacity: 0.8; }}
.shade {{ position: absolute; inset: 0; background: linear-gradient(to right, transparent, rgba(0, 0, 0, 0.6)); }}
.index {{ position: absolute; top: 3rem; left: 3rem; z-index: 10; font-size: 8rem; font-weight: 700; }}
.index span {{ display: inline-block; opacity: 0.3; transition: transform 0.3s, opacity 0.3s; }}
.index span:hover {{ transform: scale(1.1); opacity: 0.5; }}
.copy {{ height: 100vh; overflow-y: scroll; scrollbar-width: none; padding: 4rem; }}
.copy-inner {{ max-width: 42rem; margin: 0 auto; padding-bottom: 6rem; }}
.copy h2 {{ font-size: 3.75rem; font-weight: 700; line-height: 1; letter-spacing: -0.05em; margin-bottom: 1rem; }}
.copy .subtitle {{ font-size: 0.875rem; font-family: {mono}; text-transform: uppercase; letter-spacing: 0.05em; margin-bottom: 2rem; }}
.copy .rule {{ height: 1px; width: 6rem; margin-bottom: 2rem; transform-origin: left; }}
.copy h3, .copy h4, .copy h5, .copy h6 {{ margin: 1.5rem 0 0.75rem; }}
.copy p, .copy ul, .copy .card, .copy .compare, .copy .stat {{ margin-bottom: 1rem; line-height: 1.6; }}
.copy .lead {{ font-size: 1.125rem; }}
.copy blockquote {{ border-left: 2px solid currentColor; padding-left: 1rem; font-style: italic; }}
.copy .columns {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(12rem, 1fr)); gap: 1rem; }}
.copy .stat-value {{ font-size: 2rem; font-weight: 700; }}
footer {{ background: #000; color: #fff; padding: 3rem 0; text-align: center; }}
footer .title {{ font-size: 0.875rem; font-family: {mono}; color: rgba(255, 255, 255, 0.6); }}
footer .credit {{ font-size: 0.75rem; color: rgba(255, 255, 255, 0.4); margin-top: 0.5rem; }}
@media (max-width: {narrow_max}px) {{
  .hero h1 {{ font-size: 2.25rem; }}
  .panel {{ display: flex; flex-direction: column; }}
  .visual {{ height: 33.333%; flex: none; }}
  .shade {{ background: linear-gradient(to bottom, transparent, rgba(0, 0, 0, 0.6)); }}
  .index {{ top: 1rem; left: 1rem; font-size: 3rem; }}
  .copy {{ flex: 1; height: auto; padding: 1rem; }}
  .copy h2 {{ font-size: 1.875rem; }}
  .copy .rule {{ width: 4rem; margin-bottom: 1.5rem; }}
}}
"#,
        hero_vh = css_number(config.hero_height_vh * 100.0),
        section_vh = css_number(section_vh),
    );

    css.push_str(&signal_keyframes(&config.policy));
    css.push_str(&reveal_keyframes());
    let _ = write!(
        css,
        r#"@supports (animation-timeline: view()) {{
  .panel, .zoom, .blur {{ animation-timing-function: linear; animation-fill-mode: both; animation-duration: auto; animation-timeline: {TIMELINE}; animation-range: {range}; }}
  .panel {{ animation-name: placescape-opacity; }}
  .zoom {{ animation-name: placescape-scale; }}
  .blur {{ animation-name: placescape-blur; }}
{reveals}}}
"#,
        reveals = reveal_rules(),
    );
    Ok(css)
}

fn write_hero(html: &mut String, registry: &SectionRegistry) {
    let hero = registry.hero();
    let _ = writeln!(
        html,
        "<section class=\"hero\">\n<div>\n<h1>{}</h1>\n<p class=\"tagline\">{}</p>\n<p class=\"kicker\">{}</p>\n<p class=\"prompt\">{}</p>\n</div>\n</section>",
        escape_html(&hero.title),
        escape_html(&hero.tagline),
        escape_html(&hero.kicker),
        escape_html(&hero.prompt),
    );
}

fn write_section(html: &mut String, index: usize, s: &SectionDescriptor) -> PlacescapeResult<()> {
    let theme = &s.theme;
    let bg = palette::background(&theme.bg)?.css();
    let primary = palette::text_color(&theme.text_primary)?;
    let secondary = palette::text_color(&theme.text_secondary)?;
    let accent = palette::color(&theme.accent)?;
    let font = palette::font_family(&theme.font)?;
    let title_font = palette::font_family(&theme.title_font)?;

    let _ = writeln!(
        html,
        "<section class=\"scene\" id=\"{id}\" style=\"background: {bg};\">\n<div class=\"sticky\">\n<div class=\"panel\">",
        id = escape_html(&s.id),
        bg = escape_html(&bg),
    );
    let _ = writeln!(
        html,
        "<div class=\"visual\">\n<div class=\"zoom\">\n<div class=\"blur\"><img src=\"{src}\" alt=\"{alt}\"></div>\n<div class=\"shade\"></div>\n</div>\n<div class=\"index\"><span style=\"color: {color};\">{label}</span></div>\n</div>",
        src = escape_html(s.visual_path()),
        alt = escape_html(&s.title),
        color = secondary.css(),
        label = index_label(index),
    );
    let _ = writeln!(
        html,
        "<div class=\"copy\" style=\"background: {bg}; color: {primary}; font-family: {font};\">\n<div class=\"copy-inner\">",
        bg = escape_html(&bg),
        primary = primary.css(),
        font = escape_html(font),
    );
    let _ = writeln!(
        html,
        "<div class=\"masthead\">\n<h2 style=\"font-family: {title_font};\">{title}</h2>\n<p class=\"subtitle\" style=\"color: {secondary};\">{subtitle}</p>\n<div class=\"rule\" style=\"background: {accent};\"></div>\n</div>\n<div class=\"content\">",
        title_font = escape_html(title_font),
        title = escape_html(&s.title),
        secondary = secondary.css(),
        subtitle = escape_html(&s.subtitle),
        accent = accent.css(),
    );

    let colors = BlockColors { secondary, accent };
    for block in &s.content {
        write_block(html, block, &colors);
    }
    html.push_str("</div>\n</div>\n</div>\n</div>\n</div>\n</section>\n");
    Ok(())
}

struct BlockColors {
    secondary: Color,
    accent: Color,
}

fn write_block(html: &mut String, block: &Block, colors: &BlockColors) {
    match block {
        Block::Heading { text, level } => {
            let _ = writeln!(html, "<h{level}>{}</h{level}>", escape_html(text));
        }
        Block::Paragraph { text, style } => {
            let text = escape_html(text);
            let _ = match style {
                ParagraphStyle::Body => writeln!(html, "<p>{text}</p>"),
                ParagraphStyle::Lead => writeln!(html, "<p class=\"lead\">{text}</p>"),
                ParagraphStyle::Quote => writeln!(
                    html,
                    "<blockquote style=\"color: {};\">{text}</blockquote>",
                    colors.secondary.css()
                ),
                ParagraphStyle::Emphasis => writeln!(
                    html,
                    "<p><strong style=\"color: {};\">{text}</strong></p>",
                    colors.accent.css()
                ),
            };
        }
        Block::List { title, items } => {
            if let Some(t) = title {
                let _ = writeln!(
                    html,
                    "<p style=\"color: {};\"><strong>{}</strong></p>",
                    colors.secondary.css(),
                    escape_html(t)
                );
            }
            html.push_str("<ul>\n");
            for item in items {
                let _ = writeln!(html, "<li>{}</li>", escape_html(item));
            }
            html.push_str("</ul>\n");
        }
        Block::Card { title, blocks } => {
            let _ = writeln!(
                html,
                "<div class=\"card\" style=\"border-left: 2px solid {accent}; padding-left: 1rem;\">\n<h4 style=\"color: {accent};\">{}</h4>",
                escape_html(title),
                accent = colors.accent.css(),
            );
            for b in blocks {
                write_block(html, b, colors);
            }
            html.push_str("</div>\n");
        }
        Block::Compare {
            term,
            definition,
            rows,
        } => {
            let _ = writeln!(
                html,
                "<div class=\"compare\">\n<h4 style=\"color: {};\">{}</h4>",
                colors.accent.css(),
                escape_html(term)
            );
            if let Some(d) = definition {
                let _ = writeln!(
                    html,
                    "<p style=\"color: {};\">{}</p>",
                    colors.secondary.css(),
                    escape_html(d)
                );
            }
            html.push_str("<dl>\n");
            for row in rows {
                let _ = writeln!(
                    html,
                    "<dt><strong>{}</strong></dt><dd>{}</dd>",
                    escape_html(&row.label),
                    escape_html(&row.text)
                );
            }
            html.push_str("</dl>\n</div>\n");
        }
        Block::Columns { columns } => {
            html.push_str("<div class=\"columns\">\n");
            for column in columns {
                html.push_str("<div>\n");
                for b in column {
                    write_block(html, b, colors);
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        Block::Stat {
            value,
            caption,
            note,
        } => {
            let _ = writeln!(
                html,
                "<div class=\"stat\">\n<div class=\"stat-value\" style=\"color: {};\">{}</div>\n<p>{}</p>",
                colors.accent.css(),
                escape_html(value),
                escape_html(caption)
            );
            if let Some(n) = note {
                let _ = writeln!(
                    html,
                    "<p style=\"color: {};\"><small>{}</small></p>",
                    colors.secondary.css(),
                    escape_html(n)
                );
            }
            html.push_str("</div>\n");
        }
        Block::Rule => html.push_str("<hr>\n"),
    }
}

fn write_footer(html: &mut String, registry: &SectionRegistry) {
    let footer = registry.footer();
    let _ = writeln!(
        html,
        "<footer>\n<p class=\"title\">{}</p>\n<p class=\"credit\">{}</p>\n</footer>",
        escape_html(&footer.title),
        escape_html(&footer.credit),
    );
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/html.rs"]
mod tests;
