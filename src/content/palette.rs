//! Resolution of utility-class colour, gradient and font tokens.
//!
//! Only the subset the essay themes use is understood: named palette colours at shades
//! `50..=950` (with an optional `/<percent>` alpha), `black`, `white`, `transparent`, hex
//! literals, solid `bg-*` fills, `bg-gradient-to-*` / `bg-linear-to-*` gradients with
//! `from-*`/`via-*`/`to-*` stops, and the three `font-*` families.

use crate::foundation::{
    core::Rgba8Premul,
    error::{PlacescapeError, PlacescapeResult},
};

/// Straight-alpha sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Same colour at `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// CSS colour literal.
    pub fn css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = (f64::from(self.a) / 255.0 * 1000.0).round() / 1000.0;
            format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
        }
    }
}

/// Gradient direction keyword (`to-br` = "to bottom right").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    ToT,
    ToTr,
    ToR,
    ToBr,
    ToB,
    ToBl,
    ToL,
    ToTl,
}

impl Direction {
    fn parse(s: &str) -> PlacescapeResult<Self> {
        Ok(match s {
            "t" => Self::ToT,
            "tr" => Self::ToTr,
            "r" => Self::ToR,
            "br" => Self::ToBr,
            "b" => Self::ToB,
            "bl" => Self::ToBl,
            "l" => Self::ToL,
            "tl" => Self::ToTl,
            other => {
                return Err(PlacescapeError::validation(format!(
                    "unknown gradient direction 'to-{other}'"
                )));
            }
        })
    }

    fn signs(self) -> (f64, f64) {
        match self {
            Self::ToT => (0.0, -1.0),
            Self::ToTr => (1.0, -1.0),
            Self::ToR => (1.0, 0.0),
            Self::ToBr => (1.0, 1.0),
            Self::ToB => (0.0, 1.0),
            Self::ToBl => (-1.0, 1.0),
            Self::ToL => (-1.0, 0.0),
            Self::ToTl => (-1.0, -1.0),
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::ToT => "to top",
            Self::ToTr => "to top right",
            Self::ToR => "to right",
            Self::ToBr => "to bottom right",
            Self::ToB => "to bottom",
            Self::ToBl => "to bottom left",
            Self::ToL => "to left",
            Self::ToTl => "to top left",
        }
    }

    /// Start and end points of the CSS gradient line for a `width` x `height` box at the origin.
    ///
    /// Corner directions use the CSS "magic corners" rule: the line is perpendicular to the
    /// diagonal joining the two other corners, so the named corner receives the last stop.
    pub fn gradient_line(self, width: f64, height: f64) -> ((f64, f64), (f64, f64)) {
        let (sx, sy) = self.signs();
        let (vx, vy) = (sx * height, sy * width);
        let norm = vx.hypot(vy);
        let (dx, dy) = if norm > 0.0 {
            (vx / norm, vy / norm)
        } else {
            (sx, sy)
        };
        let half = 0.5 * ((width * dx).abs() + (height * dy).abs());
        let (cx, cy) = (0.5 * width, 0.5 * height);
        ((cx - dx * half, cy - dy * half), (cx + dx * half, cy + dy * half))
    }
}

/// A resolved background.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Evenly spaced stops along `direction`.
    Linear {
        direction: Direction,
        stops: Vec<Color>,
    },
}

impl Fill {
    /// CSS `background` value.
    pub fn css(&self) -> String {
        match self {
            Self::Solid(c) => c.css(),
            Self::Linear { direction, stops } => {
                let stops: Vec<String> = stops.iter().map(|c| c.css()).collect();
                format!("linear-gradient({}, {})", direction.css(), stops.join(", "))
            }
        }
    }

    /// Stop offsets in `[0, 1]` paired with their colours.
    pub fn stops(&self) -> Vec<(f64, Color)> {
        match self {
            Self::Solid(c) => vec![(0.0, *c)],
            Self::Linear { stops, .. } => {
                let n = stops.len().saturating_sub(1).max(1) as f64;
                stops
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as f64 / n, *c))
                    .collect()
            }
        }
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
pub fn parse_hex(s: &str) -> PlacescapeResult<Color> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> PlacescapeResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| PlacescapeError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.is_ascii() {
        return Err(PlacescapeError::validation("hex color must be ASCII"));
    }
    match s.len() {
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err(PlacescapeError::validation(
            "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
        )),
    }
}

/// Resolve a bare colour token: `cyan-400`, `black/20`, `white`, `transparent`, `#0a0a0a`.
pub fn color(token: &str) -> PlacescapeResult<Color> {
    let token = token.trim();
    let (base, alpha) = match token.split_once('/') {
        Some((base, pct)) => {
            let pct: u8 = pct.parse().map_err(|_| {
                PlacescapeError::validation(format!("invalid opacity suffix in '{token}'"))
            })?;
            if pct > 100 {
                return Err(PlacescapeError::validation(format!(
                    "opacity suffix in '{token}' must be <= 100"
                )));
            }
            (base, Some(f64::from(pct) / 100.0))
        }
        None => (token, None),
    };

    let c = match base {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "transparent" => Color::TRANSPARENT,
        hex if hex.starts_with('#') => parse_hex(hex)?,
        named => named_color(named)?,
    };
    Ok(match alpha {
        Some(a) => c.with_opacity(a),
        None => c,
    })
}

/// Resolve `text-<colour>`.
pub fn text_color(token: &str) -> PlacescapeResult<Color> {
    let rest = token.trim().strip_prefix("text-").ok_or_else(|| {
        PlacescapeError::validation(format!("text colour token '{token}' must start with text-"))
    })?;
    color(rest)
}

/// Resolve a background token list into a [`Fill`].
pub fn background(token: &str) -> PlacescapeResult<Fill> {
    let mut parts = token.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(PlacescapeError::validation("background token is empty"));
    };

    let dir = head
        .strip_prefix("bg-gradient-to-")
        .or_else(|| head.strip_prefix("bg-linear-to-"));
    let Some(dir) = dir else {
        let rest = head.strip_prefix("bg-").ok_or_else(|| {
            PlacescapeError::validation(format!("background token '{head}' must start with bg-"))
        })?;
        if let Some(extra) = parts.next() {
            return Err(PlacescapeError::validation(format!(
                "unexpected '{extra}' after solid background '{head}'"
            )));
        }
        return Ok(Fill::Solid(color(rest)?));
    };

    let direction = Direction::parse(dir)?;
    let (mut from, mut via, mut to) = (None, None, None);
    for p in parts {
        if let Some(c) = p.strip_prefix("from-") {
            from = Some(color(c)?);
        } else if let Some(c) = p.strip_prefix("via-") {
            via = Some(color(c)?);
        } else if let Some(c) = p.strip_prefix("to-") {
            to = Some(color(c)?);
        } else {
            return Err(PlacescapeError::validation(format!(
                "unknown gradient stop token '{p}'"
            )));
        }
    }

    let (Some(from), Some(to)) = (from, to) else {
        return Err(PlacescapeError::validation(format!(
            "gradient '{token}' needs both from-* and to-* stops"
        )));
    };
    let stops = match via {
        Some(v) => vec![from, v, to],
        None => vec![from, to],
    };
    Ok(Fill::Linear { direction, stops })
}

/// CSS font stack for `font-sans`, `font-serif` or `font-mono`.
pub fn font_family(token: &str) -> PlacescapeResult<&'static str> {
    match token.trim() {
        "font-sans" => Ok(
            "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\", \"Noto Color Emoji\"",
        ),
        "font-serif" => Ok("ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif"),
        "font-mono" => Ok(
            "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace",
        ),
        other => Err(PlacescapeError::validation(format!(
            "unknown font token '{other}'"
        ))),
    }
}

const SHADES: [u16; 11] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

#[rustfmt::skip]
const PALETTE: &[(&str, [u32; 11])] = &[
    ("slate",   [0xf8fafc, 0xf1f5f9, 0xe2e8f0, 0xcbd5e1, 0x94a3b8, 0x64748b, 0x475569, 0x334155, 0x1e293b, 0x0f172a, 0x020617]),
    ("gray",    [0xf9fafb, 0xf3f4f6, 0xe5e7eb, 0xd1d5db, 0x9ca3af, 0x6b7280, 0x4b5563, 0x374151, 0x1f2937, 0x111827, 0x030712]),
    ("red",     [0xfef2f2, 0xfee2e2, 0xfecaca, 0xfca5a5, 0xf87171, 0xef4444, 0xdc2626, 0xb91c1c, 0x991b1b, 0x7f1d1d, 0x450a0a]),
    ("orange",  [0xfff7ed, 0xffedd5, 0xfed7aa, 0xfdba74, 0xfb923c, 0xf97316, 0xea580c, 0xc2410c, 0x9a3412, 0x7c2d12, 0x431407]),
    ("amber",   [0xfffbeb, 0xfef3c7, 0xfde68a, 0xfcd34d, 0xfbbf24, 0xf59e0b, 0xd97706, 0xb45309, 0x92400e, 0x78350f, 0x451a03]),
    ("yellow",  [0xfefce8, 0xfef9c3, 0xfef08a, 0xfde047, 0xfacc15, 0xeab308, 0xca8a04, 0xa16207, 0x854d0e, 0x713f12, 0x422006]),
    ("green",   [0xf0fdf4, 0xdcfce7, 0xbbf7d0, 0x86efac, 0x4ade80, 0x22c55e, 0x16a34a, 0x15803d, 0x166534, 0x14532d, 0x052e16]),
    ("emerald", [0xecfdf5, 0xd1fae5, 0xa7f3d0, 0x6ee7b7, 0x34d399, 0x10b981, 0x059669, 0x047857, 0x065f46, 0x064e3b, 0x022c22]),
    ("teal",    [0xf0fdfa, 0xccfbf1, 0x99f6e4, 0x5eead4, 0x2dd4bf, 0x14b8a6, 0x0d9488, 0x0f766e, 0x115e59, 0x134e4a, 0x042f2e]),
    ("cyan",    [0xecfeff, 0xcffafe, 0xa5f3fc, 0x67e8f9, 0x22d3ee, 0x06b6d4, 0x0891b2, 0x0e7490, 0x155e75, 0x164e63, 0x083344]),
    ("blue",    [0xeff6ff, 0xdbeafe, 0xbfdbfe, 0x93c5fd, 0x60a5fa, 0x3b82f6, 0x2563eb, 0x1d4ed8, 0x1e40af, 0x1e3a8a, 0x172554]),
    ("purple",  [0xfaf5ff, 0xf3e8ff, 0xe9d5ff, 0xd8b4fe, 0xc084fc, 0xa855f7, 0x9333ea, 0x7e22ce, 0x6b21a8, 0x581c87, 0x3b0764]),
    ("pink",    [0xfdf2f8, 0xfce7f3, 0xfbcfe8, 0xf9a8d4, 0xf472b6, 0xec4899, 0xdb2777, 0xbe185d, 0x9d174d, 0x831843, 0x500724]),
];

fn named_color(token: &str) -> PlacescapeResult<Color> {
    let unknown = || PlacescapeError::validation(format!("unknown colour token '{token}'"));
    let (name, shade) = token.rsplit_once('-').ok_or_else(unknown)?;
    let shade: u16 = shade.parse().map_err(|_| unknown())?;
    let idx = SHADES.iter().position(|s| *s == shade).ok_or_else(unknown)?;
    let (_, ramp) = PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(unknown)?;
    Ok(Color::from_u32(ramp[idx]))
}

#[cfg(test)]
#[path = "../../tests/unit/content/palette.rs"]
mod tests;
