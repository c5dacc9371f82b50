use std::{collections::HashSet, path::Path};

use anyhow::Context;

use crate::{
    content::palette,
    foundation::error::{PlacescapeError, PlacescapeResult},
};

/// Utility-class tokens a section is styled with, kept exactly as authored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThemeTokens {
    /// Background: `bg-<color>` or `bg-gradient-to-<dir> from-<c> [via-<c>] to-<c>`.
    pub bg: String,
    pub text_primary: String,
    pub text_secondary: String,
    /// Bare colour token such as `cyan-400`.
    pub accent: String,
    pub font: String,
    pub title_font: String,
    /// Absolute asset path (`/1.png`). Absent visuals use the placeholder.
    #[serde(default)]
    pub visual: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    #[default]
    Body,
    Lead,
    Quote,
    Emphasis,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabelledRow {
    pub label: String,
    pub text: String,
}

/// Rich section content.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Paragraph {
        text: String,
        #[serde(default)]
        style: ParagraphStyle,
    },
    List {
        #[serde(default)]
        title: Option<String>,
        items: Vec<String>,
    },
    Card {
        title: String,
        #[serde(default)]
        blocks: Vec<Block>,
    },
    /// A term compared across labelled readings (e.g. digital vs. mental map).
    Compare {
        term: String,
        #[serde(default)]
        definition: Option<String>,
        rows: Vec<LabelledRow>,
    },
    Columns {
        columns: Vec<Vec<Block>>,
    },
    Stat {
        value: String,
        caption: String,
        #[serde(default)]
        note: Option<String>,
    },
    Rule,
}

fn default_heading_level() -> u8 {
    3
}

impl Block {
    fn validate(&self, section: &str) -> PlacescapeResult<()> {
        match self {
            Self::Heading { text, level } => {
                if !(2..=6).contains(level) {
                    return Err(PlacescapeError::validation(format!(
                        "section '{section}': heading level {level} must be within 2..=6"
                    )));
                }
                non_empty(section, "heading", text)
            }
            Self::Paragraph { text, .. } => non_empty(section, "paragraph", text),
            Self::List { items, .. } => {
                if items.is_empty() {
                    return Err(PlacescapeError::validation(format!(
                        "section '{section}': list must have at least one item"
                    )));
                }
                Ok(())
            }
            Self::Card { title, blocks } => {
                non_empty(section, "card title", title)?;
                blocks.iter().try_for_each(|b| b.validate(section))
            }
            Self::Compare { term, rows, .. } => {
                non_empty(section, "compare term", term)?;
                if rows.is_empty() {
                    return Err(PlacescapeError::validation(format!(
                        "section '{section}': compare '{term}' has no rows"
                    )));
                }
                Ok(())
            }
            Self::Columns { columns } => columns
                .iter()
                .flatten()
                .try_for_each(|b| b.validate(section)),
            Self::Stat { value, .. } => non_empty(section, "stat value", value),
            Self::Rule => Ok(()),
        }
    }
}

fn non_empty(section: &str, what: &str, s: &str) -> PlacescapeResult<()> {
    if s.trim().is_empty() {
        return Err(PlacescapeError::validation(format!(
            "section '{section}': {what} must be non-empty"
        )));
    }
    Ok(())
}

/// One essay section. Immutable once the registry is built.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SectionDescriptor {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub theme: ThemeTokens,
    #[serde(default)]
    pub content: Vec<Block>,
}

impl SectionDescriptor {
    /// Path the visual pane loads: the authored visual or the placeholder.
    pub fn visual_path(&self) -> &str {
        self.theme
            .visual
            .as_deref()
            .unwrap_or(PLACEHOLDER_VISUAL)
    }
}

/// Fallback visual for sections without one (or whose visual fails to load).
pub const PLACEHOLDER_VISUAL: &str = "/placeholder.svg";

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeroCopy {
    pub title: String,
    pub tagline: String,
    pub kicker: String,
    pub prompt: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FooterCopy {
    pub title: String,
    pub credit: String,
}

/// Ordered, validated collection of section descriptors plus the page's hero and footer copy.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SectionRegistry {
    pub(crate) hero: HeroCopy,
    pub(crate) footer: FooterCopy,
    pub(crate) sections: Vec<SectionDescriptor>,
}

impl SectionRegistry {
    pub fn new(
        hero: HeroCopy,
        footer: FooterCopy,
        sections: Vec<SectionDescriptor>,
    ) -> PlacescapeResult<Self> {
        let reg = Self {
            hero,
            footer,
            sections,
        };
        reg.validate()?;
        Ok(reg)
    }

    pub fn validate(&self) -> PlacescapeResult<()> {
        if self.sections.is_empty() {
            return Err(PlacescapeError::validation(
                "registry must contain at least one section",
            ));
        }

        let mut seen = HashSet::with_capacity(self.sections.len());
        for s in &self.sections {
            if s.id.trim().is_empty() {
                return Err(PlacescapeError::validation("section id must be non-empty"));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(PlacescapeError::validation(format!(
                    "duplicate section id '{}'",
                    s.id
                )));
            }
            non_empty(&s.id, "title", &s.title)?;
            validate_theme(&s.id, &s.theme)?;
            for block in &s.content {
                block.validate(&s.id)?;
            }
        }
        Ok(())
    }

    /// Parse and validate a registry document.
    pub fn from_json_str(s: &str) -> PlacescapeResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PlacescapeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read registry '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> PlacescapeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn hero(&self) -> &HeroCopy {
        &self.hero
    }

    pub fn footer(&self) -> &FooterCopy {
        &self.footer
    }
}

impl<'a> IntoIterator for &'a SectionRegistry {
    type Item = &'a SectionDescriptor;
    type IntoIter = std::slice::Iter<'a, SectionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl<'de> serde::Deserialize<'de> for SectionRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Repr {
            #[serde(default)]
            hero: HeroCopy,
            #[serde(default)]
            footer: FooterCopy,
            sections: Vec<SectionDescriptor>,
        }

        let r = Repr::deserialize(deserializer)?;
        Self::new(r.hero, r.footer, r.sections).map_err(serde::de::Error::custom)
    }
}

/// Zero-padded, one-based position label (`"01"`).
pub fn index_label(index: usize) -> String {
    format!("{:02}", index + 1)
}

fn validate_theme(id: &str, theme: &ThemeTokens) -> PlacescapeResult<()> {
    let ctx = |e: PlacescapeError| match e {
        PlacescapeError::Validation(msg) => {
            PlacescapeError::validation(format!("section '{id}': {msg}"))
        }
        other => other,
    };
    palette::background(&theme.bg).map_err(ctx)?;
    palette::text_color(&theme.text_primary).map_err(ctx)?;
    palette::text_color(&theme.text_secondary).map_err(ctx)?;
    palette::color(&theme.accent).map_err(ctx)?;
    palette::font_family(&theme.font).map_err(ctx)?;
    palette::font_family(&theme.title_font).map_err(ctx)?;
    if let Some(v) = &theme.visual
        && !v.starts_with('/')
    {
        return Err(PlacescapeError::validation(format!(
            "section '{id}': visual '{v}' must be an absolute asset path"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/content/model.rs"]
mod tests;
