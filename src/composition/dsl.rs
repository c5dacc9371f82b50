use std::collections::HashSet;

use crate::{
    content::model::{
        Block, FooterCopy, HeroCopy, LabelledRow, ParagraphStyle, SectionDescriptor,
        SectionRegistry, ThemeTokens,
    },
    foundation::error::{PlacescapeError, PlacescapeResult},
};

pub struct RegistryBuilder {
    hero: HeroCopy,
    footer: FooterCopy,
    ids: HashSet<String>,
    sections: Vec<SectionDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            hero: HeroCopy::default(),
            footer: FooterCopy::default(),
            ids: HashSet::new(),
            sections: Vec::new(),
        }
    }

    pub fn hero(mut self, hero: HeroCopy) -> Self {
        self.hero = hero;
        self
    }

    pub fn footer(mut self, footer: FooterCopy) -> Self {
        self.footer = footer;
        self
    }

    pub fn section(mut self, section: SectionDescriptor) -> PlacescapeResult<Self> {
        if !self.ids.insert(section.id.clone()) {
            return Err(PlacescapeError::validation(format!(
                "duplicate section id '{}'",
                section.id
            )));
        }
        self.sections.push(section);
        Ok(self)
    }

    pub fn build(self) -> PlacescapeResult<SectionRegistry> {
        SectionRegistry::new(self.hero, self.footer, self.sections)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ThemeBuilder {
    theme: ThemeTokens,
}

impl ThemeBuilder {
    /// Start from a solid background with white text, sans-serif fonts and no visual.
    pub fn new(bg: impl Into<String>) -> Self {
        Self {
            theme: ThemeTokens {
                bg: bg.into(),
                text_primary: "text-white".to_owned(),
                text_secondary: "text-white".to_owned(),
                accent: "white".to_owned(),
                font: "font-sans".to_owned(),
                title_font: "font-sans".to_owned(),
                visual: None,
            },
        }
    }

    pub fn text(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.theme.text_primary = primary.into();
        self.theme.text_secondary = secondary.into();
        self
    }

    pub fn accent(mut self, accent: impl Into<String>) -> Self {
        self.theme.accent = accent.into();
        self
    }

    pub fn fonts(mut self, body: impl Into<String>, title: impl Into<String>) -> Self {
        self.theme.font = body.into();
        self.theme.title_font = title.into();
        self
    }

    pub fn visual(mut self, path: impl Into<String>) -> Self {
        self.theme.visual = Some(path.into());
        self
    }

    pub fn build(self) -> ThemeTokens {
        self.theme
    }
}

pub struct SectionBuilder {
    id: String,
    title: String,
    subtitle: String,
    theme: Option<ThemeTokens>,
    content: Vec<Block>,
}

impl SectionBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            theme: None,
            content: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn theme(mut self, theme: ThemeTokens) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.content.push(block);
        self
    }

    pub fn heading(self, text: impl Into<String>) -> Self {
        self.block(Block::Heading {
            text: text.into(),
            level: 3,
        })
    }

    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.block(Block::Paragraph {
            text: text.into(),
            style: ParagraphStyle::Body,
        })
    }

    pub fn quote(self, text: impl Into<String>) -> Self {
        self.block(Block::Paragraph {
            text: text.into(),
            style: ParagraphStyle::Quote,
        })
    }

    pub fn list<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block(Block::List {
            title: None,
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub fn compare<I, L, T>(self, term: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        self.block(Block::Compare {
            term: term.into(),
            definition: None,
            rows: rows
                .into_iter()
                .map(|(label, text)| LabelledRow {
                    label: label.into(),
                    text: text.into(),
                })
                .collect(),
        })
    }

    pub fn build(self) -> PlacescapeResult<SectionDescriptor> {
        if self.id.trim().is_empty() {
            return Err(PlacescapeError::validation("section id must be non-empty"));
        }
        if self.title.trim().is_empty() {
            return Err(PlacescapeError::validation(format!(
                "section '{}' title must be non-empty",
                self.id
            )));
        }
        let Some(theme) = self.theme else {
            return Err(PlacescapeError::validation(format!(
                "section '{}' has no theme",
                self.id
            )));
        };
        Ok(SectionDescriptor {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            theme,
            content: self.content,
        })
    }
}
