use std::{fmt, str::FromStr};

use crate::foundation::error::{PlacescapeError, PlacescapeResult};

/// Point along an axis, as a fraction of that axis' length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Start,
    Center,
    End,
    Fraction(f64),
}

impl Edge {
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
            Self::Fraction(f) => f,
        }
    }

    fn parse(token: &str) -> PlacescapeResult<Self> {
        match token {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => {
                let f: f64 = other.parse().map_err(|_| {
                    PlacescapeError::validation(format!(
                        "scroll edge '{other}' must be start, center, end or a number"
                    ))
                })?;
                if !f.is_finite() {
                    return Err(PlacescapeError::validation(format!(
                        "scroll edge '{other}' must be finite"
                    )));
                }
                Ok(Self::Fraction(f))
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Center => f.write_str("center"),
            Self::End => f.write_str("end"),
            Self::Fraction(v) => write!(f, "{v}"),
        }
    }
}

/// "When `target` edge of the container meets `viewport` edge of the viewport."
///
/// Written as two tokens, e.g. `"start start"` or `"end start"`. A single token applies to both
/// sides.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Intersection {
    pub target: Edge,
    pub viewport: Edge,
}

impl Intersection {
    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }
}

impl FromStr for Intersection {
    type Err = PlacescapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let Some(first) = tokens.next() else {
            return Err(PlacescapeError::validation("scroll intersection is empty"));
        };
        let target = Edge::parse(first)?;
        let viewport = match tokens.next() {
            Some(t) => Edge::parse(t)?,
            None => target,
        };
        if tokens.next().is_some() {
            return Err(PlacescapeError::validation(format!(
                "scroll intersection '{s}' has more than two edges"
            )));
        }
        Ok(Self { target, viewport })
    }
}

impl TryFrom<String> for Intersection {
    type Error = PlacescapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Intersection> for String {
    fn from(value: Intersection) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.viewport)
    }
}

/// Observation window of a section: progress is 0 at `start` and 1 at `end`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[Intersection; 2]", into = "[Intersection; 2]")]
pub struct ScrollOffset {
    pub start: Intersection,
    pub end: Intersection,
}

impl ScrollOffset {
    /// Container top at viewport top, through container bottom at viewport top.
    pub const SECTION_EXIT: Self = Self {
        start: Intersection::new(Edge::Start, Edge::Start),
        end: Intersection::new(Edge::End, Edge::Start),
    };

    pub fn parse(start: &str, end: &str) -> PlacescapeResult<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

impl Default for ScrollOffset {
    fn default() -> Self {
        Self::SECTION_EXIT
    }
}

impl From<[Intersection; 2]> for ScrollOffset {
    fn from([start, end]: [Intersection; 2]) -> Self {
        Self { start, end }
    }
}

impl From<ScrollOffset> for [Intersection; 2] {
    fn from(value: ScrollOffset) -> Self {
        [value.start, value.end]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/offset.rs"]
mod tests;
