use std::fmt;
use std::str::FromStr;

use lull_core::{Viewport, current_viewport, remember_with_key};
use smallvec::SmallVec;

use crate::error::MediaQueryError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Square viewports count as portrait.
    pub fn of(viewport: Viewport) -> Self {
        if viewport.height >= viewport.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// One parenthesized condition. Lengths are logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    MinWidth(u32),
    MaxWidth(u32),
    MinHeight(u32),
    MaxHeight(u32),
    Orientation(Orientation),
}

impl Feature {
    pub fn matches(&self, viewport: Viewport) -> bool {
        match *self {
            Feature::MinWidth(px) => viewport.width >= px,
            Feature::MaxWidth(px) => viewport.width <= px,
            Feature::MinHeight(px) => viewport.height >= px,
            Feature::MaxHeight(px) => viewport.height <= px,
            Feature::Orientation(o) => Orientation::of(viewport) == o,
        }
    }

    fn parse(body: &str) -> Result<Self, MediaQueryError> {
        let (name, value) = body
            .split_once(':')
            .ok_or_else(|| MediaQueryError::MissingColon(body.trim().to_string()))?;
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        let invalid = || MediaQueryError::InvalidValue {
            feature: name.clone(),
            value: value.to_string(),
        };
        let px = || -> Result<u32, MediaQueryError> {
            value
                .strip_suffix("px")
                .unwrap_or(value)
                .trim()
                .parse()
                .map_err(|_| invalid())
        };

        match name.as_str() {
            "min-width" => px().map(Feature::MinWidth),
            "max-width" => px().map(Feature::MaxWidth),
            "min-height" => px().map(Feature::MinHeight),
            "max-height" => px().map(Feature::MaxHeight),
            "orientation" => match value.to_ascii_lowercase().as_str() {
                "portrait" => Ok(Feature::Orientation(Orientation::Portrait)),
                "landscape" => Ok(Feature::Orientation(Orientation::Landscape)),
                _ => Err(invalid()),
            },
            _ => Err(MediaQueryError::UnknownFeature(name.clone())),
        }
    }
}

/// A conjunction of features, e.g. `(min-width: 640px) and (orientation: landscape)`.
///
/// A leading `screen` or `all` media type is accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaQuery {
    features: SmallVec<[Feature; 2]>,
}

impl MediaQuery {
    pub fn parse(query: &str) -> Result<Self, MediaQueryError> {
        let query = query.trim();
        let mut features = SmallVec::new();
        let mut rest = strip_media_type(query);
        if rest.is_empty() {
            return Err(MediaQueryError::Empty);
        }

        loop {
            let offset = query.len() - rest.len();
            let Some(after_open) = rest.strip_prefix('(') else {
                return Err(MediaQueryError::ExpectedParen(offset));
            };
            let close = after_open
                .find(')')
                .ok_or(MediaQueryError::Unclosed(offset))?;
            features.push(Feature::parse(&after_open[..close])?);

            rest = after_open[close + 1..].trim_start();
            if rest.is_empty() {
                break;
            }
            rest = strip_keyword(rest, "and")
                .ok_or_else(|| {
                    let found = rest.split_whitespace().next().unwrap_or(rest);
                    MediaQueryError::ExpectedAnd(found.to_string())
                })?
                .trim_start();
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn matches(&self, viewport: Viewport) -> bool {
        self.features.iter().all(|f| f.matches(viewport))
    }
}

impl FromStr for MediaQuery {
    type Err = MediaQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            match feature {
                Feature::MinWidth(px) => write!(f, "(min-width: {px}px)")?,
                Feature::MaxWidth(px) => write!(f, "(max-width: {px}px)")?,
                Feature::MinHeight(px) => write!(f, "(min-height: {px}px)")?,
                Feature::MaxHeight(px) => write!(f, "(max-height: {px}px)")?,
                Feature::Orientation(Orientation::Portrait) => f.write_str("(orientation: portrait)")?,
                Feature::Orientation(Orientation::Landscape) => {
                    f.write_str("(orientation: landscape)")?
                }
            }
        }
        Ok(())
    }
}

/// Case-insensitive `keyword` followed by whitespace or `(`.
fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let head = s.get(..keyword.len())?;
    let tail = &s[keyword.len()..];
    let boundary = tail
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || c == '(');
    (head.eq_ignore_ascii_case(keyword) && boundary).then_some(tail)
}

fn strip_media_type(s: &str) -> &str {
    for media_type in ["screen", "all"] {
        if let Some(tail) = strip_keyword(s, media_type) {
            let tail = tail.trim_start();
            return strip_keyword(tail, "and").map_or(tail, str::trim_start);
        }
        if s.eq_ignore_ascii_case(media_type) {
            return "";
        }
    }
    s
}

/// Whether `query` matches the host viewport for this frame.
///
/// Re-evaluated every composition, so a resize shows up on the next frame.
/// An unparsable query logs a warning once and never matches; outside a host
/// frame nothing matches.
pub fn use_media_query(query: &str) -> bool {
    let parsed = remember_with_key(format!("media-query:{query}"), || {
        match MediaQuery::parse(query) {
            Ok(q) => Some(q),
            Err(e) => {
                log::warn!("use_media_query: `{query}` never matches: {e}");
                None
            }
        }
    });

    let Some(viewport) = current_viewport() else {
        return false;
    };
    match &*parsed {
        Some(q) => q.matches(viewport),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lull_core::Host;

    #[test]
    fn test_parse_single_and_conjunction() {
        let q = MediaQuery::parse("(min-width: 640px)").unwrap();
        assert_eq!(q.features(), &[Feature::MinWidth(640)]);

        let q: MediaQuery = "screen and (min-width:768px) AND (Orientation: Landscape)"
            .parse()
            .unwrap();
        assert_eq!(
            q.features(),
            &[
                Feature::MinWidth(768),
                Feature::Orientation(Orientation::Landscape)
            ]
        );
        assert_eq!(
            q.to_string(),
            "(min-width: 768px) and (orientation: landscape)"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MediaQuery::parse("  "), Err(MediaQueryError::Empty));
        assert_eq!(MediaQuery::parse("screen"), Err(MediaQueryError::Empty));
        assert_eq!(
            MediaQuery::parse("min-width: 3px"),
            Err(MediaQueryError::ExpectedParen(0))
        );
        assert_eq!(
            MediaQuery::parse("(min-width: 3px"),
            Err(MediaQueryError::Unclosed(0))
        );
        assert_eq!(
            MediaQuery::parse("(hover: hover)"),
            Err(MediaQueryError::UnknownFeature("hover".into()))
        );
        assert_eq!(
            MediaQuery::parse("(max-width: wide)"),
            Err(MediaQueryError::InvalidValue {
                feature: "max-width".into(),
                value: "wide".into()
            })
        );
        assert_eq!(
            MediaQuery::parse("(min-width: 1px) or (max-width: 2px)"),
            Err(MediaQueryError::ExpectedAnd("or".into()))
        );
        assert_eq!(
            MediaQuery::parse("(min-width)"),
            Err(MediaQueryError::MissingColon("min-width".into()))
        );
    }

    #[test]
    fn test_matches_bounds_inclusive() {
        let q = MediaQuery::parse("(min-width: 640px) and (max-width: 1023px)").unwrap();
        assert!(!q.matches(Viewport::new(639, 800)));
        assert!(q.matches(Viewport::new(640, 800)));
        assert!(q.matches(Viewport::new(1023, 800)));
        assert!(!q.matches(Viewport::new(1024, 800)));
    }

    #[test]
    fn test_orientation() {
        let portrait = MediaQuery::parse("(orientation: portrait)").unwrap();
        assert!(portrait.matches(Viewport::new(400, 800)));
        assert!(portrait.matches(Viewport::new(500, 500)));
        assert!(!portrait.matches(Viewport::new(800, 400)));
    }

    #[test]
    fn test_hook_follows_resize() {
        let mut host = Host::with_viewport(Viewport::new(1200, 800));
        let query = "(max-width: 767px)";

        assert!(!host.frame(|| use_media_query(query)));
        host.resize(500, 900);
        assert!(host.frame(|| use_media_query(query)));
    }

    #[test]
    fn test_hook_invalid_query_is_false() {
        let mut host = Host::new();
        assert!(!host.frame(|| use_media_query("(pointer: coarse)")));
        assert!(!host.frame(|| use_media_query("(pointer: coarse)")));
        assert_eq!(host.slot_count(), 1);
    }

    #[test]
    fn test_hook_outside_frame_is_false() {
        assert!(!use_media_query("(min-width: 0px)"));
    }
}
