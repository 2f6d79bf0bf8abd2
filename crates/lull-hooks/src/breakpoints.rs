use lull_core::Viewport;

use crate::media_query::use_media_query;

pub const XS: &str = "(max-width: 639px)";
pub const SM: &str = "(min-width: 640px)";
pub const MD: &str = "(min-width: 768px)";
pub const LG: &str = "(min-width: 1024px)";
pub const XL: &str = "(min-width: 1280px)";
pub const XXL: &str = "(min-width: 1536px)";

/// Which width breakpoints the viewport satisfies. All but `xs` are
/// cumulative: a 1300px viewport is `sm`, `md`, `lg` and `xl` at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoints {
    pub xs: bool,
    pub sm: bool,
    pub md: bool,
    pub lg: bool,
    pub xl: bool,
    #[cfg_attr(feature = "serde", serde(rename = "2xl"))]
    pub xxl: bool,
}

impl Breakpoints {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let w = viewport.width;
        Self {
            xs: w <= 639,
            sm: w >= 640,
            md: w >= 768,
            lg: w >= 1024,
            xl: w >= 1280,
            xxl: w >= 1536,
        }
    }

    /// Name of the widest breakpoint that applies.
    pub fn current(&self) -> &'static str {
        [
            (self.xxl, "2xl"),
            (self.xl, "xl"),
            (self.lg, "lg"),
            (self.md, "md"),
            (self.sm, "sm"),
        ]
        .into_iter()
        .find_map(|(on, name)| on.then_some(name))
        .unwrap_or("xs")
    }
}

pub fn use_breakpoints() -> Breakpoints {
    Breakpoints {
        xs: use_media_query(XS),
        sm: use_media_query(SM),
        md: use_media_query(MD),
        lg: use_media_query(LG),
        xl: use_media_query(XL),
        xxl: use_media_query(XXL),
    }
}
