//! Scroll targets for in-page navigation links.

/// Height of the fixed navbar that section targets must clear.
pub const DEFAULT_NAV_OFFSET: f64 = 56.0;
/// Duration hint for smooth scrolling.
pub const DEFAULT_SCROLL_DURATION_MS: u32 = 400;

/// Computes where the page should scroll for a nav link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavScroll {
    offset: f64,
    duration_ms: u32,
}

impl Default for NavScroll {
    fn default() -> Self {
        Self::new(DEFAULT_NAV_OFFSET, DEFAULT_SCROLL_DURATION_MS)
    }
}

impl NavScroll {
    /// Negative or non-finite offsets are treated as zero.
    pub fn new(offset: f64, duration_ms: u32) -> Self {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        Self { offset, duration_ms }
    }

    /// Duration hint in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Scroll position that puts a section at `section_top` (document
    /// coordinates) just below the navbar.
    pub fn target_for(&self, section_top: f64) -> f64 {
        (section_top - self.offset).max(0.0)
    }

    /// Scroll position for the `#top` link.
    pub fn to_top(&self) -> f64 {
        0.0
    }
}

/// Section id referenced by an in-page link such as `#about`.
///
/// Returns `None` for external links, a bare `#`, and `#top`, which is
/// handled separately.
pub fn section_id(href: &str) -> Option<&str> {
    href.strip_prefix('#')
        .filter(|id| !id.is_empty() && *id != "top")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_navbar_height() {
        let nav = NavScroll::default();
        assert_eq!(nav.target_for(600.0), 544.0);
        assert_eq!(nav.duration_ms(), 400);
    }

    #[test]
    fn never_scrolls_above_the_page() {
        let nav = NavScroll::default();
        assert_eq!(nav.target_for(20.0), 0.0);
        assert_eq!(nav.to_top(), 0.0);
    }

    #[test]
    fn sanitizes_offset() {
        assert_eq!(NavScroll::new(-10.0, 0).target_for(120.0), 120.0);
        assert_eq!(NavScroll::new(f64::NAN, 0).target_for(120.0), 120.0);
    }

    #[test]
    fn extracts_section_ids() {
        assert_eq!(section_id("#about"), Some("about"));
        assert_eq!(section_id("#top"), None);
        assert_eq!(section_id("#"), None);
        assert_eq!(section_id("/map/3"), None);
    }
}
