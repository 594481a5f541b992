//! Navigation bar state: scrolled styling, the mobile menu, and scroll requests.

use serde::{Deserialize, Serialize};

use crate::anchor::SectionAnchor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavState {
    threshold_px: f64,
    scrolled: bool,
    menu_open: bool,
}

impl NavState {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            scrolled: false,
            menu_open: false,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Returns the new scrolled flag when it flips.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<bool> {
        let scrolled = scroll_y > self.threshold_px;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }

    /// Flip the mobile menu; returns whether it is now open.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Selecting an item closes the menu and yields the scroll target.
    pub fn select(&mut self, anchor: SectionAnchor) -> SectionAnchor {
        self.menu_open = false;
        anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolled_flips_past_threshold_only() {
        let mut nav = NavState::new(50.0);
        assert_eq!(nav.on_scroll(10.0), None);
        assert_eq!(nav.on_scroll(50.0), None);
        assert_eq!(nav.on_scroll(51.0), Some(true));
        assert_eq!(nav.on_scroll(400.0), None);
        assert_eq!(nav.on_scroll(0.0), Some(false));
    }

    #[test]
    fn select_closes_menu() {
        let mut nav = NavState::new(50.0);
        assert!(nav.toggle_menu());
        assert_eq!(nav.select(SectionAnchor::Contact), SectionAnchor::Contact);
        assert!(!nav.is_menu_open());
    }
}
