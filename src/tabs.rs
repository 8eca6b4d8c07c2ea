//! Tab activation
//!
//! Tab buttons and tab panels are rendered from the same list of tabs, so a
//! single index is enough to keep them aligned.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TabController {
    count: usize,
    active: Option<usize>,
}

impl TabController {
    /// A controller over `count` tabs with the first one active
    pub fn new(count: usize) -> Self {
        let mut tabs = Self { count, active: None };
        tabs.show_tab(0);
        tabs
    }

    /// Activate the tab at `index`. Out-of-range indices deactivate every tab.
    pub fn show_tab(&mut self, index: usize) {
        self.active = (index < self.count).then_some(index);
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }
}
