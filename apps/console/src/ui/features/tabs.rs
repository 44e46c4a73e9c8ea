use shared::domain::Tab;

use crate::ui::{
    ids,
    page::{tab_panel_id, Page},
};

/// Tab buttons found by class at bind time, keyed by their `data-tab` value.
#[derive(Debug, Clone, Default)]
pub struct Tabs {
    buttons: Vec<(String, Tab)>,
}

impl Tabs {
    pub fn bind(page: &Page) -> Self {
        let buttons = page
            .ids_with_class(ids::TAB_BUTTON_CLASS)
            .into_iter()
            .filter_map(|id| {
                let tab = page.attr(&id, "data-tab").and_then(Tab::parse)?;
                Some((id, tab))
            })
            .collect();
        Self { buttons }
    }

    /// Marks the clicked tab active and shows only its panel.
    pub fn activate(&self, page: &mut Page, tab: Tab) -> bool {
        if !self.buttons.iter().any(|(_, t)| *t == tab) {
            return false;
        }
        for (id, button_tab) in &self.buttons {
            let active = *button_tab == tab;
            page.set_class(id, ids::ACTIVE_CLASS, active);
            page.set_visible(&tab_panel_id(*button_tab), active);
        }
        true
    }
}
