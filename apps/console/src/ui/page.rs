//! In-memory model of the host page: identified elements, the shared loading
//! indicator and the transient error banner. Only the controller loop mutates it.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::{Duration, Instant},
};

use shared::domain::Tab;
use view::{html, render, Fragment, Node};

use super::ids;

pub const DEFAULT_LOADING_MESSAGE: &str = "处理中...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Form,
    Input,
    Region,
    Button,
    Image,
}

#[derive(Debug, Clone)]
pub struct PageElement {
    pub kind: ElementKind,
    pub value: String,
    pub content: Fragment,
    pub visible: bool,
    pub disabled: bool,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub scroll_top: usize,
}

impl PageElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            value: String::new(),
            content: Vec::new(),
            visible: true,
            disabled: false,
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            scroll_top: 0,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Content height in child nodes.
    pub fn scroll_height(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub shown_at: Instant,
}

pub struct Page {
    elements: BTreeMap<String, PageElement>,
    /// Outstanding loads as (owner, message), oldest first.
    pending_loads: Vec<(String, String)>,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl Page {
    pub fn empty(banner_ttl: Duration) -> Self {
        let mut page = Self {
            elements: BTreeMap::new(),
            pending_loads: Vec::new(),
            banner: None,
            banner_ttl,
        };
        page.insert(ids::SPINNER, PageElement::new(ElementKind::Region).hidden());
        page
    }

    /// The full demo page with every feature's elements present.
    pub fn standard(banner_ttl: Duration) -> Self {
        let mut page = Self::empty(banner_ttl);
        let form = || PageElement::new(ElementKind::Form);
        let input = || PageElement::new(ElementKind::Input);
        let region = || PageElement::new(ElementKind::Region);

        page.insert(ids::NAME_FORM, form());
        page.insert(ids::CATEGORY, input());
        page.insert(ids::NAME, input());
        page.insert(ids::RESULT, region().hidden());
        for id in [ids::SUMMARY, ids::FACTS, ids::INTEREST, ids::LETTER] {
            page.insert(id, region());
        }
        page.insert(ids::PROFILE_PIC, PageElement::new(ElementKind::Image));

        page.insert(ids::MARKETING_FORM, form());
        for id in [ids::PRODUCT, ids::TARGET, ids::GOAL, ids::FEEDBACK] {
            page.insert(id, input());
        }
        page.insert(ids::PLAN_CONTENT, region());
        page.insert(ids::MARKETING_RESULT, region().hidden());
        page.insert(ids::REFINE_FORM, form());

        page.insert(ids::INVENTORY_FORM, form());
        for id in [ids::INV_PRODUCT, ids::INV_CITY, ids::CURRENT_STOCK] {
            page.insert(id, input());
        }
        for id in [
            ids::WEATHER_IMPACT,
            ids::SOCIAL_TRENDS,
            ids::SEASONAL_EVENTS,
            ids::INVENTORY_STRATEGY,
            ids::LOGISTICS_PLAN,
        ] {
            page.insert(id, region());
        }
        page.insert(ids::INVENTORY_RESULT, region().hidden());

        page.insert(ids::CHATBOT_INPUT, input());
        page.insert(ids::CHATBOT_MESSAGES, region());
        page.insert(ids::CHAT_WINDOW, region());
        page.insert(ids::MESSAGE_INPUT, input());
        page.insert(ids::CHAT_MESSAGES, region());

        for (idx, tab) in Tab::ALL.into_iter().enumerate() {
            let mut button = PageElement::new(ElementKind::Button)
                .with_class(ids::TAB_BUTTON_CLASS)
                .with_attr("data-tab", tab.as_str());
            let mut panel = region();
            if idx == 0 {
                button = button.with_class(ids::ACTIVE_CLASS);
            } else {
                panel = panel.hidden();
            }
            page.insert(&tab_button_id(tab), button);
            page.insert(&tab_panel_id(tab), panel);
        }
        page
    }

    pub fn insert(&mut self, id: &str, element: PageElement) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PageElement> {
        self.elements.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut PageElement> {
        let found = self.elements.get_mut(id);
        if found.is_none() {
            tracing::debug!(element = id, "page element missing");
        }
        found
    }

    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, el)| el.classes.contains(class))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn value(&self, id: &str) -> &str {
        self.get(id).map(|el| el.value.as_str()).unwrap_or_default()
    }

    /// Only inputs carry a value; other elements are left alone.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            if el.kind == ElementKind::Input {
                el.value = value.into();
            } else {
                tracing::debug!(element = id, kind = ?el.kind, "value set on non-input ignored");
            }
        }
    }

    pub fn set_content(&mut self, id: &str, content: Fragment) {
        if let Some(el) = self.get_mut(id) {
            el.content = content;
            el.scroll_top = 0;
        }
    }

    pub fn set_text(&mut self, id: &str, text: &str) {
        self.set_content(id, vec![Node::text(text)]);
    }

    pub fn append(&mut self, id: &str, node: Node) {
        if let Some(el) = self.get_mut(id) {
            el.content.push(node);
        }
    }

    pub fn scroll_to_bottom(&mut self, id: &str) {
        if let Some(el) = self.get_mut(id) {
            el.scroll_top = el.scroll_height();
        }
    }

    pub fn is_scrolled_to_bottom(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|el| el.scroll_top == el.scroll_height())
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(el) = self.get_mut(id) {
            el.visible = visible;
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|el| el.visible)
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        if let Some(el) = self.get_mut(id) {
            el.disabled = disabled;
        }
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|el| el.disabled)
    }

    pub fn set_class(&mut self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.get_mut(id) {
            if on {
                el.classes.insert(class.to_string());
            } else {
                el.classes.remove(class);
            }
        }
    }

    pub fn toggle_class(&mut self, id: &str, class: &str) {
        let on = !self.has_class(id, class);
        self.set_class(id, class, on);
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.classes.contains(class))
    }

    pub fn attr(&self, id: &str, name: &str) -> Option<&str> {
        self.get(id)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, id: &str, name: &str, value: &str) {
        if let Some(el) = self.get_mut(id) {
            el.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn render_region(&self, id: &str) -> String {
        self.get(id)
            .map(|el| html::render(&el.content))
            .unwrap_or_default()
    }

    pub fn text_of(&self, id: &str) -> String {
        self.get(id)
            .map(|el| html::text_content(&el.content))
            .unwrap_or_default()
    }

    /// Shows the spinner with `message` on behalf of `owner`. The spinner stays up
    /// until every owner has called `hide_loading`, showing the newest pending message.
    pub fn show_loading(&mut self, owner: &str, message: &str) {
        let message = if message.trim().is_empty() {
            DEFAULT_LOADING_MESSAGE
        } else {
            message
        };
        self.pending_loads.retain(|(o, _)| o != owner);
        self.pending_loads
            .push((owner.to_string(), message.to_string()));
        self.set_text(ids::SPINNER, message);
        self.set_visible(ids::SPINNER, true);
    }

    pub fn hide_loading(&mut self, owner: &str) {
        self.pending_loads.retain(|(o, _)| o != owner);
        match self.pending_loads.last().map(|(_, message)| message.clone()) {
            Some(message) => self.set_text(ids::SPINNER, &message),
            None => self.set_visible(ids::SPINNER, false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_visible(ids::SPINNER)
    }

    pub fn loading_message(&self) -> Option<String> {
        self.is_loading().then(|| self.text_of(ids::SPINNER))
    }

    /// Replaces any visible banner with `message`.
    pub fn show_error(&mut self, message: &str, now: Instant) {
        self.banner = Some(Banner {
            message: message.to_string(),
            shown_at: now,
        });
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.message.as_str())
    }

    pub fn banner_html(&self) -> Option<String> {
        self.banner
            .as_ref()
            .map(|b| render::error_toast(&b.message).render())
    }

    /// Drops the banner once it has been visible for the configured duration.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .banner
            .as_ref()
            .is_some_and(|b| now.saturating_duration_since(b.shown_at) >= self.banner_ttl);
        if expired {
            self.banner = None;
        }
    }
}

pub fn tab_button_id(tab: Tab) -> String {
    format!("tab-btn-{}", tab.as_str())
}

pub fn tab_panel_id(tab: Tab) -> String {
    format!("{}-tab", tab.as_str())
}
