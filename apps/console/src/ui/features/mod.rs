//! Per-feature view-models. Each owns the identifiers of its own page region and
//! is bound once, when the page is ready.

pub mod chat;
pub mod expert;
pub mod inventory;
pub mod marketing;
pub mod tabs;

use crate::ui::{ids, page::Page};

pub use chat::{ChatView, ChatWindow};
pub use expert::ExpertView;
pub use inventory::InventoryView;
pub use marketing::MarketingView;
pub use tabs::Tabs;

#[derive(Debug, Clone)]
pub struct Views {
    pub expert: Option<ExpertView>,
    pub marketing: Option<MarketingView>,
    pub inventory: Option<InventoryView>,
    pub chatbot: Option<ChatView>,
    pub chat_window: Option<ChatView>,
    pub window_toggle: Option<ChatWindow>,
    pub tabs: Tabs,
}

impl Views {
    pub fn bind(page: &Page) -> Self {
        Self {
            expert: ExpertView::bind(page),
            marketing: MarketingView::bind(page),
            inventory: InventoryView::bind(page),
            chatbot: ChatView::bind(page, ids::CHATBOT_INPUT, ids::CHATBOT_MESSAGES),
            chat_window: ChatView::bind(page, ids::MESSAGE_INPUT, ids::CHAT_MESSAGES),
            window_toggle: ChatWindow::bind(page),
            tabs: Tabs::bind(page),
        }
    }
}
