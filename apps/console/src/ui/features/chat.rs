use shared::domain::ChatSender;
use view::render;

use crate::ui::{ids, page::Page};

pub const SEND_FAILED: &str = "消息发送失败";

/// A chat input paired with the container its messages are appended to.
#[derive(Debug, Clone)]
pub struct ChatView {
    input: &'static str,
    messages: &'static str,
}

impl ChatView {
    pub fn bind(page: &Page, input: &'static str, messages: &'static str) -> Option<Self> {
        (page.contains(input) && page.contains(messages)).then_some(Self { input, messages })
    }

    /// Takes the trimmed input text and clears the field; blank input yields nothing.
    pub fn take_message(&self, page: &mut Page) -> Option<String> {
        let message = page.value(self.input).trim().to_string();
        if message.is_empty() {
            return None;
        }
        page.set_value(self.input, "");
        Some(message)
    }

    pub fn append(&self, page: &mut Page, sender: ChatSender, content: &str) {
        page.append(self.messages, render::chat_message(sender, content));
        page.scroll_to_bottom(self.messages);
    }
}

/// The floating chat window's minimize toggle.
#[derive(Debug, Clone)]
pub struct ChatWindow;

impl ChatWindow {
    pub fn bind(page: &Page) -> Option<Self> {
        page.contains(ids::CHAT_WINDOW).then_some(Self)
    }

    pub fn toggle(&self, page: &mut Page) {
        page.toggle_class(ids::CHAT_WINDOW, ids::MINIMIZED_CLASS);
    }
}
