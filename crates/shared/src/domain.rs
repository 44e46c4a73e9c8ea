use serde::{Deserialize, Serialize};

/// Page features that own a request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ExpertSearch,
    Marketing,
    MarketingRefine,
    Inventory,
    Chatbot,
    ChatWindow,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpertSearch => "expert_search",
            Self::Marketing => "marketing",
            Self::MarketingRefine => "marketing_refine",
            Self::Inventory => "inventory",
            Self::Chatbot => "chatbot",
            Self::ChatWindow => "chat_window",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    User,
    Bot,
    Error,
}

impl ChatSender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Recruitment,
    Marketing,
    Inventory,
    Service,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Recruitment, Tab::Marketing, Tab::Inventory, Tab::Service];

    /// Value of the button's `data-tab` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruitment => "recruitment",
            Self::Marketing => "marketing",
            Self::Inventory => "inventory",
            Self::Service => "service",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == raw.trim())
    }
}
