//! UI actions, backend events and error modeling for the page controller.

use client_core::{ClientError, ClientErrorKind};
use shared::{
    domain::{Feature, Tab},
    error::RequestValidationError,
    protocol::{ChatReply, ExpertResult, InventoryResult, MarketingResult, RefineReply},
};

pub const TIMEOUT_MESSAGE: &str = "请求超时，请稍后重试";
pub const NETWORK_MESSAGE: &str = "网络连接失败，请检查网络设置";
pub const GENERIC_MESSAGE: &str = "操作失败，请稍后重试";
pub const UNAVAILABLE_MESSAGE: &str = "服务暂时不可用，请稍后再试";
pub const CANCELLED_MESSAGE: &str = "请求已取消";
pub const QUEUE_FULL_MESSAGE: &str = "请求过于频繁，请稍后重试";
pub const WORKER_GONE_MESSAGE: &str = "后台服务已断开，请重新加载页面";

/// User input the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Submit(FormId),
    KeyPress { target: ChatInput, key: KeyPress },
    ClickTab(Tab),
    ToggleChatWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormId {
    ExpertSearch,
    Marketing,
    MarketingRefine,
    Inventory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInput {
    Chatbot,
    ChatWindow,
}

impl ChatInput {
    pub fn feature(self) -> Feature {
        match self {
            Self::Chatbot => Feature::Chatbot,
            Self::ChatWindow => Feature::ChatWindow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: "Enter".to_string(),
            shift: false,
        }
    }

    /// Enter without Shift sends; Shift+Enter is left to the input.
    pub fn sends_message(&self) -> bool {
        self.key == "Enter" && !self.shift
    }
}

/// Completions reported by the backend worker.
#[derive(Debug, Clone)]
pub enum UiEvent {
    ExpertResult(ExpertResult),
    MarketingPlan(MarketingResult),
    RefinedPlan(RefineReply),
    InventoryAnalysis(InventoryResult),
    ChatReply {
        feature: Feature,
        reply: ChatReply,
    },
    RequestFailed {
        feature: Feature,
        error: UiError,
    },
}

impl UiEvent {
    pub fn feature(&self) -> Feature {
        match self {
            Self::ExpertResult(_) => Feature::ExpertSearch,
            Self::MarketingPlan(_) => Feature::Marketing,
            Self::RefinedPlan(_) => Feature::MarketingRefine,
            Self::ChatReply { feature, .. } | Self::RequestFailed { feature, .. } => *feature,
            Self::InventoryAnalysis(_) => Feature::Inventory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Timeout,
    Transport,
    Http,
    Payload,
    Cancelled,
    Validation,
    Queue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: Feature,
    message: String,
}

impl UiError {
    pub fn new(category: UiErrorCategory, context: Feature, message: impl Into<String>) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_error(context: Feature, err: &ClientError) -> Self {
        let (category, message) = match err.kind() {
            ClientErrorKind::Timeout => (UiErrorCategory::Timeout, TIMEOUT_MESSAGE.to_string()),
            ClientErrorKind::Network => (UiErrorCategory::Transport, NETWORK_MESSAGE.to_string()),
            ClientErrorKind::Status => (
                UiErrorCategory::Http,
                err.server_message().unwrap_or(GENERIC_MESSAGE).to_string(),
            ),
            ClientErrorKind::Decode | ClientErrorKind::Config => {
                (UiErrorCategory::Payload, UNAVAILABLE_MESSAGE.to_string())
            }
            ClientErrorKind::Cancelled => {
                (UiErrorCategory::Cancelled, CANCELLED_MESSAGE.to_string())
            }
        };
        Self::new(category, context, message)
    }

    pub fn from_validation(context: Feature, err: &RequestValidationError, message: &str) -> Self {
        tracing::debug!(feature = context.as_str(), "validation failed: {err}");
        Self::new(UiErrorCategory::Validation, context, message)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> Feature {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
