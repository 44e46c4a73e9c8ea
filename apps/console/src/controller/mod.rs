//! Controller layer: UI actions, request lifecycle per feature, and rendering of
//! backend completions into the page.

pub mod events;
pub mod orchestration;

use std::{collections::BTreeSet, time::Instant};

use crossbeam_channel::Sender;
use shared::{
    domain::{ChatSender, Feature},
    protocol::ChatRequest,
};
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::ui::{
    features::{chat::SEND_FAILED, inventory::INVALID_STOCK, ChatView},
    ids, Page, Views,
};
use events::{ChatInput, FormId, UiAction, UiError, UiErrorCategory, UiEvent};
use orchestration::dispatch_backend_command;

fn loading_message(feature: Feature) -> Option<&'static str> {
    match feature {
        Feature::ExpertSearch => Some("正在匹配KOL..."),
        Feature::Marketing => Some("正在生成营销方案..."),
        Feature::MarketingRefine => Some("正在优化营销方案..."),
        Feature::Inventory => Some("正在分析库存策略..."),
        Feature::Chatbot | Feature::ChatWindow => None,
    }
}

/// The control disabled while the feature has a request outstanding.
fn submit_control(feature: Feature) -> &'static str {
    match feature {
        Feature::ExpertSearch => ids::NAME_FORM,
        Feature::Marketing => ids::MARKETING_FORM,
        Feature::MarketingRefine => ids::REFINE_FORM,
        Feature::Inventory => ids::INVENTORY_FORM,
        Feature::Chatbot => ids::CHATBOT_INPUT,
        Feature::ChatWindow => ids::MESSAGE_INPUT,
    }
}

/// Features sharing a result region; at most one of them is outstanding at a time.
fn exclusive_group(feature: Feature) -> &'static [Feature] {
    match feature {
        Feature::Marketing | Feature::MarketingRefine => {
            &[Feature::Marketing, Feature::MarketingRefine]
        }
        Feature::ExpertSearch => &[Feature::ExpertSearch],
        Feature::Inventory => &[Feature::Inventory],
        Feature::Chatbot => &[Feature::Chatbot],
        Feature::ChatWindow => &[Feature::ChatWindow],
    }
}

fn show_failure(page: &mut Page, err: &UiError, now: Instant) {
    error!(
        feature = err.context().as_str(),
        category = ?err.category(),
        "operation failed: {}",
        err.message()
    );
    page.show_error(err.message(), now);
}

pub struct Controller {
    cmd_tx: Sender<BackendCommand>,
    views: Views,
    in_flight: BTreeSet<Feature>,
}

impl Controller {
    /// Binds every feature present on `page`. Features whose elements are missing stay unbound.
    pub fn bind(page: &Page, cmd_tx: Sender<BackendCommand>) -> Self {
        let views = Views::bind(page);
        info!(
            expert = views.expert.is_some(),
            marketing = views.marketing.is_some(),
            inventory = views.inventory.is_some(),
            chatbot = views.chatbot.is_some(),
            chat_window = views.chat_window.is_some(),
            "page controller bound"
        );
        Self {
            cmd_tx,
            views,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn is_pending(&self, feature: Feature) -> bool {
        self.in_flight.contains(&feature)
    }

    pub fn handle_action(&mut self, page: &mut Page, action: UiAction, now: Instant) {
        match action {
            UiAction::Submit(form) => self.submit(page, form, now),
            UiAction::KeyPress { target, key } => {
                if key.sends_message() {
                    self.send_chat(page, target, now);
                }
            }
            UiAction::ClickTab(tab) => {
                if !self.views.tabs.activate(page, tab) {
                    debug!(tab = tab.as_str(), "no button for tab");
                }
            }
            UiAction::ToggleChatWindow => {
                if let Some(window) = &self.views.window_toggle {
                    window.toggle(page);
                }
            }
        }
    }

    fn busy(&self, feature: Feature) -> bool {
        let busy = exclusive_group(feature)
            .iter()
            .any(|member| self.is_pending(*member));
        if busy {
            debug!(
                feature = feature.as_str(),
                "request already outstanding; ignoring submit"
            );
        }
        busy
    }

    fn submit(&mut self, page: &mut Page, form: FormId, now: Instant) {
        let (feature, cmd) = match form {
            FormId::ExpertSearch => {
                let Some(view) = self.views.expert.as_ref() else {
                    return;
                };
                if self.busy(Feature::ExpertSearch) {
                    return;
                }
                view.begin(page);
                let request = view.collect(page);
                (Feature::ExpertSearch, BackendCommand::SearchExperts { request })
            }
            FormId::Marketing => {
                let Some(view) = self.views.marketing.as_ref() else {
                    return;
                };
                if self.busy(Feature::Marketing) {
                    return;
                }
                let request = view.collect(page);
                (
                    Feature::Marketing,
                    BackendCommand::GenerateMarketingPlan { request },
                )
            }
            FormId::MarketingRefine => {
                let Some(view) = self.views.marketing.as_ref() else {
                    return;
                };
                if self.busy(Feature::MarketingRefine) {
                    return;
                }
                let request = match view.collect_refinement(page) {
                    Ok(request) => request,
                    Err(message) => {
                        let err = UiError::new(
                            UiErrorCategory::Validation,
                            Feature::MarketingRefine,
                            message,
                        );
                        show_failure(page, &err, now);
                        return;
                    }
                };
                (
                    Feature::MarketingRefine,
                    BackendCommand::RefineMarketingPlan { request },
                )
            }
            FormId::Inventory => {
                let Some(view) = self.views.inventory.as_ref() else {
                    return;
                };
                if self.busy(Feature::Inventory) {
                    return;
                }
                let request = match view.collect(page) {
                    Ok(request) => request,
                    Err(validation) => {
                        let err =
                            UiError::from_validation(Feature::Inventory, &validation, INVALID_STOCK);
                        show_failure(page, &err, now);
                        return;
                    }
                };
                (Feature::Inventory, BackendCommand::AnalyzeInventory { request })
            }
        };
        self.start(page, feature, cmd, now);
    }

    fn chat_view(&self, target: ChatInput) -> Option<ChatView> {
        match target {
            ChatInput::Chatbot => self.views.chatbot.clone(),
            ChatInput::ChatWindow => self.views.chat_window.clone(),
        }
    }

    fn send_chat(&mut self, page: &mut Page, target: ChatInput, now: Instant) {
        let feature = target.feature();
        let Some(view) = self.chat_view(target) else {
            return;
        };
        if self.busy(feature) {
            return;
        }
        let Some(message) = view.take_message(page) else {
            return;
        };
        view.append(page, ChatSender::User, &message);
        let cmd = BackendCommand::SendChat {
            feature,
            request: ChatRequest { message },
        };
        self.start(page, feature, cmd, now);
    }

    fn start(&mut self, page: &mut Page, feature: Feature, cmd: BackendCommand, now: Instant) {
        if let Some(message) = loading_message(feature) {
            page.show_loading(feature.as_str(), message);
        }
        for member in exclusive_group(feature) {
            page.set_disabled(submit_control(*member), true);
        }
        self.in_flight.insert(feature);
        if !dispatch_backend_command(&self.cmd_tx, cmd, page, now) {
            self.finish(page, feature);
        }
    }

    fn finish(&mut self, page: &mut Page, feature: Feature) {
        self.in_flight.remove(&feature);
        for member in exclusive_group(feature) {
            page.set_disabled(submit_control(*member), false);
        }
        if loading_message(feature).is_some() {
            page.hide_loading(feature.as_str());
        }
    }

    /// Renders a backend completion, then ends the feature's request cycle.
    pub fn apply_event(&mut self, page: &mut Page, event: UiEvent, now: Instant) {
        let feature = event.feature();
        if !self.is_pending(feature) {
            warn!(
                feature = feature.as_str(),
                "completion for a request that is not outstanding; ignoring"
            );
            return;
        }

        match event {
            UiEvent::ExpertResult(result) => {
                if let Some(view) = self.views.expert.as_ref() {
                    if let Err(message) = view.apply(page, &result) {
                        let err = UiError::new(UiErrorCategory::Payload, feature, message);
                        show_failure(page, &err, now);
                    }
                }
            }
            UiEvent::MarketingPlan(result) => {
                if let Some(view) = self.views.marketing.as_mut() {
                    view.apply(page, &result);
                }
            }
            UiEvent::RefinedPlan(reply) => {
                if let Some(view) = self.views.marketing.as_mut() {
                    view.apply_refinement(page, &reply);
                }
            }
            UiEvent::InventoryAnalysis(result) => {
                if let Some(view) = self.views.inventory.as_ref() {
                    if let Err(message) = view.apply(page, result) {
                        let err = UiError::new(UiErrorCategory::Payload, feature, message);
                        show_failure(page, &err, now);
                    }
                }
            }
            UiEvent::ChatReply { reply, .. } => {
                if let Some(view) = self.chat_view_for(feature) {
                    let response = reply.response.filter(|r| !r.trim().is_empty());
                    match (response, reply.error) {
                        (Some(response), _) => view.append(page, ChatSender::Bot, &response),
                        (None, Some(message)) => {
                            view.append(page, ChatSender::Error, SEND_FAILED);
                            let err = UiError::new(UiErrorCategory::Payload, feature, message);
                            show_failure(page, &err, now);
                        }
                        (None, None) => debug!(feature = feature.as_str(), "empty chat reply"),
                    }
                }
            }
            UiEvent::RequestFailed { error, .. } => {
                if let Some(view) = self.chat_view_for(feature) {
                    view.append(page, ChatSender::Error, SEND_FAILED);
                }
                show_failure(page, &error, now);
            }
        }

        self.finish(page, feature);
    }

    fn chat_view_for(&self, feature: Feature) -> Option<ChatView> {
        match feature {
            Feature::Chatbot => self.chat_view(ChatInput::Chatbot),
            Feature::ChatWindow => self.chat_view(ChatInput::ChatWindow),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
