use shared::protocol::{plan_text, MarketingRequest, MarketingResult, RefineReply, RefineRequest};
use view::render;

use crate::ui::{ids, page::Page};

pub const NO_PLAN_YET: &str = "请先生成营销方案";

/// Marketing plan form, its refinement form and the conversation panel.
#[derive(Debug, Clone, Default)]
pub struct MarketingView {
    last_plan: Option<String>,
}

impl MarketingView {
    pub fn bind(page: &Page) -> Option<Self> {
        page.contains(ids::MARKETING_FORM).then(Self::default)
    }

    pub fn collect(&self, page: &Page) -> MarketingRequest {
        MarketingRequest {
            product: page.value(ids::PRODUCT).to_string(),
            target: page.value(ids::TARGET).to_string(),
            goal: page.value(ids::GOAL).to_string(),
        }
    }

    pub fn collect_refinement(&self, page: &Page) -> Result<RefineRequest, &'static str> {
        let plan = self.last_plan.clone().ok_or(NO_PLAN_YET)?;
        Ok(RefineRequest {
            plan,
            feedback: page.value(ids::FEEDBACK).trim().to_string(),
        })
    }

    /// Renders the conversation, if the result carries one.
    pub fn apply(&mut self, page: &mut Page, result: &MarketingResult) {
        let Some(conversation) = result.conversation.as_deref() else {
            tracing::debug!("marketing result without conversation; leaving plan untouched");
            return;
        };
        page.set_content(ids::PLAN_CONTENT, render::conversation(conversation));
        page.scroll_to_bottom(ids::PLAN_CONTENT);
        page.set_visible(ids::MARKETING_RESULT, true);
        let plan = plan_text(conversation);
        self.last_plan = (!plan.is_empty()).then_some(plan);
    }

    /// Renders a refinement, which may come back as a conversation or as bare plan text.
    pub fn apply_refinement(&mut self, page: &mut Page, reply: &RefineReply) {
        match reply {
            RefineReply::Conversation(result) => self.apply(page, result),
            RefineReply::Plan(text) => {
                page.set_content(ids::PLAN_CONTENT, render::refined_plan(text));
                page.scroll_to_bottom(ids::PLAN_CONTENT);
                page.set_visible(ids::MARKETING_RESULT, true);
                let plan = text.trim();
                if !plan.is_empty() {
                    self.last_plan = Some(plan.to_string());
                }
            }
        }
    }
}
