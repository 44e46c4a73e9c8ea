use shared::protocol::{ExpertResult, SearchRequest};
use view::render;

use crate::ui::{ids, page::Page};

pub const FETCH_FAILED: &str = "获取数据失败";

/// Expert/KOL search form and its result card.
#[derive(Debug, Clone)]
pub struct ExpertView {
    fields: Vec<&'static str>,
}

impl ExpertView {
    pub fn bind(page: &Page) -> Option<Self> {
        if !page.contains(ids::NAME_FORM) {
            return None;
        }
        let fields = [ids::CATEGORY, ids::NAME]
            .into_iter()
            .filter(|id| page.contains(id))
            .collect();
        Some(Self { fields })
    }

    /// Serializes the form fields present on the page, in order and as typed.
    pub fn collect(&self, page: &Page) -> SearchRequest {
        let mut request = SearchRequest::new();
        for id in &self.fields {
            request.push(*id, page.value(id));
        }
        request
    }

    pub fn begin(&self, page: &mut Page) {
        page.set_visible(ids::RESULT, false);
    }

    pub fn apply(&self, page: &mut Page, result: &ExpertResult) -> Result<(), &'static str> {
        if !result.has_summary() {
            return Err(FETCH_FAILED);
        }
        page.set_attr(ids::PROFILE_PIC, "src", ids::DEFAULT_AVATAR);
        page.set_text(ids::SUMMARY, &result.summary);
        page.set_content(ids::FACTS, render::list(&result.facts));
        page.set_content(ids::INTEREST, render::list(&result.interest));
        page.set_text(ids::LETTER, result.first_letter().unwrap_or(render::NO_DATA));
        page.set_visible(ids::RESULT, true);
        Ok(())
    }
}
