use shared::{
    error::RequestValidationError,
    protocol::{InventoryRequest, InventoryResult},
};
use view::render;

use crate::ui::{ids, page::Page};

pub const ANALYSIS_FAILED: &str = "分析失败";
pub const INVALID_STOCK: &str = "请输入有效的库存数量";

#[derive(Debug, Clone)]
pub struct InventoryView;

impl InventoryView {
    pub fn bind(page: &Page) -> Option<Self> {
        page.contains(ids::INVENTORY_FORM).then_some(Self)
    }

    pub fn collect(&self, page: &Page) -> Result<InventoryRequest, RequestValidationError> {
        InventoryRequest::from_inputs(
            page.value(ids::INV_PRODUCT),
            page.value(ids::INV_CITY),
            page.value(ids::CURRENT_STOCK),
        )
    }

    /// Fills the analysis regions, or returns the message to show instead.
    /// On error none of the analysis regions are touched.
    pub fn apply(&self, page: &mut Page, result: InventoryResult) -> Result<(), String> {
        if result.error.is_none()
            && result.factors.is_none()
            && result.strategy.is_none()
            && result.logistics.is_none()
        {
            return Err(ANALYSIS_FAILED.to_string());
        }
        let report = result.into_outcome()?;
        let factors = &report.factors;
        page.set_content(ids::WEATHER_IMPACT, render::weather_factors(&factors.weather_impact));
        page.set_content(ids::SOCIAL_TRENDS, render::social_factors(&factors.social_trends));
        page.set_content(ids::SEASONAL_EVENTS, render::events(&factors.seasonal_events));
        page.set_content(ids::INVENTORY_STRATEGY, render::strategy(report.strategy.as_ref()));
        page.set_content(ids::LOGISTICS_PLAN, render::logistics(report.logistics.as_ref()));
        page.set_visible(ids::INVENTORY_RESULT, true);
        Ok(())
    }
}
