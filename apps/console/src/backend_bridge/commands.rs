//! Backend commands queued from the controller to the backend worker.

use shared::{
    domain::Feature,
    protocol::{ChatRequest, InventoryRequest, MarketingRequest, RefineRequest, SearchRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SearchExperts {
        request: SearchRequest,
    },
    GenerateMarketingPlan {
        request: MarketingRequest,
    },
    RefineMarketingPlan {
        request: RefineRequest,
    },
    AnalyzeInventory {
        request: InventoryRequest,
    },
    SendChat {
        feature: Feature,
        request: ChatRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchExperts { .. } => "search_experts",
            Self::GenerateMarketingPlan { .. } => "generate_marketing_plan",
            Self::RefineMarketingPlan { .. } => "refine_marketing_plan",
            Self::AnalyzeInventory { .. } => "analyze_inventory",
            Self::SendChat { .. } => "send_chat",
        }
    }

    pub fn feature(&self) -> Feature {
        match self {
            Self::SearchExperts { .. } => Feature::ExpertSearch,
            Self::GenerateMarketingPlan { .. } => Feature::Marketing,
            Self::RefineMarketingPlan { .. } => Feature::MarketingRefine,
            Self::AnalyzeInventory { .. } => Feature::Inventory,
            Self::SendChat { feature, .. } => *feature,
        }
    }
}
