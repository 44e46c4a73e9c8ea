use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RequestValidationError;

/// Free-form text the backend may send as a string, number, bool or list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextValue(pub String);

impl TextValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for TextValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(flatten_text(&value)))
    }
}

fn flatten_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_non_empty(items.iter()),
        Value::Object(map) => join_non_empty(map.values()),
    }
}

fn join_non_empty<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values
        .map(flatten_text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Form-encoded fields of the expert search form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchRequest {
    fields: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub interest: Vec<String>,
    #[serde(default)]
    pub letter: Vec<String>,
}

impl ExpertResult {
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    pub fn first_letter(&self) -> Option<&str> {
        self.letter.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingRequest {
    pub product: String,
    pub target: String,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub plan: String,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Vec<ConversationTurn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply of `/marketing/refine`: either a full conversation result or the
/// refined plan as bare text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefineReply {
    Conversation(MarketingResult),
    Plan(String),
}

/// Plan text used as the basis for a refinement request.
pub fn plan_text(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| turn.answer.trim())
        .filter(|answer| !answer.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRequest {
    pub product: String,
    pub city: String,
    pub current_stock: i64,
}

impl InventoryRequest {
    pub fn from_inputs(
        product: &str,
        city: &str,
        current_stock: &str,
    ) -> Result<Self, RequestValidationError> {
        let raw = current_stock.trim();
        if raw.is_empty() {
            return Err(RequestValidationError::Empty {
                field: "current_stock",
            });
        }
        let current_stock = raw
            .parse::<i64>()
            .map_err(|_| RequestValidationError::NotAnInteger {
                field: "current_stock",
                raw: raw.to_string(),
            })?;
        Ok(Self {
            product: product.trim().to_string(),
            city: city.trim().to_string(),
            current_stock,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherImpact {
    #[serde(default)]
    pub impact: TextValue,
    #[serde(default)]
    pub behavior_changes: TextValue,
    #[serde(default)]
    pub demand_forecast: TextValue,
    #[serde(default)]
    pub recommendations: TextValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialTrends {
    #[serde(default)]
    pub market_heat: TextValue,
    #[serde(default)]
    pub discussion_focus: TextValue,
    #[serde(default)]
    pub reputation_trend: TextValue,
    #[serde(default)]
    pub related_topics: TextValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalEvent {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub impact: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFactors {
    #[serde(default)]
    pub weather_impact: WeatherImpact,
    #[serde(default)]
    pub social_trends: SocialTrends,
    #[serde(default)]
    pub seasonal_events: Vec<SeasonalEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default, alias = "inventory_level")]
    pub suggested_level: TextValue,
    #[serde(default, alias = "reorder_point")]
    pub reorder_time: TextValue,
    #[serde(default)]
    pub safety_stock: TextValue,
    #[serde(default, alias = "logistics_plan")]
    pub recommendations: TextValue,
}

impl Strategy {
    pub fn is_empty(&self) -> bool {
        self.suggested_level.is_empty()
            && self.reorder_time.is_empty()
            && self.safety_stock.is_empty()
            && self.recommendations.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logistics {
    #[serde(default)]
    pub routes: TextValue,
    #[serde(default)]
    pub resources: TextValue,
    #[serde(default)]
    pub timeliness: TextValue,
    #[serde(default)]
    pub cost_optimization: TextValue,
}

impl Logistics {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
            && self.resources.is_empty()
            && self.timeliness.is_empty()
            && self.cost_optimization.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<InventoryFactors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistics: Option<Logistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successful inventory analysis, separated from the in-band error form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryReport {
    pub factors: InventoryFactors,
    pub strategy: Option<Strategy>,
    pub logistics: Option<Logistics>,
}

impl InventoryResult {
    /// Splits the payload into a report or the server's error message.
    pub fn into_outcome(self) -> Result<InventoryReport, String> {
        if let Some(error) = self.error.filter(|e| !e.trim().is_empty()) {
            return Err(error);
        }
        Ok(InventoryReport {
            factors: self.factors.unwrap_or_default(),
            strategy: self.strategy,
            logistics: self.logistics,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marketing_request_serializes_fields_in_order() {
        let req = MarketingRequest {
            product: "A".into(),
            target: "B".into(),
            goal: "C".into(),
        };
        assert_eq!(
            serde_json::to_string(&req).expect("json"),
            r#"{"product":"A","target":"B","goal":"C"}"#
        );
    }

    #[test]
    fn strategy_accepts_backend_key_names() {
        let strategy: Strategy = serde_json::from_value(serde_json::json!({
            "inventory_level": "1200件",
            "reorder_point": "每周一",
            "safety_stock": 300,
            "logistics_plan": "华东仓优先",
            "current_stock": 800
        }))
        .expect("strategy");
        assert_eq!(strategy.suggested_level.as_str(), "1200件");
        assert_eq!(strategy.reorder_time.as_str(), "每周一");
        assert_eq!(strategy.safety_stock.as_str(), "300");
        assert_eq!(strategy.recommendations.as_str(), "华东仓优先");
    }

    #[test]
    fn empty_backend_objects_decode_as_empty_sections() {
        let result: InventoryResult = serde_json::from_value(serde_json::json!({
            "factors": {"weather_impact": {}, "social_trends": {}, "seasonal_events": []},
            "strategy": {},
            "logistics": {},
            "status": "success"
        }))
        .expect("inventory");
        let report = result.into_outcome().expect("report");
        assert!(report.factors.seasonal_events.is_empty());
        assert!(report.strategy.expect("strategy").is_empty());
        assert!(report.logistics.expect("logistics").is_empty());
    }

    #[test]
    fn inventory_error_field_takes_precedence() {
        let result: InventoryResult = serde_json::from_value(serde_json::json!({
            "error": "分析库存时出现错误",
            "factors": {"weather_impact": {}, "social_trends": {}, "seasonal_events": []}
        }))
        .expect("inventory");
        assert_eq!(result.into_outcome().unwrap_err(), "分析库存时出现错误");
    }

    #[test]
    fn text_value_flattens_lists_and_nulls() {
        let value: TextValue =
            serde_json::from_value(serde_json::json!(["a", null, "b"])).expect("text");
        assert_eq!(value.as_str(), "a\nb");
        let value: TextValue = serde_json::from_value(serde_json::Value::Null).expect("text");
        assert!(value.is_empty());
    }

    #[test]
    fn stock_must_be_an_integer() {
        let err = InventoryRequest::from_inputs("伞", "上海", "12x").unwrap_err();
        assert_eq!(err.field(), "current_stock");
        let req = InventoryRequest::from_inputs(" 伞 ", "上海", " 40 ").expect("request");
        assert_eq!(req.product, "伞");
        assert_eq!(req.current_stock, 40);
    }

    #[test]
    fn plan_text_joins_non_empty_answers() {
        let turns = vec![
            ConversationTurn {
                round: 1,
                question: "q1".into(),
                answer: "a1".into(),
            },
            ConversationTurn {
                round: 2,
                question: "q2".into(),
                answer: "  ".into(),
            },
            ConversationTurn {
                round: 3,
                question: "q3".into(),
                answer: "a3".into(),
            },
        ];
        assert_eq!(plan_text(&turns), "a1\n\na3");
    }

    #[test]
    fn refine_reply_accepts_bare_plan_text() {
        let reply: RefineReply =
            serde_json::from_value(serde_json::json!("优化后的完整方案")).expect("reply");
        assert_eq!(reply, RefineReply::Plan("优化后的完整方案".into()));

        let reply: RefineReply = serde_json::from_value(serde_json::json!({
            "conversation": [{"round": 1, "question": "q", "answer": "a"}]
        }))
        .expect("reply");
        match reply {
            RefineReply::Conversation(result) => {
                assert_eq!(result.conversation.expect("conversation").len(), 1)
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn search_request_keeps_field_order() {
        let req = SearchRequest::new()
            .with_field("category", "美妆")
            .with_field("name", "");
        assert_eq!(req.get("category"), Some("美妆"));
        assert_eq!(req.fields()[1].0, "name");
    }
}
