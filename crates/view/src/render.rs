//! Pure renderers turning result payloads into page fragments. Absent or empty
//! data renders a placeholder instead of failing.

use shared::{
    domain::ChatSender,
    protocol::{
        ConversationTurn, Logistics, SeasonalEvent, SocialTrends, Strategy, TextValue,
        WeatherImpact,
    },
};

use crate::html::{Element, Fragment, Node};

pub const NO_DATA: &str = "暂无相关数据";
pub const NO_STRATEGY: &str = "暂无策略建议";
pub const NO_LOGISTICS: &str = "暂无物流方案";
pub const NO_PLAN: &str = "暂无营销方案";
pub const MISSING_VALUE: &str = "暂无";

fn placeholder(message: &str) -> Fragment {
    vec![Element::new("p").class("placeholder").text(message).into()]
}

/// One `<li>` per item, in order.
pub fn list(items: &[String]) -> Fragment {
    if items.is_empty() {
        return placeholder(NO_DATA);
    }
    vec![Element::new("ul")
        .children(items.iter().map(|item| Element::new("li").text(item).into()))
        .into()]
}

fn labelled_item(label: &str, value: &TextValue) -> Node {
    let shown = if value.is_empty() {
        MISSING_VALUE
    } else {
        value.as_str()
    };
    Element::new("li")
        .child(Element::new("strong").text(format!("{label}:")))
        .text(format!(" {shown}"))
        .into()
}

fn factor_list(fields: &[(&str, &TextValue)]) -> Fragment {
    let items: Vec<Node> = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| labelled_item(label, value))
        .collect();
    if items.is_empty() {
        return placeholder(NO_DATA);
    }
    vec![Element::new("ul").class("factor-list").children(items).into()]
}

pub fn weather_factors(weather: &WeatherImpact) -> Fragment {
    factor_list(&[
        ("天气影响", &weather.impact),
        ("消费行为变化", &weather.behavior_changes),
        ("需求预测", &weather.demand_forecast),
        ("应对建议", &weather.recommendations),
    ])
}

pub fn social_factors(social: &SocialTrends) -> Fragment {
    factor_list(&[
        ("市场热度", &social.market_heat),
        ("讨论焦点", &social.discussion_focus),
        ("口碑趋势", &social.reputation_trend),
        ("相关话题", &social.related_topics),
    ])
}

pub fn events(events: &[SeasonalEvent]) -> Fragment {
    if events.is_empty() {
        return placeholder(NO_DATA);
    }
    events
        .iter()
        .map(|event| {
            let mut impact = Element::new("p");
            for (idx, line) in event.impact.iter().enumerate() {
                if idx > 0 {
                    impact = impact.child(Element::new("br"));
                }
                impact = impact.text(line);
            }
            Element::new("div")
                .class("event-item")
                .child(Element::new("h4").text(&event.event))
                .child(impact)
                .into()
        })
        .collect()
}

pub fn strategy(strategy: Option<&Strategy>) -> Fragment {
    let Some(strategy) = strategy.filter(|s| !s.is_empty()) else {
        return placeholder(NO_STRATEGY);
    };
    vec![Element::new("ul")
        .class("strategy-list")
        .child(labelled_item("建议库存水平", &strategy.suggested_level))
        .child(labelled_item("补货时间点", &strategy.reorder_time))
        .child(labelled_item("安全库存量", &strategy.safety_stock))
        .child(labelled_item("其他建议", &strategy.recommendations))
        .into()]
}

pub fn logistics(logistics: Option<&Logistics>) -> Fragment {
    let Some(logistics) = logistics.filter(|l| !l.is_empty()) else {
        return placeholder(NO_LOGISTICS);
    };
    vec![Element::new("ul")
        .class("logistics-list")
        .child(labelled_item("配送路线", &logistics.routes))
        .child(labelled_item("运力分配", &logistics.resources))
        .child(labelled_item("时效保障", &logistics.timeliness))
        .child(labelled_item("成本优化", &logistics.cost_optimization))
        .into()]
}

fn conversation_message(class: &str, icon: &str, header: String, body: &str) -> Node {
    Element::new("div")
        .class(class)
        .child(
            Element::new("div")
                .class("message-content")
                .child(
                    Element::new("div")
                        .class("message-header")
                        .child(Element::new("i").class(format!("fas {icon}")))
                        .text(format!(" {header}")),
                )
                .child(Element::new("div").class("message-text").text(body)),
        )
        .into()
}

/// Alternating question/answer nodes, two per round.
pub fn conversation(turns: &[ConversationTurn]) -> Fragment {
    if turns.is_empty() {
        return placeholder(NO_PLAN);
    }
    turns
        .iter()
        .flat_map(|turn| {
            [
                conversation_message(
                    "decision-maker-message",
                    "fa-user",
                    format!("回合 {} - 问题", turn.round),
                    &turn.question,
                ),
                conversation_message(
                    "expert-message",
                    "fa-user-tie",
                    format!("回合 {} - 专家回答", turn.round),
                    &turn.answer,
                ),
            ]
        })
        .collect()
}

/// A refined plan sent back as plain text, shown as one expert answer.
pub fn refined_plan(text: &str) -> Fragment {
    if text.trim().is_empty() {
        return placeholder(NO_PLAN);
    }
    vec![conversation_message(
        "expert-message",
        "fa-user-tie",
        "优化后的方案".to_string(),
        text,
    )]
}

pub fn chat_message(sender: ChatSender, content: &str) -> Node {
    Element::new("div")
        .class(format!("message {}-message", sender.as_str()))
        .child(
            Element::new("div")
                .class("message-content")
                .child(Element::new("div").class("message-text").text(content)),
        )
        .into()
}

pub fn error_toast(message: &str) -> Node {
    Element::new("div")
        .class("error-toast")
        .child(Element::new("i").class("fas fa-exclamation-circle"))
        .child(Element::new("span").text(message))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{render, text_content};

    #[test]
    fn list_keeps_one_item_per_fact_in_order() {
        let facts = vec!["一".to_string(), "二".to_string(), "三".to_string()];
        let fragment = list(&facts);
        let items = fragment[0].find_all("li");
        assert_eq!(items.len(), 3);
        let texts: Vec<String> = items
            .iter()
            .map(|li| Node::Element((*li).clone()).text_content())
            .collect();
        assert_eq!(texts, facts);
    }

    #[test]
    fn empty_events_render_placeholder() {
        let fragment = events(&[]);
        assert_eq!(render(&fragment), "<p class=\"placeholder\">暂无相关数据</p>");
    }

    #[test]
    fn events_join_impact_lines_with_breaks() {
        let fragment = events(&[SeasonalEvent {
            event: "双十一".into(),
            impact: vec!["销量上涨".into(), "物流紧张".into()],
        }]);
        assert_eq!(
            render(&fragment),
            "<div class=\"event-item\"><h4>双十一</h4><p>销量上涨<br>物流紧张</p></div>"
        );
    }

    #[test]
    fn empty_strategy_and_logistics_render_placeholders() {
        assert_eq!(text_content(&strategy(None)), NO_STRATEGY);
        assert_eq!(text_content(&strategy(Some(&Strategy::default()))), NO_STRATEGY);
        assert_eq!(text_content(&logistics(None)), NO_LOGISTICS);
    }

    #[test]
    fn strategy_marks_missing_fields() {
        let s = Strategy {
            suggested_level: "1200".into(),
            ..Strategy::default()
        };
        let text = text_content(&strategy(Some(&s)));
        assert!(text.contains("建议库存水平: 1200"));
        assert!(text.contains("安全库存量: 暂无"));
    }

    #[test]
    fn factors_skip_empty_fields() {
        let weather = WeatherImpact {
            impact: "降雨增多".into(),
            ..WeatherImpact::default()
        };
        let fragment = weather_factors(&weather);
        assert_eq!(fragment[0].find_all("li").len(), 1);
        assert_eq!(
            text_content(&social_factors(&SocialTrends::default())),
            NO_DATA
        );
    }

    #[test]
    fn conversation_renders_question_then_answer_per_round() {
        let fragment = conversation(&[ConversationTurn {
            round: 2,
            question: "预算?".into(),
            answer: "十万".into(),
        }]);
        assert_eq!(fragment.len(), 2);
        let question = fragment[0].as_element().expect("element");
        assert!(question.has_class("decision-maker-message"));
        assert!(fragment[0].text_content().contains("回合 2 - 问题"));
        assert!(fragment[1].text_content().contains("回合 2 - 专家回答"));
        assert!(fragment[1].text_content().ends_with("十万"));
    }

    #[test]
    fn refined_plan_is_a_single_expert_answer() {
        let fragment = refined_plan("新方案");
        assert_eq!(fragment.len(), 1);
        assert!(fragment[0]
            .as_element()
            .expect("element")
            .has_class("expert-message"));
        assert!(fragment[0].text_content().ends_with("新方案"));
        assert_eq!(text_content(&refined_plan("  ")), NO_PLAN);
    }

    #[test]
    fn chat_message_escapes_content() {
        let node = chat_message(ChatSender::User, "<b>hi</b>");
        assert_eq!(
            node.render(),
            "<div class=\"message user-message\"><div class=\"message-content\"><div class=\"message-text\">&lt;b&gt;hi&lt;/b&gt;</div></div></div>"
        );
    }
}
