//! Element identifiers the host page must provide.

pub const SPINNER: &str = "spinner-container";

pub const NAME_FORM: &str = "name-form";
pub const CATEGORY: &str = "category";
pub const NAME: &str = "name";
pub const RESULT: &str = "result";
pub const SUMMARY: &str = "summary";
pub const FACTS: &str = "facts";
pub const INTEREST: &str = "interest";
pub const LETTER: &str = "letter";
pub const PROFILE_PIC: &str = "profile-pic";

pub const MARKETING_FORM: &str = "marketing-form";
pub const PRODUCT: &str = "product";
pub const TARGET: &str = "target";
pub const GOAL: &str = "goal";
pub const PLAN_CONTENT: &str = "plan-content";
pub const MARKETING_RESULT: &str = "marketing-result";
pub const REFINE_FORM: &str = "refine-form";
pub const FEEDBACK: &str = "feedback";

pub const INVENTORY_FORM: &str = "inventory-form";
pub const INV_PRODUCT: &str = "inv-product";
pub const INV_CITY: &str = "inv-city";
pub const CURRENT_STOCK: &str = "current-stock";
pub const WEATHER_IMPACT: &str = "weather-impact";
pub const SOCIAL_TRENDS: &str = "social-trends";
pub const SEASONAL_EVENTS: &str = "seasonal-events";
pub const INVENTORY_STRATEGY: &str = "inventory-strategy";
pub const LOGISTICS_PLAN: &str = "logistics-plan";
pub const INVENTORY_RESULT: &str = "inventory-result";

pub const CHATBOT_INPUT: &str = "chatbot-input";
pub const CHATBOT_MESSAGES: &str = "chatbot-messages";
pub const MESSAGE_INPUT: &str = "messageInput";
pub const CHAT_MESSAGES: &str = "chatMessages";
pub const CHAT_WINDOW: &str = "chatWindow";

pub const TAB_BUTTON_CLASS: &str = "tab-btn";
pub const ACTIVE_CLASS: &str = "active";
pub const MINIMIZED_CLASS: &str = "minimized";

pub const DEFAULT_AVATAR: &str = "/static/images/default-avatar.png";
