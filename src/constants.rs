// UI Constants
pub const APP_TITLE: &str = "Intelligent Document Assistant";
pub const INPUT_PLACEHOLDER: &str = "Type your message here...";
pub const TYPING_INDICATOR: &str = "Typing...";

// API Constants
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_PATH: &str = "/chat/";
pub const SEND_ERROR_MESSAGE: &str = "Error processing your message. Please try again.";
pub const NEW_CONVERSATION_TEXT: &str = "new conversation";

// Environment overrides
pub const ENV_API_URL: &str = "DOCENT_API_URL";
pub const ENV_LOG_LEVEL: &str = "DOCENT_LOG_LEVEL";
