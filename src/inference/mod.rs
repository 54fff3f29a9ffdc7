pub mod capability;
pub mod openai;

pub use capability::{ModelChoice, ReplyCapability, ReplyError, select_reply_capability, OPENAI_CHATGPT};
pub use openai::OpenAiChat;
