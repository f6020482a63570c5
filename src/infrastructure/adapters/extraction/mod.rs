//! Extraction Adapters - 外部 AI 提取服务实现
//!
//! - huggingface: 命名实体识别 / 摘要模型
//! - anthropic: Messages API
//! - openai: Chat Completions API
//! - fake: 离线与测试用实现

mod anthropic;
mod fake;
mod huggingface;
mod openai;
pub mod parsing;
mod prompts;
mod registry;

pub use anthropic::{AnthropicProvider, AnthropicProviderConfig};
pub use fake::{FakeBehavior, FakeExtractionProvider};
pub use huggingface::{HuggingFaceProvider, HuggingFaceProviderConfig};
pub use openai::{OpenAiProvider, OpenAiProviderConfig};
pub use registry::{ProviderRegistry, KNOWN_PROVIDERS};
