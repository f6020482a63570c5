//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::extraction::DEFAULT_PREGENERATE_INTERVAL_PERCENT;
use crate::domain::{DEFAULT_MAX_WORDS_PER_SECTION, DEFAULT_MIN_CHAPTER_CHARS};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Provider 链配置
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// 各 Provider 的连接配置
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// 章节切分配置
    #[serde(default)]
    pub sectioning: SectioningConfig,

    /// 摘要预生成配置
    #[serde(default)]
    pub pregenerate: PregenerateConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// ============================================================================
// Server / Database
// ============================================================================

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/chapterwise.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Provider 链配置（名称顺序即尝试顺序，占位内容隐式位于最后）
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_summary_providers")]
    pub summary_providers: Vec<String>,

    #[serde(default = "default_character_providers")]
    pub character_providers: Vec<String>,

    /// 是否接受空人物列表作为有效结果
    #[serde(default)]
    pub accept_empty_characters: bool,
}

fn default_summary_providers() -> Vec<String> {
    vec!["anthropic".to_string()]
}

fn default_character_providers() -> Vec<String> {
    vec![
        "huggingface".to_string(),
        "anthropic".to_string(),
        "openai".to_string(),
    ]
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            summary_providers: default_summary_providers(),
            character_providers: default_character_providers(),
            accept_empty_characters: false,
        }
    }
}

/// 各 Provider 的连接配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Hugging Face Inference API
#[derive(Debug, Clone, Deserialize)]
pub struct HuggingFaceConfig {
    #[serde(default = "default_huggingface_url")]
    pub base_url: String,

    /// 未配置时读取 `HUGGING_FACE_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ner_model")]
    pub ner_model: String,

    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    #[serde(default = "default_huggingface_timeout")]
    pub timeout_secs: u64,
}

fn default_huggingface_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_ner_model() -> String {
    "dslim/bert-base-NER".to_string()
}

fn default_summary_model() -> String {
    "sshleifer/distilbart-cnn-6-6".to_string()
}

fn default_huggingface_timeout() -> u64 {
    15
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_huggingface_url(),
            api_key: None,
            ner_model: default_ner_model(),
            summary_model: default_summary_model(),
            timeout_secs: default_huggingface_timeout(),
        }
    }
}

/// Anthropic Messages API
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,

    /// 未配置时读取 `ANTHROPIC_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_anthropic_model")]
    pub model: String,

    #[serde(default = "default_anthropic_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_anthropic_version")]
    pub api_version: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-opus-20240229".to_string()
}

fn default_anthropic_max_tokens() -> u32 {
    1000
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_url(),
            api_key: None,
            model: default_anthropic_model(),
            max_tokens: default_anthropic_max_tokens(),
            api_version: default_anthropic_version(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// OpenAI Chat Completions API
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    /// 未配置时读取 `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_max_tokens() -> u32 {
    500
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            api_key: None,
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

// ============================================================================
// Sectioning / Pregenerate / Log
// ============================================================================

/// 章节切分配置
#[derive(Debug, Clone, Deserialize)]
pub struct SectioningConfig {
    /// 单个 Section 的最大词数
    #[serde(default = "default_max_words_per_section")]
    pub max_words_per_section: usize,

    /// 少于该字符数的章节被忽略
    #[serde(default = "default_min_chapter_chars")]
    pub min_chapter_chars: usize,
}

fn default_max_words_per_section() -> usize {
    DEFAULT_MAX_WORDS_PER_SECTION
}

fn default_min_chapter_chars() -> usize {
    DEFAULT_MIN_CHAPTER_CHARS
}

impl Default for SectioningConfig {
    fn default() -> Self {
        Self {
            max_words_per_section: default_max_words_per_section(),
            min_chapter_chars: default_min_chapter_chars(),
        }
    }
}

/// 摘要预生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct PregenerateConfig {
    /// 预生成间隔（百分比，1..=100）
    #[serde(default = "default_interval_percent")]
    pub interval_percent: u8,

    /// 同时处理的书籍数
    #[serde(default = "default_pregenerate_concurrency")]
    pub max_concurrent: usize,

    /// 队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_interval_percent() -> u8 {
    DEFAULT_PREGENERATE_INTERVAL_PERCENT
}

fn default_pregenerate_concurrency() -> usize {
    1
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for PregenerateConfig {
    fn default() -> Self {
        Self {
            interval_percent: default_interval_percent(),
            max_concurrent: default_pregenerate_concurrency(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
