//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::application::extraction::DEFAULT_PREGENERATE_INTERVAL_PERCENT;
use crate::domain::{DEFAULT_MAX_WORDS_PER_SECTION, DEFAULT_MIN_CHAPTER_CHARS};
use crate::infrastructure::adapters::KNOWN_PROVIDERS;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 以逗号分隔的列表型环境变量
const LIST_KEYS: &[&str] = &[
    "extraction.summary_providers",
    "extraction.character_providers",
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `CHAPTERWISE_SERVER__PORT=8080`
/// - `CHAPTERWISE_DATABASE__PATH=/data/chapterwise.db`
/// - `CHAPTERWISE_EXTRACTION__CHARACTER_PROVIDERS=huggingface,openai`
/// - `CHAPTERWISE_PROVIDERS__ANTHROPIC__MODEL=claude-3-haiku-20240307`
///
/// API Key 未在配置中设置时，读取 `HUGGING_FACE_API_KEY`、
/// `ANTHROPIC_API_KEY`、`OPENAI_API_KEY`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级），Provider 列表的默认值由 serde 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("database.path", "data/chapterwise.db")?
        .set_default("database.max_connections", 5)?
        .set_default("extraction.accept_empty_characters", false)?
        .set_default(
            "sectioning.max_words_per_section",
            DEFAULT_MAX_WORDS_PER_SECTION as i64,
        )?
        .set_default(
            "sectioning.min_chapter_chars",
            DEFAULT_MIN_CHAPTER_CHARS as i64,
        )?
        .set_default(
            "pregenerate.interval_percent",
            i64::from(DEFAULT_PREGENERATE_INTERVAL_PERCENT),
        )?
        .set_default("pregenerate.max_concurrent", 1)?
        .set_default("pregenerate.queue_capacity", 64)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: CHAPTERWISE_PROVIDERS__OPENAI__MODEL=gpt-4o-mini
    let mut env = Environment::with_prefix("CHAPTERWISE")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .try_parsing(true);
    for key in LIST_KEYS {
        env = env.with_list_parse_key(key);
    }
    builder = builder.add_source(env);

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_api_key_fallbacks(&mut app_config, |name| std::env::var(name).ok());
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 未配置 API Key 时使用约定俗成的环境变量
fn apply_api_key_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let fallback = |current: &mut Option<String>, var: &str| {
        let missing = current.as_deref().map_or(true, |k| k.trim().is_empty());
        if missing {
            *current = lookup(var).filter(|k| !k.trim().is_empty());
        }
    };

    fallback(&mut config.providers.huggingface.api_key, "HUGGING_FACE_API_KEY");
    fallback(&mut config.providers.anthropic.api_key, "ANTHROPIC_API_KEY");
    fallback(&mut config.providers.openai.api_key, "OPENAI_API_KEY");
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

    if config.server.port == 0 {
        return invalid("Server port cannot be 0".to_string());
    }

    if config.database.path.trim().is_empty() {
        return invalid("Database path cannot be empty".to_string());
    }

    let chains = [
        ("summary_providers", &config.extraction.summary_providers),
        ("character_providers", &config.extraction.character_providers),
    ];
    for (chain, names) in chains {
        for name in names.iter() {
            if name.trim().is_empty() {
                return invalid(format!("Empty provider name in extraction.{}", chain));
            }
            if !KNOWN_PROVIDERS.contains(&name.as_str()) {
                return invalid(format!(
                    "Unknown provider '{}' in extraction.{} (known: {})",
                    name,
                    chain,
                    KNOWN_PROVIDERS.join(", ")
                ));
            }
        }
    }

    let timeouts = [
        ("huggingface", config.providers.huggingface.timeout_secs),
        ("anthropic", config.providers.anthropic.timeout_secs),
        ("openai", config.providers.openai.timeout_secs),
    ];
    for (provider, secs) in timeouts {
        if secs == 0 {
            return invalid(format!("Timeout of provider {} cannot be 0", provider));
        }
    }

    if config.sectioning.max_words_per_section == 0 {
        return invalid("Section size cannot be 0".to_string());
    }

    if !(1..=100).contains(&config.pregenerate.interval_percent) {
        return invalid(format!(
            "Pregeneration interval must be within 1..=100, got {}",
            config.pregenerate.interval_percent
        ));
    }

    if config.pregenerate.max_concurrent == 0 || config.pregenerate.queue_capacity == 0 {
        return invalid("Pregeneration concurrency and queue capacity must be positive".to_string());
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出 API Key
pub fn print_config(config: &AppConfig) {
    let key_state = |key: &Option<String>| if key.is_some() { "set" } else { "missing" };

    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Summary Providers: {:?}", config.extraction.summary_providers);
    tracing::info!("Character Providers: {:?}", config.extraction.character_providers);
    tracing::info!(
        "Accept Empty Characters: {}",
        config.extraction.accept_empty_characters
    );
    tracing::info!(
        "API Keys: huggingface={}, anthropic={}, openai={}",
        key_state(&config.providers.huggingface.api_key),
        key_state(&config.providers.anthropic.api_key),
        key_state(&config.providers.openai.api_key)
    );
    tracing::info!(
        "Section Max Words: {}",
        config.sectioning.max_words_per_section
    );
    tracing::info!(
        "Pregenerate: every {}%, concurrency {}",
        config.pregenerate.interval_percent,
        config.pregenerate.max_concurrent
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_default_config() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_provider_names() {
        let mut config = AppConfig::default();
        config.extraction.character_providers = vec!["gemini".to_string()];
        assert!(validate_config(&config).is_err());

        config.extraction.character_providers = vec![" ".to_string()];
        assert!(validate_config(&config).is_err());

        // 空链合法：只返回占位内容
        config.extraction.character_providers = vec![];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.providers.openai.timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.sectioning.max_words_per_section = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.pregenerate.queue_capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_interval_range() {
        let mut config = AppConfig::default();
        config.pregenerate.interval_percent = 0;
        assert!(validate_config(&config).is_err());

        config.pregenerate.interval_percent = 101;
        assert!(validate_config(&config).is_err());

        config.pregenerate.interval_percent = 100;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_api_key_fallbacks() {
        let mut config = AppConfig::default();
        config.providers.openai.api_key = Some("from-config".to_string());
        config.providers.anthropic.api_key = Some("  ".to_string());

        apply_api_key_fallbacks(&mut config, |name| match name {
            "OPENAI_API_KEY" => Some("from-env".to_string()),
            "ANTHROPIC_API_KEY" => Some("sk-ant".to_string()),
            _ => None,
        });

        assert_eq!(config.providers.openai.api_key.as_deref(), Some("from-config"));
        assert_eq!(config.providers.anthropic.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.providers.huggingface.api_key, None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[extraction]
summary_providers = ["openai", "anthropic"]
accept_empty_characters = true

[providers.openai]
model = "gpt-4o-mini"

[pregenerate]
interval_percent = 25
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.extraction.summary_providers, vec!["openai", "anthropic"]);
        assert_eq!(
            config.extraction.character_providers,
            vec!["huggingface", "anthropic", "openai"]
        );
        assert!(config.extraction.accept_empty_characters);
        assert_eq!(config.providers.openai.model, "gpt-4o-mini");
        assert_eq!(config.providers.anthropic.timeout_secs, 60);
        assert_eq!(config.pregenerate.interval_percent, 25);
    }

    #[test]
    fn test_load_rejects_unknown_provider_in_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[extraction]\ncharacter_providers = [\"cohere\"]").unwrap();

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
