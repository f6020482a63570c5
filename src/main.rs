//! Chapterwise - 无剧透的书籍摘要与人物列表服务
//!
//! - Domain: book/, artifact/
//! - Application: extraction, commands, queries, ports
//! - Infrastructure: http, persistence, adapters, memory, worker

use std::sync::Arc;
use std::time::Duration;

use chapterwise::application::{
    ExtractionCache, ExtractionService, PositionResolver, ProviderChainConfig, SummaryPregenerator,
};
use chapterwise::config::{load_config, print_config, AppConfig};
use chapterwise::domain::SectionConfig;
use chapterwise::infrastructure::adapters::{
    AnthropicProviderConfig, HuggingFaceProviderConfig, OpenAiProviderConfig, ProviderRegistry,
};
use chapterwise::infrastructure::http::{AppState, HttpServer, ServerConfig};
use chapterwise::infrastructure::memory::ChannelPregenerationQueue;
use chapterwise::infrastructure::persistence::{Database, DatabaseConfig};
use chapterwise::infrastructure::worker::{PregenerateWorker, PregenerateWorkerConfig};
use tokio::sync::mpsc;

/// 关闭时等待预生成 Worker 的最长时间
const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Chapterwise - spoiler-free summaries and character lists");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db = Database::open(&DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    })
    .await?;

    let book_repo = db.book_repository();
    let reading_repo = db.reading_state_repository();
    let artifact_store = db.artifact_store();

    // 创建 Provider 链
    let chain = provider_registry(&config).build_chain(
        &config.extraction.summary_providers,
        &config.extraction.character_providers,
        ProviderChainConfig {
            accept_empty_characters: config.extraction.accept_empty_characters,
        },
    )?;

    let extraction = Arc::new(ExtractionService::new(
        ExtractionCache::new(artifact_store),
        PositionResolver::new(book_repo.clone()),
        Arc::new(chain),
    ));

    // 创建预生成队列与 Worker
    let (job_tx, job_rx) = mpsc::channel(config.pregenerate.queue_capacity);
    let pregenerator = Arc::new(SummaryPregenerator::new(
        book_repo.clone(),
        extraction.clone(),
        config.pregenerate.interval_percent,
    ));
    let worker = PregenerateWorker::new(
        PregenerateWorkerConfig {
            max_concurrent: config.pregenerate.max_concurrent,
        },
        job_rx,
        pregenerator,
    );
    let worker_handle = tokio::spawn(worker.run());

    // 创建 HTTP 服务器
    let state = AppState::new(
        book_repo,
        reading_repo,
        extraction,
        ChannelPregenerationQueue::new(job_tx).arc(),
        SectionConfig {
            max_words: config.sectioning.max_words_per_section,
            min_chapter_chars: config.sectioning.min_chapter_chars,
        },
    );
    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    // 启动服务器（带优雅关闭）
    server.run_with_shutdown(shutdown_signal()).await?;

    // 服务器停止后队列发送端已释放，Worker 处理完剩余任务后退出
    match tokio::time::timeout(WORKER_SHUTDOWN_GRACE, worker_handle).await {
        Ok(Ok(())) => tracing::info!("Pregenerate worker drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Pregenerate worker panicked"),
        Err(_) => tracing::warn!("Pregenerate worker did not finish in time"),
    }

    db.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志（RUST_LOG 优先于配置中的级别）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},chapterwise={},tower_http=debug,sqlx=warn",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 由配置构建 Provider Registry
fn provider_registry(config: &AppConfig) -> ProviderRegistry {
    let providers = &config.providers;

    ProviderRegistry::new(
        HuggingFaceProviderConfig {
            base_url: providers.huggingface.base_url.clone(),
            api_key: providers.huggingface.api_key.clone(),
            ner_model: providers.huggingface.ner_model.clone(),
            summary_model: providers.huggingface.summary_model.clone(),
            timeout_secs: providers.huggingface.timeout_secs,
        },
        AnthropicProviderConfig {
            base_url: providers.anthropic.base_url.clone(),
            api_key: providers.anthropic.api_key.clone(),
            model: providers.anthropic.model.clone(),
            max_tokens: providers.anthropic.max_tokens,
            api_version: providers.anthropic.api_version.clone(),
            timeout_secs: providers.anthropic.timeout_secs,
        },
        OpenAiProviderConfig {
            base_url: providers.openai.base_url.clone(),
            api_key: providers.openai.api_key.clone(),
            model: providers.openai.model.clone(),
            max_tokens: providers.openai.max_tokens,
            timeout_secs: providers.openai.timeout_secs,
        },
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
