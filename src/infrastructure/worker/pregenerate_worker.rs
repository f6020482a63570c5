//! Pregenerate Worker - Background Summary Pregeneration

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::extraction::SummaryPregenerator;
use crate::application::ports::PregenerationJob;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct PregenerateWorkerConfig {
    /// 最大并发任务数（按书）
    pub max_concurrent: usize,
}

impl Default for PregenerateWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 1 }
    }
}

/// 预生成 Worker
///
/// 后台任务处理器，从队列消费任务并生成百分比位置的摘要
pub struct PregenerateWorker {
    config: PregenerateWorkerConfig,
    queue_receiver: mpsc::Receiver<PregenerationJob>,
    pregenerator: Arc<SummaryPregenerator>,
}

impl PregenerateWorker {
    pub fn new(
        config: PregenerateWorkerConfig,
        queue_receiver: mpsc::Receiver<PregenerationJob>,
        pregenerator: Arc<SummaryPregenerator>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            pregenerator,
        }
    }

    /// 启动 Worker，队列关闭且进行中的任务完成后返回
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "PregenerateWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrent.max(1)));
        let mut running = tokio::task::JoinSet::new();

        while let Some(job) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to acquire semaphore permit");
                    continue;
                }
            };

            let pregenerator = self.pregenerator.clone();
            running.spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成
                Self::process_job(job, pregenerator).await;
            });

            // 回收已完成的任务
            while running.try_join_next().is_some() {}
        }

        while running.join_next().await.is_some() {}

        tracing::info!("PregenerateWorker stopped");
    }

    /// 处理单个任务
    async fn process_job(job: PregenerationJob, pregenerator: Arc<SummaryPregenerator>) {
        tracing::info!(book_id = %job.book_id, "Pregeneration job started");

        match pregenerator.run(job.book_id).await {
            Ok(report) => tracing::info!(
                book_id = %job.book_id,
                targets = report.targets.len(),
                stored = report.stored,
                "Pregeneration job completed"
            ),
            Err(e) => tracing::error!(book_id = %job.book_id, error = %e, "Pregeneration job failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::ImportBookHandler;
    use crate::application::commands::ImportBook;
    use crate::application::extraction::{
        ExtractionCache, ExtractionService, PositionResolver, ProviderChain, ProviderChainConfig,
    };
    use crate::application::ports::{ArtifactStorePort, ExtractionProviderPort};
    use crate::domain::artifact::ArtifactKind;
    use crate::domain::book::{BookId, Position};
    use crate::domain::SectionConfig;
    use crate::infrastructure::adapters::extraction::FakeExtractionProvider;
    use crate::infrastructure::persistence::sqlite::Database;

    #[tokio::test]
    async fn test_worker_stores_summaries_at_targets() {
        let db = Database::in_memory().await.unwrap();
        let books = db.book_repository();
        let store = db.artifact_store();

        // 10 个 Section，每个 100 词
        let imported = ImportBookHandler::new(
            books.clone(),
            SectionConfig {
                max_words: 100,
                min_chapter_chars: 1,
            },
        )
        .handle(ImportBook {
            title: "Northanger Abbey".to_string(),
            author: "Jane Austen".to_string(),
            is_public_domain: true,
            owner_id: None,
            chapters: (0..10).map(|i| vec![format!("w{}", i); 100].join(" ")).collect(),
        })
        .await
        .unwrap();

        let provider = Arc::new(FakeExtractionProvider::offline());
        let chain = ProviderChain::new(
            vec![provider.clone() as Arc<dyn ExtractionProviderPort>],
            vec![],
            ProviderChainConfig::default(),
        );
        let service = Arc::new(ExtractionService::new(
            ExtractionCache::new(store.clone()),
            PositionResolver::new(books.clone()),
            Arc::new(chain),
        ));
        let pregenerator = Arc::new(SummaryPregenerator::new(books, service, 10));

        let (tx, rx) = mpsc::channel(4);
        let worker = PregenerateWorker::new(PregenerateWorkerConfig::default(), rx, pregenerator);
        let book_id = BookId::from_uuid(imported.id);
        tx.send(PregenerationJob { book_id }).await.unwrap();
        // 重复任务：所有目标已存在，不再调用 Provider
        tx.send(PregenerationJob { book_id }).await.unwrap();
        drop(tx);

        worker.run().await;

        assert_eq!(provider.call_count(), 10);
        for p in (100..=1000).step_by(100) {
            let artifact = store
                .find_best_prior(&book_id, ArtifactKind::Summary, Position::new(p))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(artifact.position(), Position::new(p));
        }
    }
}
