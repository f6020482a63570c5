//! Summary Pregenerator - 按百分比位置批量生成摘要

use std::sync::Arc;

use super::{ExtractionService, PregenerateOutcome};
use crate::application::error::ApplicationError;
use crate::application::ports::BookRepositoryPort;
use crate::domain::artifact::ArtifactKind;
use crate::domain::book::{BookId, Position};

/// 默认预生成间隔（百分比）
pub const DEFAULT_PREGENERATE_INTERVAL_PERCENT: u8 = 10;

/// 单本书的预生成统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PregenerateReport {
    pub targets: Vec<Position>,
    pub stored: usize,
    pub already_cached: usize,
    pub no_content: usize,
    pub exhausted: usize,
}

/// 计算预生成目标位置: `total * p / 100`，p = interval, 2*interval, ..., 100
///
/// interval 为 0 时视为 100（只生成全书末尾）。相同位置只保留一次。
pub fn pregenerate_targets(total_words: Position, interval_percent: u8) -> Vec<Position> {
    let interval = match interval_percent {
        0 => 100,
        n => n.min(100),
    };

    let mut targets: Vec<Position> = (1..=100 / interval)
        .map(|step| Position::at_percent(total_words, step * interval))
        .collect();
    if targets.last() != Some(&total_words) {
        targets.push(total_words);
    }
    targets.dedup();
    targets
}

/// Summary Pregenerator
pub struct SummaryPregenerator {
    book_repo: Arc<dyn BookRepositoryPort>,
    service: Arc<ExtractionService>,
    interval_percent: u8,
}

impl SummaryPregenerator {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        service: Arc<ExtractionService>,
        interval_percent: u8,
    ) -> Self {
        Self {
            book_repo,
            service,
            interval_percent,
        }
    }

    /// 依次处理每个目标位置，单个位置失败不影响其余位置
    pub async fn run(&self, book_id: BookId) -> Result<PregenerateReport, ApplicationError> {
        let id = *book_id.as_uuid();
        if !self.book_repo.exists(id).await? {
            return Err(ApplicationError::not_found("Book", id));
        }

        let total_words = self.book_repo.total_words(id).await?;
        let mut report = PregenerateReport {
            targets: pregenerate_targets(total_words, self.interval_percent),
            ..Default::default()
        };

        tracing::info!(
            book_id = %book_id,
            total_words = %total_words,
            targets = report.targets.len(),
            "Pregenerating summaries"
        );

        for position in report.targets.clone() {
            let outcome = self
                .service
                .pregenerate_at(book_id, position, ArtifactKind::Summary)
                .await;

            tracing::debug!(book_id = %book_id, position = %position, outcome = ?outcome, "Pregenerate target done");

            match outcome {
                PregenerateOutcome::Stored => report.stored += 1,
                PregenerateOutcome::AlreadyCached => report.already_cached += 1,
                PregenerateOutcome::NoContent => report.no_content += 1,
                PregenerateOutcome::Exhausted => {
                    tracing::warn!(book_id = %book_id, position = %position, "No provider could summarize target");
                    report.exhausted += 1
                }
            }
        }

        tracing::info!(
            book_id = %book_id,
            stored = report.stored,
            already_cached = report.already_cached,
            no_content = report.no_content,
            exhausted = report.exhausted,
            "Summary pregeneration finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_every_ten_percent() {
        let targets = pregenerate_targets(Position::new(1200), 10);
        assert_eq!(targets.len(), 10);
        assert_eq!(targets[0], Position::new(120));
        assert_eq!(targets[4], Position::new(600));
        assert_eq!(targets[9], Position::new(1200));
    }

    #[test]
    fn test_targets_uneven_interval_ends_at_total() {
        let targets = pregenerate_targets(Position::new(1000), 30);
        assert_eq!(
            targets,
            vec![
                Position::new(300),
                Position::new(600),
                Position::new(900),
                Position::new(1000)
            ]
        );
    }

    #[test]
    fn test_targets_small_book_deduplicated() {
        let targets = pregenerate_targets(Position::new(5), 10);
        assert_eq!(
            targets,
            vec![
                Position::new(0),
                Position::new(1),
                Position::new(2),
                Position::new(3),
                Position::new(4),
                Position::new(5)
            ]
        );
    }
}
