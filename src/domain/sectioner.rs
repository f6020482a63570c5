//! 章节切分器
//!
//! 将导入的章节纯文本切分为带词偏移区间的 Section

use super::book::Position;

/// 默认每个 Section 的最大词数
pub const DEFAULT_MAX_WORDS_PER_SECTION: usize = 5000;

/// 默认章节最少字符数，低于此值的章节（目录页、版权页等）被跳过
pub const DEFAULT_MIN_CHAPTER_CHARS: usize = 50;

/// 段落分隔符
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// 切分配置
#[derive(Debug, Clone)]
pub struct SectionConfig {
    /// 单个 Section 的最大词数（单个超长段落独立成段，不拆分）
    pub max_words: usize,
    /// 章节最少字符数
    pub min_chapter_chars: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS_PER_SECTION,
            min_chapter_chars: DEFAULT_MIN_CHAPTER_CHARS,
        }
    }
}

/// 切分结果（尚未归属 Book）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDraft {
    pub title: String,
    pub content: String,
    pub start: Position,
    pub end: Position,
}

/// 统计词数（按空白切分）
#[inline]
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// 按空行切分段落，段落内空白折叠为单个空格
fn split_paragraphs(chapter: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in chapter.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(collapse_whitespace(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(collapse_whitespace(&current.join(" ")));
    }

    paragraphs
}

#[inline]
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 对章节文本进行切分
///
/// 切分策略：
/// 1. 跳过过短的章节
/// 2. 每个章节按空行切分段落
/// 3. 段落依次装入当前 Section，超出 max_words 时开启新 Section（Section 不跨章节）
/// 4. 位置从 0 开始连续分配，`start(n+1) == end(n)`
pub fn section_chapters(chapters: &[String], config: &SectionConfig) -> Vec<SectionDraft> {
    let max_words = config.max_words.max(1) as u64;
    let mut drafts: Vec<SectionDraft> = Vec::new();
    let mut position = Position::ZERO;

    let mut flush = |paragraphs: &mut Vec<String>, words: &mut u64, drafts: &mut Vec<SectionDraft>| {
        if paragraphs.is_empty() {
            return;
        }
        let start = position;
        position = position.advance(*words);
        drafts.push(SectionDraft {
            title: format!("Section {}", drafts.len() + 1),
            content: paragraphs.join(PARAGRAPH_SEPARATOR),
            start,
            end: position,
        });
        paragraphs.clear();
        *words = 0;
    };

    for chapter in chapters {
        if chapter.trim().chars().count() < config.min_chapter_chars {
            tracing::debug!(chars = chapter.trim().chars().count(), "Skipping short chapter");
            continue;
        }

        let mut current: Vec<String> = Vec::new();
        let mut current_words = 0u64;

        for paragraph in split_paragraphs(chapter) {
            let paragraph_words = count_words(&paragraph);
            if current_words > 0 && current_words + paragraph_words > max_words {
                flush(&mut current, &mut current_words, &mut drafts);
            }
            current.push(paragraph);
            current_words += paragraph_words;
        }

        flush(&mut current, &mut current_words, &mut drafts);
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, word: &str) -> String {
        vec![word; n].join(" ")
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  one two\nthree\tfour  "), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_split_paragraphs_collapses_whitespace() {
        let paragraphs = split_paragraphs("First   line\ncontinues here.\n\n\n  Second paragraph. \n");
        assert_eq!(
            paragraphs,
            vec!["First line continues here.", "Second paragraph."]
        );
    }

    #[test]
    fn test_short_chapters_skipped() {
        let chapters = vec![
            "Contents".to_string(),
            words(60, "alpha"),
        ];
        let drafts = section_chapters(&chapters, &SectionConfig::default());

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].start, Position::ZERO);
        assert_eq!(drafts[0].end, Position::new(60));
    }

    #[test]
    fn test_sections_are_gapless() {
        let config = SectionConfig {
            max_words: 100,
            min_chapter_chars: 1,
        };
        let chapter = format!("{}\n\n{}\n\n{}", words(60, "a"), words(50, "b"), words(30, "c"));
        let drafts = section_chapters(&[chapter, words(20, "d")], &config);

        // 60 | 50+30 | 20（新章节）
        assert_eq!(drafts.len(), 3);
        assert_eq!((drafts[0].start.value(), drafts[0].end.value()), (0, 60));
        assert_eq!((drafts[1].start.value(), drafts[1].end.value()), (60, 140));
        assert_eq!((drafts[2].start.value(), drafts[2].end.value()), (140, 160));
        assert_eq!(drafts[1].content, format!("{}\n\n{}", words(50, "b"), words(30, "c")));
        assert_eq!(drafts[2].title, "Section 3");
    }

    #[test]
    fn test_oversized_paragraph_forms_own_section() {
        let config = SectionConfig {
            max_words: 10,
            min_chapter_chars: 1,
        };
        let chapter = format!("{}\n\n{}", words(3, "x"), words(25, "y"));
        let drafts = section_chapters(&[chapter], &config);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].end.value() - drafts[1].start.value(), 25);
    }

    #[test]
    fn test_word_intervals_match_content() {
        let config = SectionConfig {
            max_words: 7,
            min_chapter_chars: 1,
        };
        let chapter = "The quick brown fox.\n\nJumps over the lazy dog.\n\nThe end.".to_string();
        let drafts = section_chapters(&[chapter], &config);

        for draft in &drafts {
            assert_eq!(
                count_words(&draft.content),
                draft.end.value() - draft.start.value()
            );
        }
    }
}
