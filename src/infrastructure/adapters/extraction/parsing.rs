//! Provider 输出规范化
//!
//! 把各家服务的原始输出转换为统一的人物列表 / 摘要文本

use serde_json::Value;

use crate::application::ports::ProviderError;
use crate::domain::artifact::CharacterEntry;
use crate::domain::book::Position;

/// NER 结果最多保留的人物数
pub const MAX_NER_CHARACTERS: usize = 5;

/// NER 人物的固定描述
pub const NER_CHARACTER_DESCRIPTION: &str = "Character mentioned in the book.";

/// 摘要模型输出的最大词数
pub const MAX_SUMMARY_WORDS: usize = 250;

const PERSON_GROUPS: &[&str] = &["PER", "B-PER", "I-PER"];

/// 规范化 NER 实体列表
///
/// 只保留人名实体，去掉子词前缀 `##`，按首次出现顺序去重，最多保留 5 个
pub fn normalize_ner_entities(body: &Value) -> Result<Vec<CharacterEntry>, ProviderError> {
    let entities = body
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse("NER output is not an array".to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for entity in entities {
        let group = entity
            .get("entity_group")
            .or_else(|| entity.get("entity"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !PERSON_GROUPS.contains(&group) {
            continue;
        }

        let Some(word) = entity.get("word").and_then(Value::as_str) else {
            continue;
        };
        let name = word.trim_start_matches("##").trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }

    Ok(names
        .into_iter()
        .take(MAX_NER_CHARACTERS)
        .map(|name| CharacterEntry::new(name, NER_CHARACTER_DESCRIPTION))
        .collect())
}

/// 规范化摘要模型输出 `[{"summary_text": "..."}]`
pub fn normalize_summary_output(body: &Value) -> Result<String, ProviderError> {
    let text = body
        .as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("summary_text"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProviderError::InvalidResponse("Missing summary_text in model output".to_string())
        })?;

    Ok(truncate_words(text.trim(), MAX_SUMMARY_WORDS))
}

/// 按词截断，超出时追加 "..."
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

/// 从模型回复中取出 JSON 文本
///
/// 支持 Markdown 代码块包裹，以及 JSON 前后夹带说明文字的情况
pub fn extract_json(response: &str) -> Option<&str> {
    let mut text = response.trim();

    if let Some(fenced) = text.find("```") {
        let after = &text[fenced + 3..];
        // 跳过语言标记（如 ```json）
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        text = match body.find("```") {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        };
    }

    let start = text.find(['[', '{'])?;
    let closing = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(closing)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// 解析大模型返回的人物 JSON
///
/// 接受顶层数组或 `{"characters": [...]}`，每项必须有非空 `name`
pub fn parse_character_json(response: &str) -> Result<Vec<CharacterEntry>, ProviderError> {
    let json = extract_json(response)
        .ok_or_else(|| ProviderError::InvalidResponse("No JSON found in response".to_string()))?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("characters")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("Expected a characters array".to_string())
            })?,
        _ => {
            return Err(ProviderError::InvalidResponse(
                "Expected JSON array or object".to_string(),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_character(item).map_err(|e| {
            ProviderError::InvalidResponse(format!("character {}: {}", idx, e))
        }))
        .collect()
}

fn parse_character(item: &Value) -> Result<CharacterEntry, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "not a JSON object".to_string())?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| "missing or empty 'name'".to_string())?;

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    let mut entry = CharacterEntry::new(name, description);
    if let Some(first) = obj.get("firstAppearance").and_then(Value::as_f64) {
        if first.is_finite() && first >= 0.0 {
            entry = entry.with_first_appearance(Position::new(first as u64));
        }
    }
    Ok(entry)
}
