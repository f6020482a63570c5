//! 大模型 Prompt 模板

/// 摘要 system 指令
pub const SUMMARY_SYSTEM: &str = "You are a helpful assistant that creates concise book summaries. \
Focus on key plot points, character developments, and major themes. \
Avoid any spoilers beyond the provided content.";

/// 人物 system 指令
pub const CHARACTERS_SYSTEM: &str = "You are a helpful assistant that identifies key characters in book content \
and provides brief descriptions. Return the data as JSON.";

/// 摘要 prompt
pub fn summary_prompt(content: &str) -> String {
    format!(
        "Please provide a summary of the following book content:\n\n{}",
        content
    )
}

/// 人物 prompt
///
/// 要求返回 `{"characters": [{"name", "description", "firstAppearance"}]}`
pub fn characters_prompt(content: &str) -> String {
    format!(
        "Identify the main characters in the following book content and provide a brief description of each character. \
Return your answer as a JSON object with a \"characters\" array of objects with \"name\", \"description\" \
and optional \"firstAppearance\" (word position) fields:\n\n{}",
        content
    )
}
