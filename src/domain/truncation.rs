//! Provider 输入截断
//!
//! 截断只取前缀且按字符边界切分，同一内容总是得到相同的输入

/// 取前 `max_chars` 个字符
#[inline]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// 输入指纹（md5 十六进制）
pub fn input_fingerprint(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}
