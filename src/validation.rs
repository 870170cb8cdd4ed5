/// 公共验证函数模块
/// 提供标识符与题目内容的输入验证，供存储键构造和题库接口共用。
use crate::constants::{MAX_ID_LEN, MAX_OPTIONS, MAX_STEM_CHARS, MIN_OPTIONS};

/// 验证标识符格式：1-64 字节，仅允许字母数字、连字符和下划线
///
/// 同时接受 UUID 与 24 位十六进制对象 ID。
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// 验证题干：去除首尾空白后非空，且不超过上限
pub fn validate_stem(stem: &str) -> Result<(), &'static str> {
    let trimmed = stem.trim();
    if trimmed.is_empty() {
        return Err("question stem must not be empty");
    }
    if trimmed.chars().count() > MAX_STEM_CHARS {
        return Err("question stem is too long");
    }
    Ok(())
}

/// 验证选项列表与正确答案下标
pub fn validate_options(options: &[String], correct_index: i32) -> Result<(), String> {
    if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
        return Err(format!(
            "a question needs between {MIN_OPTIONS} and {MAX_OPTIONS} options"
        ));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err("options must not be blank".to_string());
    }
    if correct_index < 0 || correct_index as usize >= options.len() {
        return Err("correct index is out of range".to_string());
    }
    Ok(())
}

/// 验证评分为有限实数
pub fn validate_rating(rating: f64) -> Result<(), &'static str> {
    if !rating.is_finite() {
        return Err("rating must be a finite number");
    }
    Ok(())
}
