use crate::store::StoreError;
use crate::validation::is_valid_id;

/// 大于所有合法标识符字符的哨兵，用作范围扫描的上界
const RANGE_END_SENTINEL: char = '~';

fn checked<'a>(entity: &str, id: &'a str) -> Result<&'a str, StoreError> {
    if is_valid_id(id) {
        Ok(id)
    } else {
        Err(StoreError::Validation(format!("invalid {entity} id: {id:?}")))
    }
}

/// 将 f64 编码为保序的 u64，使字节序与数值序一致
pub fn sortable_rating(rating: f64) -> u64 {
    // -0.0 与 0.0 视为同一值
    let rating = if rating == 0.0 { 0.0 } else { rating };
    let bits = rating.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

pub fn student_key(student_id: &str) -> Result<String, StoreError> {
    Ok(checked("student", student_id)?.to_string())
}

pub fn question_key(question_id: &str) -> Result<String, StoreError> {
    Ok(checked("question", question_id)?.to_string())
}

pub fn topic_index_key(
    topic_id: &str,
    difficulty_rating: f64,
    question_id: &str,
) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{:016x}:{}",
        checked("topic", topic_id)?,
        sortable_rating(difficulty_rating),
        checked("question", question_id)?
    ))
}

pub fn topic_index_prefix(topic_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", checked("topic", topic_id)?))
}

/// 难度落在 `[min, max]` 内的索引键范围（闭区间）
pub fn topic_index_range(
    topic_id: &str,
    min: f64,
    max: f64,
) -> Result<(String, String), StoreError> {
    let topic_id = checked("topic", topic_id)?;
    Ok((
        format!("{}:{:016x}:", topic_id, sortable_rating(min)),
        format!(
            "{}:{:016x}:{}",
            topic_id,
            sortable_rating(max),
            RANGE_END_SENTINEL
        ),
    ))
}

/// 学生答题记录键：时间（微秒）与写入序号均取反，前缀扫描即为新到旧
pub fn attempt_key(
    student_id: &str,
    timestamp_us: i64,
    sequence: u64,
) -> Result<String, StoreError> {
    let reverse_ts = u64::MAX - timestamp_us.max(0) as u64;
    Ok(format!(
        "{}:{:020}:{:020}",
        checked("student", student_id)?,
        reverse_ts,
        u64::MAX - sequence
    ))
}

pub fn attempt_id_key(attempt_id: &str) -> Result<String, StoreError> {
    Ok(checked("attempt", attempt_id)?.to_string())
}

pub fn attempt_prefix(student_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", checked("student", student_id)?))
}
