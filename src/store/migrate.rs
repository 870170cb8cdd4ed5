use crate::store::keys;
use crate::store::operations::attempts::Attempt;
use crate::store::operations::questions::Question;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_questions_by_topic_index", m002_questions_by_topic_index),
        ("003_attempt_sequence_keys", m003_attempt_sequence_keys),
    ]
}

/// 执行所有未应用的数据库迁移。
///
/// - 每个迁移函数必须幂等：进程可能在迁移完成但版本号未写入前崩溃，
///   重启后会重新执行该迁移。
/// - 版本号在每个迁移成功后立即持久化。
/// - 仅向前：set_version 拒绝降级。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.config_versions.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().map_err(|_| StoreError::Migration {
                version: 0,
                message: format!("corrupt version marker ({} bytes)", raw.len()),
            })?;
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// 依据题目主数据重建按主题+难度排序的索引
fn m002_questions_by_topic_index(store: &Store) -> Result<(), StoreError> {
    store.questions_by_topic.clear()?;
    let mut rebuilt = 0usize;
    for item in store.questions.iter() {
        let (_, value) = item?;
        let question: Question = Store::deserialize(&value)?;
        let index_key =
            keys::topic_index_key(&question.topic_id, question.difficulty_rating, &question.id)?;
        store
            .questions_by_topic
            .insert(index_key.as_bytes(), question.id.as_bytes())?;
        rebuilt += 1;
    }
    tracing::info!(rebuilt, "Rebuilt questions_by_topic index");
    Ok(())
}

/// 答题记录改用「微秒时间 + 写入序号」键，并建立 attempt id 索引
fn m003_attempt_sequence_keys(store: &Store) -> Result<(), StoreError> {
    let mut attempts = Vec::new();
    for item in store.attempts.iter() {
        let (_, value) = item?;
        attempts.push(Store::deserialize::<Attempt>(&value)?);
    }
    // 按时间升序重写，使同一时刻的记录序号与原先后一致
    attempts.sort_by_key(|a| a.attempted_at);

    store.attempts.clear()?;
    store.attempt_ids.clear()?;
    for attempt in &attempts {
        store.insert_attempt(attempt)?;
    }
    tracing::info!(rekeyed = attempts.len(), "Rewrote attempt keys");
    Ok(())
}
