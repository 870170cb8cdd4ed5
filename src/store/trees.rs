pub const STUDENTS: &str = "students";
pub const QUESTIONS: &str = "questions";
pub const ATTEMPTS: &str = "attempts";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Secondary index trees
pub const QUESTIONS_BY_TOPIC: &str = "questions_by_topic";
pub const ATTEMPT_IDS: &str = "attempt_ids";
