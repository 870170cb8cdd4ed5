/// 学生初始评分（首次引用时自动创建）
pub const DEFAULT_RATING: f64 = 1000.0;

/// 学生评分 K 系数
pub const STUDENT_K_FACTOR: f64 = 32.0;

/// 题目难度评分 K 系数
pub const QUESTION_K_FACTOR: f64 = 32.0;

/// 选题窗口：学生评分上下浮动的难度范围
pub const RATING_WINDOW: f64 = 75.0;

/// Elo 期望分数公式中的尺度常数
pub const ELO_SCALE: f64 = 400.0;

/// 标识符最大长度（字节）
pub const MAX_ID_LEN: usize = 64;

/// 题干最大长度（字符）
pub const MAX_STEM_CHARS: usize = 2_000;

/// 单道题最少选项数
pub const MIN_OPTIONS: usize = 2;

/// 单道题最多选项数
pub const MAX_OPTIONS: usize = 10;

/// 答题记录列表默认返回条数
pub const DEFAULT_ATTEMPT_PAGE_SIZE: usize = 50;

/// 答题记录列表最大返回条数
pub const MAX_ATTEMPT_PAGE_SIZE: usize = 200;
