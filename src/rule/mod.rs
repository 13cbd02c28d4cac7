//! 规则模块：负责规则的加载、去重合并、数据模型定义
pub mod model;
pub mod repository;
pub mod loader;

// 导出核心接口
pub use self::model::{
    CheckResult, FingerTag, FingerprintEntry, FingerprintRule, ProbeShape, ResponseCriterion,
};
pub use self::repository::RuleRepository;
pub use self::loader::RuleLoader;
