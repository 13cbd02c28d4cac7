//! 通用工具模块：哈希计算、目标处理
pub mod hash;
pub mod target;

// 导出核心接口
pub use self::hash::sum_md5;
pub use self::target::{display_target, normalize_target, parse_target_list, read_target_file};
