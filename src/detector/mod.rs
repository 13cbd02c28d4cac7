//! 检测模块：指纹探测核心逻辑
pub mod matcher;
pub mod prober;
pub mod aggregator;
pub mod detector;

// 导出核心接口
pub use self::matcher::MatchEngine;
pub use self::prober::{ProbeReport, ProbeStats, Prober};
pub use self::aggregator::{ResultAggregator, ScanSummary};
pub use self::detector::FingerDetector;
