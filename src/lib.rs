//! rsfinger - 基于 YAML 指纹规则的并发 Web 指纹识别工具

// 导出全局错误类型
pub use self::error::{RsFingerError, RsfResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig, DEFAULT_USER_AGENT};

// 导出规则模块核心接口
pub use self::rule::{
    CheckResult, FingerTag, FingerprintEntry, FingerprintRule, ProbeShape, ResponseCriterion,
    RuleLoader, RuleRepository,
};

// 导出检测模块核心接口
pub use self::detector::{
    FingerDetector, MatchEngine, ProbeReport, ProbeStats, Prober, ResultAggregator, ScanSummary,
};

// 导出结果输出与漏洞扫描联动接口
pub use self::report::{ConsoleReporter, JsonLinesReporter, MultiReporter, Reporter};
pub use self::vuln::{AfrogScanner, VulnScanner};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod detector;
pub mod report;
pub mod vuln;
