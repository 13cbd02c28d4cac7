//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;
use std::time::Duration;

/// 默认浏览器 User-Agent（规则未指定时填充）
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 指纹规则目录
    pub rule_dir: PathBuf,
    // 单次请求超时
    pub http_timeout: Duration,
    // 同时运行的目标任务数上限
    pub concurrency: usize,
    // 单目标请求失败阈值，超过后停止探测
    pub max_failures: usize,
    // 默认 User-Agent
    pub user_agent: String,
    // 是否忽略证书错误
    pub accept_invalid_certs: bool,
    // 是否将识别到的指纹联动漏洞扫描
    pub auto_scan: bool,
    // 漏洞扫描器可执行文件
    pub scanner_binary: PathBuf,
    // 漏洞扫描等级过滤
    pub scanner_severity: String,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rule_dir: PathBuf::from("web_fingerprint"),
            http_timeout: Duration::from_secs(10),
            concurrency: 10,
            max_failures: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
            auto_scan: false,
            scanner_binary: PathBuf::from("afrog"),
            scanner_severity: "medium,high,critical,unknown".to_string(),
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn rule_dir(mut self, dir: PathBuf) -> Self {
        self.config.rule_dir = dir;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// 并发上限，0 会被修正为 1
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    pub fn max_failures(mut self, max_failures: usize) -> Self {
        self.config.max_failures = max_failures;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn auto_scan(mut self, auto_scan: bool) -> Self {
        self.config.auto_scan = auto_scan;
        self
    }

    pub fn scanner_binary(mut self, binary: PathBuf) -> Self {
        self.config.scanner_binary = binary;
        self
    }

    pub fn scanner_severity(mut self, severity: String) -> Self {
        self.config.scanner_severity = severity;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}
