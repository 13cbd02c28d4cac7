//! 检测器核心：整合规则仓库、探测器与结果汇聚
use std::sync::Arc;

use tokio::sync::mpsc;

use super::aggregator::{ResultAggregator, ScanSummary};
use super::prober::Prober;
use crate::config::GlobalConfig;
use crate::error::RsfResult;
use crate::report::Reporter;
use crate::rule::{CheckResult, RuleLoader, RuleRepository};
use crate::vuln::VulnScanner;

/// 指纹检测器
#[derive(Debug, Clone)]
pub struct FingerDetector {
    repo: Arc<RuleRepository>,
    prober: Arc<Prober>,
    config: GlobalConfig,
}

impl FingerDetector {
    /// 创建检测器：从配置的规则目录加载规则
    pub async fn new(config: GlobalConfig) -> RsfResult<Self> {
        let repo = RuleLoader::load(&config.rule_dir).await?;
        Self::with_repository(config, repo)
    }

    /// 使用已构建的规则仓库创建检测器
    pub fn with_repository(config: GlobalConfig, repo: RuleRepository) -> RsfResult<Self> {
        let prober = Prober::new(&config)?;
        Ok(Self {
            repo: Arc::new(repo),
            prober: Arc::new(prober),
            config,
        })
    }

    pub fn repository(&self) -> &RuleRepository {
        &self.repo
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// 检测单个目标
    pub async fn detect(&self, target: &str) -> CheckResult {
        self.prober.probe(target, &self.repo).await
    }

    /// 并发检测多个目标，返回结果接收端
    pub fn dispatch(&self, targets: Vec<String>) -> mpsc::Receiver<CheckResult> {
        ResultAggregator::dispatch_probes(
            targets,
            Arc::clone(&self.repo),
            Arc::clone(&self.prober),
            self.config.concurrency,
        )
    }

    /// 并发检测并消费全部结果
    pub async fn run(
        &self,
        targets: Vec<String>,
        reporter: &mut dyn Reporter,
        scanner: Option<&dyn VulnScanner>,
    ) -> ScanSummary {
        let rx = self.dispatch(targets);
        ResultAggregator::consume(rx, reporter, scanner).await
    }
}
