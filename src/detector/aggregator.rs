//! 结果汇聚：按目标并发调度探测任务，统一收集检测结果
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::prober::Prober;
use crate::report::Reporter;
use crate::rule::{CheckResult, RuleRepository};
use crate::vuln::VulnScanner;

/// 一次扫描的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// 收到的结果数
    pub total: usize,
    /// 目标可处理的结果数
    pub passed: usize,
    /// 至少命中一个指纹的结果数
    pub matched: usize,
    /// 已联动漏洞扫描的结果数
    pub escalated: usize,
}

/// 结果汇聚器
pub struct ResultAggregator;

impl ResultAggregator {
    /// 为每个目标启动一个任务，信号量限制同时运行的任务数
    ///
    /// 每个任务持有一个发送端，全部任务结束后通道自动关闭。
    /// 需在 tokio 运行时内调用。
    pub fn dispatch<F, Fut>(
        targets: Vec<String>,
        capacity: usize,
        probe: F,
    ) -> mpsc::Receiver<CheckResult>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        let capacity = capacity.max(1);
        let semaphore = Arc::new(Semaphore::new(capacity));
        let (tx, rx) = mpsc::channel(capacity);
        let probe = Arc::new(probe);

        info!("开始扫描：目标数={}，并发={}", targets.len(), capacity);
        for target in targets {
            let tx = tx.clone();
            let semaphore = Arc::clone(&semaphore);
            let probe = Arc::clone(&probe);

            tokio::spawn(async move {
                // 信号量不会被关闭，获取失败时直接放弃该任务
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = probe(target).await;
                if tx.send(result).await.is_err() {
                    warn!("结果接收端已关闭，丢弃结果");
                }
            });
        }

        rx
    }

    /// 使用探测器和规则仓库调度全部目标
    pub fn dispatch_probes(
        targets: Vec<String>,
        repo: Arc<RuleRepository>,
        prober: Arc<Prober>,
        capacity: usize,
    ) -> mpsc::Receiver<CheckResult> {
        Self::dispatch(targets, capacity, move |target| {
            let repo = Arc::clone(&repo);
            let prober = Arc::clone(&prober);
            async move { prober.probe(&target, &repo).await }
        })
    }

    /// 消费结果直到通道关闭：逐条输出，开启联动时把命中标签交给漏洞扫描器
    pub async fn consume(
        mut rx: mpsc::Receiver<CheckResult>,
        reporter: &mut dyn Reporter,
        scanner: Option<&dyn VulnScanner>,
    ) -> ScanSummary {
        let mut summary = ScanSummary::default();

        while let Some(result) = rx.recv().await {
            summary.total += 1;
            if result.is_passed {
                summary.passed += 1;
            }
            if !result.tags.is_empty() {
                summary.matched += 1;
            }

            if let Err(e) = reporter.report(&result) {
                warn!("结果输出失败：{}：{}", result.target, e);
            }

            let Some(scanner) = scanner else {
                continue;
            };
            if result.tags.is_empty() {
                continue;
            }

            let tags = result.joined_tag_names();
            debug!("联动漏洞扫描：{}，标签={}", result.target, tags);
            match scanner.scan(&result.target, &tags).await {
                Ok(()) => summary.escalated += 1,
                Err(e) => warn!("漏洞扫描失败：{}：{}", result.target, e),
            }
        }

        if let Err(e) = reporter.finish() {
            warn!("结果输出收尾失败：{}", e);
        }
        summary
    }
}
