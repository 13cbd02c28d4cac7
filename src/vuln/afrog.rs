//! afrog 扫描器调用
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use super::VulnScanner;
use crate::config::GlobalConfig;
use crate::error::{RsFingerError, RsfResult};

/// 通过子进程调用 afrog，按指纹标签搜索 PoC
#[derive(Debug, Clone)]
pub struct AfrogScanner {
    binary: PathBuf,
    severity: String,
}

impl AfrogScanner {
    pub fn new(binary: PathBuf, severity: String) -> Self {
        Self { binary, severity }
    }

    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::new(config.scanner_binary.clone(), config.scanner_severity.clone())
    }

    /// 命令行参数：-t 目标 -s 搜索关键词 -S 等级
    pub fn build_args(&self, target: &str, tags: &str) -> Vec<String> {
        vec![
            "-t".to_string(),
            target.to_string(),
            "-s".to_string(),
            tags.to_string(),
            "-S".to_string(),
            self.severity.clone(),
        ]
    }
}

#[async_trait]
impl VulnScanner for AfrogScanner {
    async fn scan(&self, target: &str, tags: &str) -> RsfResult<()> {
        info!("调用afrog：{}，标签={}", target, tags);
        let status = Command::new(&self.binary)
            .args(self.build_args(target, tags))
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                RsFingerError::ScannerError(format!("{} 启动失败：{}", self.binary.display(), e))
            })?;

        if !status.success() {
            return Err(RsFingerError::ScannerError(format!(
                "{} 退出码异常：{}",
                self.binary.display(),
                status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let scanner = AfrogScanner::new(PathBuf::from("afrog"), "high,critical".to_string());
        assert_eq!(
            scanner.build_args("http://a.test", "nginx,tomcat"),
            vec!["-t", "http://a.test", "-s", "nginx,tomcat", "-S", "high,critical"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_scanner_error() {
        let scanner = AfrogScanner::new(
            PathBuf::from("/nonexistent/rsfinger-afrog"),
            "high".to_string(),
        );
        let err = scanner.scan("http://a.test", "nginx").await.unwrap_err();
        assert!(matches!(err, RsFingerError::ScannerError(_)));
    }
}
