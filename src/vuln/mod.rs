//! 漏洞扫描联动：把识别到的指纹标签交给外部漏洞扫描器
pub mod afrog;

use async_trait::async_trait;

use crate::error::RsfResult;

pub use self::afrog::AfrogScanner;

/// 外部漏洞扫描器
#[async_trait]
pub trait VulnScanner: Send + Sync {
    /// `tags` 为逗号拼接的指纹名称
    async fn scan(&self, target: &str, tags: &str) -> RsfResult<()>;
}
