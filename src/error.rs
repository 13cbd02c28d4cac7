//! 全局错误类型定义

use std::io::Error as IoError;
use std::path::PathBuf;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RsFingerError {
    // 规则相关错误（致命，终止启动）
    #[error("规则目录读取失败：{}：{source}", dir.display())]
    RuleDirError {
        dir: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("规则解析失败：{}：{reason}", file.display())]
    RuleParseError { file: PathBuf, reason: String },

    // 目标相关错误（仅影响单个目标）
    #[error("目标URL无效：{0}")]
    TargetNormalizationError(String),

    // 探测相关错误（非致命）
    #[error("请求发送失败：{0}")]
    ProbeTransportError(String),
    #[error("请求构建失败：{0}")]
    ProbeConstructionError(String),
    #[error("响应体读取失败：{0}")]
    BodyReadError(String),

    // 网络相关错误
    #[error("HTTP客户端初始化失败：{0}")]
    HttpClientError(#[from] reqwest::Error),

    // 漏洞扫描联动错误
    #[error("漏洞扫描调用失败：{0}")]
    ScannerError(String),

    // 序列化错误
    #[error("JSON序列化失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

impl RsFingerError {
    /// 是否为致命错误（规则加载失败需终止进程）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RsFingerError::RuleDirError { .. } | RsFingerError::RuleParseError { .. }
        )
    }
}

// 全局Result类型
pub type RsfResult<T> = Result<T, RsFingerError>;
