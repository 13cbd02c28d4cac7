//! 目标处理工具
//! 目标URL规范化、目标列表解析

use std::path::Path;

use url::Url;

use crate::error::{RsFingerError, RsfResult};

/// 规范化目标：缺少协议时补全 `http://`，仅允许 http/https
pub fn normalize_target(target: &str) -> RsfResult<Url> {
    let target = target.trim();
    if target.is_empty() {
        return Err(RsFingerError::TargetNormalizationError("目标为空".to_string()));
    }

    let candidate = if has_scheme(target) {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let url = Url::parse(&candidate).map_err(|e| {
        RsFingerError::TargetNormalizationError(format!("{}：{}", target, e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RsFingerError::TargetNormalizationError(format!(
                "不支持的协议：{}",
                other
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(RsFingerError::TargetNormalizationError(format!(
            "缺少主机：{}",
            target
        )));
    }

    Ok(url)
}

/// 是否以 `scheme://` 开头（scheme 形如 `[A-Za-z][A-Za-z0-9+.-]*`）
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// 输出用的目标字符串（根路径不带结尾 `/`）
pub fn display_target(url: &Url) -> String {
    let s = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        s.trim_end_matches('/').to_string()
    } else {
        s.to_string()
    }
}

/// 解析换行分隔的目标列表，忽略空行
pub fn parse_target_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从文件读取目标列表
pub async fn read_target_file(path: &Path) -> RsfResult<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_target_list(&content))
}
