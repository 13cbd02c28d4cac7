//! 响应匹配引擎
//! 纯函数：按顺序评估请求模板下的匹配条件，首个命中的条件胜出

use tracing::debug;

use crate::rule::{FingerTag, ResponseCriterion};

/// 响应匹配引擎
pub struct MatchEngine;

impl MatchEngine {
    /// 评估一次响应，返回首个命中条件的标签
    ///
    /// `favicon_hash` 为该目标 `/favicon.ico` 的 MD5（未获取或获取失败为 `None`）。
    pub fn evaluate<'a>(
        criteria: &'a [ResponseCriterion],
        status_code: u16,
        body: &str,
        favicon_hash: Option<&str>,
    ) -> Option<&'a FingerTag> {
        criteria
            .iter()
            .find(|criterion| Self::criterion_matches(criterion, status_code, body, favicon_hash))
            .map(|criterion| {
                debug!("指纹匹配成功：{}，状态码={}", criterion.tag.name, status_code);
                &criterion.tag
            })
    }

    /// 单个条件：状态码满足，且关键词全部命中或 favicon 任一命中
    pub fn criterion_matches(
        criterion: &ResponseCriterion,
        status_code: u16,
        body: &str,
        favicon_hash: Option<&str>,
    ) -> bool {
        if criterion.expected_status != 0 && criterion.expected_status != status_code {
            return false;
        }
        Self::keywords_match(&criterion.keywords, body)
            || Self::favicon_matches(&criterion.favicon_hashes, favicon_hash)
    }

    /// 关键词为空时不匹配
    fn keywords_match(keywords: &[String], body: &str) -> bool {
        !keywords.is_empty() && keywords.iter().all(|keyword| body.contains(keyword.as_str()))
    }

    fn favicon_matches(expected: &[String], actual: Option<&str>) -> bool {
        match actual {
            Some(hash) => expected.iter().any(|h| h.eq_ignore_ascii_case(hash)),
            None => false,
        }
    }
}
