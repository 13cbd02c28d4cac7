//! 探测器：对单个目标逐个发送去重后的探测请求，并交给匹配引擎判定
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Request};
use tracing::{debug, warn};
use url::Url;

use super::matcher::MatchEngine;
use crate::config::GlobalConfig;
use crate::error::{RsFingerError, RsfResult};
use crate::rule::{CheckResult, FingerTag, ProbeShape, RuleRepository};
use crate::utils::{display_target, normalize_target, sum_md5};

/// 单目标探测统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    /// 实际发出的请求数
    pub attempted: usize,
    /// 发送失败（超时/连接错误）次数
    pub failures: usize,
    /// 构建失败或读取响应体失败而跳过的模板数
    pub skipped: usize,
    /// 是否因失败次数超过阈值提前结束
    pub aborted: bool,
}

/// 探测结果 + 统计
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub result: CheckResult,
    pub stats: ProbeStats,
}

/// 探测器
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    user_agent: HeaderValue,
    max_failures: usize,
}

impl Prober {
    /// 创建探测器（内部 HTTP 客户端可在任务间共享）
    pub fn new(config: &GlobalConfig) -> RsfResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| RsFingerError::InvalidInput(format!("无效User-Agent：{}", e)))?;

        Ok(Self {
            client,
            user_agent,
            max_failures: config.max_failures,
        })
    }

    /// 探测单个目标
    pub async fn probe(&self, target: &str, repo: &RuleRepository) -> CheckResult {
        self.probe_with_stats(target, repo).await.result
    }

    /// 探测单个目标并返回统计信息
    pub async fn probe_with_stats(&self, target: &str, repo: &RuleRepository) -> ProbeReport {
        self.probe_shapes(target, repo.shapes()).await
    }

    /// 按给定顺序探测请求模板
    ///
    /// 一个响应都没有收到（全部发送失败）时结果标记为不可达。
    pub(crate) async fn probe_shapes<'a, I>(&self, target: &str, shapes: I) -> ProbeReport
    where
        I: IntoIterator<Item = &'a ProbeShape>,
    {
        let mut stats = ProbeStats::default();

        let base = match normalize_target(target) {
            Ok(url) => url,
            Err(e) => {
                warn!("跳过目标 {}：{}", target, e);
                return ProbeReport {
                    result: CheckResult::failed(target.trim().to_string()),
                    stats,
                };
            }
        };
        let target_url = display_target(&base);

        let mut tags: Vec<FingerTag> = Vec::new();
        let mut responded = false;
        // 外层 None 表示尚未获取，内层 None 表示获取失败
        let mut favicon: Option<Option<String>> = None;

        for shape in shapes {
            if stats.failures > self.max_failures {
                warn!(
                    "目标 {} 请求失败次数 {} 超过阈值 {}，停止探测",
                    target_url, stats.failures, self.max_failures
                );
                stats.aborted = true;
                break;
            }

            let request = match self.build_request(&base, shape) {
                Ok(request) => request,
                Err(e) => {
                    warn!("{}", e);
                    stats.skipped += 1;
                    continue;
                }
            };

            stats.attempted += 1;
            let response = match self.client.execute(request).await {
                Ok(response) => response,
                Err(e) => {
                    stats.failures += 1;
                    let reason = if e.is_timeout() { "超时" } else { "连接错误" };
                    warn!(
                        "{}",
                        RsFingerError::ProbeTransportError(format!(
                            "{}{}（{}）：{}",
                            target_url, shape.path, reason, e
                        ))
                    );
                    continue;
                }
            };
            responded = true;

            let status = response.status().as_u16();
            let body = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(
                        "{}",
                        RsFingerError::BodyReadError(format!("{}{}：{}", target_url, shape.path, e))
                    );
                    stats.skipped += 1;
                    continue;
                }
            };
            let body = String::from_utf8_lossy(&body);

            if shape.needs_favicon() && favicon.is_none() {
                favicon = Some(self.fetch_favicon_hash(&base).await);
            }
            let favicon_hash = favicon.as_ref().and_then(|hash| hash.as_deref());

            if let Some(tag) = MatchEngine::evaluate(&shape.criteria, status, &body, favicon_hash) {
                if !tags.iter().any(|t| t.name == tag.name) {
                    tags.push(tag.clone());
                }
            }
        }

        debug!(
            "目标探测完成：{}，命中={}，请求={}，失败={}，跳过={}",
            target_url,
            tags.len(),
            stats.attempted,
            stats.failures,
            stats.skipped
        );

        let result = if stats.attempted > 0 && !responded {
            warn!("目标不可达：{}", target_url);
            CheckResult::failed(target_url)
        } else {
            CheckResult::passed(target_url, tags)
        };
        ProbeReport { result, stats }
    }

    /// 根据请求模板构建请求
    fn build_request(&self, base: &Url, shape: &ProbeShape) -> RsfResult<Request> {
        let construction_error =
            |reason: String| RsFingerError::ProbeConstructionError(format!("{} {}：{}", shape.method, shape.path, reason));

        let url = base
            .join(&shape.path)
            .map_err(|e| construction_error(e.to_string()))?;
        let method = Method::from_bytes(shape.method.as_bytes())
            .map_err(|e| construction_error(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &shape.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| construction_error(format!("无效Header名称 {}：{}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| construction_error(format!("无效Header值 {}：{}", value, e)))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, self.user_agent.clone());
        }

        let mut builder = self.client.request(method, url).headers(headers);
        if !shape.body.is_empty() {
            builder = builder.body(shape.body.clone());
        }
        builder.build().map_err(|e| construction_error(e.to_string()))
    }

    /// 获取目标 `/favicon.ico` 的 MD5，非 200 或出错时返回 None
    async fn fetch_favicon_hash(&self, base: &Url) -> Option<String> {
        let url = base.join("/favicon.ico").ok()?;
        let response = match self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("favicon获取失败：{}：{}", url, e);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            debug!("favicon状态码异常：{}：{}", url, response.status());
            return None;
        }

        let body = response.bytes().await.ok()?;
        let hash = sum_md5(&body);
        debug!("favicon哈希：{}：{}", url, hash);
        Some(hash)
    }
}
