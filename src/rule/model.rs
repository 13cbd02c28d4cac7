//! 规则数据模型定义
//! 规则文件结构、去重后的探测请求模板、单目标检测结果

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RsfResult;
use crate::utils::sum_md5;

/// 规则文件（一个技术家族一个文件）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FingerprintRule {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    // 兼容旧规则的 nuclei_tags 字段
    #[serde(default, alias = "nuclei_tags")]
    pub classification_tags: Vec<Vec<String>>,
    #[serde(default)]
    pub fingerprint: Vec<FingerprintEntry>,
}

/// 规则中的单条指纹：请求部分 + 响应匹配部分
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FingerprintEntry {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_method")]
    pub request_method: String,
    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub request_data: String,
    #[serde(default)]
    pub status_code: u16,
    // 仅做结构兼容，匹配时不使用
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub keyword: Vec<String>,
    #[serde(default)]
    pub favicon_hash: Vec<String>,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

/// 指纹标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTag {
    pub name: String,
    pub priority: i32,
    pub classification_tags: Vec<Vec<String>>,
}

impl fmt::Display for FingerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 响应匹配条件，归属于唯一的探测模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCriterion {
    /// 0 表示任意状态码
    pub expected_status: u16,
    /// 全部命中才算关键词匹配
    pub keywords: Vec<String>,
    /// 任一命中才算图标匹配
    pub favicon_hashes: Vec<String>,
    pub tag: FingerTag,
}

impl ResponseCriterion {
    pub fn needs_favicon(&self) -> bool {
        !self.favicon_hashes.is_empty()
    }
}

/// 去重后的探测请求模板
#[derive(Debug, Clone)]
pub struct ProbeShape {
    pub path: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub criteria: Vec<ResponseCriterion>,
}

/// 参与去重键计算的请求字段（字段顺序即 JSON 键顺序）
#[derive(Serialize)]
struct ProbeKey<'a> {
    body: &'a str,
    headers: &'a BTreeMap<String, String>,
    method: &'a str,
    path: &'a str,
}

impl ProbeShape {
    /// 从规则条目构建请求模板（方法统一大写，不含匹配条件）
    pub fn from_entry(entry: &FingerprintEntry) -> Self {
        let method = entry.request_method.trim().to_uppercase();
        let path = entry.path.trim();
        Self {
            path: if path.is_empty() { default_path() } else { path.to_string() },
            method: if method.is_empty() { default_method() } else { method },
            headers: entry.request_headers.clone(),
            body: entry.request_data.clone(),
            criteria: Vec::new(),
        }
    }

    /// 请求模板去重键：{path, method, headers, body} 的 JSON 编码取 MD5
    pub fn hash_key(&self) -> RsfResult<String> {
        let key = ProbeKey {
            body: &self.body,
            headers: &self.headers,
            method: &self.method,
            path: &self.path,
        };
        let data = serde_json::to_vec(&key)?;
        Ok(sum_md5(&data))
    }

    /// 是否有条件依赖 favicon
    pub fn needs_favicon(&self) -> bool {
        self.criteria.iter().any(ResponseCriterion::needs_favicon)
    }
}

/// 单个目标的检测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub target: String,
    pub tags: Vec<FingerTag>,
    /// false 表示目标本身无法处理（区别于"未命中指纹"）
    pub is_passed: bool,
}

impl CheckResult {
    pub fn passed(target: String, tags: Vec<FingerTag>) -> Self {
        Self {
            target,
            tags,
            is_passed: true,
        }
    }

    pub fn failed(target: String) -> Self {
        Self {
            target,
            tags: Vec::new(),
            is_passed: false,
        }
    }

    /// 供漏洞扫描使用的标签串：去重、排序后逗号拼接
    pub fn joined_tag_names(&self) -> String {
        let mut names: Vec<&str> = self.tags.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.join(",")
    }
}
