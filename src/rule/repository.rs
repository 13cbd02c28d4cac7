//! 规则仓库
//! 以请求模板哈希为键存放去重后的探测模板；加载完成后只读共享

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use super::model::{FingerTag, FingerprintRule, ProbeShape, ResponseCriterion};
use crate::error::RsfResult;

/// 规则仓库
#[derive(Debug, Clone, Default)]
pub struct RuleRepository {
    shapes: HashMap<String, ProbeShape>,
}

impl RuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一条规则定义：相同请求模板的匹配条件按出现顺序追加
    ///
    /// 返回新增的请求模板数量
    pub fn insert(&mut self, rule: &FingerprintRule) -> RsfResult<usize> {
        let tag = FingerTag {
            name: rule.name.clone(),
            priority: rule.priority,
            classification_tags: rule.classification_tags.clone(),
        };

        let mut created = 0;
        for entry in &rule.fingerprint {
            let shape = ProbeShape::from_entry(entry);
            let hash = shape.hash_key()?;
            let criterion = ResponseCriterion {
                expected_status: entry.status_code,
                keywords: entry.keyword.clone(),
                favicon_hashes: entry
                    .favicon_hash
                    .iter()
                    .map(|h| h.trim().to_lowercase())
                    .collect(),
                tag: tag.clone(),
            };

            match self.shapes.entry(hash) {
                Entry::Occupied(mut occupied) => {
                    debug!(
                        "请求模板已存在，合并匹配条件：规则={}，路径={}，键={}",
                        rule.name,
                        occupied.get().path,
                        occupied.key()
                    );
                    occupied.get_mut().criteria.push(criterion);
                }
                Entry::Vacant(vacant) => {
                    let mut shape = shape;
                    shape.criteria.push(criterion);
                    vacant.insert(shape);
                    created += 1;
                }
            }
        }
        Ok(created)
    }

    /// 按哈希获取请求模板
    pub fn get(&self, hash: &str) -> Option<&ProbeShape> {
        self.shapes.get(hash)
    }

    /// 遍历全部请求模板（顺序不固定）
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProbeShape)> {
        self.shapes.iter()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ProbeShape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// 匹配条件总数
    pub fn criteria_count(&self) -> usize {
        self.shapes.values().map(|s| s.criteria.len()).sum()
    }
}
