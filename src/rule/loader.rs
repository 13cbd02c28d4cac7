//! 规则加载管理器
//! 负责从规则目录读取 YAML 指纹规则并构建规则仓库

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::model::FingerprintRule;
use super::repository::RuleRepository;
use crate::error::{RsFingerError, RsfResult};

/// 支持的规则文件扩展名
const RULE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 从目录加载规则仓库
    ///
    /// 目录不可读返回 `RuleDirError`；任一规则文件解析失败立即返回 `RuleParseError`。
    /// 文件按文件名排序处理，保证合并顺序稳定。
    pub async fn load(dir: &Path) -> RsfResult<RuleRepository> {
        let files = Self::list_rule_files(dir).await?;

        let mut repo = RuleRepository::new();
        let mut definitions = 0;
        for file in &files {
            let content = tokio::fs::read_to_string(file).await.map_err(|e| {
                RsFingerError::RuleParseError {
                    file: file.clone(),
                    reason: e.to_string(),
                }
            })?;
            let rule = Self::parse_rule(file, &content)?;
            let created = repo.insert(&rule)?;
            definitions += rule.fingerprint.len();
            debug!(
                "规则文件加载完成：{}，规则={}，指纹条目={}，新增请求模板={}",
                file.display(),
                rule.name,
                rule.fingerprint.len(),
                created
            );
        }

        info!(
            "规则加载完成：文件数={}，指纹条目={}，去重后请求模板={}，匹配条件={}",
            files.len(),
            definitions,
            repo.len(),
            repo.criteria_count()
        );
        Ok(repo)
    }

    /// 从内存中的规则定义构建仓库（按给定顺序合并）
    pub fn from_rules<'a, I>(rules: I) -> RsfResult<RuleRepository>
    where
        I: IntoIterator<Item = &'a FingerprintRule>,
    {
        let mut repo = RuleRepository::new();
        for rule in rules {
            repo.insert(rule)?;
        }
        Ok(repo)
    }

    /// 解析单个规则文件内容
    pub fn parse_rule(file: &Path, content: &str) -> RsfResult<FingerprintRule> {
        serde_yaml::from_str(content).map_err(|e| RsFingerError::RuleParseError {
            file: file.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// 列出目录下的规则文件（已排序）
    async fn list_rule_files(dir: &Path) -> RsfResult<Vec<PathBuf>> {
        let dir_error = |source: std::io::Error| RsFingerError::RuleDirError {
            dir: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(dir_error)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
            if !entry.file_type().await.map_err(dir_error)?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_rule_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| RULE_EXTENSIONS.contains(&ext));
            if is_rule_file {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NGINX_RULE: &str = r#"
name: nginx
priority: 3
nuclei_tags:
  - [nginx]
fingerprint:
  - path: /
    request_method: get
    status_code: 0
    keyword:
      - "<center>nginx</center>"
"#;

    const WELCOME_RULE: &str = r#"
name: welcome-page
priority: 1
classification_tags:
  - [misc, default-page]
fingerprint:
  - path: /
    request_method: GET
    status_code: 200
    keyword: ["Welcome"]
  - path: /admin
    status_code: 200
    keyword: ["Login"]
"#;

    #[tokio::test]
    async fn test_load_merges_shapes_across_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_nginx.yaml"), NGINX_RULE).unwrap();
        std::fs::write(dir.path().join("b_welcome.yml"), WELCOME_RULE).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a rule").unwrap();

        let repo = RuleLoader::load(dir.path()).await.unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.criteria_count(), 3);

        let root = repo.shapes().find(|s| s.path == "/").unwrap();
        let names: Vec<&str> = root.criteria.iter().map(|c| c.tag.name.as_str()).collect();
        assert_eq!(names, vec!["nginx", "welcome-page"]);
        assert_eq!(root.criteria[0].tag.classification_tags, vec![vec!["nginx".to_string()]]);
    }

    #[tokio::test]
    async fn test_load_missing_dir_is_dir_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = RuleLoader::load(&missing).await.unwrap_err();
        assert!(matches!(err, RsFingerError::RuleDirError { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_load_fails_fast_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_nginx.yaml"), NGINX_RULE).unwrap();
        std::fs::write(dir.path().join("b_broken.yaml"), "name: [unclosed").unwrap();

        let err = RuleLoader::load(dir.path()).await.unwrap_err();
        match err {
            RsFingerError::RuleParseError { file, .. } => {
                assert!(file.ends_with("b_broken.yaml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_rules_keeps_given_order() {
        let a = RuleLoader::parse_rule(Path::new("a.yaml"), NGINX_RULE).unwrap();
        let b = RuleLoader::parse_rule(Path::new("b.yaml"), WELCOME_RULE).unwrap();

        let repo = RuleLoader::from_rules([&b, &a]).unwrap();
        let root = repo.shapes().find(|s| s.path == "/").unwrap();
        assert_eq!(root.criteria[0].tag.name, "welcome-page");
        assert_eq!(root.criteria[1].tag.name, "nginx");
    }
}
