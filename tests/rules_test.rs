//! 内置规则目录加载测试

use std::path::PathBuf;

use rsfinger::RuleLoader;

#[tokio::test]
async fn test_bundled_rules_load_and_merge() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web_fingerprint");
    let repo = RuleLoader::load(&dir).await.expect("bundled rules should load");

    // nginx 与 tomcat 共用 GET / 请求
    assert_eq!(repo.len(), 3);
    assert_eq!(repo.criteria_count(), 4);

    let root = repo.shapes().find(|s| s.path == "/").unwrap();
    let names: Vec<&str> = root.criteria.iter().map(|c| c.tag.name.as_str()).collect();
    assert_eq!(names, vec!["nginx", "tomcat"]);
}
