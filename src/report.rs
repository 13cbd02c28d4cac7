//! 检测结果输出
//! 控制台输出与 JSON Lines 文件输出

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::RsfResult;
use crate::rule::CheckResult;

/// 将检测结果序列化为单行 JSON
pub fn render_json(result: &CheckResult) -> RsfResult<String> {
    Ok(serde_json::to_string(result)?)
}

/// 结果输出接口
pub trait Reporter: Send {
    fn report(&mut self, result: &CheckResult) -> RsfResult<()>;

    fn finish(&mut self) -> RsfResult<()> {
        Ok(())
    }
}

/// 收集到内存（测试或嵌入调用）
impl Reporter for Vec<CheckResult> {
    fn report(&mut self, result: &CheckResult) -> RsfResult<()> {
        self.push(result.clone());
        Ok(())
    }
}

/// 控制台输出
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, result: &CheckResult) -> RsfResult<()> {
        println!("Match found: {}", render_json(result)?);
        Ok(())
    }
}

/// JSON Lines 文件输出
pub struct JsonLinesReporter {
    writer: BufWriter<File>,
}

impl JsonLinesReporter {
    pub fn create(path: &Path) -> RsfResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Reporter for JsonLinesReporter {
    fn report(&mut self, result: &CheckResult) -> RsfResult<()> {
        writeln!(self.writer, "{}", render_json(result)?)?;
        Ok(())
    }

    fn finish(&mut self) -> RsfResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// 同时输出到多个目标
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }
}

impl Reporter for MultiReporter {
    fn report(&mut self, result: &CheckResult) -> RsfResult<()> {
        for reporter in &mut self.reporters {
            reporter.report(result)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> RsfResult<()> {
        for reporter in &mut self.reporters {
            reporter.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FingerTag;

    #[test]
    fn test_render_json_record_shape() {
        let result = CheckResult::passed(
            "http://example.com".to_string(),
            vec![FingerTag {
                name: "nginx".to_string(),
                priority: 3,
                classification_tags: vec![vec!["nginx".to_string()]],
            }],
        );
        let line = render_json(&result).unwrap();
        assert_eq!(
            line,
            r#"{"target":"http://example.com","tags":[{"name":"nginx","priority":3,"classification_tags":[["nginx"]]}],"is_passed":true}"#
        );
    }

    #[test]
    fn test_json_lines_reporter_writes_one_line_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let mut reporter = JsonLinesReporter::create(&path).unwrap();
        reporter
            .report(&CheckResult::passed("http://a.test".to_string(), Vec::new()))
            .unwrap();
        reporter.report(&CheckResult::failed("ftp://x".to_string())).unwrap();
        reporter.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: CheckResult = serde_json::from_str(lines[1]).unwrap();
        assert!(!second.is_passed);
    }
}
