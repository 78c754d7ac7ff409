//! 패턴 매칭 모듈
//!
//! glob 패턴을 사용한 입력 파일 필터링을 담당합니다.

use glob::Pattern;
use std::path::Path;

use crate::error::{JsonCsvError, Result};

/// 컴파일된 입력 파일 필터
#[derive(Debug, Default)]
pub struct PatternMatcher {
    pattern: Option<Pattern>,
}

impl PatternMatcher {
    /// 새 패턴 매처 생성
    ///
    /// # Arguments
    /// * `pattern` - 글로브 패턴 문자열 (None이면 모든 파일 매칭)
    ///
    /// # Examples
    /// ```
    /// use jsoncsv::pattern::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new(Some("order_*".to_string())).unwrap();
    /// assert!(matcher.matches("order_17.json"));
    /// assert!(!matcher.matches("invoice_17.json"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(p) => Some(
                Pattern::new(&p).map_err(|_| JsonCsvError::InvalidPattern { pattern: p })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 파일 이름이 패턴과 일치하는지 확인 (패턴이 없으면 항상 true)
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }

    /// `.json` 확장자(대소문자 무시)이고 이름이 패턴과 일치하는 파일인지 확인
    pub fn accepts(&self, path: &Path) -> bool {
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        is_json
            && path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| self.matches(s))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matcher_with_wildcard() {
        let matcher = PatternMatcher::new(Some("*_SUM_*".to_string())).unwrap();
        assert!(matcher.matches("HS_H_323503_SUM_15.json"));
        assert!(!matcher.matches("SUM.json"));
    }

    #[test]
    fn test_accepts_json_extension_only() {
        let matcher = PatternMatcher::new(None).unwrap();
        assert!(matcher.accepts(Path::new("dir/a.json")));
        assert!(matcher.accepts(Path::new("dir/B.JSON")));
        assert!(!matcher.accepts(Path::new("dir/a.jsonl")));
        assert!(!matcher.accepts(Path::new("dir/j_results_1.txt")));
        assert!(!matcher.accepts(Path::new("dir/json")));
    }

    #[test]
    fn test_accepts_with_pattern() {
        let matcher = PatternMatcher::new(Some("file[0-9].json".to_string())).unwrap();
        assert!(matcher.accepts(Path::new("file1.json")));
        assert!(!matcher.accepts(Path::new("fileA.json")));
    }

    #[test]
    fn test_pattern_matcher_invalid() {
        let result = PatternMatcher::new(Some("[invalid".to_string()));
        assert!(matches!(result, Err(JsonCsvError::InvalidPattern { .. })));
    }
}
