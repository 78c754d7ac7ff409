//! JSON 문서 모듈
//!
//! 파일을 JSON 트리로 읽어들이고, 평탄화에 사용되는 노드 분류
//! (`Scalar` / `Document` / `Collection`)를 제공합니다.

use memmap2::Mmap;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{JsonCsvError, Result};

/// 이 크기 이상인 파일은 메모리 매핑으로 파싱 (10MB)
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 최상위 문서 (필드 선언 순서 유지)
pub type Document = Map<String, Value>;

/// 문서 트리의 노드 분류
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// 문자열, 숫자, 불리언, null
    Scalar(&'a Value),
    /// 이름이 있는 하위 노드를 가진 중첩 문서
    Document(&'a Document),
    /// 이름 없는 노드의 나열
    Collection(&'a [Value]),
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Document(map),
            Value::Array(items) => Node::Collection(items),
            scalar => Node::Scalar(scalar),
        }
    }
}

impl<'a> Node<'a> {
    /// 노드의 기본 문자열 표현
    ///
    /// 문자열은 따옴표 없이 그대로, 그 외 스칼라는 JSON 리터럴로,
    /// 문서와 컬렉션은 압축된 JSON으로 표현합니다.
    pub fn render(&self) -> String {
        match self {
            Node::Scalar(Value::String(s)) => s.clone(),
            Node::Scalar(v) => v.to_string(),
            // 문자열 키만 가진 맵/배열의 직렬화는 실패하지 않음
            Node::Document(map) => serde_json::to_string(map).unwrap_or_default(),
            Node::Collection(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }

    /// 열거 가능한 노드의 원소 수 (스칼라는 `None`)
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Node::Scalar(_) => None,
            Node::Document(map) => Some(map.len()),
            Node::Collection(items) => Some(items.len()),
        }
    }
}

/// 파일을 읽어 최상위 문서로 파싱
///
/// # Arguments
/// * `path` - JSON 파일 경로
/// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑 사용
///
/// # Returns
/// 최상위 JSON 객체. 파일을 열 수 없거나, 파싱에 실패하거나,
/// 최상위 값이 객체가 아니면 에러
pub fn load_document(path: &Path, mmap_threshold: u64) -> Result<Document> {
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let value = if file_size >= mmap_threshold {
        parse_with_mmap(path)?
    } else {
        parse_with_reader(path)?
    };

    into_document(path, value)
}

/// 파싱된 값을 최상위 문서로 변환
pub fn into_document(path: &Path, value: Value) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(JsonCsvError::NotADocument {
            file: path.to_path_buf(),
            kind: kind_name(&other),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 버퍼 리더를 사용한 JSON 파싱
fn parse_with_reader(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| JsonCsvError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| JsonCsvError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| JsonCsvError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| JsonCsvError::FileOpenError {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| JsonCsvError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_node_classification() {
        let v = json!({"a": 1});
        assert!(matches!(Node::from(&v), Node::Document(_)));
        let v = json!([1, 2]);
        assert!(matches!(Node::from(&v), Node::Collection(_)));
        let v = json!("text");
        assert!(matches!(Node::from(&v), Node::Scalar(_)));
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(Node::from(&json!("plain")).render(), "plain");
        assert_eq!(Node::from(&json!(42)).render(), "42");
        assert_eq!(Node::from(&json!(1.5)).render(), "1.5");
        assert_eq!(Node::from(&json!(true)).render(), "true");
        assert_eq!(Node::from(&Value::Null).render(), "null");
    }

    #[test]
    fn test_render_containers_compact() {
        assert_eq!(Node::from(&json!({"b": 1, "a": "x"})).render(), r#"{"b":1,"a":"x"}"#);
        assert_eq!(Node::from(&json!([1, "two", null])).render(), r#"[1,"two",null]"#);
    }

    #[test]
    fn test_element_count() {
        assert_eq!(Node::from(&json!([1, 2, 3])).element_count(), Some(3));
        assert_eq!(Node::from(&json!({"a": 1, "b": 2})).element_count(), Some(2));
        assert_eq!(Node::from(&json!("abc")).element_count(), None);
    }

    #[test]
    fn test_load_document_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();

        let doc = load_document(&path, DEFAULT_MMAP_THRESHOLD).unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_load_document_with_mmap() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"id": 7}"#).unwrap();

        let doc = load_document(&path, 0).unwrap();
        assert_eq!(doc.get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_top_level_array_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arr.json");
        fs::write(&path, r#"[{"id": 1}]"#).unwrap();

        let err = load_document(&path, DEFAULT_MMAP_THRESHOLD).unwrap_err();
        assert!(matches!(err, JsonCsvError::NotADocument { kind: "array", .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"id": 1, broken"#).unwrap();

        let err = load_document(&path, DEFAULT_MMAP_THRESHOLD).unwrap_err();
        assert!(matches!(err, JsonCsvError::ParseError { .. }));
    }
}
