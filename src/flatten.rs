//! 문서 평탄화 모듈
//!
//! 중첩된 JSON 문서를 깊이 우선으로 순회하면서 헤더에 매핑된 필드 값을
//! 컬럼 위치별로 수집합니다.

use std::collections::BTreeMap;

use crate::columns::ColumnIndex;
use crate::document::{Document, Node};

/// 컬럼 위치 → 렌더링된 값 (위치 순으로 정렬)
pub type RowBuffer = BTreeMap<usize, String>;

/// 평탄화 옵션
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// 행을 연결할 기본 구분자
    pub delimiter: String,
    /// 값 안의 기본 구분자를 대체할 보조 구분자
    pub escape_delimiter: Option<String>,
    /// 컬렉션을 내용 대신 원소 수로 표현
    pub counts_only: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            escape_delimiter: None,
            counts_only: false,
        }
    }
}

impl FlattenOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 구분자 설정
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// 보조 구분자 설정 (빈 문자열이면 대체하지 않음)
    pub fn with_escape_delimiter(mut self, escape: Option<String>) -> Self {
        self.escape_delimiter = escape.filter(|s| !s.is_empty());
        self
    }

    /// 개수 전용 모드 설정
    pub fn with_counts_only(mut self, counts_only: bool) -> Self {
        self.counts_only = counts_only;
        self
    }

    /// 값 안의 줄바꿈을 공백으로, 기본 구분자를 보조 구분자로 치환
    ///
    /// 한 문서는 항상 한 줄이어야 하므로 줄바꿈 치환은 보조 구분자와
    /// 관계없이 적용됩니다. `\r\n`은 공백 하나가 됩니다.
    pub fn sanitize(&self, value: String) -> String {
        let value = if value.contains(['\n', '\r']) {
            value.replace("\r\n", " ").replace(['\n', '\r'], " ")
        } else {
            value
        };

        match &self.escape_delimiter {
            Some(escape) if value.contains(self.delimiter.as_str()) => {
                value.replace(self.delimiter.as_str(), escape)
            }
            _ => value,
        }
    }
}

/// 문서 하나를 평탄화하여 행 버퍼 생성
///
/// 같은 이름의 필드가 여러 깊이에 나타나면 마지막으로 방문한 값이 남습니다.
pub fn flatten_document(
    document: &Document,
    columns: &ColumnIndex,
    options: &FlattenOptions,
) -> RowBuffer {
    let mut row = RowBuffer::new();
    visit(document, columns, options, &mut row);
    row
}

fn visit(
    document: &Document,
    columns: &ColumnIndex,
    options: &FlattenOptions,
    row: &mut RowBuffer,
) {
    for (name, value) in document {
        let node = Node::from(value);

        if let Node::Document(child) = node {
            visit(child, columns, options, row);
        }

        let Some(positions) = columns.lookup(name) else {
            continue;
        };

        let rendered = render_value(node, options);
        for &pos in positions {
            row.insert(pos, rendered.clone());
        }
    }
}

fn render_value(node: Node<'_>, options: &FlattenOptions) -> String {
    let rendered = match node.element_count() {
        Some(count) if options.counts_only => count.to_string(),
        _ => node.render(),
    };
    options.sanitize(rendered)
}
