//! 컬럼 인덱스 모듈
//!
//! 사용자가 지정한 헤더(필드 이름 목록)를 출력 컬럼 위치로 매핑합니다.
//! 필드 이름은 대소문자를 구분하지 않으며, 헤더에 같은 이름이 여러 번 나오면
//! 해당 필드 값이 모든 위치에 기록됩니다.

use std::collections::HashMap;

use crate::error::{JsonCsvError, Result};

/// 필드 이름 → 컬럼 위치 목록 매핑
///
/// 실행당 한 번 생성되며 이후에는 읽기 전용입니다.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    header: Vec<String>,
    positions: HashMap<String, Vec<usize>>,
}

impl ColumnIndex {
    /// 순서가 있는 헤더로부터 컬럼 인덱스 생성
    ///
    /// # Arguments
    /// * `header` - 출력 컬럼 순서대로 나열된 필드 이름
    ///
    /// # Returns
    /// 생성된 `ColumnIndex` 또는 이름이 하나도 없으면 `EmptyHeader` 에러
    pub fn new(header: Vec<String>) -> Result<Self> {
        if header.iter().all(|name| name.is_empty()) {
            return Err(JsonCsvError::EmptyHeader);
        }

        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            positions.entry(fold(name)).or_default().push(i);
        }

        Ok(Self { header, positions })
    }

    /// 쉼표로 구분된 헤더 문자열로부터 생성
    ///
    /// 각 이름의 앞뒤 공백은 제거됩니다. 빈 이름도 위치를 차지하므로
    /// `id,,name`은 가운데가 빈 세 컬럼이 됩니다.
    ///
    /// # Examples
    /// ```
    /// use jsoncsv::columns::ColumnIndex;
    ///
    /// let index = ColumnIndex::parse("id, Name,id").unwrap();
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.lookup("NAME"), Some(&[1][..]));
    /// assert_eq!(index.lookup("id"), Some(&[0, 2][..]));
    /// assert_eq!(index.lookup("missing"), None);
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        Self::new(split_header(header))
    }

    /// 필드 이름에 매핑된 컬럼 위치 조회 (없으면 `None`)
    pub fn lookup(&self, name: &str) -> Option<&[usize]> {
        self.positions.get(&fold(name)).map(Vec::as_slice)
    }

    /// 출력 컬럼 수
    pub fn len(&self) -> usize {
        self.header.len()
    }

    /// 컬럼이 없는지 여부 (생성 시 검증되므로 항상 false)
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// 입력 순서 그대로의 헤더 이름
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

/// 헤더 문자열을 필드 이름 목록으로 분리 (빈 이름도 위치로 유지)
pub fn split_header(header: &str) -> Vec<String> {
    header.split(',').map(|s| s.trim().to_string()).collect()
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
