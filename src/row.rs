//! 행 조립 모듈
//!
//! 행 버퍼를 구분자로 연결된 한 줄로 만들고, 헤더 라인을 렌더링합니다.

use crate::columns::ColumnIndex;
use crate::flatten::{FlattenOptions, RowBuffer};

/// 파일 이름 태깅 시 추가되는 컬럼 이름
pub const FILE_NAME_COLUMN: &str = "FileName";

/// 행 조립기
#[derive(Debug, Clone)]
pub struct RowAssembler<'a> {
    columns: &'a ColumnIndex,
    options: &'a FlattenOptions,
    tag_file_name: bool,
}

impl<'a> RowAssembler<'a> {
    pub fn new(columns: &'a ColumnIndex, options: &'a FlattenOptions, tag_file_name: bool) -> Self {
        Self {
            columns,
            options,
            tag_file_name,
        }
    }

    /// 헤더 라인 렌더링 (줄바꿈 제외)
    pub fn header_line(&self) -> String {
        let mut fields: Vec<&str> = Vec::with_capacity(self.field_count());
        if self.tag_file_name {
            fields.push(FILE_NAME_COLUMN);
        }
        fields.extend(self.columns.header().iter().map(String::as_str));
        fields.join(self.options.delimiter.as_str())
    }

    /// 행 버퍼를 한 줄로 조립 (줄바꿈 제외)
    ///
    /// 값이 없는 위치는 빈 필드로 채워지며, 마지막 구분자는 붙지 않습니다.
    ///
    /// # Arguments
    /// * `row` - 평탄화 결과
    /// * `file_name` - 파일 이름 태깅 시 첫 컬럼에 들어갈 원본 파일 이름
    pub fn assemble(&self, row: &RowBuffer, file_name: &str) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(self.field_count());
        if self.tag_file_name {
            fields.push(self.options.sanitize(file_name.to_string()));
        }
        fields.extend((0..self.columns.len()).map(|i| row.get(&i).cloned().unwrap_or_default()));
        fields.join(self.options.delimiter.as_str())
    }

    /// 한 행의 필드 수
    pub fn field_count(&self) -> usize {
        self.columns.len() + usize::from(self.tag_file_name)
    }
}
