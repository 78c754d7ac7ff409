//! JSON 파일 처리 모듈
//!
//! 개별 JSON 파일의 읽기, 파싱, 평탄화, 행 조립을 담당합니다.

use std::path::{Path, PathBuf};

use crate::columns::ColumnIndex;
use crate::document::{load_document, DEFAULT_MMAP_THRESHOLD};
use crate::error::Result;
use crate::flatten::{flatten_document, FlattenOptions};
use crate::row::RowAssembler;

/// 파일 처리 결과
#[derive(Debug)]
pub struct ProcessResult {
    /// 처리된 파일 경로
    pub path: PathBuf,
    /// 조립된 행 (성공 시, 줄바꿈 제외)
    pub row: Option<String>,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 원본 파일 크기
    pub file_size: u64,
}

impl ProcessResult {
    /// 성공 결과 생성
    pub fn success(path: PathBuf, row: String, file_size: u64) -> Self {
        Self {
            path,
            row: Some(row),
            error: None,
            file_size,
        }
    }

    /// 실패 결과 생성
    pub fn failure(path: PathBuf, error: String, file_size: u64) -> Self {
        Self {
            path,
            row: None,
            error: Some(error),
            file_size,
        }
    }

    /// 성공 여부
    pub fn is_success(&self) -> bool {
        self.row.is_some()
    }
}

/// 모든 파일에 공통으로 쓰이는 처리 컨텍스트
#[derive(Debug, Clone)]
pub struct ProcessContext {
    pub columns: ColumnIndex,
    pub options: FlattenOptions,
    /// 각 행 앞에 원본 파일 이름 컬럼 추가
    pub tag_file_name: bool,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl ProcessContext {
    /// 기본 컨텍스트 생성
    pub fn new(columns: ColumnIndex, options: FlattenOptions) -> Self {
        Self {
            columns,
            options,
            tag_file_name: false,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }

    /// 파일 이름 태깅 설정
    pub fn with_file_name(mut self, tag_file_name: bool) -> Self {
        self.tag_file_name = tag_file_name;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    /// 이 컨텍스트의 행 조립기
    pub fn assembler(&self) -> RowAssembler<'_> {
        RowAssembler::new(&self.columns, &self.options, self.tag_file_name)
    }
}

/// 단일 JSON 파일 처리
///
/// 파싱 실패는 에러로 전파하지 않고 실패 결과로 돌려주어,
/// 호출자가 해당 파일만 건너뛰고 계속 진행할 수 있게 합니다.
///
/// # Arguments
/// * `path` - 처리할 JSON 파일 경로
/// * `ctx` - 처리 컨텍스트
pub fn process_file(path: PathBuf, ctx: &ProcessContext) -> ProcessResult {
    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    match process_file_internal(&path, ctx) {
        Ok(row) => ProcessResult::success(path, row, file_size),
        Err(e) => ProcessResult::failure(path, e.to_string(), file_size),
    }
}

fn process_file_internal(path: &Path, ctx: &ProcessContext) -> Result<String> {
    let document = load_document(path, ctx.mmap_threshold)?;
    let row = flatten_document(&document, &ctx.columns, &ctx.options);

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    Ok(ctx.assembler().assemble(&row, &file_name))
}
