//! 실행 설정 모듈
//!
//! CLI 인자(또는 대화형 입력)를 검증하여 한 번의 실행에 필요한 설정으로
//! 변환합니다. 검증에 실패하면 아무 파일도 쓰기 전에 실행이 중단됩니다.

use std::path::PathBuf;

use crate::batch::BatchSize;
use crate::cli::Args;
use crate::columns::ColumnIndex;
use crate::error::{JsonCsvError, Result};
use crate::flatten::FlattenOptions;
use crate::merge::MergeOrder;
use crate::pattern::PatternMatcher;
use crate::processor::ProcessContext;

/// 검증된 실행 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON 파일이 있는 폴더
    pub input_dir: PathBuf,
    /// 배치 파일과 결과 파일을 쓸 폴더
    pub output_dir: PathBuf,
    /// 결과 파일 경로
    pub output_file: PathBuf,
    pub columns: ColumnIndex,
    pub flatten: FlattenOptions,
    pub batch_size: BatchSize,
    pub tag_file_name: bool,
    pub merge_order: MergeOrder,
    pub max_depth: usize,
    pub pattern: Option<String>,
    /// 병렬 처리 스레드 수 (1이면 순차 처리)
    pub threads: usize,
    pub log: Option<PathBuf>,
    pub dry_run: bool,
}

impl Config {
    /// CLI 인자로부터 설정 생성
    ///
    /// # Errors
    /// 입력 폴더가 없거나 폴더가 아닌 경우, 헤더나 구분자가 비어 있는 경우,
    /// 배치 크기가 양수가 아닌 경우, 패턴이 잘못된 경우
    pub fn from_args(args: &Args) -> Result<Self> {
        let input_dir = args.input.clone();
        if !input_dir.exists() {
            return Err(JsonCsvError::InputNotFound { path: input_dir });
        }
        if !input_dir.is_dir() {
            return Err(JsonCsvError::NotADirectory { path: input_dir });
        }

        let columns = ColumnIndex::new(args.get_header().unwrap_or_default())?;

        let delimiter = unescape(&args.delimiter);
        if delimiter.is_empty() {
            return Err(JsonCsvError::EmptyDelimiter);
        }
        let flatten = FlattenOptions::new()
            .with_delimiter(delimiter)
            .with_escape_delimiter(args.escape_delimiter.as_deref().map(unescape))
            .with_counts_only(args.counts_only);

        let batch_size = BatchSize::from_option(args.batch_size)?;

        // 잘못된 패턴은 파일 탐색 전에 걸러냄
        PatternMatcher::new(args.pattern.clone())?;

        let output_dir = args.output_dir.clone().unwrap_or_else(|| input_dir.clone());
        let output_file = output_dir.join(&args.output);

        Ok(Self {
            input_dir,
            output_dir,
            output_file,
            columns,
            flatten,
            batch_size,
            tag_file_name: args.file_name,
            merge_order: args.merge_order,
            max_depth: args.max_depth.max(1),
            pattern: args.pattern.clone(),
            threads: args.threads.unwrap_or(1).max(1),
            log: args.log.clone(),
            dry_run: args.dry_run,
        })
    }

    /// 파일 처리에 쓰이는 컨텍스트 생성
    pub fn process_context(&self) -> ProcessContext {
        ProcessContext::new(self.columns.clone(), self.flatten.clone())
            .with_file_name(self.tag_file_name)
    }

    /// 결과 파일 첫 줄
    pub fn header_line(&self) -> String {
        crate::row::RowAssembler::new(&self.columns, &self.flatten, self.tag_file_name)
            .header_line()
    }
}

/// 구분자 입력의 `\t` 표기를 탭 문자로 변환
fn unescape(delimiter: &str) -> String {
    delimiter.replace("\\t", "\t")
}
