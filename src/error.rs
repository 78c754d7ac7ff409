//! 에러 타입 정의 모듈
//!
//! jsoncsv에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 설정 에러는 실행 전에 치명적으로 처리되고, 문서 단위 에러는 해당 파일만 건너뜁니다.

use std::path::PathBuf;
use thiserror::Error;

/// jsoncsv에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum JsonCsvError {
    /// 입력 폴더가 존재하지 않음
    #[error("입력 폴더를 찾을 수 없습니다: {path}")]
    InputNotFound { path: PathBuf },

    /// 입력이 폴더가 아님
    #[error("입력 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 헤더가 비어 있음
    #[error("헤더가 비어 있습니다. 추출할 필드를 하나 이상 지정하세요")]
    EmptyHeader,

    /// 구분자가 비어 있음
    #[error("구분자는 빈 문자열일 수 없습니다")]
    EmptyDelimiter,

    /// 배치 크기가 양수가 아님
    #[error("배치 크기는 양수여야 합니다: {value}")]
    InvalidBatchSize { value: i64 },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// JSON 파일 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// JSON 파싱 실패
    #[error("JSON 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// 최상위 값이 객체가 아님
    #[error("최상위 값이 JSON 객체가 아닙니다 ({file}): {kind}")]
    NotADocument { file: PathBuf, kind: &'static str },

    /// 배치/결과 파일 쓰기 실패
    #[error("파일 쓰기 실패 ({file}): {source}")]
    WriteError {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 배치 파일 읽기 실패 (병합 단계)
    #[error("파일 읽기 실패 ({file}): {source}")]
    ReadError {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 이전 실행의 배치 파일 삭제 실패
    #[error("이전 배치 파일을 삭제할 수 없습니다 ({file}): {source}")]
    CleanupError {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 스레드 풀 초기화 실패
    #[error("스레드 풀 초기화 실패: {reason}")]
    ThreadPoolError { reason: String },
}

impl JsonCsvError {
    /// 실행을 중단시키는 설정 에러인지 여부
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            JsonCsvError::InputNotFound { .. }
                | JsonCsvError::NotADirectory { .. }
                | JsonCsvError::EmptyHeader
                | JsonCsvError::EmptyDelimiter
                | JsonCsvError::InvalidBatchSize { .. }
                | JsonCsvError::InvalidPattern { .. }
        )
    }
}

/// jsoncsv 결과 타입 별칭
pub type Result<T> = std::result::Result<T, JsonCsvError>;
